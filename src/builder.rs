//! Symbolic builder: fluent construction over human-readable state names.
//!
//! The builder resolves names to identifiers with get-or-create semantics,
//! so states referenced by a transition before being declared come into
//! existence on first mention. It is pure convenience; everything it does
//! can be reproduced through the direct graph-mutation API.

use std::io::Write;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::automaton::{Automaton, HookContext, StateId};
use crate::byteclass::ByteClass;
use crate::debug::DebugFlags;

/// Fluent constructor for [`Automaton`].
///
/// ```
/// use bytefsa::{Builder, ByteClass};
///
/// let mut fsa = Builder::new("three_digits")
///     .transition("START", "D1", ByteClass::digit())
///     .transition("D1", "D2", ByteClass::digit())
///     .transition("D2", "ACCEPT", ByteClass::digit())
///     .start_state("START")
///     .accept_state("ACCEPT")
///     .build();
///
/// assert!(fsa.validate(b"123"));
/// assert!(!fsa.validate(b"12"));
/// ```
pub struct Builder {
    fsa: Automaton,
    names: FxHashMap<String, StateId>,
    start: Option<StateId>,
    accepts: Vec<StateId>,
    pending_merges: Vec<(StateId, StateId, Arc<Automaton>)>,
    last_transition: Option<u32>,
}

impl Builder {
    pub fn new(name: &str) -> Self {
        Self::with_id(0, name)
    }

    pub fn with_id(id: u32, name: &str) -> Self {
        Self {
            fsa: Automaton::with_id_and_name(id, name),
            names: FxHashMap::default(),
            start: None,
            accepts: Vec::new(),
            pending_merges: Vec::new(),
            last_transition: None,
        }
    }

    /// Declare a state by name. States mentioned in transitions are created
    /// implicitly; an explicit declaration is only needed to attach a
    /// description before first use.
    pub fn add_state(mut self, name: &str) -> Self {
        self.get_or_create(name);
        self
    }

    /// Declare a state with a description. Must precede the state's first
    /// mention; a state created implicitly keeps its empty description.
    pub fn add_state_with_description(mut self, name: &str, description: &str) -> Self {
        self.get_or_create_with(name, description);
        self
    }

    pub fn start_state(mut self, name: &str) -> Self {
        let sid = self.get_or_create(name);
        self.start = Some(sid);
        self
    }

    pub fn accept_state(mut self, name: &str) -> Self {
        let sid = self.get_or_create(name);
        self.accepts.push(sid);
        self
    }

    /// Add a class-kind transition at normal priority.
    pub fn transition(mut self, from: &str, to: &str, class: ByteClass) -> Self {
        let from_id = self.get_or_create(from);
        let to_id = self.get_or_create(to);
        let id = self.fsa.add_transition(&from_id, &to_id, class);
        self.last_transition = Some(id);
        self
    }

    pub fn transition_with_priority(
        mut self,
        from: &str,
        to: &str,
        class: ByteClass,
        priority: i32,
    ) -> Self {
        let from_id = self.get_or_create(from);
        let to_id = self.get_or_create(to);
        let id = self
            .fsa
            .add_transition_with_priority(&from_id, &to_id, class, priority);
        self.last_transition = Some(id);
        self
    }

    pub fn transition_with_description(
        mut self,
        from: &str,
        to: &str,
        class: ByteClass,
        description: &str,
        priority: i32,
    ) -> Self {
        let from_id = self.get_or_create(from);
        let to_id = self.get_or_create(to);
        let id = self
            .fsa
            .add_transition_full(&from_id, &to_id, class, description, priority);
        self.last_transition = Some(id);
        self
    }

    pub fn epsilon(mut self, from: &str, to: &str) -> Self {
        let from_id = self.get_or_create(from);
        let to_id = self.get_or_create(to);
        let id = self.fsa.add_epsilon_transition(&from_id, &to_id);
        self.last_transition = Some(id);
        self
    }

    /// Inline a sub-automaton along the named edge. Merges are deferred to
    /// [`build`](Self::build) so they see the finished name map.
    pub fn sub_automaton(mut self, from: &str, to: &str, sub: Arc<Automaton>) -> Self {
        let from_id = self.get_or_create(from);
        let to_id = self.get_or_create(to);
        self.pending_merges.push((from_id, to_id, sub));
        self
    }

    /// Attach a hook to the most recently added transition.
    ///
    /// # Panics
    ///
    /// Panics if no transition has been added yet.
    pub fn on_transition(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        let id = self
            .last_transition
            .expect("on_transition requires a previously added transition");
        self.fsa.set_transition_hook(id, hook);
        self
    }

    pub fn on_state_entry(mut self, name: &str, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        let sid = self.get_or_create(name);
        self.fsa.set_entry_hook(&sid, hook);
        self
    }

    pub fn on_state_exit(mut self, name: &str, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        let sid = self.get_or_create(name);
        self.fsa.set_exit_hook(&sid, hook);
        self
    }

    pub fn mark_choice_point(mut self, name: &str) -> Self {
        let sid = self.get_or_create(name);
        self.fsa.mark_choice_point(&sid);
        self
    }

    pub fn debug_flags(mut self, flags: DebugFlags) -> Self {
        self.fsa.debug_config_mut().flags = flags;
        self
    }

    pub fn enable_debug_flag(mut self, flag: DebugFlags) -> Self {
        self.fsa.debug_config_mut().enable(flag);
        self
    }

    pub fn debug_sink(mut self, sink: Box<dyn Write>) -> Self {
        self.fsa.debug_config_mut().set_sink(sink);
        self
    }

    pub fn basic_debug(self) -> Self {
        self.debug_flags(DebugFlags::BASIC)
    }

    pub fn full_debug(self) -> Self {
        self.debug_flags(DebugFlags::FULL)
    }

    pub fn user_data<T: 'static>(mut self, data: T) -> Self {
        self.fsa.set_user_data(data);
        self
    }

    pub fn max_backtrack_depth(mut self, depth: usize) -> Self {
        self.fsa.set_max_backtrack_depth(depth);
        self
    }

    /// Finish construction.
    ///
    /// # Panics
    ///
    /// Panics if no start state or no accept state was declared.
    pub fn build(mut self) -> Automaton {
        let start = self
            .start
            .clone()
            .expect("cannot build an automaton without a start state");
        assert!(
            !self.accepts.is_empty(),
            "cannot build an automaton without accept states"
        );

        self.fsa.set_start_state(&start);
        for accept in &self.accepts {
            self.fsa.add_accept_state(accept);
        }
        for (from, to, sub) in std::mem::take(&mut self.pending_merges) {
            self.fsa.merge_automaton(&from, &to, &sub);
        }
        self.fsa
    }

    fn get_or_create(&mut self, name: &str) -> StateId {
        self.get_or_create_with(name, "")
    }

    fn get_or_create_with(&mut self, name: &str, description: &str) -> StateId {
        if let Some(sid) = self.names.get(name) {
            return sid.clone();
        }
        let sid = self
            .fsa
            .add_state_with(name, description, crate::automaton::StateRole::Normal);
        self.names.insert(name.to_string(), sid.clone());
        sid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::StreamStatus;

    #[test]
    fn test_states_created_on_first_mention() {
        let fsa = Builder::new("implicit")
            .transition("A", "B", ByteClass::digit())
            .start_state("A")
            .accept_state("B")
            .build();
        assert_eq!(fsa.state_count(), 2);
        assert_eq!(fsa.transition_count(), 1);
    }

    #[test]
    fn test_names_resolve_to_the_same_state() {
        let mut fsa = Builder::new("shared")
            .transition("A", "B", ByteClass::digit())
            .transition("B", "A", ByteClass::alpha())
            .start_state("A")
            .accept_state("A")
            .build();
        assert_eq!(fsa.state_count(), 2);
        assert!(fsa.validate(b"1x"));
        assert!(fsa.validate(b""));
        assert!(!fsa.validate(b"1"));
    }

    #[test]
    #[should_panic(expected = "without a start state")]
    fn test_build_requires_start() {
        let _ = Builder::new("no_start")
            .transition("A", "B", ByteClass::digit())
            .accept_state("B")
            .build();
    }

    #[test]
    #[should_panic(expected = "without accept states")]
    fn test_build_requires_accepts() {
        let _ = Builder::new("no_accept")
            .transition("A", "B", ByteClass::digit())
            .start_state("A")
            .build();
    }

    #[test]
    fn test_sub_automaton_merge_through_builder() {
        let hex = {
            let mut sub = Automaton::with_name("hex");
            let s = sub.add_state("S");
            let a = sub.add_state("A");
            sub.set_start_state(&s);
            sub.add_accept_state(&a);
            sub.add_transition(&s, &a, ByteClass::hexdig());
            Arc::new(sub)
        };

        let mut fsa = Builder::new("framed")
            .transition("START", "OPEN", ByteClass::byte(b'#'))
            .sub_automaton("OPEN", "CLOSE", hex)
            .transition("CLOSE", "DONE", ByteClass::byte(b';'))
            .start_state("START")
            .accept_state("DONE")
            .build();

        assert!(fsa.validate(b"#f;"));
        assert!(!fsa.validate(b"#z;"));
    }

    #[test]
    fn test_hooks_and_user_data_through_builder() {
        let mut fsa = Builder::new("count")
            .transition("S", "A", ByteClass::digit())
            .on_transition(|ctx| {
                if let Some(count) = ctx.user_data_mut::<u32>() {
                    *count += 1;
                }
            })
            .start_state("S")
            .accept_state("A")
            .user_data(0u32)
            .build();

        assert!(fsa.validate(b"5"));
        assert_eq!(fsa.user_data::<u32>(), Some(&1));
    }

    #[test]
    fn test_streaming_through_built_automaton() {
        let mut fsa = Builder::new("stream")
            .transition("S", "A", ByteClass::digit())
            .transition("A", "A", ByteClass::digit())
            .start_state("S")
            .accept_state("A")
            .build();

        assert_eq!(fsa.feed(b'1'), StreamStatus::Complete);
        assert_eq!(fsa.feed(b'2'), StreamStatus::Complete);
        assert_eq!(fsa.end_of_stream(), StreamStatus::Complete);
    }
}
