//! Graph model: states, transitions, and the automaton container.
//!
//! The graph is built once through the mutation API and is logically
//! immutable while validating. All per-run execution state (current state,
//! input buffer, position, captures, stream status, choice stack, counters,
//! last error) lives on the instance; distinct instances share nothing.
//!
//! A derived index from each state to its outgoing transitions, sorted by
//! descending priority with ties keeping insertion order, is marked dirty
//! on every mutation and rebuilt lazily before the next execution.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::byteclass::ByteClass;
use crate::debug::{BacktrackStats, DebugConfig, DebugFlags, Metrics, TraceEntry};
use crate::error::{ErrorKind, ValidationError};

use super::backtrack::ChoicePoint;
use super::capture::CaptureSet;
use super::hooks::{Hook, HookContext};
use super::streaming::StreamStatus;

/// A state identifier: a numeric id plus an optional symbolic name.
///
/// Identity, ordering, and hashing depend only on the numeric id; the name
/// is purely diagnostic. Numeric 0 is reserved to mean "unset/invalid".
#[derive(Clone, Default)]
pub struct StateId {
    pub(crate) id: u32,
    pub(crate) name: Option<Arc<str>>,
}

impl StateId {
    pub(crate) fn new(id: u32, name: Option<&str>) -> Self {
        Self {
            id,
            name: name.map(Arc::from),
        }
    }

    /// The reserved "unset" identifier.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }
}

impl PartialEq for StateId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StateId {}

impl PartialOrd for StateId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StateId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for StateId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "state_{}", self.id),
        }
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "StateId({}, {name:?})", self.id),
            None => write!(f, "StateId({})", self.id),
        }
    }
}

/// Role metadata attached to a state. Authoritative start/accept
/// membership is carried by the owning automaton, not by the role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StateRole {
    #[default]
    Normal,
    Start,
    Accept,
    Error,
}

impl StateRole {
    pub fn as_str(self) -> &'static str {
        match self {
            StateRole::Normal => "normal",
            StateRole::Start => "start",
            StateRole::Accept => "accept",
            StateRole::Error => "error",
        }
    }
}

/// A node in the transition graph.
pub struct State {
    pub id: StateId,
    pub role: StateRole,
    pub description: String,
    /// Biases the backtracking heuristic: a marked state records a choice
    /// point even when only one transition is viable.
    pub choice_point: bool,
    pub(crate) on_entry: Option<Hook>,
    pub(crate) on_exit: Option<Hook>,
}

impl State {
    fn new(id: StateId, role: StateRole, description: String) -> Self {
        Self {
            id,
            role,
            description,
            choice_point: false,
            on_entry: None,
            on_exit: None,
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("description", &self.description)
            .field("choice_point", &self.choice_point)
            .field("on_entry", &self.on_entry.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// What an edge consumes.
#[derive(Clone)]
pub enum TransitionKind {
    /// Consumes one byte admitted by the class.
    Class(ByteClass),
    /// Consumes no input.
    Epsilon,
    /// An embedded sub-automaton. Expanded into the host by composition
    /// before execution; the drivers never execute these directly.
    Sub(Arc<Automaton>),
}

impl TransitionKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransitionKind::Class(_) => "class",
            TransitionKind::Epsilon => "epsilon",
            TransitionKind::Sub(_) => "sub",
        }
    }
}

impl fmt::Debug for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Class(class) => write!(f, "Class({class})"),
            TransitionKind::Epsilon => f.write_str("Epsilon"),
            TransitionKind::Sub(sub) => write!(f, "Sub({})", sub.name()),
        }
    }
}

/// A labeled edge between two states.
pub struct Transition {
    pub id: u32,
    pub from: StateId,
    pub to: StateId,
    pub kind: TransitionKind,
    /// Higher priorities run first; ties keep insertion order.
    pub priority: i32,
    pub description: String,
    pub(crate) hook: Option<Hook>,
}

impl Transition {
    pub const PRIORITY_LOWEST: i32 = 0;
    pub const PRIORITY_LOW: i32 = 25;
    pub const PRIORITY_NORMAL: i32 = 50;
    pub const PRIORITY_HIGH: i32 = 75;
    pub const PRIORITY_HIGHEST: i32 = 100;

    /// Whether this transition consumes the byte. Only class-kind
    /// transitions participate in byte matching.
    #[inline]
    pub fn matches(&self, byte: u8) -> bool {
        match &self.kind {
            TransitionKind::Class(class) => class.matches(byte),
            _ => false,
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("description", &self.description)
            .finish()
    }
}

/// Per-state outgoing transition indices, sorted by descending priority.
pub(crate) type OutgoingIndex = FxHashMap<u32, SmallVec<[u32; 4]>>;

/// A finite-state automaton over 8-bit byte streams.
///
/// Owns the transition graph and all mutable execution state for one run
/// at a time. Instances are not thread-safe; concurrent callers must use
/// distinct instances or external mutual exclusion.
pub struct Automaton {
    id: u32,
    name: String,

    pub(crate) states: FxHashMap<u32, State>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) index: OutgoingIndex,
    pub(crate) index_dirty: bool,
    pub(crate) start: StateId,
    pub(crate) accepts: FxHashSet<u32>,
    next_state_id: u32,
    next_transition_id: u32,

    // Execution state, cleared by `reset` and never shared between runs.
    pub(crate) current: StateId,
    pub(crate) input: Vec<u8>,
    pub(crate) position: usize,
    pub(crate) captures: CaptureSet,
    pub(crate) stream_status: StreamStatus,
    pub(crate) streaming: bool,
    pub(crate) choice_stack: Vec<ChoicePoint>,
    pub(crate) backtrack_stats: BacktrackStats,
    pub(crate) max_backtrack_depth: usize,
    pub(crate) last_error: Option<ValidationError>,

    pub(crate) debug: DebugConfig,
    pub(crate) trace: Vec<TraceEntry>,
    pub(crate) metrics: Metrics,
    pub(crate) user_data: Option<Box<dyn Any>>,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    pub fn new() -> Self {
        Self::with_id_and_name(0, "fsa")
    }

    pub fn with_name(name: &str) -> Self {
        Self::with_id_and_name(0, name)
    }

    pub fn with_id_and_name(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            states: FxHashMap::default(),
            transitions: Vec::new(),
            index: OutgoingIndex::default(),
            index_dirty: true,
            start: StateId::invalid(),
            accepts: FxHashSet::default(),
            next_state_id: 1,
            next_transition_id: 1,
            current: StateId::invalid(),
            input: Vec::new(),
            position: 0,
            captures: CaptureSet::default(),
            stream_status: StreamStatus::Ready,
            streaming: false,
            choice_stack: Vec::new(),
            backtrack_stats: BacktrackStats::default(),
            max_backtrack_depth: 0,
            last_error: None,
            debug: DebugConfig::new(),
            trace: Vec::new(),
            metrics: Metrics::default(),
            user_data: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------
    // State management
    // ------------------------------------------------------------------

    /// Add a Normal state, returning its fresh identifier.
    pub fn add_state(&mut self, name: &str) -> StateId {
        self.add_state_with(name, "", StateRole::Normal)
    }

    /// Add a state with a description and role. Numeric ids are handed out
    /// monotonically starting at 1.
    pub fn add_state_with(&mut self, name: &str, description: &str, role: StateRole) -> StateId {
        let sid = StateId::new(self.next_state_id, (!name.is_empty()).then_some(name));
        self.next_state_id += 1;
        self.states
            .insert(sid.id, State::new(sid.clone(), role, description.to_string()));
        self.index_dirty = true;
        sid
    }

    /// Bind the start state. Also repositions the current state.
    ///
    /// # Panics
    ///
    /// Panics if the state does not exist.
    pub fn set_start_state(&mut self, state: &StateId) {
        let entry = self
            .states
            .get_mut(&state.id)
            .unwrap_or_else(|| panic!("cannot set nonexistent state {state} as start"));
        entry.role = StateRole::Start;
        self.start = state.clone();
        self.current = state.clone();
    }

    /// The bound start state; invalid when unset.
    pub fn start_state(&self) -> &StateId {
        &self.start
    }

    /// # Panics
    ///
    /// Panics if the state does not exist.
    pub fn add_accept_state(&mut self, state: &StateId) {
        let entry = self
            .states
            .get_mut(&state.id)
            .unwrap_or_else(|| panic!("cannot add nonexistent state {state} as accept"));
        if entry.role != StateRole::Start {
            entry.role = StateRole::Accept;
        }
        self.accepts.insert(state.id);
    }

    pub fn remove_accept_state(&mut self, state: &StateId) {
        self.accepts.remove(&state.id);
    }

    pub fn is_accept_state(&self, state: &StateId) -> bool {
        self.accepts.contains(&state.id)
    }

    /// Accept states, sorted by numeric id.
    pub fn accept_states(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self
            .accepts
            .iter()
            .filter_map(|id| self.states.get(id).map(|s| s.id.clone()))
            .collect();
        ids.sort();
        ids
    }

    pub fn current_state(&self) -> &StateId {
        &self.current
    }

    pub fn state(&self, id: &StateId) -> Option<&State> {
        self.states.get(&id.id)
    }

    pub fn has_state(&self, id: &StateId) -> bool {
        self.states.contains_key(&id.id)
    }

    // ------------------------------------------------------------------
    // Transition management
    // ------------------------------------------------------------------

    /// Add a class-kind transition at normal priority. The class
    /// description doubles as the transition description.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint does not exist.
    pub fn add_transition(&mut self, from: &StateId, to: &StateId, class: ByteClass) -> u32 {
        let description = class.description().to_string();
        self.add_transition_full(from, to, class, &description, Transition::PRIORITY_NORMAL)
    }

    /// # Panics
    ///
    /// Panics if either endpoint does not exist.
    pub fn add_transition_with_priority(
        &mut self,
        from: &StateId,
        to: &StateId,
        class: ByteClass,
        priority: i32,
    ) -> u32 {
        let description = class.description().to_string();
        self.add_transition_full(from, to, class, &description, priority)
    }

    /// # Panics
    ///
    /// Panics if either endpoint does not exist.
    pub fn add_transition_full(
        &mut self,
        from: &StateId,
        to: &StateId,
        class: ByteClass,
        description: &str,
        priority: i32,
    ) -> u32 {
        self.push_transition(from, to, TransitionKind::Class(class), description, priority)
    }

    /// Add an epsilon transition at normal priority.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint does not exist.
    pub fn add_epsilon_transition(&mut self, from: &StateId, to: &StateId) -> u32 {
        self.push_transition(
            from,
            to,
            TransitionKind::Epsilon,
            "epsilon",
            Transition::PRIORITY_NORMAL,
        )
    }

    /// Add a sub-automaton transition. Expand it with
    /// [`merge_automaton`](Self::merge_automaton) before validating;
    /// the drivers do not execute sub-kind transitions.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint does not exist.
    pub fn add_sub_transition(
        &mut self,
        from: &StateId,
        to: &StateId,
        sub: Arc<Automaton>,
        priority: i32,
    ) -> u32 {
        let description = format!("fsa:{}", sub.name());
        self.push_transition(from, to, TransitionKind::Sub(sub), &description, priority)
    }

    fn push_transition(
        &mut self,
        from: &StateId,
        to: &StateId,
        kind: TransitionKind,
        description: &str,
        priority: i32,
    ) -> u32 {
        assert!(
            self.has_state(from),
            "transition source {from} does not exist"
        );
        assert!(
            self.has_state(to),
            "transition destination {to} does not exist"
        );
        let id = self.next_transition_id;
        self.next_transition_id += 1;
        self.transitions.push(Transition {
            id,
            from: from.clone(),
            to: to.clone(),
            kind,
            priority,
            description: description.to_string(),
            hook: None,
        });
        self.index_dirty = true;
        id
    }

    /// Mark a state so the backtracking driver records a choice point
    /// there even when only one transition is viable.
    ///
    /// # Panics
    ///
    /// Panics if the state does not exist.
    pub fn mark_choice_point(&mut self, state: &StateId) {
        let entry = self
            .states
            .get_mut(&state.id)
            .unwrap_or_else(|| panic!("cannot mark nonexistent state {state} as choice point"));
        entry.choice_point = true;
    }

    pub fn is_choice_point(&self, state: &StateId) -> bool {
        self.states
            .get(&state.id)
            .is_some_and(|s| s.choice_point)
    }

    // ------------------------------------------------------------------
    // Hooks and user data
    // ------------------------------------------------------------------

    /// # Panics
    ///
    /// Panics if the state does not exist.
    pub fn set_entry_hook(
        &mut self,
        state: &StateId,
        hook: impl Fn(&mut HookContext<'_>) + 'static,
    ) {
        let entry = self
            .states
            .get_mut(&state.id)
            .unwrap_or_else(|| panic!("cannot set entry hook on nonexistent state {state}"));
        entry.on_entry = Some(Arc::new(hook));
    }

    /// # Panics
    ///
    /// Panics if the state does not exist.
    pub fn set_exit_hook(
        &mut self,
        state: &StateId,
        hook: impl Fn(&mut HookContext<'_>) + 'static,
    ) {
        let entry = self
            .states
            .get_mut(&state.id)
            .unwrap_or_else(|| panic!("cannot set exit hook on nonexistent state {state}"));
        entry.on_exit = Some(Arc::new(hook));
    }

    /// # Panics
    ///
    /// Panics if no transition has the given id.
    pub fn set_transition_hook(
        &mut self,
        transition_id: u32,
        hook: impl Fn(&mut HookContext<'_>) + 'static,
    ) {
        let t = self
            .transitions
            .iter_mut()
            .find(|t| t.id == transition_id)
            .unwrap_or_else(|| panic!("no transition with id {transition_id}"));
        t.hook = Some(Arc::new(hook));
    }

    /// Install an opaque user-data value observable from hooks.
    pub fn set_user_data<T: 'static>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }

    pub fn user_data<T: 'static>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref::<T>()
    }

    pub fn user_data_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut::<T>()
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// All state identifiers, sorted by numeric id.
    pub fn states(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self.states.values().map(|s| s.id.clone()).collect();
        ids.sort();
        ids
    }

    /// The ordered transition list.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, id: u32) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// Outgoing transitions of a state in execution order: descending
    /// priority, insertion order within equal priority.
    pub fn transitions_from(&self, state: &StateId) -> Vec<&Transition> {
        let mut out: Vec<&Transition> = self
            .transitions
            .iter()
            .filter(|t| t.from.id == state.id)
            .collect();
        out.sort_by_key(|t| std::cmp::Reverse(t.priority));
        out
    }

    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    pub fn backtrack_stats(&self) -> &BacktrackStats {
        &self.backtrack_stats
    }

    pub fn reset_backtrack_stats(&mut self) {
        self.backtrack_stats.reset();
    }

    /// Bound the choice-point stack. 0 means unbounded. Choice points past
    /// the bound are silently not saved; acceptance may be missed compared
    /// to an unbounded search.
    pub fn set_max_backtrack_depth(&mut self, depth: usize) {
        self.max_backtrack_depth = depth;
    }

    pub fn max_backtrack_depth(&self) -> usize {
        self.max_backtrack_depth
    }

    pub fn set_debug_config(&mut self, config: DebugConfig) {
        self.debug = config;
    }

    pub fn debug_config(&self) -> &DebugConfig {
        &self.debug
    }

    pub fn debug_config_mut(&mut self) -> &mut DebugConfig {
        &mut self.debug
    }

    // ------------------------------------------------------------------
    // Execution state
    // ------------------------------------------------------------------

    /// Whether the current state is an accept state.
    pub fn is_in_accept_state(&self) -> bool {
        self.accepts.contains(&self.current.id)
    }

    /// Clear all execution state: current state back to start, input
    /// buffer, position, captures, stream status, choice stack,
    /// backtracking counters, and the last error. Trace and metrics are
    /// cleared when their flags are set. The graph itself is untouched.
    pub fn reset(&mut self) {
        self.current = self.start.clone();
        self.last_error = None;
        if self.debug.has(DebugFlags::TRACE_TRANSITIONS)
            || self.debug.has(DebugFlags::TRACE_STATE_CHANGES)
        {
            self.trace.clear();
        }
        if self.debug.has(DebugFlags::COLLECT_METRICS) {
            self.metrics.reset();
        }
        self.input.clear();
        self.position = 0;
        self.captures.clear();
        self.stream_status = StreamStatus::Ready;
        self.streaming = false;
        self.choice_stack.clear();
        self.backtrack_stats.reset();
    }

    /// Rebuild the outgoing index if any mutation invalidated it.
    pub(crate) fn ensure_index(&mut self) {
        if !self.index_dirty {
            return;
        }
        self.index.clear();
        for (i, t) in self.transitions.iter().enumerate() {
            self.index.entry(t.from.id).or_default().push(i as u32);
        }
        for list in self.index.values_mut() {
            list.sort_by_key(|&i| std::cmp::Reverse(self.transitions[i as usize].priority));
        }
        self.index_dirty = false;
    }

    // ------------------------------------------------------------------
    // Structural validation
    // ------------------------------------------------------------------

    /// Check the graph for structural problems without executing it:
    /// missing or dangling start/accept bindings, dangling transition
    /// endpoints, equal-priority overlapping class fan-out, and states
    /// unreachable from the start.
    pub fn validate_structure(&self) -> Vec<ValidationError> {
        let mut issues = Vec::new();

        if !self.start.is_valid() || !self.has_state(&self.start) {
            issues.push(ValidationError::new(
                ErrorKind::NoStartState,
                0,
                0,
                self.start.clone(),
                "no valid start state bound".to_string(),
            ));
        }

        if self.accepts.is_empty() {
            issues.push(ValidationError::new(
                ErrorKind::InvalidState,
                0,
                0,
                StateId::invalid(),
                "automaton has no accept states".to_string(),
            ));
        }

        for id in &self.accepts {
            if !self.states.contains_key(id) {
                issues.push(ValidationError::new(
                    ErrorKind::InvalidState,
                    0,
                    0,
                    StateId::new(*id, None),
                    format!("accept state {id} does not exist"),
                ));
            }
        }

        for t in &self.transitions {
            if !self.has_state(&t.from) {
                issues.push(ValidationError::new(
                    ErrorKind::InvalidTransition,
                    0,
                    0,
                    t.from.clone(),
                    format!("transition {} leaves nonexistent state {}", t.id, t.from),
                ));
            }
            if !self.has_state(&t.to) {
                issues.push(ValidationError::new(
                    ErrorKind::InvalidTransition,
                    0,
                    0,
                    t.to.clone(),
                    format!("transition {} enters nonexistent state {}", t.id, t.to),
                ));
            }
        }

        self.find_ambiguous_transitions(&mut issues);
        self.find_unreachable_states(&mut issues);

        issues
    }

    pub fn is_structurally_valid(&self) -> bool {
        self.validate_structure().is_empty()
    }

    fn find_ambiguous_transitions(&self, issues: &mut Vec<ValidationError>) {
        let mut by_state: FxHashMap<u32, Vec<&Transition>> = FxHashMap::default();
        for t in &self.transitions {
            if matches!(t.kind, TransitionKind::Class(_)) {
                by_state.entry(t.from.id).or_default().push(t);
            }
        }
        for list in by_state.values() {
            for (i, a) in list.iter().enumerate() {
                for b in &list[i + 1..] {
                    if a.priority != b.priority {
                        continue;
                    }
                    let (TransitionKind::Class(ca), TransitionKind::Class(cb)) =
                        (&a.kind, &b.kind)
                    else {
                        continue;
                    };
                    if !ca.intersect(cb).is_empty() {
                        issues.push(ValidationError::new(
                            ErrorKind::AmbiguousTransition,
                            0,
                            0,
                            a.from.clone(),
                            format!(
                                "transitions {} and {} from {} overlap at equal priority {}",
                                a.id, b.id, a.from, a.priority
                            ),
                        ));
                    }
                }
            }
        }
    }

    fn find_unreachable_states(&self, issues: &mut Vec<ValidationError>) {
        if !self.start.is_valid() || !self.has_state(&self.start) {
            return;
        }
        let mut seen: FxHashSet<u32> = FxHashSet::default();
        let mut frontier = vec![self.start.id];
        seen.insert(self.start.id);
        while let Some(id) = frontier.pop() {
            for t in &self.transitions {
                if t.from.id == id && seen.insert(t.to.id) {
                    frontier.push(t.to.id);
                }
            }
        }
        let mut unreachable: Vec<StateId> = self
            .states
            .values()
            .filter(|s| !seen.contains(&s.id.id))
            .map(|s| s.id.clone())
            .collect();
        if !unreachable.is_empty() {
            unreachable.sort();
            let listed = unreachable
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let mut issue = ValidationError::new(
                ErrorKind::UnreachableStates,
                0,
                0,
                self.start.clone(),
                format!("states unreachable from start: {listed}"),
            );
            issue.attempted = unreachable;
            issues.push(issue);
        }
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fsa {} (states={}, transitions={}, start={}, accepts={})",
            self.name,
            self.states.len(),
            self.transitions.len(),
            self.start,
            self.accepts.len()
        )
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .field("start", &self.start)
            .field("accepts", &self.accepts.len())
            .field("current", &self.current)
            .field("position", &self.position)
            .field("stream_status", &self.stream_status)
            .finish()
    }
}
