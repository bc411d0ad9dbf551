//! The greedy driver and the step machinery shared by all three drivers.
//!
//! One byte is processed as: select the highest-priority matching
//! class-kind transition, fire exit/transition/entry hooks when the state
//! changes, append the byte to open captures, advance the position, then
//! update counters and the trace. Epsilon steps run the same hook sequence
//! with a zero-byte sentinel and consume no input.

use std::time::Instant;

use rustc_hash::FxHashSet;

use crate::debug::{DebugFlags, TraceEntry};
use crate::error::{ErrorKind, ValidationError};

use super::graph::{Automaton, StateId, TransitionKind};
use super::hooks::HookContext;

impl Automaton {
    /// Whole-input greedy validation.
    ///
    /// Resets execution state, consumes the input byte by byte taking the
    /// highest-priority matching transition at every step, closes under
    /// epsilon at end of input, and reports accept-state membership.
    /// Greedy mode never revisits a decision; ambiguous graphs may reject
    /// inputs that [`validate_with_backtracking`](Self::validate_with_backtracking)
    /// accepts. On failure the error record is available from
    /// [`last_error`](Self::last_error).
    pub fn validate(&mut self, input: &[u8]) -> bool {
        self.reset();
        self.input = input.to_vec();
        self.ensure_index();
        let started = Instant::now();

        if !self.start.is_valid() {
            self.fail(ErrorKind::NoStartState, 0, 0, "no start state bound".to_string());
            return false;
        }

        while self.position < input.len() {
            let byte = input[self.position];
            if !self.step_greedy(byte) {
                self.dump_graph_on_error();
                return false;
            }
        }

        self.close_epsilon();

        if !self.is_in_accept_state() {
            let current = self.current.clone();
            self.fail(
                ErrorKind::NotInAcceptState,
                input.len(),
                0,
                format!("input consumed but not in accept state (current: {current})"),
            );
            self.dump_graph_on_error();
            return false;
        }

        if self.debug.has(DebugFlags::COLLECT_METRICS) {
            self.metrics.validation_time = started.elapsed();
        }
        true
    }

    /// Consume one byte greedily. Records the error and returns false when
    /// no class-kind transition from the current state admits it.
    pub(crate) fn step_greedy(&mut self, byte: u8) -> bool {
        match self.first_match(byte) {
            Some(idx) => {
                self.take_transition(idx, byte);
                true
            }
            None => {
                let current = self.current.clone();
                let position = self.position;
                self.fail(
                    ErrorKind::NoMatchingTransition,
                    position,
                    byte,
                    format!("no transition from {current} admits byte 0x{byte:02X}"),
                );
                false
            }
        }
    }

    /// Index of the first class-kind transition admitting the byte, in
    /// descending priority order (insertion order within equal priority).
    fn first_match(&self, byte: u8) -> Option<u32> {
        let list = self.index.get(&self.current.id)?;
        list.iter()
            .copied()
            .find(|&i| self.transitions[i as usize].matches(byte))
    }

    /// Commit a consuming transition: hooks, state, captures, position,
    /// counters, trace, in that order.
    pub(crate) fn take_transition(&mut self, idx: u32, byte: u8) {
        let t = &self.transitions[idx as usize];
        let from = self.current.clone();
        let to = t.to.clone();
        let transition_id = t.id;
        let hook = t.hook.clone();
        let trace_description = self
            .debug
            .has(DebugFlags::TRACE_TRANSITIONS)
            .then(|| t.description.clone());
        let changed = from != to;
        let position = self.position;

        if changed {
            self.fire_exit_hook(&from, byte, position);
        }
        if let Some(hook) = hook {
            let mut ctx = HookContext {
                state: from.clone(),
                to: Some(to.clone()),
                byte,
                position,
                captures: &mut self.captures,
                user_data: &mut self.user_data,
            };
            hook(&mut ctx);
        }
        self.current = to.clone();
        if changed {
            self.fire_entry_hook(&to, byte, position);
        }

        self.captures.record_byte(byte);
        self.position += 1;

        if self.debug.has(DebugFlags::COLLECT_METRICS) {
            self.metrics.transitions_taken += 1;
            self.metrics.characters_processed += 1;
            if changed {
                self.metrics.states_entered += 1;
            }
        }
        if changed && self.debug.has(DebugFlags::TRACE_STATE_CHANGES) {
            let name = self.name_for_log();
            self.debug
                .emit(&name, format_args!("state change: {from} -> {to}"));
        }
        if let Some(description) = trace_description {
            let entry = TraceEntry {
                step: self.trace.len(),
                from,
                to,
                byte,
                transition_id,
                description,
            };
            let name = self.name_for_log();
            self.debug.emit(&name, format_args!("{entry}"));
            self.trace.push(entry);
        }
    }

    /// Close the current state under epsilon at the current position.
    ///
    /// Repeatedly takes the first eligible epsilon transition (priority
    /// order, then insertion order) whose destination has not been visited
    /// in this closure. The visited set is local to each invocation and
    /// bounds the walk by the number of states.
    pub(crate) fn close_epsilon(&mut self) {
        let position = self.position;
        let mut visited: FxHashSet<u32> = FxHashSet::default();
        visited.insert(self.current.id);
        while let Some(idx) = self.first_epsilon(&visited) {
            self.take_epsilon(idx, position, &mut visited);
        }
    }

    fn first_epsilon(&self, visited: &FxHashSet<u32>) -> Option<u32> {
        let list = self.index.get(&self.current.id)?;
        list.iter().copied().find(|&i| {
            let t = &self.transitions[i as usize];
            matches!(t.kind, TransitionKind::Epsilon) && !visited.contains(&t.to.id)
        })
    }

    /// Commit an epsilon step: the full hook sequence with a zero-byte
    /// sentinel, no capture append, no position advance.
    fn take_epsilon(&mut self, idx: u32, position: usize, visited: &mut FxHashSet<u32>) {
        let t = &self.transitions[idx as usize];
        let from = self.current.clone();
        let to = t.to.clone();
        let transition_id = t.id;
        let hook = t.hook.clone();
        let trace_description = self
            .debug
            .has(DebugFlags::TRACE_TRANSITIONS)
            .then(|| t.description.clone());

        self.fire_exit_hook(&from, 0, position);
        if let Some(hook) = hook {
            let mut ctx = HookContext {
                state: from.clone(),
                to: Some(to.clone()),
                byte: 0,
                position,
                captures: &mut self.captures,
                user_data: &mut self.user_data,
            };
            hook(&mut ctx);
        }
        self.current = to.clone();
        visited.insert(to.id);
        self.fire_entry_hook(&to, 0, position);

        if self.debug.has(DebugFlags::COLLECT_METRICS) {
            self.metrics.epsilon_transitions += 1;
        }
        if self.debug.has(DebugFlags::TRACE_STATE_CHANGES) {
            let name = self.name_for_log();
            self.debug
                .emit(&name, format_args!("state change: {from} -> {to}"));
        }
        if let Some(description) = trace_description {
            let entry = TraceEntry {
                step: self.trace.len(),
                from,
                to,
                byte: 0,
                transition_id,
                description,
            };
            let name = self.name_for_log();
            self.debug.emit(&name, format_args!("{entry}"));
            self.trace.push(entry);
        }
    }

    fn fire_exit_hook(&mut self, state: &StateId, byte: u8, position: usize) {
        let hook = self.states.get(&state.id).and_then(|s| s.on_exit.clone());
        if let Some(hook) = hook {
            let mut ctx = HookContext {
                state: state.clone(),
                to: None,
                byte,
                position,
                captures: &mut self.captures,
                user_data: &mut self.user_data,
            };
            hook(&mut ctx);
        }
    }

    fn fire_entry_hook(&mut self, state: &StateId, byte: u8, position: usize) {
        let hook = self.states.get(&state.id).and_then(|s| s.on_entry.clone());
        if let Some(hook) = hook {
            let mut ctx = HookContext {
                state: state.clone(),
                to: None,
                byte,
                position,
                captures: &mut self.captures,
                user_data: &mut self.user_data,
            };
            hook(&mut ctx);
        }
    }

    /// Record a validation error. With VERBOSE_ERRORS set, attaches a
    /// snippet of the input around the failure position.
    pub(crate) fn fail(&mut self, kind: ErrorKind, position: usize, byte: u8, message: String) {
        let mut err = ValidationError::new(kind, position, byte, self.current.clone(), message);
        if self.debug.has(DebugFlags::VERBOSE_ERRORS) {
            err.context = Some(self.input_context(position));
        }
        self.last_error = Some(err);
    }

    /// Up to ten bytes either side of the failure position, lossily
    /// decoded.
    fn input_context(&self, position: usize) -> String {
        const CONTEXT: usize = 10;
        let start = position.saturating_sub(CONTEXT);
        let end = (position + CONTEXT).min(self.input.len());
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    /// Emit a DOT dump of the graph when EXPORT_DOT_ON_ERROR is set.
    pub(crate) fn dump_graph_on_error(&mut self) {
        if self.debug.has(DebugFlags::EXPORT_DOT_ON_ERROR) {
            let dot = self.to_dot();
            let name = self.name_for_log();
            self.debug
                .emit(&name, format_args!("validation failed, graph dump:\n{dot}"));
        }
    }

    fn name_for_log(&self) -> String {
        self.name().to_string()
    }
}
