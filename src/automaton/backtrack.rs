//! Backtracking search.
//!
//! Extends the greedy driver with an explicit stack of choice points. At
//! each byte the viable class-kind transitions are collected in priority
//! order; when more than one is viable (or the state is marked as a choice
//! point) the untried alternatives are saved together with a snapshot of
//! the observable state. When the greedy path cannot advance, or cannot
//! end in an accept state, the search restores the most recent snapshot
//! with alternatives left and commits the next one as if it had been the
//! first choice. Counters are monotone and never rolled back.

use std::time::Instant;

use smallvec::SmallVec;

use crate::debug::DebugFlags;
use crate::error::ErrorKind;

use super::capture::{ActiveCapture, CaptureGroup};
use super::graph::{Automaton, StateId};

/// A saved decision: the untried alternatives plus the snapshot needed to
/// replay from just before the decision byte.
pub(crate) struct ChoicePoint {
    pub(crate) state: StateId,
    /// Position of the byte the decision was made on.
    pub(crate) position: usize,
    /// Untried transition indices, best first.
    pub(crate) remaining: SmallVec<[u32; 4]>,
    pub(crate) completed_snapshot: Vec<CaptureGroup>,
    pub(crate) active_snapshot: Vec<ActiveCapture>,
    /// Input cursor at the time of the decision.
    pub(crate) input_position: usize,
}

impl Automaton {
    /// Whole-input validation with backtracking.
    ///
    /// Accepts every input the greedy driver accepts, plus inputs where a
    /// lower-priority alternative at some earlier byte leads to an accept
    /// state. Search effort is observable through
    /// [`backtrack_stats`](Self::backtrack_stats).
    pub fn validate_with_backtracking(&mut self, input: &[u8]) -> bool {
        self.reset();
        self.input = input.to_vec();
        self.ensure_index();
        let started = Instant::now();

        if !self.start.is_valid() {
            self.fail(ErrorKind::NoStartState, 0, 0, "no start state bound".to_string());
            return false;
        }

        let mut attempted: Vec<StateId> = Vec::new();

        loop {
            while self.position < input.len() {
                let byte = input[self.position];
                let viable = self.viable_transitions(byte);

                if viable.is_empty() {
                    if self.backtrack_resume(input, &mut attempted) {
                        continue;
                    }
                    let current = self.current.clone();
                    let position = self.position;
                    self.fail(
                        ErrorKind::NoMatchingTransition,
                        position,
                        byte,
                        format!(
                            "no transition from {current} admits byte 0x{byte:02X} and no choice point remains"
                        ),
                    );
                    if let Some(err) = &mut self.last_error {
                        err.attempted = attempted;
                    }
                    self.dump_graph_on_error();
                    return false;
                }

                if self.should_create_choice_point(viable.len()) {
                    self.save_choice_point(&viable[1..]);
                }
                self.take_transition(viable[0], byte);
                self.backtrack_stats.paths_explored += 1;
            }

            self.close_epsilon();
            if self.is_in_accept_state() {
                if self.debug.has(DebugFlags::COLLECT_METRICS) {
                    self.metrics.validation_time = started.elapsed();
                }
                return true;
            }

            if !self.backtrack_resume(input, &mut attempted) {
                self.fail(
                    ErrorKind::NotInAcceptState,
                    input.len(),
                    0,
                    "every path exhausted without reaching an accept state".to_string(),
                );
                if let Some(err) = &mut self.last_error {
                    err.attempted = attempted;
                }
                self.dump_graph_on_error();
                return false;
            }
        }
    }

    /// Class-kind transitions from the current state admitting the byte,
    /// best first.
    fn viable_transitions(&self, byte: u8) -> SmallVec<[u32; 4]> {
        match self.index.get(&self.current.id) {
            Some(list) => list
                .iter()
                .copied()
                .filter(|&i| self.transitions[i as usize].matches(byte))
                .collect(),
            None => SmallVec::new(),
        }
    }

    /// A choice point is recorded when the state is marked and anything is
    /// viable, or when more than one transition is viable.
    fn should_create_choice_point(&self, viable: usize) -> bool {
        viable > 1 || (viable >= 1 && self.is_choice_point(&self.current))
    }

    /// Save the untried alternatives with a snapshot of the observable
    /// state. Silently skipped once the configured depth cap is reached.
    fn save_choice_point(&mut self, remaining: &[u32]) {
        if self.max_backtrack_depth > 0 && self.choice_stack.len() >= self.max_backtrack_depth {
            return;
        }
        let cp = ChoicePoint {
            state: self.current.clone(),
            position: self.position,
            remaining: SmallVec::from_slice(remaining),
            completed_snapshot: self.captures.completed.clone(),
            active_snapshot: self.captures.active.clone(),
            input_position: self.position,
        };
        self.choice_stack.push(cp);
        self.backtrack_stats.choice_points_created += 1;
        if self.choice_stack.len() > self.backtrack_stats.max_stack_depth {
            self.backtrack_stats.max_stack_depth = self.choice_stack.len();
        }
    }

    /// Pop to the most recent choice point with alternatives left, restore
    /// its snapshot, and commit the next alternative exactly like a normal
    /// advance (hooks fire, the decision byte joins open captures).
    /// Execution resumes at the byte after the decision. Returns false when
    /// the stack is exhausted.
    fn backtrack_resume(&mut self, input: &[u8], attempted: &mut Vec<StateId>) -> bool {
        loop {
            let Some(top) = self.choice_stack.last_mut() else {
                return false;
            };
            if top.remaining.is_empty() {
                self.choice_stack.pop();
                continue;
            }

            let alternative = top.remaining.remove(0);
            let state = top.state.clone();
            let completed = top.completed_snapshot.clone();
            let active = top.active_snapshot.clone();
            let input_position = top.input_position;

            self.current = state;
            self.captures.completed = completed;
            self.captures.active = active;
            self.position = input_position;
            self.backtrack_stats.backtracks_performed += 1;

            let byte = input[input_position];
            self.take_transition(alternative, byte);
            self.backtrack_stats.paths_explored += 1;
            attempted.push(self.current.clone());
            return true;
        }
    }
}
