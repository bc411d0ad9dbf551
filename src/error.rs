//! Validation error records.
//!
//! Failures are reported through a single record carrying the error kind,
//! the input position and offending byte, the state the engine was in, a
//! human-readable message, and (optionally) the states attempted before
//! giving up plus a snippet of input context. Errors are returned, never
//! thrown: a failed validation leaves the graph untouched and `reset` is
//! sufficient to run again.

use std::fmt;

use crate::automaton::StateId;

/// Classification of everything that can go wrong while validating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Validation began with no start state bound.
    NoStartState,
    /// No class-kind transition from the current state admits the current
    /// byte (and, in backtracking mode, no choice point remains).
    NoMatchingTransition,
    /// `end_of_stream` was called before any byte was fed.
    UnexpectedEndOfInput,
    /// Input fully consumed but epsilon closure did not land in an accept
    /// state.
    NotInAcceptState,
    /// A sub-automaton transition failed during execution. Never produced
    /// by this engine (composition expands sub-automata before execution);
    /// kept for callers that run pre-composition graphs elsewhere.
    EmbeddedFsmFailed,
    /// A structural reference to a state that does not exist.
    InvalidState,
    /// A structural reference to a transition that does not exist.
    InvalidTransition,
    /// Two equal-priority class transitions from one state admit
    /// overlapping byte sets. Structural finding only.
    AmbiguousTransition,
    /// States that cannot be reached from the start state. Structural
    /// finding only.
    UnreachableStates,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoStartState => "NoStartState",
            ErrorKind::NoMatchingTransition => "NoMatchingTransition",
            ErrorKind::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorKind::NotInAcceptState => "NotInAcceptState",
            ErrorKind::EmbeddedFsmFailed => "EmbeddedFsmFailed",
            ErrorKind::InvalidState => "InvalidState",
            ErrorKind::InvalidTransition => "InvalidTransition",
            ErrorKind::AmbiguousTransition => "AmbiguousTransition",
            ErrorKind::UnreachableStates => "UnreachableStates",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record handed back by `last_error` after a failed validation.
#[derive(Clone, Debug)]
pub struct ValidationError {
    pub kind: ErrorKind,
    /// Input position the failure was detected at.
    pub position: usize,
    /// The offending byte, or 0 where no byte applies (end of input).
    pub byte: u8,
    /// State the engine was in when the failure was detected.
    pub state: StateId,
    pub message: String,
    /// States tried before the search gave up. Filled by the backtracking
    /// driver, empty otherwise.
    pub attempted: Vec<StateId>,
    /// Input bytes around the failure position, lossily decoded. Present
    /// only when verbose errors are enabled.
    pub context: Option<String>,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ErrorKind,
        position: usize,
        byte: u8,
        state: StateId,
        message: String,
    ) -> Self {
        Self {
            kind,
            position,
            byte,
            state,
            message,
            attempted: Vec::new(),
            context: None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at position {} on byte 0x{:02X} in state {}: {}",
            self.kind, self.position, self.byte, self.state, self.message
        )?;
        if !self.attempted.is_empty() {
            write!(f, " (attempted:")?;
            for s in &self.attempted {
                write!(f, " {s}")?;
            }
            write!(f, ")")?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " near {ctx:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
