//! bytefsa: a finite-state automaton engine over 8-bit byte streams.
//!
//! The engine accepts a labeled transition graph whose edges consume either
//! one byte classified by a [`ByteClass`] predicate or no input (epsilon),
//! and decides whether a byte sequence drives the automaton from its start
//! state into an accept state. It is intended as a building block for
//! lexical validation, protocol framing, and simple pattern matching.
//!
//! Three validation modes share one observable model (current state, input
//! position, captures, choice stack):
//!
//! - [`Automaton::validate`]: whole-input greedy validation that takes the
//!   highest-priority matching transition at every byte and never revisits
//!   a decision
//! - [`Automaton::feed`] / [`Automaton::end_of_stream`]: streaming
//!   validation admitting bytes incrementally with a public
//!   [`StreamStatus`]
//! - [`Automaton::validate_with_backtracking`]: a choice-point search that
//!   explores lower-priority alternatives when the greedy path fails
//!
//! ```
//! use bytefsa::{Builder, ByteClass};
//!
//! let mut fsa = Builder::new("hex_color")
//!     .transition("START", "HASH", ByteClass::byte(b'#'))
//!     .transition("HASH", "H1", ByteClass::hexdig())
//!     .transition("H1", "H2", ByteClass::hexdig())
//!     .transition("H2", "H3", ByteClass::hexdig())
//!     .start_state("START")
//!     .accept_state("H3")
//!     .build();
//!
//! assert!(fsa.validate(b"#fa0"));
//! assert!(!fsa.validate(b"#fg0"));
//! ```

pub mod automaton;

mod builder;
mod byteclass;
mod debug;
mod dot;
mod error;

pub use automaton::{
    Automaton, CaptureGroup, Hook, HookContext, State, StateId, StateRole, StreamStatus,
    Transition, TransitionKind,
};
pub use builder::Builder;
pub use byteclass::{ByteClass, ByteClassBuilder, CoreRule};
pub use debug::{BacktrackStats, DebugConfig, DebugFlags, Metrics, TraceEntry};
pub use error::{ErrorKind, ValidationError};
