//! Observability: debug flags, the log sink, step traces, and counters.
//!
//! Everything in this module is purely additive. Enabling or disabling any
//! flag never changes which inputs an automaton accepts; it only changes
//! what gets recorded and logged along the way.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use bitflags::bitflags;

use crate::automaton::StateId;

bitflags! {
    /// Bitmap of recognized debug options.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct DebugFlags: u8 {
        /// Record each committed step in the trace.
        const TRACE_TRANSITIONS   = 0b0000_0001;
        /// Log each state change distinctly.
        const TRACE_STATE_CHANGES = 0b0000_0010;
        /// Richer error messages with input context.
        const VERBOSE_ERRORS      = 0b0000_0100;
        /// Maintain counters and timings.
        const COLLECT_METRICS     = 0b0000_1000;
        /// Emit a DOT dump of the graph when validation fails.
        const EXPORT_DOT_ON_ERROR = 0b0001_0000;

        /// Transitions trace plus verbose errors.
        const BASIC = Self::TRACE_TRANSITIONS.bits() | Self::VERBOSE_ERRORS.bits();
        /// Everything except the DOT dump.
        const FULL = Self::TRACE_TRANSITIONS.bits()
            | Self::TRACE_STATE_CHANGES.bits()
            | Self::VERBOSE_ERRORS.bits()
            | Self::COLLECT_METRICS.bits();
    }
}

/// Debug flags plus an optional output-stream sink for human-readable log
/// lines. With no sink installed, lines go to the `log` facade at debug
/// level instead.
#[derive(Default)]
pub struct DebugConfig {
    pub flags: DebugFlags,
    sink: Option<Box<dyn Write>>,
}

impl DebugConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: DebugFlags) -> Self {
        Self { flags, sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        !self.flags.is_empty()
    }

    #[inline]
    pub fn has(&self, flag: DebugFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn enable(&mut self, flag: DebugFlags) {
        self.flags |= flag;
    }

    pub fn disable(&mut self, flag: DebugFlags) {
        self.flags &= !flag;
    }

    pub fn toggle(&mut self, flag: DebugFlags) {
        self.flags ^= flag;
    }

    /// Install a sink for human-readable log lines.
    pub fn set_sink(&mut self, sink: Box<dyn Write>) {
        self.sink = Some(sink);
    }

    /// Remove the sink; lines fall back to the `log` facade.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    pub(crate) fn emit(&mut self, name: &str, line: fmt::Arguments<'_>) {
        match &mut self.sink {
            Some(sink) => {
                let _ = writeln!(sink, "[fsa:{name}] {line}");
            }
            None => log::debug!(target: "bytefsa", "[fsa:{name}] {line}"),
        }
    }
}

impl fmt::Debug for DebugConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugConfig")
            .field("flags", &self.flags)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// One committed step, recorded when TRACE_TRANSITIONS is set.
#[derive(Clone, Debug)]
pub struct TraceEntry {
    pub step: usize,
    pub from: StateId,
    pub to: StateId,
    /// Byte consumed, or 0 for an epsilon step.
    pub byte: u8,
    pub transition_id: u32,
    pub description: String,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: {} -> {} on ", self.step, self.from, self.to)?;
        if self.byte.is_ascii_graphic() || self.byte == b' ' {
            write!(f, "'{}'", self.byte as char)?;
        } else {
            write!(f, "0x{:02X}", self.byte)?;
        }
        write!(f, " (transition #{})", self.transition_id)?;
        if !self.description.is_empty() {
            write!(f, " [{}]", self.description)?;
        }
        Ok(())
    }
}

/// Execution counters, maintained when COLLECT_METRICS is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub transitions_taken: usize,
    pub states_entered: usize,
    pub characters_processed: usize,
    pub epsilon_transitions: usize,
    pub validation_time: Duration,
}

impl Metrics {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transitions={}, states={}, chars={}, epsilons={}, time={:?}",
            self.transitions_taken,
            self.states_entered,
            self.characters_processed,
            self.epsilon_transitions,
            self.validation_time
        )
    }
}

/// Counters maintained by the backtracking driver. Monotone within a run;
/// never rolled back when a snapshot is restored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BacktrackStats {
    pub choice_points_created: usize,
    pub backtracks_performed: usize,
    /// Peak size of the choice-point stack.
    pub max_stack_depth: usize,
    /// Every committed transition, including the one taken when a choice
    /// point is saved.
    pub paths_explored: usize,
}

impl BacktrackStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for BacktrackStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "choice_points={}, backtracks={}, max_depth={}, paths={}",
            self.choice_points_created,
            self.backtracks_performed,
            self.max_stack_depth,
            self.paths_explored
        )
    }
}
