//! Named byte-range captures.
//!
//! Captures are user-driven: entry/exit hooks open and close them by name
//! while the engine appends every committed byte to every currently open
//! buffer. Both the completed list and the open list are snapshotted into
//! choice points and restored atomically on backtracking.

use std::borrow::Cow;
use std::fmt;

use super::graph::Automaton;

/// A closed capture: the byte range `[start, end)` and the bytes
/// accumulated while it was open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureGroup {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub bytes: Vec<u8>,
}

impl CaptureGroup {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The captured bytes, lossily decoded for display.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl fmt::Display for CaptureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}..{}]={:?}",
            self.name,
            self.start,
            self.end,
            self.as_text()
        )
    }
}

/// A capture that has been opened but not yet closed.
#[derive(Clone, Debug)]
pub(crate) struct ActiveCapture {
    pub(crate) name: String,
    pub(crate) start: usize,
    pub(crate) buffer: Vec<u8>,
}

/// Completed and open captures for one run.
#[derive(Clone, Debug, Default)]
pub(crate) struct CaptureSet {
    pub(crate) completed: Vec<CaptureGroup>,
    pub(crate) active: Vec<ActiveCapture>,
}

impl CaptureSet {
    /// # Panics
    ///
    /// Panics if a capture with this name is already open.
    pub(crate) fn begin(&mut self, name: &str, position: usize) {
        assert!(
            !self.active.iter().any(|a| a.name == name),
            "capture {name:?} is already active"
        );
        self.active.push(ActiveCapture {
            name: name.to_string(),
            start: position,
            buffer: Vec::new(),
        });
    }

    /// # Panics
    ///
    /// Panics if no capture with this name is open.
    pub(crate) fn end(&mut self, name: &str, position: usize) -> CaptureGroup {
        let idx = self
            .active
            .iter()
            .position(|a| a.name == name)
            .unwrap_or_else(|| panic!("no active capture named {name:?}"));
        let active = self.active.remove(idx);
        let group = CaptureGroup {
            name: active.name,
            start: active.start,
            end: position,
            bytes: active.buffer,
        };
        self.completed.push(group.clone());
        group
    }

    /// Append a committed byte to every open buffer.
    #[inline]
    pub(crate) fn record_byte(&mut self, byte: u8) {
        for active in &mut self.active {
            active.buffer.push(byte);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.completed.clear();
        self.active.clear();
    }
}

impl Automaton {
    /// Open a named capture at the current input position.
    ///
    /// # Panics
    ///
    /// Panics if a capture with this name is already active.
    pub fn begin_capture(&mut self, name: &str) {
        let position = self.position;
        self.captures.begin(name, position);
    }

    /// Close a named capture, producing its group at the current position.
    ///
    /// # Panics
    ///
    /// Panics if no capture with this name is active.
    pub fn end_capture(&mut self, name: &str) -> CaptureGroup {
        let position = self.position;
        self.captures.end(name, position)
    }

    /// The first completed capture with the given name.
    pub fn capture(&self, name: &str) -> Option<&CaptureGroup> {
        self.captures.completed.iter().find(|c| c.name == name)
    }

    /// All completed captures, in closure order.
    pub fn captures(&self) -> &[CaptureGroup] {
        &self.captures.completed
    }

    pub fn capture_by_index(&self, index: usize) -> Option<&CaptureGroup> {
        self.captures.completed.get(index)
    }

    pub fn has_capture(&self, name: &str) -> bool {
        self.capture(name).is_some()
    }

    pub fn clear_captures(&mut self) {
        self.captures.clear();
    }
}
