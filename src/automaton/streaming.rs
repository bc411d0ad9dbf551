//! Streaming driver: incremental validation one byte (or chunk) at a time.
//!
//! The public status machine is `Ready → Processing → (WaitingForInput |
//! Complete | Error)`. `Complete` is reported eagerly whenever the current
//! state is an accept state after a byte, and a further successful byte can
//! move it back to `WaitingForInput`. Once `Error` is reached, further
//! feeds are no-ops until a reset.

use std::fmt;

use crate::error::ErrorKind;

use super::graph::Automaton;

/// Public status of a streaming validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StreamStatus {
    /// No byte has been fed since the last reset.
    #[default]
    Ready,
    /// A feed is in flight; replaced before `feed` returns.
    Processing,
    /// All bytes so far were consumed; the current state does not accept.
    WaitingForInput,
    /// The current state accepts; more bytes may still arrive.
    Complete,
    /// A feed failed, or the stream ended outside an accept state.
    Error,
}

impl StreamStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamStatus::Ready => "ready",
            StreamStatus::Processing => "processing",
            StreamStatus::WaitingForInput => "waiting_for_input",
            StreamStatus::Complete => "complete",
            StreamStatus::Error => "error",
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Automaton {
    /// Feed one byte.
    ///
    /// The first call moves `Ready → Processing`; on success the status
    /// becomes `Complete` if the current state accepts after this byte,
    /// else `WaitingForInput`. A matching failure records the error and
    /// pins the status at `Error`; feeding while at `Error` changes
    /// nothing.
    pub fn feed(&mut self, byte: u8) -> StreamStatus {
        if self.stream_status == StreamStatus::Error {
            return StreamStatus::Error;
        }
        self.ensure_index();
        if !self.streaming {
            self.streaming = true;
            self.stream_status = StreamStatus::Processing;
            if !self.start.is_valid() {
                self.fail(
                    ErrorKind::NoStartState,
                    self.position,
                    byte,
                    "no start state bound".to_string(),
                );
                self.stream_status = StreamStatus::Error;
                return StreamStatus::Error;
            }
        }

        self.input.push(byte);
        if !self.step_greedy(byte) {
            self.stream_status = StreamStatus::Error;
            self.dump_graph_on_error();
            return StreamStatus::Error;
        }

        self.stream_status = if self.is_in_accept_state() {
            StreamStatus::Complete
        } else {
            StreamStatus::WaitingForInput
        };
        self.stream_status
    }

    /// Feed each byte of the chunk in order, stopping at the first error.
    pub fn feed_all(&mut self, chunk: &[u8]) -> StreamStatus {
        for &byte in chunk {
            if self.feed(byte) == StreamStatus::Error {
                return StreamStatus::Error;
            }
        }
        self.stream_status
    }

    /// Signal end of input: close under epsilon at the current position and
    /// require an accept state. Calling this before any byte was fed is an
    /// `UnexpectedEndOfInput` error.
    pub fn end_of_stream(&mut self) -> StreamStatus {
        if self.stream_status == StreamStatus::Error {
            return StreamStatus::Error;
        }
        if !self.streaming {
            self.fail(
                ErrorKind::UnexpectedEndOfInput,
                0,
                0,
                "end of stream before any byte was fed".to_string(),
            );
            self.stream_status = StreamStatus::Error;
            return StreamStatus::Error;
        }

        self.ensure_index();
        self.close_epsilon();

        if !self.is_in_accept_state() {
            let current = self.current.clone();
            let position = self.position;
            self.fail(
                ErrorKind::NotInAcceptState,
                position,
                0,
                format!("stream ended but not in accept state (current: {current})"),
            );
            self.stream_status = StreamStatus::Error;
            self.dump_graph_on_error();
            return StreamStatus::Error;
        }

        self.stream_status = StreamStatus::Complete;
        StreamStatus::Complete
    }

    pub fn stream_status(&self) -> StreamStatus {
        self.stream_status
    }

    pub fn is_stream_complete(&self) -> bool {
        self.stream_status == StreamStatus::Complete
    }

    pub fn needs_more_input(&self) -> bool {
        self.stream_status == StreamStatus::WaitingForInput
    }

    /// Return the status to `Ready` without clearing the rest of the
    /// execution state, so captures and the final state stay inspectable.
    /// Use [`reset`](Self::reset) to clear everything.
    pub fn reset_stream(&mut self) {
        self.stream_status = StreamStatus::Ready;
        self.streaming = false;
    }
}
