//! Hook dispatch.
//!
//! Hooks are plain closures installed on states (entry/exit) and
//! transitions. They observe the execution context and may open or close
//! captures or mutate caller state through the opaque user-data handle;
//! they must not mutate graph structure.

use std::any::Any;
use std::sync::Arc;

use super::capture::{CaptureGroup, CaptureSet};
use super::graph::StateId;

/// A hook closure. Fired with the execution context described by
/// [`HookContext`]; ordering on a consuming step between distinct states is
/// exit(old), transition, entry(new). Epsilon steps fire the same sequence
/// with a zero-byte sentinel.
pub type Hook = Arc<dyn Fn(&mut HookContext<'_>)>;

/// What a hook can see and touch while it runs.
pub struct HookContext<'a> {
    /// The state the hook fires on. For transition hooks, the source state.
    pub state: StateId,
    /// Destination state for transition hooks; `None` for entry/exit hooks.
    pub to: Option<StateId>,
    /// The byte being consumed, or 0 for an epsilon step.
    pub byte: u8,
    /// Current input position.
    pub position: usize,
    pub(crate) captures: &'a mut CaptureSet,
    pub(crate) user_data: &'a mut Option<Box<dyn Any>>,
}

impl HookContext<'_> {
    /// Open a named capture at the current position.
    ///
    /// # Panics
    ///
    /// Panics if a capture with this name is already active.
    pub fn begin_capture(&mut self, name: &str) {
        self.captures.begin(name, self.position);
    }

    /// Close a named capture at the current position.
    ///
    /// # Panics
    ///
    /// Panics if no capture with this name is active.
    pub fn end_capture(&mut self, name: &str) -> CaptureGroup {
        self.captures.end(name, self.position)
    }

    pub fn has_active_capture(&self, name: &str) -> bool {
        self.captures.active.iter().any(|a| a.name == name)
    }

    /// Typed view of the user-data handle, if one of type `T` is installed.
    pub fn user_data<T: 'static>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref::<T>()
    }

    /// Mutable typed view of the user-data handle.
    pub fn user_data_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut::<T>()
    }
}
