//! Next-tick callbacks.

use crate::mode::ModeId;

/// Deferred work the editor runs at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Activate an editor mode.
    ActivateMode(ModeId),
}

/// Queue of actions for the next tick, run in the order they were set.
#[derive(Debug, Default)]
pub struct TimerManager {
    next_tick: Vec<TimerAction>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` at the start of the next tick.
    pub fn set_timer_for_next_tick(&mut self, action: TimerAction) {
        self.next_tick.push(action);
    }

    /// Take everything due this tick. Actions set while these run wait for
    /// the following tick.
    pub fn take_next_tick(&mut self) -> Vec<TimerAction> {
        std::mem::take(&mut self.next_tick)
    }

    /// Number of actions waiting.
    pub fn pending(&self) -> usize {
        self.next_tick.len()
    }
}
