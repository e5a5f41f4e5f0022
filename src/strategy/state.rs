use crate::strategy::StrategyMode;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use tracing::info;

/// Shared routing state owned by the producer service: the active strategy
/// mode and the message sequence counter.
///
/// Mode writes are rare and reads happen on every send, so both sides use
/// plain atomic load/store. A mode change takes effect from the next
/// evaluation onward; sends already in flight may still see the previous
/// mode.
#[derive(Debug)]
pub struct StrategyState {
    mode: AtomicU8,
    counter: AtomicU64,
}

impl StrategyState {
    pub fn new(initial: StrategyMode) -> Self {
        Self {
            mode: AtomicU8::new(initial as u8),
            counter: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> StrategyMode {
        StrategyMode::from_u8(self.mode.load(Ordering::Relaxed))
    }

    /// Replaces the active mode for all subsequent evaluations.
    pub fn set_mode(&self, new_mode: StrategyMode) {
        self.mode.store(new_mode as u8, Ordering::Relaxed);
    }

    /// Atomically increments the message counter and returns the new value.
    /// The first message is number 1. Two concurrent callers never receive
    /// the same value.
    pub fn next_sequence_number(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Switches the mode from a free-text label. Unrecognized labels
    /// activate the even-distribution fallback rather than failing; see
    /// [`StrategyMode::from_label`]. Returns the mode that was activated.
    pub fn change_strategy_via_label(&self, label: &str) -> StrategyMode {
        let mode = StrategyMode::from_label(label);
        info!(label = %label, mode = ?mode, "Changing key strategy");
        self.set_mode(mode);
        mode
    }
}

impl Default for StrategyState {
    fn default() -> Self {
        Self::new(StrategyMode::default())
    }
}
