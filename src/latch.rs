use std::sync::atomic::{AtomicBool, Ordering};

/// Edge-triggered flag set by an input callback and consumed by a polling loop.
///
/// Presses that arrive between two polls collapse into one.
#[derive(Debug, Default)]
pub struct Latch {
    pressed: AtomicBool,
}

impl Latch {
    pub fn new() -> Self {
        Latch {
            pressed: AtomicBool::new(false),
        }
    }

    pub fn set(&self) {
        self.pressed.store(true, Ordering::Release);
    }

    /// Returns true if the latch was set since the last call, and clears it.
    pub fn take(&self) -> bool {
        self.pressed.swap(false, Ordering::AcqRel)
    }
}
