//! Operational state, stored so interrupt context can read it safely.

use core::sync::atomic::{
    AtomicU8,
    Ordering,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperationalState {
    /// Baseline noise is being measured; entered once at power-up.
    Calibrating = 0,
    /// Waiting for a start press.
    Idle = 1,
    /// A measurement window is running.
    Measuring = 2,
}

impl OperationalState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Idle,
            2 => Self::Measuring,
            _ => Self::Calibrating,
        }
    }
}

/// [`OperationalState`] in a single atomic byte.
#[derive(Debug)]
pub struct AtomicState(AtomicU8);

impl Default for AtomicState {
    fn default() -> Self {
        Self::new(OperationalState::Calibrating)
    }
}

impl AtomicState {
    pub const fn new(state: OperationalState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> OperationalState {
        OperationalState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, state: OperationalState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
