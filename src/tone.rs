//! Buzzer seam and the interrupt-safe tone mixer.

use core::sync::atomic::{
    AtomicBool,
    AtomicU32,
    Ordering,
};

/// A tone output. Takes `&self` so interrupt handlers can drive it.
pub trait Tone {
    fn tone_on(&self, frequency_hz: u32);
    fn tone_off(&self);
}

impl<T: Tone + ?Sized> Tone for &T {
    fn tone_on(&self, frequency_hz: u32) {
        (**self).tone_on(frequency_hz);
    }

    fn tone_off(&self) {
        (**self).tone_off();
    }
}

/// One requested frequency; zero means silent.
#[derive(Debug, Default)]
pub struct Voice(AtomicU32);

impl Voice {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    pub fn frequency(&self) -> Option<u32> {
        match self.0.load(Ordering::Acquire) {
            0 => None,
            hz => Some(hz),
        }
    }
}

impl Tone for Voice {
    fn tone_on(&self, frequency_hz: u32) {
        self.0.store(frequency_hz, Ordering::Release);
    }

    fn tone_off(&self) {
        self.0.store(0, Ordering::Release);
    }
}

/// Two voices sharing one buzzer: the manual tone (B button, interrupt
/// context) always wins over the alert/chirp voice (main loop).
#[derive(Debug, Default)]
pub struct ToneControl {
    manual: Voice,
    alert: Voice,
    muted: AtomicBool,
}

impl ToneControl {
    pub const fn new() -> Self {
        Self {
            manual: Voice::new(),
            alert: Voice::new(),
            muted: AtomicBool::new(false),
        }
    }

    pub const fn manual(&self) -> &Voice {
        &self.manual
    }

    pub const fn alert(&self) -> &Voice {
        &self.alert
    }

    /// Silence both voices for good. Later `tone_on` calls are ignored.
    pub fn mute(&self) {
        self.muted.store(true, Ordering::Release);
        self.manual.tone_off();
        self.alert.tone_off();
    }

    /// Frequency the buzzer should play right now.
    pub fn frequency(&self) -> Option<u32> {
        if self.muted.load(Ordering::Acquire) {
            return None;
        }
        self.manual.frequency().or_else(|| self.alert.frequency())
    }
}
