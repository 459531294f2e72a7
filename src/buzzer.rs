//! Passive piezo buzzer driven as a square wave from an async task.
//!
//! The meter never touches the pin directly; it sets voices on a
//! [`ToneControl`] and [`Buzzer::run`] plays whatever frequency is current.
//! Run it on a higher-priority executor than the main loop, which blocks
//! while sampling.

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::gpio::{
    Level,
    Output,
    OutputConfig,
};

use crate::{
    board::BuzzerResources,
    tone::ToneControl,
};

/// How often a silent buzzer re-checks for a tone request.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// The piezo output pin.
pub struct Buzzer {
    pin: Output<'static>,
}

impl From<BuzzerResources<'static>> for Buzzer {
    fn from(res: BuzzerResources<'static>) -> Self {
        Self {
            pin: Output::new(res.pin, Level::Low, OutputConfig::default()),
        }
    }
}

impl Buzzer {
    /// Play `tones` forever.
    pub async fn run(&mut self, tones: &ToneControl) -> ! {
        loop {
            match tones.frequency() {
                Some(hz) => {
                    self.pin.toggle();
                    Timer::after(half_period(hz)).await;
                }
                None => {
                    self.pin.set_low();
                    Timer::after(IDLE_POLL).await;
                }
            }
        }
    }
}

fn half_period(hz: u32) -> Duration {
    Duration::from_micros(500_000 / u64::from(hz.max(1)))
}
