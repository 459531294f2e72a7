//! # spl-meter
//!
//! Sound-pressure-level meter for the Disobey 2026 badge.
//!
//! The crate splits into a hardware-agnostic core and the badge binding:
//! - **Core** (always built, host-testable): calibration, signal
//!   conditioning, intensity mapping, debounced input and the
//!   Idle/Calibrating/Measuring state machine in [`Meter`].
//! - **Badge** (`badge` feature): I2S microphone, WS2812 LED bars, ST7789
//!   display, A/B button interrupts and a piezo tone output.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = spl_meter::init();
//! let resources = spl_meter::split_resources!(peripherals);
//!
//! let mic = Microphone::new(resources.mic, SAMPLE_RATE, descriptors)?;
//! let leds: Leds = resources.leds.try_into()?;
//! let mut meter = Meter::new(&CONTROLS, mic, leds, screen, TONES.alert());
//! meter.calibrate(&mut Delay::new())?;
//! loop {
//!     meter.tick(Instant::now())?;
//!     Timer::after(TICK_INTERVAL).await;
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod calibrator;
pub mod conditioner;
pub mod config;
pub mod debounce;
pub mod error;
pub mod feedback;
pub mod input;
pub mod meter;
pub mod sampler;
pub mod screen;
pub mod state;
pub mod tone;

#[cfg(feature = "badge")]
pub mod board;
#[cfg(feature = "badge")]
mod buttons;
#[cfg(feature = "badge")]
mod buzzer;
#[cfg(feature = "badge")]
mod display;
#[cfg(feature = "badge")]
mod leds;
#[cfg(feature = "badge")]
pub mod microphone;

pub use calibrator::Baseline;
pub use conditioner::{
    MeasurementSession,
    Reading,
};
pub use error::{
    Error,
    halt,
};
pub use feedback::{
    Intensity,
    LevelIndicator,
};
pub use input::{
    Controls,
    Edges,
    InputEvent,
    InputLine,
};
pub use meter::{
    Meter,
    Tick,
};
pub use sampler::Sampler;
pub use screen::{
    TextDisplay,
    TextScreen,
};
pub use state::OperationalState;
pub use tone::{
    Tone,
    ToneControl,
};

#[cfg(feature = "badge")]
pub use board::{
    CONTROLS,
    Resources,
    TONES,
    init,
};
#[cfg(feature = "badge")]
pub use buttons::Buttons;
#[cfg(feature = "badge")]
pub use buzzer::Buzzer;
#[cfg(feature = "badge")]
pub use display::{
    Display,
    Screen,
};
#[cfg(feature = "badge")]
pub use leds::Leds;
#[cfg(feature = "badge")]
pub use microphone::Microphone;

/// Allocate `$val` into a `static` of type `$t`. Each call site may run once.
#[cfg(feature = "badge")]
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}
