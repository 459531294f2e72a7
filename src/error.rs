//! Error type shared by the core and the board layer.

use core::fmt;

/// Everything that can stop the meter. All variants are fatal: with no
/// working microphone, panel or LED channel there is nothing useful to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The microphone could not be set up.
    SamplerUnavailable,
    /// A blocking sample read failed.
    SampleRead,
    /// The LED channel could not be set up.
    LedDriver,
    /// The panel or its bus could not be set up.
    Display,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SamplerUnavailable => f.write_str("no sampling channel available"),
            Self::SampleRead => f.write_str("sample read failed"),
            Self::LedDriver => f.write_str("LED driver initialisation failed"),
            Self::Display => f.write_str("display initialisation failed"),
        }
    }
}

impl core::error::Error for Error {}

/// Park the device after a fatal error.
///
/// Logs once, then spins forever. Silence the buzzer before calling this;
/// nothing else needs to be released.
pub fn halt(error: Error) -> ! {
    error!("fatal: {}", error);
    loop {
        core::hint::spin_loop();
    }
}
