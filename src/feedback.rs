//! Maps adjusted voltage to LED bar level, colour and alert tone.

use palette::Srgb;

use crate::config::{
    ALERT_TONE_HZ,
    INTENSITY_STEP,
    MAX_INTENSITY,
};

/// Rows in one LED bar, one per intensity level.
pub const BAR_ROWS: usize = MAX_INTENSITY as usize;

const OFF: Srgb<u8> = Srgb::new(0, 0, 0);
const GREEN: Srgb<u8> = Srgb::new(0, 24, 0);
const AMBER: Srgb<u8> = Srgb::new(24, 12, 0);
const RED: Srgb<u8> = Srgb::new(32, 0, 0);

/// Discrete loudness level, `0..=MAX_INTENSITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Intensity(u8);

impl Intensity {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(MAX_INTENSITY);

    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Something that can show an intensity level.
pub trait LevelIndicator {
    /// Show `intensity`; `voltage` is the adjusted voltage it came from.
    fn update(&mut self, intensity: Intensity, voltage: f32);

    fn clear(&mut self) {
        self.update(Intensity::ZERO, 0.0);
    }
}

impl<L: LevelIndicator + ?Sized> LevelIndicator for &mut L {
    fn update(&mut self, intensity: Intensity, voltage: f32) {
        (**self).update(intensity, voltage);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Number of whole intensity steps strictly below `voltage`, capped.
pub fn map_intensity(voltage: f32) -> Intensity {
    if voltage <= 0.0 {
        return Intensity::ZERO;
    }
    let steps = libm::ceilf(voltage / INTENSITY_STEP) - 1.0;
    Intensity(steps.min(f32::from(MAX_INTENSITY)) as u8)
}

/// Colour of one bar row when lit.
pub const fn row_color(row: usize) -> Srgb<u8> {
    match row {
        0 | 1 => GREEN,
        2 | 3 => AMBER,
        _ => RED,
    }
}

/// Bar pattern for `intensity`, bottom row first.
pub fn bar_colors(intensity: Intensity) -> [Srgb<u8>; BAR_ROWS] {
    let lit = usize::from(intensity.level());
    core::array::from_fn(|row| if row < lit { row_color(row) } else { OFF })
}

/// Alert frequency while the input sits at the top level.
pub fn alert_tone(intensity: Intensity) -> Option<u32> {
    (intensity == Intensity::MAX).then_some(ALERT_TONE_HZ)
}
