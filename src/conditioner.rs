//! Signal conditioning: moving average, baseline subtraction, silence gate
//! and the dB-SPL transform.
//!
//! The dB formula uses a fixed reference voltage and reference pressure. It is
//! a reproducible transform, not a calibrated acoustic measurement.

use crate::{
    calibrator::Baseline,
    config::{
        DB_MAX,
        DB_MIN,
        HISTORY_LEN,
        REF_PRESSURE,
        REF_VOLTAGE,
        SILENCE_THRESHOLD,
    },
    sampler::raw_voltage,
};

/// Output of one conditioning step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Filtered voltage minus baseline, zero when silent.
    pub voltage: f32,
    /// Clamped dB-SPL, zero when silent.
    pub db: f32,
}

impl Reading {
    pub const SILENT: Self = Self { voltage: 0.0, db: 0.0 };

    pub fn is_silent(&self) -> bool {
        self.voltage == 0.0
    }
}

/// Per-session conditioning state, owned by the main loop.
///
/// The history starts zeroed, so the first `HISTORY_LEN - 1` readings of a
/// session are biased toward zero.
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    history: [f32; HISTORY_LEN],
    index: usize,
    last_db: f32,
    max_db: f32,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementSession {
    pub const fn new() -> Self {
        Self {
            history: [0.0; HISTORY_LEN],
            index: 0,
            last_db: 0.0,
            max_db: 0.0,
        }
    }

    /// Start over: empty history, no readings.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Most recent dB reading, zero after silence.
    pub const fn last_db(&self) -> f32 {
        self.last_db
    }

    /// Highest dB reading of the session; zero until a non-silent reading.
    pub const fn max_db(&self) -> f32 {
        self.max_db
    }

    /// Next history slot to be written.
    pub const fn history_index(&self) -> usize {
        self.index
    }

    /// Store `voltage` in the ring and return the mean of all slots.
    pub fn filter(&mut self, voltage: f32) -> f32 {
        self.history[self.index] = voltage;
        self.index = (self.index + 1) % HISTORY_LEN;
        self.history.iter().sum::<f32>() / HISTORY_LEN as f32
    }

    /// Condition one round given its average power.
    pub fn process(&mut self, avg_power: f32, baseline: Baseline) -> Reading {
        self.condition(raw_voltage(avg_power), baseline)
    }

    /// Condition one raw voltage.
    pub fn condition(&mut self, voltage: f32, baseline: Baseline) -> Reading {
        let filtered = self.filter(voltage);
        let adjusted = (filtered - baseline.volts()).max(0.0);

        if adjusted < SILENCE_THRESHOLD {
            self.last_db = 0.0;
            return Reading::SILENT;
        }

        let db = voltage_to_db(adjusted);
        self.last_db = db;
        self.max_db = self.max_db.max(db);
        Reading {
            voltage: adjusted,
            db,
        }
    }
}

/// dB-SPL for a positive adjusted voltage, clamped to `[DB_MIN, DB_MAX]`.
pub fn voltage_to_db(adjusted: f32) -> f32 {
    let pressure_pa = adjusted / REF_VOLTAGE;
    let db = 20.0 * libm::log10f(pressure_pa / REF_PRESSURE);
    db.clamp(DB_MIN, DB_MAX)
}
