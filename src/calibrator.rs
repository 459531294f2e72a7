//! Background-noise calibration.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::{
    config::{
        CALIBRATION_CHECKPOINT,
        CALIBRATION_INTERVAL,
        CALIBRATION_SAMPLES,
    },
    error::Error,
    sampler::{
        SampleBuffer,
        Sampler,
        read_voltage,
    },
};

/// Baseline noise voltage, written once by calibration and read thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Baseline(f32);

impl Baseline {
    pub const ZERO: Self = Self(0.0);

    pub const fn new(volts: f32) -> Self {
        Self(volts)
    }

    pub const fn volts(self) -> f32 {
        self.0
    }
}

/// Where a calibration pass is, reported after every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    checkpoint: bool,
}

impl Progress {
    /// Whether this round is one of the periodic feedback points.
    pub const fn is_checkpoint(&self) -> bool {
        self.checkpoint
    }

    pub const fn percent(&self) -> u8 {
        (self.completed * 100 / self.total) as u8
    }
}

/// Averages a fixed number of sampling rounds into a [`Baseline`].
#[derive(Debug, Clone, Copy)]
pub struct Calibrator {
    rounds: usize,
    interval: Duration,
    checkpoint: usize,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CALIBRATION_SAMPLES, CALIBRATION_INTERVAL, CALIBRATION_CHECKPOINT)
    }
}

impl Calibrator {
    pub fn new(rounds: usize, interval: Duration, checkpoint: usize) -> Self {
        Self {
            rounds: rounds.max(1),
            interval,
            checkpoint: checkpoint.max(1),
        }
    }

    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// Run every round to completion and return the mean raw voltage.
    ///
    /// `on_progress` is called after each round and must not sample. A
    /// sampler failure aborts the pass; the caller treats it as fatal.
    pub fn run<S, D, F>(
        &self,
        sampler: &mut S,
        buffer: &mut SampleBuffer,
        delay: &mut D,
        mut on_progress: F,
    ) -> Result<Baseline, Error>
    where
        S: Sampler,
        D: DelayNs,
        F: FnMut(Progress),
    {
        let mut sum = 0.0_f32;
        for round in 1..=self.rounds {
            sum += read_voltage(sampler, buffer)?;
            on_progress(Progress {
                completed: round,
                total: self.rounds,
                checkpoint: round % self.checkpoint == 0,
            });
            delay.delay_ms(self.interval.as_millis() as u32);
        }
        Ok(Baseline(sum / self.rounds as f32))
    }
}
