//! The measuring state machine and the device context it runs in.
//!
//! ```text
//! Calibrating ──(calibration done)──▶ Idle ──(start press)──▶ Measuring
//!                                      ▲                         │
//!                                      └──(deadline passed)──────┘
//! ```
//!
//! [`Meter`] owns every main-loop resource (sample buffer, session, baseline,
//! deadline, output drivers). The only state it shares with interrupt
//! context is the [`Controls`] it borrows.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

use crate::{
    calibrator::{
        Baseline,
        Calibrator,
    },
    conditioner::{
        MeasurementSession,
        Reading,
    },
    config::{
        CALIBRATION_TONE_HZ,
        MEASUREMENT_DURATION,
        SAMPLE_COUNT,
        START_TONE_HZ,
    },
    error::Error,
    feedback::{
        LevelIndicator,
        alert_tone,
        map_intensity,
    },
    input::Controls,
    sampler::{
        SampleBuffer,
        Sampler,
    },
    screen::{
        self,
        TextDisplay,
    },
    state::OperationalState,
    tone::Tone,
};

/// What one call to [`Meter::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Calibrating or idle with nothing requested.
    Waiting,
    /// A start request was taken; the window is armed.
    Started,
    /// One sample was processed.
    Measured(Reading),
    /// The last sample of the window was processed and reported.
    Completed { reading: Reading, max_db: f32 },
}

/// Device context: the state machine plus everything the main loop owns.
pub struct Meter<'a, S, L, D, T> {
    controls: &'a Controls,
    sampler: S,
    leds: L,
    display: D,
    alert: T,
    buffer: SampleBuffer,
    session: MeasurementSession,
    baseline: Baseline,
    deadline: Option<Instant>,
}

impl<'a, S, L, D, T> Meter<'a, S, L, D, T>
where
    S: Sampler,
    L: LevelIndicator,
    D: TextDisplay,
    T: Tone,
{
    /// A meter in `Calibrating`. `alert` is the voice used for chirps and the
    /// saturation alert; the manual tone is driven from interrupt context.
    pub fn new(controls: &'a Controls, sampler: S, leds: L, display: D, alert: T) -> Self {
        controls.set_state(OperationalState::Calibrating);
        Self {
            controls,
            sampler,
            leds,
            display,
            alert,
            buffer: [0; SAMPLE_COUNT],
            session: MeasurementSession::new(),
            baseline: Baseline::ZERO,
            deadline: None,
        }
    }

    pub fn state(&self) -> OperationalState {
        self.controls.state()
    }

    pub const fn session(&self) -> &MeasurementSession {
        &self.session
    }

    pub const fn baseline(&self) -> Baseline {
        self.baseline
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub const fn leds(&self) -> &L {
        &self.leds
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn alert(&self) -> &T {
        &self.alert
    }

    /// Measure the background noise and move to `Idle`.
    ///
    /// Called from any other state this abandons the running window first.
    /// On error the meter stays in `Calibrating` with its alert voice off.
    pub fn calibrate<Dl: DelayNs>(&mut self, delay: &mut Dl) -> Result<Baseline, Error> {
        if self.controls.state() != OperationalState::Calibrating {
            self.abandon();
        }
        info!("calibrating background noise");
        let Self {
            sampler,
            buffer,
            display,
            alert,
            ..
        } = self;

        let result = Calibrator::default().run(sampler, buffer, delay, |progress| {
            if progress.is_checkpoint() {
                screen::show_calibrating(&mut *display, progress);
                alert.tone_on(CALIBRATION_TONE_HZ);
            } else {
                alert.tone_off();
            }
        });
        self.alert.tone_off();
        let baseline = result?;

        self.baseline = baseline;
        info!("baseline noise: {} V", baseline.volts());
        screen::show_ready(&mut self.display);
        self.controls.set_state(OperationalState::Idle);
        Ok(baseline)
    }

    /// Run one main-loop iteration at time `now`.
    pub fn tick(&mut self, now: Instant) -> Result<Tick, Error> {
        match self.controls.state() {
            OperationalState::Calibrating => Ok(Tick::Waiting),
            OperationalState::Idle => {
                if self.controls.take_start_request() {
                    self.start(now);
                    Ok(Tick::Started)
                } else {
                    Ok(Tick::Waiting)
                }
            }
            OperationalState::Measuring => {
                let reading = self.measure().inspect_err(|_| self.alert.tone_off())?;
                // Checked after the sample, so a window can run up to one
                // tick past its deadline.
                match self.deadline {
                    Some(deadline) if now >= deadline => {
                        let max_db = self.complete();
                        Ok(Tick::Completed { reading, max_db })
                    }
                    _ => Ok(Tick::Measured(reading)),
                }
            }
        }
    }

    fn start(&mut self, now: Instant) {
        info!("measuring for {} s", MEASUREMENT_DURATION.as_secs());
        self.session.reset();
        self.deadline = Some(now + MEASUREMENT_DURATION);
        self.leds.clear();
        self.alert.tone_on(START_TONE_HZ);
        screen::show_measuring(&mut self.display, MEASUREMENT_DURATION.as_secs());
        self.controls.set_state(OperationalState::Measuring);
    }

    fn abandon(&mut self) {
        warn!("recalibrating, current window dropped");
        self.controls.set_state(OperationalState::Calibrating);
        self.controls.take_start_request();
        self.deadline = None;
        self.session.reset();
        self.leds.clear();
        self.alert.tone_off();
    }

    fn measure(&mut self) -> Result<Reading, Error> {
        self.sampler.sample(&mut self.buffer)?;
        let avg_power = self.sampler.power(&self.buffer);
        let reading = self.session.process(avg_power, self.baseline);

        let intensity = map_intensity(reading.voltage);
        self.leds.update(intensity, reading.voltage);
        match alert_tone(intensity) {
            Some(hz) => self.alert.tone_on(hz),
            None => self.alert.tone_off(),
        }

        debug!("voltage: {} V, level: {} dB SPL", reading.voltage, reading.db);
        Ok(reading)
    }

    fn complete(&mut self) -> f32 {
        let max_db = self.session.max_db();
        info!("measurement complete, max: {} dB", max_db);
        self.controls.set_state(OperationalState::Idle);
        self.deadline = None;
        screen::show_report(&mut self.display, max_db);
        self.leds.clear();
        self.alert.tone_off();
        self.session.reset();
        max_db
    }
}
