//! Fixed device constants. The meter has no runtime configuration.

use embassy_time::Duration;

// ── Timing ──────────────────────────────────────────────────────────────────

/// Main loop period; one state-machine tick per interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Length of one measurement window.
pub const MEASUREMENT_DURATION: Duration = Duration::from_secs(10);

/// Minimum spacing between two accepted edges on the same input line.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(400);

/// Settle time after power-up before the panel and microphone are trusted.
pub const STARTUP_DELAY: Duration = Duration::from_secs(2);

// ── Calibration ─────────────────────────────────────────────────────────────

/// Sampling rounds averaged into the baseline noise voltage.
pub const CALIBRATION_SAMPLES: usize = 50;

/// Pause between calibration rounds.
pub const CALIBRATION_INTERVAL: Duration = Duration::from_millis(100);

/// Rounds between two progress checkpoints (display refresh + chirp).
pub const CALIBRATION_CHECKPOINT: usize = 10;

// ── Sampling / ADC model ────────────────────────────────────────────────────

/// Samples captured per sampling round.
pub const SAMPLE_COUNT: usize = 200;

/// Microphone sample rate in Hz.
pub const SAMPLE_RATE: u32 = 16_000;

/// Bit depth of the raw sample codes.
pub const ADC_BITS: u32 = 12;

/// Number of distinct raw codes.
pub const ADC_RESOLUTION: u32 = 1 << ADC_BITS;

/// Reference voltage; full scale of the raw codes.
pub const REF_VOLTAGE: f32 = 3.3;

// ── Signal conditioning ─────────────────────────────────────────────────────

/// Slots in the moving-average history.
pub const HISTORY_LEN: usize = 5;

/// Reference sound pressure (20 µPa).
pub const REF_PRESSURE: f32 = 0.000_02;

/// Adjusted voltages below this are treated as silence.
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// Lowest reportable level.
pub const DB_MIN: f32 = 30.0;

/// Highest reportable level.
pub const DB_MAX: f32 = 120.0;

// ── Feedback ────────────────────────────────────────────────────────────────

/// Voltage covered by one intensity level.
pub const INTENSITY_STEP: f32 = REF_VOLTAGE / 5.0 / 20.0;

/// Highest intensity level; one per LED bar row.
pub const MAX_INTENSITY: u8 = 5;

/// Manual tone toggled by the B button.
pub const MANUAL_TONE_HZ: u32 = 2_500;

/// Chirp played when a measurement starts.
pub const START_TONE_HZ: u32 = 392;

/// Chirp played at each calibration checkpoint.
pub const CALIBRATION_TONE_HZ: u32 = 800;

/// Alert played while the input saturates the top intensity level.
pub const ALERT_TONE_HZ: u32 = 3_500;

// ── Text display ────────────────────────────────────────────────────────────

/// Characters per text line.
pub const LINE_WIDTH: usize = 32;
