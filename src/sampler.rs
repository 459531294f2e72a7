//! Sampler seam and the fixed transforms from raw codes to volts.
//!
//! Raw samples are 12-bit codes centred on mid-scale. Sources with a
//! different native format (the badge's signed 16-bit I2S microphone) map
//! onto that range with [`pcm_to_code`], so the rest of the pipeline only
//! ever sees one ADC model.

use crate::{
    config::{
        ADC_BITS,
        ADC_RESOLUTION,
        REF_VOLTAGE,
        SAMPLE_COUNT,
    },
    error::Error,
};

/// One sampling round of raw codes.
pub type SampleBuffer = [u16; SAMPLE_COUNT];

/// Mid-scale code; silence sits here.
const MID_SCALE: i32 = 1 << (ADC_BITS - 1);

/// A blocking microphone.
pub trait Sampler {
    /// Fill `buffer` with a full round of raw codes, blocking until done.
    fn sample(&mut self, buffer: &mut SampleBuffer) -> Result<(), Error>;

    /// Reduce a round to one "average power" scalar (in code units).
    fn power(&self, buffer: &SampleBuffer) -> f32 {
        rms(buffer)
    }
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn sample(&mut self, buffer: &mut SampleBuffer) -> Result<(), Error> {
        (**self).sample(buffer)
    }

    fn power(&self, buffer: &SampleBuffer) -> f32 {
        (**self).power(buffer)
    }
}

/// Root mean square of the raw codes.
pub fn rms(buffer: &[u16]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f32 = buffer
        .iter()
        .map(|&code| {
            let c = f32::from(code);
            c * c
        })
        .sum();
    libm::sqrtf(sum / buffer.len() as f32)
}

/// Convert a code (or a code-scaled scalar) to volts relative to mid-scale.
pub fn adc_to_volts(code: f32) -> f32 {
    code * (REF_VOLTAGE / ADC_RESOLUTION as f32) - REF_VOLTAGE / 2.0
}

/// RMS-like voltage of one round: twice the magnitude of the adjusted power.
pub fn raw_voltage(avg_power: f32) -> f32 {
    2.0 * libm::fabsf(adc_to_volts(avg_power))
}

/// Map a signed 16-bit PCM sample onto the 12-bit code range.
pub const fn pcm_to_code(sample: i16) -> u16 {
    ((sample as i32 >> (16 - ADC_BITS)) + MID_SCALE) as u16
}

/// Run one sampling round and return its raw voltage.
pub(crate) fn read_voltage<S: Sampler>(
    sampler: &mut S,
    buffer: &mut SampleBuffer,
) -> Result<f32, Error> {
    sampler.sample(buffer)?;
    Ok(raw_voltage(sampler.power(buffer)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_scale_is_zero_volts() {
        assert!(adc_to_volts(MID_SCALE as f32).abs() < 1e-6);
        assert!(raw_voltage(MID_SCALE as f32) < 1e-6);
    }

    #[test]
    fn test_raw_voltage_is_symmetric_around_mid_scale() {
        let above = raw_voltage(MID_SCALE as f32 + 100.0);
        let below = raw_voltage(MID_SCALE as f32 - 100.0);
        assert!((above - below).abs() < 1e-5);
        assert!((above - 2.0 * 100.0 * 3.3 / 4096.0).abs() < 1e-5);
    }

    #[test]
    fn test_rms_of_constant_buffer() {
        let buffer = [1000_u16; SAMPLE_COUNT];
        assert!((rms(&buffer) - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_rms_of_empty_slice() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_pcm_to_code_covers_full_range() {
        assert_eq!(pcm_to_code(0), 2048);
        assert_eq!(pcm_to_code(i16::MIN), 0);
        assert_eq!(pcm_to_code(i16::MAX), 4095);
        assert_eq!(pcm_to_code(-16), 2047);
    }
}
