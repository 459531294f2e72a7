//! I2S MEMS microphone driver.
//!
//! The badge has an I2S microphone connected via:
//! - WS (word select / LRCLK) on GPIO8
//! - SD (serial data / DIN) on GPIO3
//! - DIO (bit clock / BCLK) on GPIO46
//!
//! Uses DMA for capture. Each read blocks until a full round of
//! [`SAMPLE_COUNT`] words has arrived, then maps the signed PCM onto the
//! 12-bit code range the rest of the meter expects.

use esp_hal::{
    Blocking,
    dma::DmaDescriptor,
    i2s::master::{
        Channels,
        Config,
        DataFormat,
        I2s,
        I2sRx,
    },
    time::Rate,
};

use crate::{
    board::MicResources,
    config::SAMPLE_COUNT,
    error::Error,
    sampler::{
        SampleBuffer,
        Sampler,
        pcm_to_code,
    },
};

/// I2S microphone, ready for blocking DMA reads.
pub struct Microphone<'a> {
    rx: I2sRx<'a, Blocking>,
    pcm: [i16; SAMPLE_COUNT],
}

impl<'a> Microphone<'a> {
    /// Set up the I2S receiver.
    ///
    /// `sample_rate` is in Hz. `descriptors` must outlive the receiver; allocate
    /// them with [`mk_static!`](crate::mk_static).
    pub fn new(
        res: MicResources<'a>,
        sample_rate: u32,
        descriptors: &'static mut [DmaDescriptor],
    ) -> Result<Self, Error> {
        let i2s = I2s::new(
            res.i2s,
            res.dma,
            Config::new_tdm_philips()
                .with_sample_rate(Rate::from_hz(sample_rate))
                .with_data_format(DataFormat::Data16Channel16)
                .with_channels(Channels::MONO),
        )
        .map_err(|_| Error::SamplerUnavailable)?;

        let rx = i2s
            .i2s_rx
            .with_bclk(res.dio)
            .with_ws(res.ws)
            .with_din(res.sd)
            .build(descriptors);

        Ok(Self {
            rx,
            pcm: [0; SAMPLE_COUNT],
        })
    }
}

impl Sampler for Microphone<'_> {
    fn sample(&mut self, buffer: &mut SampleBuffer) -> Result<(), Error> {
        self.rx.read_words(&mut self.pcm).map_err(|e| {
            error!("I2S read failed: {}", e);
            Error::SampleRead
        })?;
        for (code, &pcm) in buffer.iter_mut().zip(self.pcm.iter()) {
            *code = pcm_to_code(pcm);
        }
        Ok(())
    }
}
