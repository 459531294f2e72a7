//! WS2812 LED bars driven over RMT, showing the current intensity.
//!
//! The badge has 10 RGB LEDs in two bars of 5. Indexing is counter
//! clockwise from the bottom right: 0 is bottom right, 4 top right, 5 top
//! left, 9 bottom left. Both bars show the same level, bottom-up.

extern crate alloc;

use esp_hal::{
    Blocking,
    delay::Delay,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    rmt::{
        Channel,
        PulseCode,
        Rmt,
        Tx,
        TxChannelConfig,
        TxChannelCreator as _,
    },
    time::Rate,
};
use palette::Srgb;

use crate::{
    board::LedResources,
    error::Error,
    feedback::{
        BAR_ROWS,
        Intensity,
        LevelIndicator,
        bar_colors,
    },
};

/// Number of WS2812 LEDs on the badge.
pub const LED_COUNT: usize = 2 * BAR_ROWS;

/// LED bar pair with an in-memory framebuffer.
pub struct Leds<'a> {
    channel: Option<Channel<'a, Blocking, Tx>>,
    framebuffer: [Srgb<u8>; LED_COUNT],
    // Keeps the LED supply switched on.
    _power: Output<'a>,
}

impl<'a> TryFrom<LedResources<'a>> for Leds<'a> {
    type Error = Error;

    fn try_from(res: LedResources<'a>) -> Result<Self, Error> {
        let power = Output::new(res.power, Level::High, OutputConfig::default());
        let rmt = Rmt::new(res.rmt, Rate::from_mhz(40)).map_err(|_| Error::LedDriver)?;
        let tx_config = TxChannelConfig::default().with_clk_divider(1);
        let channel = rmt
            .channel0
            .configure_tx(res.io, tx_config)
            .map_err(|_| Error::LedDriver)?;
        Ok(Self {
            channel: Some(channel),
            framebuffer: [Srgb::new(0, 0, 0); LED_COUNT],
            _power: power,
        })
    }
}

impl Leds<'_> {
    /// Put the same bottom-to-top pattern on both bars.
    fn set_bars(&mut self, colors: &[Srgb<u8>; BAR_ROWS]) {
        // Right bar: hardware 0 (bottom) .. 4 (top).
        self.framebuffer[..BAR_ROWS].copy_from_slice(colors);
        // Left bar: hardware 5 (top) .. 9 (bottom).
        for (i, &color) in colors.iter().rev().enumerate() {
            self.framebuffer[BAR_ROWS + i] = color;
        }
    }

    /// Push the framebuffer out to the strip.
    fn flush(&mut self) {
        let Some(channel) = self.channel.take() else {
            error!("RMT channel lost during previous transmission");
            return;
        };

        let pulses = self
            .framebuffer
            .iter()
            .flat_map(|c| {
                // WS2812 expects GRB byte order
                [
                    Self::byte_to_pulses(c.green),
                    Self::byte_to_pulses(c.red),
                    Self::byte_to_pulses(c.blue),
                ]
                .into_iter()
                .flatten()
            })
            .chain(core::iter::once(PulseCode::end_marker()))
            .collect::<alloc::vec::Vec<_>>();

        let transaction = match channel.transmit(&pulses) {
            Ok(t) => t,
            Err(e) => {
                error!("RMT transmit failed: {}", e);
                return;
            }
        };

        self.channel = Some(match transaction.wait() {
            Ok(ch) => ch,
            Err((err, ch)) => {
                error!("RMT transaction failed: {}", err);
                ch
            }
        });

        // WS2812 reset time
        Delay::new().delay_micros(50);
    }

    /// WS2812 bit timing at 40 MHz RMT clock.
    const fn bit_to_pulse(bit: bool) -> PulseCode {
        if bit {
            // '1': 0.8 µs high (32 ticks), 0.45 µs low (18 ticks)
            PulseCode::new(Level::High, 32, Level::Low, 18)
        } else {
            // '0': 0.4 µs high (16 ticks), 0.85 µs low (34 ticks)
            PulseCode::new(Level::High, 16, Level::Low, 34)
        }
    }

    fn byte_to_pulses(byte: u8) -> [PulseCode; 8] {
        core::array::from_fn(|i| Self::bit_to_pulse((byte >> (7 - i)) & 1 != 0))
    }
}

impl LevelIndicator for Leds<'_> {
    fn update(&mut self, intensity: Intensity, _voltage: f32) {
        self.set_bars(&bar_colors(intensity));
        self.flush();
    }
}
