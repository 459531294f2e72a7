//! Sound-pressure-level meter firmware.
//!
//! Calibrates against background noise at power-up, then waits for button A
//! to run a 10 second measurement. The LED bars follow the level while
//! measuring and the display reports the loudest reading at the end.
//! Button B toggles a test tone at any time.

#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{
    Instant,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    dma::DmaDescriptor,
    interrupt::{
        Priority,
        software::SoftwareInterruptControl,
    },
    timer::timg::TimerGroup,
};
use esp_println as _;
use esp_rtos::embassy::InterruptExecutor;
#[allow(clippy::wildcard_imports)]
use spl_meter::board::*;
use spl_meter::{
    Buttons,
    Buzzer,
    Error,
    Leds,
    Meter,
    Microphone,
    Screen,
    TextDisplay,
    config::{
        SAMPLE_RATE,
        STARTUP_DELAY,
        TICK_INTERVAL,
    },
    halt,
    mk_static,
    split_resources,
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

#[embassy_executor::task]
async fn buzzer_task(mut buzzer: Buzzer) {
    buzzer.run(&TONES).await
}

async fn run(
    display: DisplayResources<'static>,
    mic: MicResources<'static>,
    leds: LedResources<'static>,
    buttons: ButtonResources<'static>,
) -> Result<Infallible, Error> {
    let mut screen = Screen::try_from(display)?;
    screen.show_lines(&["SPL meter", "", "Starting..."]);

    let descriptors = mk_static!([DmaDescriptor; 8], [DmaDescriptor::EMPTY; 8]);
    let mic = Microphone::new(mic, SAMPLE_RATE, descriptors)?;
    let leds = Leds::try_from(leds)?;

    Buttons::from(buttons).listen();

    Timer::after(STARTUP_DELAY).await;

    let mut meter = Meter::new(&CONTROLS, mic, leds, screen, TONES.alert());
    meter.calibrate(&mut Delay::new())?;
    info!("ready, press A to start");

    loop {
        meter.tick(Instant::now())?;
        Timer::after(TICK_INTERVAL).await;
    }
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    let peripherals = spl_meter::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("SPL meter booting");

    // The main loop blocks while sampling, so the tone generator runs on
    // an interrupt-driven executor above it.
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    let executor = mk_static!(
        InterruptExecutor<2>,
        InterruptExecutor::new(sw_ints.software_interrupt2)
    );
    let tone_spawner = executor.start(Priority::Priority3);
    tone_spawner.must_spawn(buzzer_task(resources.buzzer.into()));

    match run(resources.display, resources.mic, resources.leds, resources.buttons).await {
        Ok(never) => match never {},
        Err(e) => {
            TONES.mute();
            halt(e)
        }
    }
}
