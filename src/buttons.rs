//! A and B buttons as falling-edge interrupt sources.
//!
//! Button A is the start line, button B the manual-tone line. Both share the
//! GPIO interrupt; the handler timestamps the edge and hands it to
//! [`Controls::on_edge`](crate::input::Controls::on_edge).

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use esp_hal::{
    gpio::{
        Event,
        Input,
        InputConfig,
        Io,
        Pull,
    },
    handler,
    ram,
};

use crate::{
    board::{
        ButtonResources,
        CONTROLS,
        TONES,
    },
    input::{
        Edges,
        InputLine,
    },
};

static START: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));
static TONE: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));

/// The two meter buttons, active low with pull-ups.
pub struct Buttons {
    a: Input<'static>,
    b: Input<'static>,
    io: Io<'static>,
}

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            a: Input::new(res.a, pull_up),
            b: Input::new(res.b, pull_up),
            io: Io::new(res.io_mux),
        }
    }
}

impl Buttons {
    /// Install the GPIO handler and start listening for presses.
    ///
    /// From here on the inputs belong to interrupt context.
    pub fn listen(self) {
        let Self {
            mut a,
            mut b,
            mut io,
        } = self;
        io.set_interrupt_handler(on_button_edge);
        critical_section::with(|cs| {
            a.listen(Event::FallingEdge);
            b.listen(Event::FallingEdge);
            START.borrow_ref_mut(cs).replace(a);
            TONE.borrow_ref_mut(cs).replace(b);
        });
    }
}

#[handler]
#[ram]
fn on_button_edge() {
    let now = Instant::now();
    critical_section::with(|cs| {
        for (line, slot) in [(InputLine::Start, &START), (InputLine::Tone, &TONE)] {
            let mut slot = slot.borrow_ref_mut(cs);
            let Some(input) = slot.as_mut() else {
                continue;
            };
            if input.is_interrupt_set() {
                input.clear_interrupt();
                CONTROLS.on_edge(line, Edges::FALLING, now, TONES.manual());
            }
        }
    });
}
