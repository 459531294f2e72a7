//! Everything the button interrupt shares with the main loop.
//!
//! The handler never touches the measurement session. It records what
//! happened in single-word atomics (`state`, the start request, the manual
//! tone flag, one debounce timestamp per line) and the main loop picks the
//! start request up on its next tick.

use core::sync::atomic::{
    AtomicBool,
    Ordering,
};

use embassy_time::Instant;

use crate::{
    config::{
        DEBOUNCE_INTERVAL,
        MANUAL_TONE_HZ,
    },
    debounce::Debouncer,
    state::{
        AtomicState,
        OperationalState,
    },
    tone::Tone,
};

/// The two monitored input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputLine {
    /// Starts a measurement from idle.
    Start,
    /// Toggles the manual tone.
    Tone,
}

/// Edge-type bitmask delivered with each trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edges(u8);

impl Edges {
    pub const FALLING: Self = Self(0b01);
    pub const RISING: Self = Self(0b10);
    pub const BOTH: Self = Self(0b11);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Outcome of one raw edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Inside the debounce window; dropped.
    Rejected,
    /// Accepted while idle; the main loop will start a measurement.
    StartRequested,
    /// Accepted but nothing to do in the current state.
    Ignored,
    ToneOn,
    ToneOff,
}

/// Interrupt-shared device state. Lives in a `static` on the badge.
#[derive(Debug)]
pub struct Controls {
    state: AtomicState,
    start_requested: AtomicBool,
    manual_tone: AtomicBool,
    start_line: Debouncer,
    tone_line: Debouncer,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    pub const fn new() -> Self {
        Self {
            state: AtomicState::new(OperationalState::Calibrating),
            start_requested: AtomicBool::new(false),
            manual_tone: AtomicBool::new(false),
            start_line: Debouncer::new(DEBOUNCE_INTERVAL),
            tone_line: Debouncer::new(DEBOUNCE_INTERVAL),
        }
    }

    pub fn state(&self) -> OperationalState {
        self.state.load()
    }

    pub(crate) fn set_state(&self, state: OperationalState) {
        self.state.store(state);
    }

    /// Consume a pending start request.
    pub fn take_start_request(&self) -> bool {
        self.start_requested.swap(false, Ordering::AcqRel)
    }

    pub fn manual_tone(&self) -> bool {
        self.manual_tone.load(Ordering::Acquire)
    }

    /// Handle one raw edge on `line`. Called from interrupt context.
    ///
    /// `manual` is the voice the tone line drives.
    pub fn on_edge<T: Tone>(
        &self,
        line: InputLine,
        edges: Edges,
        now: Instant,
        manual: &T,
    ) -> InputEvent {
        let debouncer = match line {
            InputLine::Start => &self.start_line,
            InputLine::Tone => &self.tone_line,
        };
        if !debouncer.accept(now) {
            debug!("{} edge rejected", line);
            return InputEvent::Rejected;
        }

        let event = match line {
            InputLine::Start => {
                if edges.contains(Edges::FALLING) && self.state() == OperationalState::Idle {
                    self.start_requested.store(true, Ordering::Release);
                    InputEvent::StartRequested
                } else {
                    InputEvent::Ignored
                }
            }
            InputLine::Tone => {
                let on = !self.manual_tone.fetch_xor(true, Ordering::AcqRel);
                if on {
                    manual.tone_on(MANUAL_TONE_HZ);
                    InputEvent::ToneOn
                } else {
                    manual.tone_off();
                    InputEvent::ToneOff
                }
            }
        };
        debug!("{} edge accepted: {}", line, event);
        event
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use super::*;
    use crate::tone::Voice;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_start_only_from_idle() {
        let controls = Controls::new();
        let voice = Voice::new();

        // Still calibrating.
        assert_eq!(
            controls.on_edge(InputLine::Start, Edges::FALLING, at(0), &voice),
            InputEvent::Ignored
        );
        assert!(!controls.take_start_request());

        controls.set_state(OperationalState::Idle);
        assert_eq!(
            controls.on_edge(InputLine::Start, Edges::FALLING, at(1_000), &voice),
            InputEvent::StartRequested
        );
        assert!(controls.take_start_request());
        assert!(!controls.take_start_request());
    }

    #[test]
    fn test_start_while_measuring_is_consumed() {
        let controls = Controls::new();
        let voice = Voice::new();
        controls.set_state(OperationalState::Measuring);
        assert_eq!(
            controls.on_edge(InputLine::Start, Edges::FALLING, at(1_000), &voice),
            InputEvent::Ignored
        );

        // Back to idle right away: the earlier edge still blocks a bounce.
        controls.set_state(OperationalState::Idle);
        assert_eq!(
            controls.on_edge(InputLine::Start, Edges::FALLING, at(1_100), &voice),
            InputEvent::Rejected
        );
        assert!(!controls.take_start_request());
        assert_eq!(controls.state(), OperationalState::Idle);
    }

    #[test]
    fn test_rising_edge_does_not_start() {
        let controls = Controls::new();
        controls.set_state(OperationalState::Idle);
        assert_eq!(
            controls.on_edge(InputLine::Start, Edges::RISING, at(0), &Voice::new()),
            InputEvent::Ignored
        );
        assert!(!controls.take_start_request());
    }

    #[test]
    fn test_bouncing_start_collapses_to_one() {
        let controls = Controls::new();
        let voice = Voice::new();
        controls.set_state(OperationalState::Idle);
        let accepted = [0, 3, 9, 40, 120, 399]
            .into_iter()
            .map(|ms| controls.on_edge(InputLine::Start, Edges::FALLING, at(5_000 + ms), &voice))
            .filter(|e| *e == InputEvent::StartRequested)
            .count();
        assert_eq!(accepted, 1);
    }

    #[test]
    fn test_tone_toggles_in_any_state() {
        let controls = Controls::new();
        let voice = Voice::new();
        let step = DEBOUNCE_INTERVAL + Duration::from_millis(1);

        assert_eq!(
            controls.on_edge(InputLine::Tone, Edges::FALLING, at(0), &voice),
            InputEvent::ToneOn
        );
        assert!(controls.manual_tone());
        assert_eq!(voice.frequency(), Some(MANUAL_TONE_HZ));

        controls.set_state(OperationalState::Measuring);
        assert_eq!(
            controls.on_edge(InputLine::Tone, Edges::FALLING, at(0) + step, &voice),
            InputEvent::ToneOff
        );
        assert!(!controls.manual_tone());
        assert_eq!(voice.frequency(), None);
        assert_eq!(controls.state(), OperationalState::Measuring);
    }

    #[test]
    fn test_lines_debounce_independently() {
        let controls = Controls::new();
        let voice = Voice::new();
        controls.set_state(OperationalState::Idle);
        assert_eq!(
            controls.on_edge(InputLine::Tone, Edges::FALLING, at(100), &voice),
            InputEvent::ToneOn
        );
        assert_eq!(
            controls.on_edge(InputLine::Start, Edges::FALLING, at(110), &voice),
            InputEvent::StartRequested
        );
    }

    #[test]
    fn test_edge_mask() {
        assert!(Edges::BOTH.contains(Edges::FALLING));
        assert!(!Edges::RISING.contains(Edges::FALLING));
    }
}
