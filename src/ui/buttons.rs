//! GPIO button input with tick-based debouncing.
//!
//! Four physical buttons (active-low with internal pull-up):
//!   - S1 PARENT - leave the current sub-menu
//!   - S2 UP     - move selection up
//!   - S3 DOWN   - move selection down
//!   - S4 SELECT - enter the selected sub-menu
//!
//! Every button runs its own four-state machine, advanced once per
//! scheduling pass:
//!
//! ```text
//!   UP --press--> FALLING --50 passes pressed--> DOWN  (emits Edge::Down)
//!    ^               | released                   |
//!    +---------------+                            | release
//!    +---50 passes released--- RISING <-----------+
//!                                 | pressed again -> DOWN
//! ```
//!
//! Only the press edge is reported. The release edge is accepted (the
//! machine returns to UP) but no `Edge::Up` signal is emitted.

use embedded_hal::digital::InputPin;

use crate::config::{BUTTON_COUNT, BUTTON_DEBOUNCE_TICKS};
use crate::queue::EventQueue;
use crate::tick::TickCounter;
use crate::ui::{ButtonId, ButtonSignal, Edge};

/// Debounce machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    Up,
    Falling,
    Down,
    Rising,
}

/// One raw sample of a button, already corrected for polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Pressed,
    Released,
}

/// Static wiring of one button.
#[derive(Clone, Copy, Debug)]
pub struct ButtonConfig {
    pub id: ButtonId,
    /// Pin reads low while the switch is closed.
    pub active_low: bool,
    /// Passes a new level must hold before it is accepted.
    pub debounce_ticks: u32,
}

impl ButtonConfig {
    pub const fn active_low(id: ButtonId) -> Self {
        Self {
            id,
            active_low: true,
            debounce_ticks: BUTTON_DEBOUNCE_TICKS,
        }
    }
}

/// Board button table, in pin order S1..S4.
pub const DEFAULT_BUTTONS: [ButtonConfig; BUTTON_COUNT] = [
    ButtonConfig::active_low(ButtonId::Parent),
    ButtonConfig::active_low(ButtonId::Up),
    ButtonConfig::active_low(ButtonId::Down),
    ButtonConfig::active_low(ButtonId::Select),
];

/// Runtime debounce state of one button.
#[derive(Clone, Copy, Debug)]
pub struct ButtonState {
    id: ButtonId,
    debounce_ticks: u32,
    ticks: u32,
    state: DebounceState,
    last_reading: Reading,
}

impl ButtonState {
    pub const fn new(config: &ButtonConfig) -> Self {
        Self {
            id: config.id,
            debounce_ticks: config.debounce_ticks,
            ticks: 0,
            state: DebounceState::Up,
            last_reading: Reading::Released,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Countdown remaining in FALLING/RISING.
    pub fn ticks_remaining(&self) -> u32 {
        self.ticks
    }

    pub fn last_reading(&self) -> Reading {
        self.last_reading
    }

    /// Advance the machine by one pass with a fresh sample.
    pub fn update(&mut self, reading: Reading) -> Option<Edge> {
        self.last_reading = reading;

        match self.state {
            DebounceState::Up => {
                if reading == Reading::Pressed {
                    self.ticks = self.debounce_ticks;
                    self.state = DebounceState::Falling;
                }
                None
            }
            DebounceState::Falling => {
                self.ticks = self.ticks.saturating_sub(1);
                match reading {
                    Reading::Released => {
                        self.state = DebounceState::Up;
                        None
                    }
                    Reading::Pressed if self.ticks == 0 => {
                        self.state = DebounceState::Down;
                        Some(Edge::Down)
                    }
                    Reading::Pressed => None,
                }
            }
            DebounceState::Down => {
                if reading == Reading::Released {
                    self.ticks = self.debounce_ticks;
                    self.state = DebounceState::Rising;
                }
                None
            }
            DebounceState::Rising => {
                self.ticks = self.ticks.saturating_sub(1);
                match reading {
                    Reading::Pressed => {
                        self.state = DebounceState::Down;
                    }
                    Reading::Released if self.ticks == 0 => {
                        // Release accepted; Edge::Up is not reported.
                        self.state = DebounceState::Up;
                    }
                    Reading::Released => {}
                }
                None
            }
        }
    }
}

/// Sample a pin and translate its level into a [`Reading`].
///
/// A failed read counts as released so a flaky line can never fake a press.
fn sample<P: InputPin>(pin: &mut P, active_low: bool) -> Reading {
    match pin.is_low() {
        Ok(low) if low == active_low => Reading::Pressed,
        Ok(_) => Reading::Released,
        Err(_) => {
            log_warn!("button: pin read failed");
            Reading::Released
        }
    }
}

/// Button task: owns the input pins and their debounce machines.
pub struct ButtonTask<P, const N: usize = BUTTON_COUNT> {
    pins: [P; N],
    configs: [ButtonConfig; N],
    states: [ButtonState; N],
}

impl<P: InputPin, const N: usize> ButtonTask<P, N> {
    /// Pair each pin with the config at the same index.
    pub fn new(pins: [P; N], configs: [ButtonConfig; N]) -> Self {
        let states = configs.map(|c| ButtonState::new(&c));
        log_info!("button task: {=usize} buttons", N);
        Self {
            pins,
            configs,
            states,
        }
    }

    pub fn states(&self) -> &[ButtonState; N] {
        &self.states
    }

    /// Drain this task's ticks, polling every button once per tick.
    ///
    /// Returns the number of passes executed.
    pub fn update(
        &mut self,
        ticks: &TickCounter,
        events: &mut EventQueue<ButtonSignal>,
    ) -> u32 {
        ticks.drain(|| self.poll(events))
    }

    /// One scheduling pass over every button.
    pub fn poll(&mut self, events: &mut EventQueue<ButtonSignal>) {
        for ((pin, config), state) in self
            .pins
            .iter_mut()
            .zip(self.configs.iter())
            .zip(self.states.iter_mut())
        {
            let reading = sample(pin, config.active_low);
            if let Some(edge) = state.update(reading) {
                let signal = ButtonSignal {
                    button: state.id(),
                    edge,
                };
                log_info!("button: {} {}", signal.button, signal.edge);
                if !events.push(signal) {
                    log_warn!("button: event queue full, {} dropped", signal.button);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;

    /// Active-low pin whose level is shared with the test body.
    #[derive(Clone)]
    struct MockPin {
        low: Rc<Cell<bool>>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                low: Rc::new(Cell::new(false)),
            }
        }

        fn press(&self) {
            self.low.set(true);
        }

        fn release(&self) {
            self.low.set(false);
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low.get())
        }
    }

    fn machine() -> ButtonState {
        ButtonState::new(&ButtonConfig::active_low(ButtonId::Select))
    }

    fn feed(state: &mut ButtonState, reading: Reading, passes: u32) -> u32 {
        (0..passes)
            .filter(|_| state.update(reading) == Some(Edge::Down))
            .count() as u32
    }

    // ════════════════════════════════════════════════════════════════════
    // Debounce state machine
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn starts_up_and_released() {
        let s = machine();
        assert_eq!(s.state(), DebounceState::Up);
        assert_eq!(s.ticks_remaining(), 0);
        assert_eq!(s.last_reading(), Reading::Released);
    }

    #[test]
    fn press_loads_counter() {
        let mut s = machine();
        assert_eq!(s.update(Reading::Pressed), None);
        assert_eq!(s.state(), DebounceState::Falling);
        assert_eq!(s.ticks_remaining(), BUTTON_DEBOUNCE_TICKS);
    }

    #[test]
    fn press_edge_after_full_window() {
        let mut s = machine();
        // One pass arms the window, then 50 passes count it down.
        assert_eq!(feed(&mut s, Reading::Pressed, BUTTON_DEBOUNCE_TICKS), 0);
        assert_eq!(s.state(), DebounceState::Falling);
        assert_eq!(s.update(Reading::Pressed), Some(Edge::Down));
        assert_eq!(s.state(), DebounceState::Down);
    }

    #[test]
    fn held_press_emits_exactly_once() {
        let mut s = machine();
        assert_eq!(feed(&mut s, Reading::Pressed, 500), 1);
        assert_eq!(s.state(), DebounceState::Down);
    }

    #[test]
    fn short_bounce_is_rejected() {
        let mut s = machine();
        assert_eq!(feed(&mut s, Reading::Pressed, 30), 0);
        assert_eq!(s.update(Reading::Released), None);
        assert_eq!(s.state(), DebounceState::Up);
        assert_eq!(feed(&mut s, Reading::Released, 100), 0);
    }

    #[test]
    fn release_is_silent() {
        let mut s = machine();
        feed(&mut s, Reading::Pressed, 60);
        assert_eq!(feed(&mut s, Reading::Released, 1), 0);
        assert_eq!(s.state(), DebounceState::Rising);
        assert_eq!(s.ticks_remaining(), BUTTON_DEBOUNCE_TICKS);

        for _ in 0..BUTTON_DEBOUNCE_TICKS {
            assert_eq!(s.update(Reading::Released), None);
        }
        assert_eq!(s.state(), DebounceState::Up);
    }

    #[test]
    fn release_bounce_returns_to_down_without_new_edge() {
        let mut s = machine();
        feed(&mut s, Reading::Pressed, 60);
        feed(&mut s, Reading::Released, 10);
        assert_eq!(s.state(), DebounceState::Rising);
        assert_eq!(s.update(Reading::Pressed), None);
        assert_eq!(s.state(), DebounceState::Down);
        assert_eq!(feed(&mut s, Reading::Pressed, 100), 0);
    }

    #[test]
    fn second_clean_press_emits_again() {
        let mut s = machine();
        assert_eq!(feed(&mut s, Reading::Pressed, 60), 1);
        feed(&mut s, Reading::Released, 60);
        assert_eq!(s.state(), DebounceState::Up);
        assert_eq!(feed(&mut s, Reading::Pressed, 60), 1);
    }

    // ════════════════════════════════════════════════════════════════════
    // Button task
    // ════════════════════════════════════════════════════════════════════

    fn task() -> (ButtonTask<MockPin>, [MockPin; 4]) {
        let pins = [MockPin::new(), MockPin::new(), MockPin::new(), MockPin::new()];
        let task = ButtonTask::new(pins.clone(), DEFAULT_BUTTONS);
        (task, pins)
    }

    #[test]
    fn task_drains_ticks_and_queues_press() {
        let (mut task, pins) = task();
        let ticks = TickCounter::new();
        let mut events = EventQueue::new();

        pins[2].press();
        ticks.add(BUTTON_DEBOUNCE_TICKS + 1);
        assert_eq!(task.update(&ticks, &mut events), BUTTON_DEBOUNCE_TICKS + 1);
        assert_eq!(ticks.pending(), 0);

        assert_eq!(events.pop(), Some(ButtonSignal::down(ButtonId::Down)));
        assert!(events.is_empty());
    }

    #[test]
    fn task_without_ticks_does_not_poll() {
        let (mut task, pins) = task();
        let ticks = TickCounter::new();
        let mut events = EventQueue::new();

        pins[0].press();
        assert_eq!(task.update(&ticks, &mut events), 0);
        assert_eq!(task.states()[0].state(), DebounceState::Up);
    }

    #[test]
    fn buttons_debounce_independently() {
        let (mut task, pins) = task();
        let mut events = EventQueue::new();

        pins[0].press();
        for _ in 0..20 {
            task.poll(&mut events);
        }
        pins[3].press();
        for _ in 0..40 {
            task.poll(&mut events);
        }
        assert_eq!(events.pop(), Some(ButtonSignal::down(ButtonId::Parent)));
        assert!(events.is_empty());
        assert_eq!(task.states()[3].state(), DebounceState::Falling);

        pins[0].release();
        for _ in 0..20 {
            task.poll(&mut events);
        }
        assert_eq!(events.pop(), Some(ButtonSignal::down(ButtonId::Select)));
        assert_eq!(task.states()[0].state(), DebounceState::Rising);
    }

    #[test]
    fn full_queue_drops_press_but_debounce_continues() {
        let (mut task, pins) = task();
        let mut events = EventQueue::new();
        while events.push(ButtonSignal::down(ButtonId::Up)) {}

        pins[3].press();
        for _ in 0..=BUTTON_DEBOUNCE_TICKS {
            task.poll(&mut events);
        }
        assert_eq!(task.states()[3].state(), DebounceState::Down);
        assert_eq!(events.len(), events.capacity());
        while let Some(signal) = events.pop() {
            assert_eq!(signal.button, ButtonId::Up);
        }
    }

    #[test]
    fn active_high_button_is_inverted() {
        let pin = MockPin::new();
        let config = ButtonConfig {
            id: ButtonId::Up,
            active_low: false,
            debounce_ticks: 2,
        };
        let mut task = ButtonTask::new([pin.clone()], [config]);
        let mut events: EventQueue<ButtonSignal> = EventQueue::new();

        // Mock line idles high, which is "pressed" for an active-high switch.
        for _ in 0..3 {
            task.poll(&mut events);
        }
        assert_eq!(events.pop(), Some(ButtonSignal::down(ButtonId::Up)));

        pin.press();
        task.poll(&mut events);
        assert_eq!(task.states()[0].state(), DebounceState::Rising);
    }
}
