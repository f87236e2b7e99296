//! Application context: every task plus the queues between them.
//!
//! ```text
//!   TaskTicks (ISR) ──┬──────────────┬──────────────┐
//!                     ▼              ▼              ▼
//!               ButtonTask ──▶ System ──────▶ ScreenTask ──▶ HD44780
//!                     button queue    screen queue
//! ```
//!
//! Only [`TaskTicks`] is shared with interrupt context; everything else is
//! owned here and touched from the main loop alone.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::BUTTON_COUNT;
use crate::error::Result;
use crate::lcd::{DisplayBus, Hd44780};
use crate::queue::EventQueue;
use crate::system::System;
use crate::tick::TaskTicks;
use crate::ui::buttons::{ButtonConfig, ButtonTask};
use crate::ui::screen::{ScreenDescriptor, ScreenTask};
use crate::ui::ButtonSignal;

pub struct App<'a, P, B, D> {
    ticks: &'a TaskTicks,
    buttons: ButtonTask<P, BUTTON_COUNT>,
    system: System,
    screen: ScreenTask<B, D>,
    button_events: EventQueue<ButtonSignal>,
    screen_events: EventQueue<ScreenDescriptor>,
}

impl<'a, P, B, D> App<'a, P, B, D>
where
    P: InputPin,
    B: DisplayBus,
    D: DelayNs,
{
    pub fn new(
        ticks: &'a TaskTicks,
        pins: [P; BUTTON_COUNT],
        configs: [ButtonConfig; BUTTON_COUNT],
        lcd: Hd44780<B, D>,
    ) -> Self {
        Self::with_system(ticks, pins, configs, lcd, System::new())
    }

    pub fn with_system(
        ticks: &'a TaskTicks,
        pins: [P; BUTTON_COUNT],
        configs: [ButtonConfig; BUTTON_COUNT],
        lcd: Hd44780<B, D>,
        system: System,
    ) -> Self {
        Self {
            ticks,
            buttons: ButtonTask::new(pins, configs),
            system,
            screen: ScreenTask::new(lcd),
            button_events: EventQueue::new(),
            screen_events: EventQueue::new(),
        }
    }

    /// Initialise the display and queue the first screen.
    ///
    /// A display that fails to initialise is reported but does not stop
    /// the menu from running.
    pub fn start(&mut self) -> Result<()> {
        let display = self.screen.init();
        if let Err(_e) = display {
            log_warn!("app: display init failed: {}", _e);
        }
        self.system.start(&mut self.screen_events);
        log_info!("app: started");
        display
    }

    /// One pass of the cooperative loop: buttons, then system, then screen.
    pub fn run_pass(&mut self) {
        self.buttons.update(&self.ticks.button, &mut self.button_events);
        self.system.update(
            &self.ticks.system,
            &mut self.button_events,
            &mut self.screen_events,
        );
        self.screen.update(&self.ticks.screen, &mut self.screen_events);
    }

    pub fn ticks(&self) -> &'a TaskTicks {
        self.ticks
    }

    pub fn buttons(&self) -> &ButtonTask<P, BUTTON_COUNT> {
        &self.buttons
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn screen(&self) -> &ScreenTask<B, D> {
        &self.screen
    }

    pub fn button_events(&self) -> &EventQueue<ButtonSignal> {
        &self.button_events
    }

    pub fn screen_events(&self) -> &EventQueue<ScreenDescriptor> {
        &self.screen_events
    }
}
