//! Screen task: renders menu descriptors on the character LCD.
//!
//! The system task describes *what* should be visible as a
//! [`ScreenDescriptor`]; this task decides how to get it onto the glass.
//! A full repaint rewrites every row, a cursor-only update touches just
//! the selection marker column.
//!
//! Row layout (20 columns):
//!
//! ```text
//!   [x] Menu Item 1
//!   [ ] Menu Item 2
//! ```

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::config::{LCD_COLUMNS, LCD_ROWS};
use crate::error::Result;
use crate::lcd::{DisplayBus, Hd44780};
use crate::queue::EventQueue;
use crate::tick::TickCounter;
use crate::ui::menu::{label, Label};

/// Column holding the selection marker.
const MARKER_COLUMN: u8 = 1;

/// One formatted LCD row.
pub type Line = String<LCD_COLUMNS>;

/// Snapshot of what the screen should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenDescriptor {
    /// Labels for rows 0..3; rows past the end of the menu are empty.
    pub lines: [Label; LCD_ROWS],
    /// Selected row.
    pub selected: usize,
    /// Rewrite every row instead of only moving the marker.
    pub full_repaint: bool,
}

impl ScreenDescriptor {
    /// Content shown before the first descriptor arrives.
    pub fn placeholder() -> Self {
        Self {
            lines: [
                label("Default 1"),
                label("Default 2"),
                label("Default 3"),
                label("Default 4"),
            ],
            selected: 0,
            full_repaint: false,
        }
    }
}

impl Default for ScreenDescriptor {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Format a row: `"[ ] label"`, with `x` in the box when selected, padded
/// with spaces to the full width. An empty label gives a blank row.
pub fn format_line(text: &str, selected: bool) -> Line {
    let mut line = Line::new();
    if !text.is_empty() {
        let prefix = if selected { "[x] " } else { "[ ] " };
        let _ = line.push_str(prefix);
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
    }
    while line.push(' ').is_ok() {}
    line
}

/// Owns the display driver and the descriptor currently shown.
pub struct ScreenTask<B, D> {
    lcd: Hd44780<B, D>,
    shown: ScreenDescriptor,
}

impl<B: DisplayBus, D: DelayNs> ScreenTask<B, D> {
    pub fn new(lcd: Hd44780<B, D>) -> Self {
        Self {
            lcd,
            shown: ScreenDescriptor::placeholder(),
        }
    }

    /// Bring up the display controller.
    pub fn init(&mut self) -> Result<()> {
        log_info!("screen task: init");
        self.lcd.init()
    }

    /// Last descriptor taken from the queue.
    pub fn shown(&self) -> &ScreenDescriptor {
        &self.shown
    }

    pub fn lcd(&self) -> &Hd44780<B, D> {
        &self.lcd
    }

    pub fn release(self) -> Hd44780<B, D> {
        self.lcd
    }

    /// Drain this task's ticks, rendering one descriptor per tick.
    ///
    /// Returns the number of passes executed.
    pub fn update(
        &mut self,
        ticks: &TickCounter,
        events: &mut EventQueue<ScreenDescriptor>,
    ) -> u32 {
        ticks.drain(|| self.step(events))
    }

    /// One scheduling pass. Display errors are logged and dropped; the next
    /// descriptor gets a fresh attempt.
    pub fn step(&mut self, events: &mut EventQueue<ScreenDescriptor>) {
        let outcome = match events.pop() {
            Some(descriptor) => {
                self.shown = descriptor;
                self.render()
            }
            None => self.lcd.keep_alive(),
        };
        if let Err(_e) = outcome {
            log_warn!("screen: display write failed: {}", _e);
        }
    }

    fn render(&mut self) -> Result<()> {
        if self.shown.full_repaint {
            self.repaint()
        } else {
            self.move_marker()
        }
    }

    fn repaint(&mut self) -> Result<()> {
        for (row, text) in self.shown.lines.iter().enumerate() {
            let line = format_line(text, row == self.shown.selected);
            self.lcd.set_cursor(0, row as u8)?;
            self.lcd.write_str(&line)?;
        }
        Ok(())
    }

    fn move_marker(&mut self) -> Result<()> {
        for row in 0..LCD_ROWS as u8 {
            self.lcd.set_cursor(MARKER_COLUMN, row)?;
            self.lcd.write_str(" ")?;
        }
        // Off-screen selection: no marker.
        let Some(row) = u8::try_from(self.shown.selected)
            .ok()
            .filter(|row| usize::from(*row) < LCD_ROWS)
        else {
            log_debug!("screen: selection {=usize} not visible", self.shown.selected);
            return Ok(());
        };
        self.lcd.set_cursor(MARKER_COLUMN, row)?;
        self.lcd.write_str("x")
    }
}
