//! HD44780 character LCD driver.
//!
//! Speaks the controller's instruction set over any [`DisplayBus`]. The
//! protocol is written once, in terms of logical lines; the bus decides
//! whether a line is a GPIO pin or a bit in an I²C expander byte.
//!
//! Every controller write is framed the same way:
//!
//! ```text
//!   RS <- instruction/data, RW <- write, EN <- low
//!   D7..D4 <- high nibble
//!   8-bit:            D3..D0 <- low nibble
//!   4-bit (awake):    pulse EN, D7..D4 <- low nibble
//!   pulse EN   (high, 1 ms, low, 1 ms)
//! ```
//!
//! Until the wake-up sequence has switched a 4-bit bus over, only the high
//! nibble of each instruction is clocked in, which is exactly what the
//! controller expects while it still believes it is on an 8-bit bus.

pub mod bus;

use embedded_hal::delay::DelayNs;

pub use bus::{Connection, DisplayBus, Line, Parallel4Bus, Parallel8Bus, Pcf8574Bus};

use crate::config::{
    LCD_POWER_ON_DELAY_MS, LCD_ROW_OFFSETS, LCD_SETTLE_DELAY_MS, LCD_WAKE_DELAY_MS,
};
use crate::error::Result;

// Instructions
pub const CLEAR_DISPLAY: u8 = 0b0000_0001;
pub const ENTRY_MODE_SET: u8 = 0b0000_0100;
pub const DISPLAY_CONTROL: u8 = 0b0000_1000;
pub const FUNCTION_SET: u8 = 0b0010_0000;
pub const SET_DDRAM_ADDR: u8 = 0b1000_0000;

// ENTRY_MODE_SET flags
pub const ENTRY_INCREMENT: u8 = 0b0000_0010;
pub const ENTRY_NO_SHIFT: u8 = 0b0000_0000;

// DISPLAY_CONTROL flags
pub const DISPLAY_ON: u8 = 0b0000_0100;
pub const DISPLAY_OFF: u8 = 0b0000_0000;
pub const CURSOR_OFF: u8 = 0b0000_0000;
pub const BLINK_OFF: u8 = 0b0000_0000;

// FUNCTION_SET flags
pub const FUNCTION_8BIT: u8 = 0b0001_0000;
pub const FUNCTION_4BIT: u8 = 0b0000_0000;
pub const FUNCTION_2LINES: u8 = 0b0000_1000;
pub const FUNCTION_5X8_DOTS: u8 = 0b0000_0000;

/// Register targeted by a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Register {
    Instruction,
    Data,
}

/// DDRAM address of character cell (`col`, `row`), or `None` for rows the
/// 20x4 module does not have.
pub fn ddram_address(col: u8, row: u8) -> Option<u8> {
    LCD_ROW_OFFSETS
        .get(usize::from(row))
        .map(|base| base.wrapping_add(col) & !SET_DDRAM_ADDR)
}

/// HD44780 controller on bus `B`, timed by `D`.
pub struct Hd44780<B, D> {
    bus: B,
    delay: D,
    /// The controller has been switched to 4-bit transfers.
    wake_complete: bool,
}

impl<B: DisplayBus, D: DelayNs> Hd44780<B, D> {
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            wake_complete: false,
        }
    }

    pub fn connection(&self) -> Connection {
        self.bus.connection()
    }

    /// Give back the bus and delay provider.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Power-on initialisation.
    ///
    /// Three 8-bit function sets wake the controller whatever state it is
    /// in; narrow buses then switch to 4-bit before configuring lines,
    /// font, display, and entry mode.
    pub fn init(&mut self) -> Result<()> {
        let connection = self.bus.connection();
        log_info!("lcd: init, {}", connection);

        // Expander backlight on; no-op on parallel buses.
        self.bus.set_line(Line::Backlight, true)?;

        self.wake_complete = false;
        self.delay.delay_ms(LCD_POWER_ON_DELAY_MS);

        self.command(FUNCTION_SET | FUNCTION_8BIT)?;
        self.delay.delay_ms(LCD_WAKE_DELAY_MS);
        self.command(FUNCTION_SET | FUNCTION_8BIT)?;
        self.settle();
        self.command(FUNCTION_SET | FUNCTION_8BIT)?;
        self.settle();

        if connection.is_nibble_mode() {
            self.command(FUNCTION_SET | FUNCTION_4BIT)?;
            self.settle();
            self.wake_complete = true;
            self.command(FUNCTION_SET | FUNCTION_4BIT | FUNCTION_2LINES | FUNCTION_5X8_DOTS)?;
            self.settle();
        } else {
            self.command(FUNCTION_SET | FUNCTION_8BIT | FUNCTION_2LINES | FUNCTION_5X8_DOTS)?;
            self.settle();
        }

        for instruction in [
            DISPLAY_CONTROL | DISPLAY_OFF | CURSOR_OFF | BLINK_OFF,
            CLEAR_DISPLAY,
            ENTRY_MODE_SET | ENTRY_INCREMENT | ENTRY_NO_SHIFT,
            DISPLAY_CONTROL | DISPLAY_ON | CURSOR_OFF | BLINK_OFF,
        ] {
            self.command(instruction)?;
            self.settle();
        }
        Ok(())
    }

    /// Move the write position to (`col`, `row`). Rows past the last one
    /// are ignored.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<()> {
        let Some(address) = ddram_address(col, row) else {
            log_debug!("lcd: row {=u8} out of range", row);
            return Ok(());
        };
        self.command(SET_DDRAM_ADDR | address)?;
        self.settle();
        Ok(())
    }

    /// Write `text` at the current position.
    ///
    /// The controller advances the address after each character, so no
    /// re-addressing happens between bytes. Writing stops at a NUL byte.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        for byte in text.bytes().take_while(|b| *b != 0) {
            self.write_char(byte)?;
        }
        Ok(())
    }

    /// Write a single character code at the current position.
    pub fn write_char(&mut self, byte: u8) -> Result<()> {
        self.write(Register::Data, byte)
    }

    /// Send a raw instruction byte.
    pub fn command(&mut self, instruction: u8) -> Result<()> {
        self.write(Register::Instruction, instruction)
    }

    /// Re-assert the expander's auxiliary line.
    pub fn keep_alive(&mut self) -> Result<()> {
        self.bus.set_line(Line::Backlight, true)
    }

    fn settle(&mut self) {
        self.delay.delay_ms(LCD_SETTLE_DELAY_MS);
    }

    fn write(&mut self, register: Register, byte: u8) -> Result<()> {
        self.bus.set_line(Line::Rs, register == Register::Data)?;
        self.bus.set_line(Line::Rw, false)?;
        self.write_bus(byte)
    }

    fn write_bus(&mut self, byte: u8) -> Result<()> {
        self.bus.set_line(Line::En, false)?;
        self.present(&Line::HIGH_NIBBLE, byte >> 4)?;

        if !self.bus.connection().is_nibble_mode() {
            self.present(&Line::LOW_NIBBLE, byte)?;
        } else if self.wake_complete {
            self.pulse_enable()?;
            self.present(&Line::HIGH_NIBBLE, byte)?;
        }

        self.pulse_enable()
    }

    /// Drive four data lines, MSB first, from the low nibble of `nibble`.
    fn present(&mut self, lines: &[Line; 4], nibble: u8) -> Result<()> {
        for (i, line) in lines.iter().enumerate() {
            let bit = 0b1000 >> i;
            self.bus.set_line(*line, nibble & bit != 0)?;
        }
        Ok(())
    }

    fn pulse_enable(&mut self) -> Result<()> {
        self.bus.set_line(Line::En, true)?;
        self.settle();
        self.bus.set_line(Line::En, false)?;
        self.settle();
        Ok(())
    }
}
