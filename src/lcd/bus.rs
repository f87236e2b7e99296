//! Physical wiring of the HD44780 controller.
//!
//! The protocol in [`super::Hd44780`] only ever asks a bus to drive one
//! logical controller line high or low. Each wiring variant decides what
//! that means on the board:
//!
//! | Variant          | RS | RW      | EN | Backlight | Data      |
//! |------------------|----|---------|----|-----------|-----------|
//! | `Parallel8Bus`   | pin| tied low| pin| -         | D0..D7    |
//! | `Parallel4Bus`   | pin| tied low| pin| -         | D4..D7    |
//! | `Pcf8574Bus`     | P0 | P1      | P2 | P3        | D4..D7=P4..P7 |
//!
//! Lines a variant does not wire are accepted and ignored.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::i2c::I2c;

use crate::config::{I2C_WRITE_RETRIES, PCF8574_ADDRESS};
use crate::error::{Error, Result};

/// Logical controller lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Register select: low = instruction, high = data.
    Rs,
    /// Read/write: low = write.
    Rw,
    /// Enable strobe; the controller latches on the falling edge.
    En,
    /// Backlight / auxiliary output of the expander.
    Backlight,
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
}

impl Line {
    /// Data lines carrying the high nibble, most significant first.
    pub const HIGH_NIBBLE: [Line; 4] = [Line::D7, Line::D6, Line::D5, Line::D4];

    /// Data lines carrying the low nibble, most significant first.
    pub const LOW_NIBBLE: [Line; 4] = [Line::D3, Line::D2, Line::D1, Line::D0];

    /// Bit index for data lines, `None` for control lines.
    pub fn data_bit(self) -> Option<usize> {
        match self {
            Line::D0 => Some(0),
            Line::D1 => Some(1),
            Line::D2 => Some(2),
            Line::D3 => Some(3),
            Line::D4 => Some(4),
            Line::D5 => Some(5),
            Line::D6 => Some(6),
            Line::D7 => Some(7),
            _ => None,
        }
    }
}

/// Wiring topology, selected by the bus type handed to the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connection {
    Gpio8Bit,
    Gpio4Bit,
    I2cExpander,
}

impl Connection {
    /// Bytes travel as two nibbles on D7..D4 once the controller is awake.
    pub fn is_nibble_mode(self) -> bool {
        !matches!(self, Connection::Gpio8Bit)
    }
}

/// Something that can drive the controller's lines.
pub trait DisplayBus {
    fn connection(&self) -> Connection;

    /// Drive `line` to `level` (`true` = high).
    fn set_line(&mut self, line: Line, level: bool) -> Result<()>;
}

fn drive<P: OutputPin>(pin: &mut P, level: bool) -> Result<()> {
    pin.set_state(PinState::from(level)).map_err(|_| Error::Pin)
}

// ═══════════════════════════════════════════════════════════════════════════
// Parallel GPIO
// ═══════════════════════════════════════════════════════════════════════════

/// Eight data pins plus RS and EN.
pub struct Parallel8Bus<P> {
    rs: P,
    en: P,
    /// D0..D7, index = bit.
    data: [P; 8],
}

impl<P: OutputPin> Parallel8Bus<P> {
    pub fn new(rs: P, en: P, data: [P; 8]) -> Self {
        Self { rs, en, data }
    }

    pub fn release(self) -> (P, P, [P; 8]) {
        (self.rs, self.en, self.data)
    }
}

impl<P: OutputPin> DisplayBus for Parallel8Bus<P> {
    fn connection(&self) -> Connection {
        Connection::Gpio8Bit
    }

    fn set_line(&mut self, line: Line, level: bool) -> Result<()> {
        match line {
            Line::Rs => drive(&mut self.rs, level),
            Line::En => drive(&mut self.en, level),
            Line::Rw | Line::Backlight => Ok(()),
            data => match data.data_bit().and_then(|bit| self.data.get_mut(bit)) {
                Some(pin) => drive(pin, level),
                None => Ok(()),
            },
        }
    }
}

/// Four data pins (D4..D7) plus RS and EN.
pub struct Parallel4Bus<P> {
    rs: P,
    en: P,
    /// D4..D7.
    data: [P; 4],
}

impl<P: OutputPin> Parallel4Bus<P> {
    pub fn new(rs: P, en: P, data: [P; 4]) -> Self {
        Self { rs, en, data }
    }

    pub fn release(self) -> (P, P, [P; 4]) {
        (self.rs, self.en, self.data)
    }
}

impl<P: OutputPin> DisplayBus for Parallel4Bus<P> {
    fn connection(&self) -> Connection {
        Connection::Gpio4Bit
    }

    fn set_line(&mut self, line: Line, level: bool) -> Result<()> {
        match line {
            Line::Rs => drive(&mut self.rs, level),
            Line::En => drive(&mut self.en, level),
            Line::D4 => drive(&mut self.data[0], level),
            Line::D5 => drive(&mut self.data[1], level),
            Line::D6 => drive(&mut self.data[2], level),
            Line::D7 => drive(&mut self.data[3], level),
            _ => Ok(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PCF8574 I²C backpack
// ═══════════════════════════════════════════════════════════════════════════

/// Expander port bit for each wired line.
fn expander_bit(line: Line) -> Option<u8> {
    match line {
        Line::Rs => Some(0b0000_0001),
        Line::Rw => Some(0b0000_0010),
        Line::En => Some(0b0000_0100),
        Line::Backlight => Some(0b0000_1000),
        Line::D4 => Some(0b0001_0000),
        Line::D5 => Some(0b0010_0000),
        Line::D6 => Some(0b0100_0000),
        Line::D7 => Some(0b1000_0000),
        _ => None,
    }
}

/// 8-bit I/O expander that mirrors all controller lines in one byte.
///
/// Every line change rewrites the whole port with a single one-byte I²C
/// write.
pub struct Pcf8574Bus<I> {
    i2c: I,
    address: u8,
    port: u8,
}

impl<I: I2c> Pcf8574Bus<I> {
    /// Backpack at the default address (0x27).
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, PCF8574_ADDRESS)
    }

    /// Backpack at a strapped 7-bit `address`.
    pub fn with_address(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            port: 0,
        }
    }

    /// Last byte composed for the port.
    pub fn port(&self) -> u8 {
        self.port
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn transmit(&mut self) -> Result<()> {
        let mut retries = 0;
        loop {
            match self.i2c.write(self.address, &[self.port]) {
                Ok(()) => return Ok(()),
                Err(_) if retries < I2C_WRITE_RETRIES => retries += 1,
                Err(_) => {
                    log_warn!("lcd: expander write failed, port={=u8:#x}", self.port);
                    return Err(Error::I2c);
                }
            }
        }
    }
}

impl<I: I2c> DisplayBus for Pcf8574Bus<I> {
    fn connection(&self) -> Connection {
        Connection::I2cExpander
    }

    fn set_line(&mut self, line: Line, level: bool) -> Result<()> {
        let Some(mask) = expander_bit(line) else {
            return Ok(());
        };
        if level {
            self.port |= mask;
        } else {
            self.port &= !mask;
        }
        self.transmit()
    }
}
