//! Unified error type for lcd-menu.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for efficient
//! on-target logging.

use core::fmt;

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Hardware collaborators
    /// A GPIO line could not be driven or sampled.
    Pin,

    /// An I²C write to the display expander failed after all retries.
    I2c,

    // Menu construction
    /// The menu arena or a menu's item list is at capacity.
    MenuFull,

    /// A `MenuId` does not refer to a menu in this tree.
    InvalidMenu,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin => f.write_str("GPIO line access failed"),
            Error::I2c => f.write_str("I2C expander write failed"),
            Error::MenuFull => f.write_str("menu capacity exhausted"),
            Error::InvalidMenu => f.write_str("unknown menu handle"),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
