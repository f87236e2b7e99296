//! Button-driven hierarchical menu on an HD44780 character LCD.
//!
//! The crate is the application core of a small embedded device: four
//! debounced buttons navigate a menu tree shown on a 20x4 LCD. Three
//! cooperative tasks run from one main loop and talk through fixed-capacity
//! queues; a periodic timer interrupt paces them through tick counters.
//!
//! Everything here is `no_std` and hardware-agnostic. Pins, I²C, and delays
//! come in through `embedded-hal` 1.0 traits, so the same code runs on the
//! nRF52840 firmware (`src/main.rs`, feature `embedded`) and under
//! `cargo test --lib` on the host.
//!
//! ## Layout
//!
//! - [`tick`]: interrupt-shared tick counters and the drain loop
//! - [`queue`]: bounded FIFO between tasks
//! - [`ui::buttons`]: debounce engine and button task
//! - [`ui::menu`]: menu tree and navigation cursor
//! - [`system`]: maps button signals to navigation and screen updates
//! - [`ui::screen`]: renders screen descriptors
//! - [`lcd`]: HD44780 protocol over GPIO or a PCF8574 expander
//! - [`app`]: owns all tasks and runs one pass of the loop

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod app;
pub mod config;
pub mod error;
pub mod lcd;
pub mod queue;
pub mod system;
pub mod tick;
pub mod ui;

pub use app::App;
pub use error::{Error, Result};
pub use queue::EventQueue;
pub use system::System;
pub use tick::{TaskTicks, TickCounter};
