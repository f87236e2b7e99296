//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, capacities, and LCD protocol constants live
//! here so they can be tuned in one place.

// Scheduling

/// Period of the tick interrupt (ms).
pub const TICK_PERIOD_MS: u64 = 5;

/// Ticks added to every task counter per tick interrupt.
pub const TICK_INCREMENT: u32 = 1;

// Event queues

/// Capacity of both inter-task event queues.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

// Buttons

/// Number of physical buttons on the board.
pub const BUTTON_COUNT: usize = 4;

/// Debounce window, in scheduling passes (one pass per tick).
pub const BUTTON_DEBOUNCE_TICKS: u32 = 50;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the concrete `embassy_nrf::peripherals::*` are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button S1 PARENT → P0.11
//   Button S2 UP     → P0.12
//   Button S3 DOWN   → P0.24
//   Button S4 SELECT → P0.25
//   I²C SDA          → P0.26
//   I²C SCL          → P0.27

// Menu

/// Maximum label length in bytes.
pub const MENU_LABEL_LEN: usize = 20;

/// Maximum number of items a single menu can hold.
pub const MAX_MENU_ITEMS: usize = 8;

/// Maximum number of menus in the arena (root included).
pub const MAX_MENUS: usize = 8;

/// Items in the default root menu.
pub const DEFAULT_MENU_ITEMS: usize = 4;

/// Items in each default sub-menu.
pub const DEFAULT_SUBMENU_ITEMS: usize = 3;

// LCD (HD44780, 20x4)

/// Characters per row.
pub const LCD_COLUMNS: usize = 20;

/// Visible rows.
pub const LCD_ROWS: usize = 4;

/// DDRAM address of the first character of each row on a 20x4 module.
pub const LCD_ROW_OFFSETS: [u8; LCD_ROWS] = [0, 64, 20, 84];

/// Power-on wait before the first instruction (ms).
pub const LCD_POWER_ON_DELAY_MS: u32 = 50;

/// Wait after the first wake-up instruction (ms).
pub const LCD_WAKE_DELAY_MS: u32 = 5;

/// Settle time after every instruction and each enable edge (ms).
pub const LCD_SETTLE_DELAY_MS: u32 = 1;

/// PCF8574 backpack address (7-bit form of the 0x4E write address).
pub const PCF8574_ADDRESS: u8 = 0x27;

/// Extra attempts for a failed expander write before giving up.
pub const I2C_WRITE_RETRIES: u8 = 2;
