//! User interface subsystem - character LCD + physical buttons.
//!
//! ## Components
//!
//! - **Buttons**: 4 tactile switches, polled and debounced once per tick
//! - **Menu**: arena-backed menu tree with a navigation cursor
//! - **Screen**: formats the current menu and drives the HD44780 LCD

pub mod buttons;
pub mod menu;
pub mod screen;

/// Physical buttons (board switches S1..S4).
///
///   - PARENT: leave the current sub-menu
///   - UP/DOWN: move the selection
///   - SELECT: enter the selected item's sub-menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Parent,
    Up,
    Down,
    Select,
}

/// Debounced transition of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Stable press accepted.
    Down,
    /// Stable release accepted.
    Up,
}

/// Signal sent from the button task to the system task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSignal {
    pub button: ButtonId,
    pub edge: Edge,
}

impl ButtonSignal {
    /// Press signal for `button`.
    pub const fn down(button: ButtonId) -> Self {
        Self {
            button,
            edge: Edge::Down,
        }
    }

    /// Release signal for `button`.
    pub const fn up(button: ButtonId) -> Self {
        Self {
            button,
            edge: Edge::Up,
        }
    }
}
