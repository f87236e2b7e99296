//! Interrupt-shared tick counters and the per-task drain loop.
//!
//! Each cooperative task owns one [`TickCounter`]. The periodic timer
//! interrupt adds to it; the task's update function drains it. The counter
//! is the only datum shared between interrupt and task context, so it is
//! the only thing guarded by a critical section. Task work itself always
//! runs with interrupts enabled.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::TICK_INCREMENT;

/// Pending-tick counter for one task.
pub struct TickCounter {
    pending: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Credit `ticks` to the task. Called from the tick interrupt.
    pub fn add(&self, ticks: u32) {
        self.pending.lock(|p| p.set(p.get().saturating_add(ticks)));
    }

    /// Consume a single tick if one is pending.
    pub fn try_take(&self) -> bool {
        self.pending.lock(|p| {
            let n = p.get();
            if n > 0 {
                p.set(n - 1);
                true
            } else {
                false
            }
        })
    }

    /// Ticks not yet consumed.
    pub fn pending(&self) -> u32 {
        self.pending.lock(Cell::get)
    }

    /// Run `work` once per pending tick.
    ///
    /// The counter is decremented under the lock before each pass, the
    /// work runs unlocked. Ticks that arrive before the last pass starts
    /// are consumed in the same call. Returns the number of passes executed.
    pub fn drain(&self, mut work: impl FnMut()) -> u32 {
        let mut passes: u32 = 0;
        let mut update_required = self.try_take();
        while update_required {
            update_required = self.try_take();
            work();
            passes = passes.wrapping_add(1);
        }
        passes
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick counters of every task in the application.
pub struct TaskTicks {
    pub button: TickCounter,
    pub system: TickCounter,
    pub screen: TickCounter,
}

impl TaskTicks {
    pub const fn new() -> Self {
        Self {
            button: TickCounter::new(),
            system: TickCounter::new(),
            screen: TickCounter::new(),
        }
    }

    /// Tick interrupt entry point.
    pub fn on_tick(&self) {
        self.button.add(TICK_INCREMENT);
        self.system.add(TICK_INCREMENT);
        self.screen.add(TICK_INCREMENT);
    }
}

impl Default for TaskTicks {
    fn default() -> Self {
        Self::new()
    }
}
