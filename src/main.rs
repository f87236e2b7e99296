//! lcd-menu firmware for the nRF52840-DK.
//!
//! Two executors share one set of tick counters:
//!
//! - a high-priority `InterruptExecutor` runs the 5 ms ticker and credits
//!   every task through [`TaskTicks::on_tick`];
//! - the thread-mode executor runs the cooperative loop, one
//!   [`App::run_pass`] per iteration.
//!
//! The LCD sits behind a PCF8574 backpack on TWIM0 (SDA P0.26, SCL P0.27);
//! the four buttons are active-low on P0.11, P0.12, P0.24, P0.25.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::{InterruptExecutor, Spawner};
use embassy_futures::yield_now;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_time::{Delay, Duration, Ticker};
use static_cell::StaticCell;

use lcd_menu::config::TICK_PERIOD_MS;
use lcd_menu::lcd::{Hd44780, Pcf8574Bus};
use lcd_menu::tick::TaskTicks;
use lcd_menu::ui::buttons::DEFAULT_BUTTONS;
use lcd_menu::App;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type Display = Pcf8574Bus<twim::Twim<'static, peripherals::TWISPI0>>;
type MenuApp = App<'static, Input<'static>, Display, Delay>;

static TICKS: TaskTicks = TaskTicks::new();
static APP: StaticCell<MenuApp> = StaticCell::new();

static TICK_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    TICK_EXECUTOR.on_interrupt()
}

/// Periodic tick source.
#[embassy_executor::task]
async fn tick_task(ticks: &'static TaskTicks) {
    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
    loop {
        ticker.next().await;
        ticks.on_tick();
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("lcd-menu starting");

    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let tick_spawner = TICK_EXECUTOR.start(interrupt::EGU1_SWI1);
    unwrap!(tick_spawner.spawn(tick_task(&TICKS)));

    // ── Display ─────────────────────────────────────────────────────────
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let lcd = Hd44780::new(Pcf8574Bus::new(i2c), Delay);

    // ── Buttons (S1..S4) ────────────────────────────────────────────────
    let pins = [
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
    ];

    let app = APP.init(App::new(&TICKS, pins, DEFAULT_BUTTONS, lcd));
    if app.start().is_err() {
        info!("continuing without display");
    }

    loop {
        app.run_pass();
        yield_now().await;
    }
}
