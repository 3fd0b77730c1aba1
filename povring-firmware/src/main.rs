//! Povring - Persistence-of-Vision Display Firmware
//!
//! Main firmware binary for STM32F103 boards (Blue Pill). A Hall sensor on
//! PA0 marks each revolution; eight LEDs on PB8..PB15 show one column of
//! the framebuffer per column interval.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::rcc;
use embassy_stm32::time::Hertz;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use povring_hal::PinLines;
use povring_hal_stm32f1::{Line, Stm32TimingPort, TimerClocks, CAPTURE_WRAP};

mod channels;
mod config;
mod image;
mod irq;
mod tasks;

/// Timer kernel clock with the clock tree below
const TIMER_CLOCK_MHZ: u16 = 72;

/// Sensor input must stay configured for the life of the firmware
static SENSOR: StaticCell<Input<'static>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Povring firmware starting...");

    let p = embassy_stm32::init(clock_config());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Pixel lines, row 0 first
    let pins = [
        Line::new(Output::new(p.PB8, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB9, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB10, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB11, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB12, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB13, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB14, Level::Low, Speed::VeryHigh)),
        Line::new(Output::new(p.PB15, Level::Low, Speed::VeryHigh)),
    ];
    let lines = if config.display.strobe {
        // Blue Pill LED on PC13, active low
        let strobe = Line::new(Output::new(p.PC13, Level::High, Speed::Low));
        PinLines::with_strobe(pins, strobe)
    } else {
        PinLines::new(pins)
    };
    info!("Pixel lines initialized (strobe: {})", config.display.strobe);

    // TIM2 CH1 input on PA0, sensor pulls low
    SENSOR.init(Input::new(p.PA0, Pull::Up));

    let clocks = TimerClocks {
        timer_clock_mhz: TIMER_CLOCK_MHZ,
        column_ticks_per_us: config.timing.ticks_per_us,
    };
    if clocks.column_prescaler() == 0 && config.timing.ticks_per_us != TIMER_CLOCK_MHZ {
        warn!(
            "ticks_per_us {} does not divide {} MHz timer clock",
            config.timing.ticks_per_us, TIMER_CLOCK_MHZ
        );
    }
    if config.timing.wrap_modulus != CAPTURE_WRAP {
        warn!(
            "wrap_modulus {} ignored, TIM2 wraps at {}",
            config.timing.wrap_modulus, CAPTURE_WRAP
        );
    }
    let mut port = Stm32TimingPort::new(clocks);
    port.configure();
    info!("Timers configured");

    irq::POV.lock(|display| display.set_timing(config.timing));
    irq::POV.init(&mut port);
    let text_columns =
        irq::POV.draw(|canvas| image::draw_boot_image(canvas, config.display.banner.as_str()));

    irq::install(irq::Hardware { port, lines });
    irq::enable();

    spawner.spawn(tasks::stats_task()).unwrap();
    spawner.spawn(tasks::render_task(text_columns)).unwrap();

    info!("All tasks spawned, display running");

    // Main task has nothing else to do - the display runs from interrupts
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// 8 MHz crystal, PLL x9: 72 MHz core, APB1 36 MHz (timers 72 MHz)
fn clock_config() -> embassy_stm32::Config {
    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(rcc::Hse {
        freq: Hertz(8_000_000),
        mode: rcc::HseMode::Oscillator,
    });
    config.rcc.pll = Some(rcc::Pll {
        src: rcc::PllSource::HSE,
        prediv: rcc::PllPreDiv::DIV1,
        mul: rcc::PllMul::MUL9,
    });
    config.rcc.sys = rcc::Sysclk::PLL1_P;
    config.rcc.ahb_pre = rcc::AHBPrescaler::DIV1;
    config.rcc.apb1_pre = rcc::APBPrescaler::DIV2;
    config.rcc.apb2_pre = rcc::APBPrescaler::DIV1;
    config
}
