//! Timer interrupt handlers
//!
//! TIM2 carries the sensor capture and the capture-timer wrap, TIM3 the
//! column advance. Both run at the same priority, so they never preempt
//! each other, and both go through the display lock.

use core::cell::RefCell;

use defmt::*;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use povring_core::config::TimingConfig;
use povring_core::font::{Font5x7, FONT_5X7};
use povring_core::sync::{capture_timer_events, SyncOutcome, TimerEvent};
use povring_core::{PovDisplay, SharedPov};
use povring_hal::{CaptureChannel, TimerId, TimingPort};
use povring_hal_stm32f1::{PixelPins, Stm32TimingPort, CAPTURE_WRAP};

use crate::channels::ROTATION_PERIODS;

/// Columns per revolution
pub const RESOLUTION: usize = 60;

/// Timer interrupt priority (above the executor's thread mode)
const TIMER_PRIORITY: Priority = Priority::P1;

/// The display, shared by the interrupts and the foreground
pub static POV: SharedPov<Font5x7, RESOLUTION> =
    SharedPov::new(PovDisplay::new(FONT_5X7, TimingConfig::DEFAULT));

/// Hardware driven from interrupt context
pub struct Hardware {
    pub port: Stm32TimingPort,
    pub lines: PixelPins<'static>,
}

static HARDWARE: Mutex<CriticalSectionRawMutex, RefCell<Option<Hardware>>> =
    Mutex::new(RefCell::new(None));

/// Hand the timing port and pixel lines over to the interrupt handlers
pub fn install(hardware: Hardware) {
    HARDWARE.lock(|cell| *cell.borrow_mut() = Some(hardware));
}

/// Unmask TIM2 and TIM3
pub fn enable() {
    interrupt::TIM2.set_priority(TIMER_PRIORITY);
    interrupt::TIM3.set_priority(TIMER_PRIORITY);
    // SAFETY: both handlers only touch state behind critical-section mutexes
    unsafe {
        interrupt::TIM2.enable();
        interrupt::TIM3.enable();
    }
    info!("Timer interrupts enabled");
}

fn with_hardware(f: impl FnOnce(&mut Hardware)) {
    HARDWARE.lock(|cell| {
        if let Some(hardware) = cell.borrow_mut().as_mut() {
            f(hardware);
        }
    });
}

fn report(outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Measured {
            period,
            interval,
            clamped,
        } => {
            if clamped {
                warn!("Column interval clamped to {} (period {} us)", interval, period);
            }
            trace!("Rotation: {} us, {} us/column", period, interval);
            // Dropped while the stats task is behind
            let _ = ROTATION_PERIODS.try_send(period);
        }
        SyncOutcome::Column(index) => trace!("Column {}", index),
        SyncOutcome::Overflow(count) => trace!("Capture timer wrap {}", count),
        SyncOutcome::Idle => {}
    }
}

#[interrupt]
fn TIM2() {
    with_hardware(|hw| {
        let flags = hw.port.take_capture_flags();
        let captured = hw.port.read_captured_value(CaptureChannel::CH1);
        for event in capture_timer_events(flags, captured, CAPTURE_WRAP) {
            let outcome = POV.handle(event, &mut hw.port, &mut hw.lines);
            report(outcome);
        }
    });
}

#[interrupt]
fn TIM3() {
    with_hardware(|hw| {
        if hw.port.take_column_flag() {
            let event = TimerEvent::PeriodElapsed(TimerId::ColumnAdvance);
            let outcome = POV.handle(event, &mut hw.port, &mut hw.lines);
            report(outcome);
        }
    });
}
