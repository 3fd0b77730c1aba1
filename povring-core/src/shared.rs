//! Display shared between interrupts and the foreground
//!
//! Both timer interrupts and application drawing code reach the display
//! through [`SharedPov::lock`], which runs the closure inside a critical
//! section. A capture and a column advance can therefore never interleave,
//! and a column is never read while a drawing call is half done.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use povring_hal::{PixelLines, TimingPort};

use crate::display::PovDisplay;
use crate::font::Font;
use crate::render::Canvas;
use crate::sync::{SyncOutcome, TimerEvent};

/// [`PovDisplay`] behind a critical-section mutex, suitable for a `static`
pub struct SharedPov<F, const RESOLUTION: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<PovDisplay<F, RESOLUTION>>>,
}

impl<F: Font, const RESOLUTION: usize> SharedPov<F, RESOLUTION> {
    /// Wrap `display`; usable in a `static` initializer
    pub const fn new(display: PovDisplay<F, RESOLUTION>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(display)),
        }
    }

    /// Run `f` with exclusive access to the display
    ///
    /// Keep `f` short: interrupts are masked while it runs. Calling `lock`
    /// again from inside `f` panics.
    pub fn lock<T>(&self, f: impl FnOnce(&mut PovDisplay<F, RESOLUTION>) -> T) -> T {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Run a drawing closure on the canvas
    pub fn draw<T>(&self, f: impl FnOnce(&mut Canvas<F, RESOLUTION>) -> T) -> T {
        self.lock(|display| f(display.canvas_mut()))
    }

    /// Start the hardware; see [`PovDisplay::init`]
    pub fn init<P: TimingPort>(&self, port: &mut P) {
        self.lock(|display| display.init(port));
    }

    /// Handle a timer event from interrupt context
    pub fn handle<P: TimingPort, L: PixelLines>(
        &self,
        event: TimerEvent,
        port: &mut P,
        lines: &mut L,
    ) -> SyncOutcome {
        self.lock(|display| display.handle(event, port, lines))
    }
}
