//! Events delivered by the timing hardware

use heapless::Vec;
use povring_hal::{CaptureFlags, TimerId};

/// Interrupt-level timing events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerEvent {
    /// The rotation sensor fired and the capture timer latched its counter
    Capture,
    /// A timer's period elapsed
    ///
    /// For [`TimerId::Capture`] this is a counter wrap; for
    /// [`TimerId::ColumnAdvance`] it is time to show the next column.
    PeriodElapsed(TimerId),
}

impl TimerEvent {
    /// Check if this event restarts the revolution
    pub fn is_capture(&self) -> bool {
        matches!(self, TimerEvent::Capture)
    }

    /// Check if this event counts a capture timer wrap
    pub fn is_overflow(&self) -> bool {
        matches!(self, TimerEvent::PeriodElapsed(TimerId::Capture))
    }
}

/// Order the capture-timer flags into events
///
/// With both flags pending, a small latched value means the counter
/// wrapped before the pulse, so the wrap is counted first. A large one
/// means it wrapped after the latch; the capture resets the counter, so
/// that wrap is dropped.
pub fn capture_timer_events(
    flags: CaptureFlags,
    captured: u16,
    wrap_modulus: u32,
) -> Vec<TimerEvent, 2> {
    let overflow = TimerEvent::PeriodElapsed(TimerId::Capture);
    let mut events = Vec::new();

    // Two events at most, pushes cannot fail
    match (flags.capture, flags.overflow) {
        (true, true) if (captured as u32) < wrap_modulus / 2 => {
            let _ = events.push(overflow);
            let _ = events.push(TimerEvent::Capture);
        }
        (true, _) => {
            let _ = events.push(TimerEvent::Capture);
        }
        (false, true) => {
            let _ = events.push(overflow);
        }
        (false, false) => {}
    }
    events
}
