//! Timer abstractions
//!
//! A POV display needs two timers:
//!
//! - The **capture timer** free-runs at a fixed tick rate and latches its
//!   counter when the rotation sensor fires. Its update (wrap) interrupt
//!   lets the core count how many times it rolled over within one rotation.
//! - The **column-advance timer** fires once per column. Its period is
//!   reprogrammed on every rotation pulse.

/// Identifies one of the two timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// Free-running timer with the input capture channel
    Capture,
    /// Timer whose period elapses once per displayed column
    ColumnAdvance,
}

/// Input capture channel of the capture timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureChannel(pub u8);

impl CaptureChannel {
    /// First capture channel (the rotation sensor input)
    pub const CH1: Self = Self(1);
}

/// Interrupt flags pending on the capture timer
///
/// The sensor pulse and a counter wrap can both be pending when the
/// capture interrupt runs; the core decides the order they happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureFlags {
    /// A value was latched on the sensor channel
    pub capture: bool,
    /// The counter wrapped
    pub overflow: bool,
}

/// Auto-reload register value for a timer period
///
/// `interval` is in capture ticks (microseconds) and the timer counts
/// `ticks_per_us` per microsecond. Saturates at the 16-bit register and is
/// never 0, which would stop the counter.
pub fn auto_reload(interval: u16, ticks_per_us: u16) -> u16 {
    let ticks = interval as u32 * ticks_per_us as u32;
    ticks.saturating_sub(1).clamp(1, u16::MAX as u32) as u16
}

/// Hardware timing port
///
/// Implementations own the register-level setup. Every method must be
/// callable from interrupt context: bounded and non-blocking.
pub trait TimingPort {
    /// Start the free-running capture base timer with its update interrupt
    fn start_base_timer(&mut self);

    /// Start input capture on `channel` with its interrupt
    fn start_capture(&mut self, channel: CaptureChannel);

    /// Start the column-advance timer with its update interrupt
    fn start_column_timer(&mut self);

    /// Set a timer's period in capture-timer ticks
    ///
    /// `ticks` is never 0. Implementations convert to their own reload
    /// register format.
    fn set_period(&mut self, timer: TimerId, ticks: u16);

    /// Reset a timer's counter to 0
    fn reset_counter(&mut self, timer: TimerId);

    /// Read the value latched on `channel` by the last capture event
    fn read_captured_value(&mut self, channel: CaptureChannel) -> u16;

    /// Counts per capture timer wrap
    fn capture_wrap(&self) -> u32 {
        1 << 16
    }
}
