//! Configuration type definitions

use heapless::String;

/// Maximum banner length in characters
pub const MAX_BANNER_LEN: usize = 32;

/// Banner drawn at boot when none is configured
pub const DEFAULT_BANNER: &str = "POVRING";

/// Timer configuration
///
/// The capture timer ticks once per microsecond and wraps at
/// `wrap_modulus`. The column-advance timer runs at `ticks_per_us` ticks
/// per microsecond, so its 16-bit reload register bounds the longest
/// column interval to `65536 / ticks_per_us` microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Capture counter range (65536 for a 16-bit timer)
    pub wrap_modulus: u32,
    /// Column-advance timer ticks per capture-timer tick
    pub ticks_per_us: u16,
    /// Smallest column interval ever programmed (at least 1)
    pub min_interval_ticks: u16,
}

impl TimingConfig {
    /// 16-bit capture timer, column-advance timer prescaled to 1 MHz
    pub const DEFAULT: Self = Self {
        wrap_modulus: 65536,
        ticks_per_us: 1,
        min_interval_ticks: 1,
    };

    /// Longest interval the column-advance reload register can hold
    pub fn max_interval(&self) -> u16 {
        let ticks_per_us = self.ticks_per_us.max(1) as u32;
        ((u16::MAX as u32 + 1) / ticks_per_us).min(u16::MAX as u32) as u16
    }

    /// Shortest interval: the configured minimum, and at least two timer
    /// ticks since a reload of 0 stops the counter
    pub fn min_interval(&self) -> u16 {
        let ticks_per_us = self.ticks_per_us.max(1);
        let hardware = 2u16.div_ceil(ticks_per_us);
        self.min_interval_ticks
            .max(hardware)
            .min(self.max_interval())
    }

    /// Clamp a raw column interval into the programmable range
    ///
    /// Returns the interval and whether it had to be clamped. Every
    /// returned interval survives [`Self::auto_reload`] exactly.
    pub fn clamp_interval(&self, raw: u32) -> (u16, bool) {
        let min = self.min_interval();
        let max = self.max_interval();
        if raw < min as u32 {
            (min, true)
        } else if raw > max as u32 {
            (max, true)
        } else {
            (raw as u16, false)
        }
    }

    /// Auto-reload value for the column-advance timer
    ///
    /// `interval` is in capture ticks. Saturates at the 16-bit register
    /// and is never 0.
    pub fn auto_reload(&self, interval: u16) -> u16 {
        povring_hal::auto_reload(interval, self.ticks_per_us)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What the display shows and how
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Text drawn at boot
    pub banner: String<MAX_BANNER_LEN>,
    /// Toggle the strobe line on every column
    pub strobe: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut banner = String::new();
        // DEFAULT_BANNER is shorter than MAX_BANNER_LEN
        let _ = banner.push_str(DEFAULT_BANNER);
        Self {
            banner,
            strobe: true,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PovConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
}
