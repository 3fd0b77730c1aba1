//! GPIO output abstractions
//!
//! Provides the single-pin output trait and the "pixel lines" port that
//! drives one column of the display at a time.

/// Logic level of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0, element dark
    Low,
    /// Logic 1, element lit
    High,
}

impl Level {
    /// Level of `bit` in a column bitmask
    pub fn of_bit(bits: u8, bit: u8) -> Self {
        if bit < 8 && bits & (1 << bit) != 0 {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self);

    /// Set the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// The row of light-emitting elements on the rotating arm
///
/// Line `n` shows bit `n` of the current column.
pub trait PixelLines {
    /// Number of logical lines
    const LINES: u8;

    /// Drive logical line `index` to `level`
    ///
    /// Indices at or above [`Self::LINES`] are ignored.
    fn set_line(&mut self, index: u8, level: Level);

    /// Show a whole column: line `n` follows bit `n` of `bits`
    fn show_column(&mut self, bits: u8) {
        for line in 0..Self::LINES {
            self.set_line(line, Level::of_bit(bits, line));
        }
    }

    /// Pulse the debug strobe, if one is wired
    ///
    /// Called once per displayed column advance.
    fn strobe(&mut self) {}
}

/// [`PixelLines`] backed by an array of output pins
///
/// Optionally carries a strobe pin that toggles on every column advance,
/// which makes the column rate visible on a scope or a status LED.
pub struct PinLines<P, const N: usize> {
    pins: [P; N],
    strobe: Option<P>,
}

impl<P: OutputPin, const N: usize> PinLines<P, N> {
    /// Create lines from pins, in row order (row 0 first)
    pub fn new(pins: [P; N]) -> Self {
        Self { pins, strobe: None }
    }

    /// Create lines with a debug strobe pin
    pub fn with_strobe(pins: [P; N], strobe: P) -> Self {
        Self {
            pins,
            strobe: Some(strobe),
        }
    }

    /// Access the pin driving a line
    pub fn pin(&self, index: usize) -> Option<&P> {
        self.pins.get(index)
    }

    /// Access the strobe pin
    pub fn strobe_pin(&self) -> Option<&P> {
        self.strobe.as_ref()
    }
}

impl<P: OutputPin, const N: usize> PixelLines for PinLines<P, N> {
    const LINES: u8 = N as u8;

    fn set_line(&mut self, index: u8, level: Level) {
        if let Some(pin) = self.pins.get_mut(index as usize) {
            pin.set_level(level);
        }
    }

    fn strobe(&mut self) {
        if let Some(pin) = self.strobe.as_mut() {
            pin.toggle();
        }
    }
}
