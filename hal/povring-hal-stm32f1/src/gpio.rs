//! GPIO adapters for STM32F1
//!
//! Wraps any embedded-hal 1.0 output (embassy's `Output` included) as a
//! [`povring_hal::OutputPin`], so pins can drive [`PinLines`].

use embassy_stm32::gpio::Output;
use embedded_hal::digital::{OutputPin as EhOutputPin, StatefulOutputPin};
use povring_hal::{OutputPin, PinLines};

/// Pixel lines of an eight-element arm on embassy outputs
pub type PixelPins<'d> = PinLines<Line<Output<'d>>, 8>;

/// embedded-hal output used as a display line
///
/// The last written level is cached so `is_set_high` does not need
/// `&mut` access to the pin.
pub struct Line<P> {
    pin: P,
    high: bool,
}

impl<P: StatefulOutputPin> Line<P> {
    pub fn new(mut pin: P) -> Self {
        let high = pin.is_set_high().unwrap_or(false);
        Self { pin, high }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: StatefulOutputPin> OutputPin for Line<P> {
    fn set_high(&mut self) {
        // GPIO writes on this chip are infallible
        let _ = EhOutputPin::set_high(&mut self.pin);
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = EhOutputPin::set_low(&mut self.pin);
        self.high = false;
    }

    fn toggle(&mut self) {
        let _ = StatefulOutputPin::toggle(&mut self.pin);
        self.high = !self.high;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
