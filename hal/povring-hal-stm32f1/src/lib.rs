//! STM32F1-specific HAL for the Povring display
//!
//! Implements the `povring-hal` ports on STM32F103 chips:
//!
//! - [`timer::Stm32TimingPort`] - TIM2 input capture and TIM3 column timer
//! - [`gpio::Line`] - embassy outputs as display lines
//!
//! # Features
//!
//! - `stm32f103c8` - STM32F103C8T6 (Blue Pill)
//! - `stm32f103cb` - STM32F103CBT6
//! - `defmt` - Enable debug formatting support
//!
//! # Interrupts
//!
//! The firmware owns the `TIM2` and `TIM3` handlers. Each handler takes the
//! pending flags from the port and feeds the resulting events to the
//! display.

#![no_std]

pub mod gpio;
pub mod timer;

pub use gpio::{Line, PixelPins};
pub use timer::{Stm32TimingPort, TimerClocks, CAPTURE_WRAP};

// Re-export shared types from povring-hal
pub use povring_hal::{CaptureFlags, PinLines, TimerId, TimingPort};
