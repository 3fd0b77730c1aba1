//! Povring Hardware Abstraction Layer
//!
//! This crate defines the two hardware ports the POV display core depends
//! on. Chip-specific HALs (STM32F1, ...) implement them, so the framebuffer
//! and rotation sync logic never touch a peripheral register.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (povring-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  povring-core (framebuffer, sync)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  povring-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ povring-hal-    │
//!            │    stm32f1      │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`timer::TimingPort`] - Capture timer and column-advance timer
//! - [`gpio::PixelLines`] - The row of light-emitting elements
//! - [`gpio::OutputPin`] - A single digital output

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use gpio::{Level, OutputPin, PinLines, PixelLines};
pub use timer::{auto_reload, CaptureChannel, CaptureFlags, TimerId, TimingPort};
