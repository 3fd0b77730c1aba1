//! Board-agnostic core logic for the Povring POV display
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Column framebuffer
//! - Renderer (pixels, columns, text, lines, frames, triangles)
//! - 5x7 font table
//! - Rotation sync state machine and rotation statistics
//! - Critical-section wrapper for sharing the display with interrupts
//! - Configuration types and parser
//!
//! Hardware is reached only through the ports in `povring-hal`.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod font;
pub mod framebuffer;
pub mod render;
pub mod shared;
pub mod sync;

pub use display::PovDisplay;
pub use framebuffer::{Column, DisplayError, Framebuffer, PixelState, PIXELS};
pub use render::{Canvas, Cursor};
pub use shared::SharedPov;
