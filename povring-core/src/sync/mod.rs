//! Rotation synchronisation
//!
//! Measures the rotation period from sensor pulses and steps the display
//! through the framebuffer in lock-step with the arm.

pub mod events;
pub mod machine;
pub mod stats;

pub use events::{capture_timer_events, TimerEvent};
pub use machine::{RotationSync, SyncOutcome, SyncState};
pub use stats::RotationStats;
