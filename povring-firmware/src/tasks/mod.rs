//! Embassy async tasks
//!
//! The display itself runs entirely from interrupts; tasks only draw
//! through the display lock or observe.

pub mod render;
pub mod stats;

pub use render::render_task;
pub use stats::stats_task;
