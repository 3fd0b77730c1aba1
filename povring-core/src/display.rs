//! The complete display
//!
//! [`PovDisplay`] owns the drawing canvas and the rotation sync state.
//! Interrupt handlers feed it timer events; application code draws on the
//! canvas. Hardware is always passed in, never stored.

use povring_hal::{PixelLines, TimingPort};

use crate::config::TimingConfig;
use crate::font::Font;
use crate::render::Canvas;
use crate::sync::{RotationSync, SyncOutcome, TimerEvent};

/// Canvas plus rotation sync
pub struct PovDisplay<F, const RESOLUTION: usize> {
    canvas: Canvas<F, RESOLUTION>,
    sync: RotationSync<RESOLUTION>,
}

impl<F: Font, const RESOLUTION: usize> PovDisplay<F, RESOLUTION> {
    /// Create a blank, idle display
    pub const fn new(font: F, timing: TimingConfig) -> Self {
        Self {
            canvas: Canvas::new(font),
            sync: RotationSync::new(timing),
        }
    }

    /// Blank the canvas, reset sync state and start both timers
    ///
    /// The capture timer's real wrap replaces any configured
    /// `wrap_modulus`. The column-advance timer free-runs at its reset
    /// period until the first sensor pulse sets a real interval.
    pub fn init<T: TimingPort>(&mut self, port: &mut T) {
        self.canvas.clear();
        self.sync.reset();

        let timing = *self.sync.config();
        let wrap_modulus = port.capture_wrap();
        if timing.wrap_modulus != wrap_modulus {
            self.sync.set_config(TimingConfig {
                wrap_modulus,
                ..timing
            });
        }

        port.start_base_timer();
        port.start_capture(RotationSync::<RESOLUTION>::SENSOR_CHANNEL);
        port.start_column_timer();
    }

    /// Feed one timer event through the sync state machine
    pub fn handle<T: TimingPort, L: PixelLines>(
        &mut self,
        event: TimerEvent,
        port: &mut T,
        lines: &mut L,
    ) -> SyncOutcome {
        self.sync
            .handle(event, port, lines, self.canvas.framebuffer())
    }

    /// Drawing surface, read-only
    pub fn canvas(&self) -> &Canvas<F, RESOLUTION> {
        &self.canvas
    }

    /// Drawing surface
    pub fn canvas_mut(&mut self) -> &mut Canvas<F, RESOLUTION> {
        &mut self.canvas
    }

    /// Rotation timing state
    pub fn sync(&self) -> &RotationSync<RESOLUTION> {
        &self.sync
    }

    /// Replace the timing configuration; applies from the next pulse
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.sync.set_config(timing);
    }
}
