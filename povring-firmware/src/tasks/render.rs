//! Render task
//!
//! Sweeps a small triangle marker back and forth through the columns the
//! banner leaves free. Each frame is one locked drawing call, so the
//! column interrupt never shows a half-moved marker.

use defmt::*;
use embassy_time::{Duration, Ticker};
use povring_core::font::Font5x7;
use povring_core::{Canvas, PIXELS};

use crate::irq::{POV, RESOLUTION};

/// Frame interval in milliseconds
pub const FRAME_INTERVAL_MS: u64 = 150;

/// Marker width in columns
const MARKER_WIDTH: usize = 5;

/// Render task - animates the marker after the first `text_columns` columns
#[embassy_executor::task]
pub async fn render_task(text_columns: usize) {
    let Some(span) = free_span(text_columns) else {
        info!("No free columns for the marker, render task idle");
        return;
    };
    info!("Render task started ({} free columns)", span.len);

    let mut ticker = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));
    let mut offset = 0;
    let mut forward = true;

    loop {
        ticker.next().await;

        POV.draw(|canvas| draw_marker(canvas, &span, offset));

        (offset, forward) = step(offset, forward, span.len - MARKER_WIDTH);
    }
}

/// Columns available to the marker
struct Span {
    start: usize,
    len: usize,
}

/// One blank column on each side of the text, room for the marker
fn free_span(text_columns: usize) -> Option<Span> {
    let start = text_columns + 1;
    let len = RESOLUTION.checked_sub(start + 1)?;
    (len >= MARKER_WIDTH).then_some(Span { start, len })
}

fn draw_marker(
    canvas: &mut Canvas<Font5x7, RESOLUTION>,
    span: &Span,
    offset: usize,
) {
    for column in span.start..span.start + span.len {
        let _ = canvas.write_column(column, 0);
    }

    let left = span.start + offset;
    if let Err(e) = canvas.draw_triangle(
        left,
        PIXELS - 2,
        left + MARKER_WIDTH / 2,
        0,
        left + MARKER_WIDTH - 1,
        PIXELS - 2,
    ) {
        warn!("Marker not drawn: {:?}", e);
    }
}

/// Bounce between 0 and `last`
fn step(offset: usize, forward: bool, last: usize) -> (usize, bool) {
    match (forward, offset) {
        (_, _) if last == 0 => (0, forward),
        (true, o) if o >= last => (o - 1, false),
        (true, o) => (o + 1, true),
        (false, 0) => (1, true),
        (false, o) => (o - 1, false),
    }
}
