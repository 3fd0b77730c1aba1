//! Boot image
//!
//! Banner text from the configuration, underlined on the spare bottom row.
//! The render task animates the columns after it.

use defmt::*;
use povring_core::font::Font;
use povring_core::{Canvas, PIXELS};

/// Compose the boot image on `canvas`, returning the columns the text uses
pub fn draw_boot_image<F: Font, const RESOLUTION: usize>(
    canvas: &mut Canvas<F, RESOLUTION>,
    banner: &str,
) -> usize {
    canvas.clear();

    let slots = Canvas::<F, RESOLUTION>::slot_count();
    let drawn = match canvas.write_line(banner.as_bytes()) {
        Ok(drawn) => drawn,
        Err(e) => {
            warn!("Banner not fully drawn: {:?}", e);
            banner.len().min(slots)
        }
    };
    if banner.len() > slots {
        warn!("Banner cut to {} of {} characters", slots, banner.len());
    }

    let used = drawn * Canvas::<F, RESOLUTION>::SLOT_WIDTH;

    // Stop short of the last gap column
    if used >= 2 {
        let _ = canvas.draw_line(0, PIXELS - 1, used - 2, PIXELS - 1);
    }

    info!("Boot image drawn ({} columns of text)", used);
    used
}
