//! Text layer
//!
//! Characters are laid out in slots of `WIDTH + 1` columns: the glyph
//! followed by one blank gap column. Slots wrap around the revolution.

use super::{Canvas, Cursor};
use crate::font::Font;
use crate::framebuffer::DisplayError;

impl<F: Font, const RESOLUTION: usize> Canvas<F, RESOLUTION> {
    /// Columns per character slot (glyph plus gap)
    pub const SLOT_WIDTH: usize = F::WIDTH + 1;

    /// Number of character slots in one revolution
    pub const fn slot_count() -> usize {
        RESOLUTION / (F::WIDTH + 1)
    }

    fn slot_start(slot: usize) -> usize {
        (slot * Self::SLOT_WIDTH) % RESOLUTION
    }

    /// Move the cursor to character `slot`
    pub fn set_cursor(&mut self, slot: usize) -> Result<(), DisplayError> {
        if slot >= Self::slot_count() {
            return Err(DisplayError::OutOfRange);
        }
        self.cursor = Cursor {
            slot,
            pixel: Self::slot_start(slot),
        };
        Ok(())
    }

    /// Draw `code` at the cursor and advance it by one slot
    ///
    /// Codes the font does not cover are rejected and leave both the
    /// framebuffer and the cursor untouched.
    pub fn write_char(&mut self, code: u8) -> Result<(), DisplayError> {
        let slots = Self::slot_count();
        if slots == 0 {
            return Err(DisplayError::OutOfRange);
        }
        let glyph = self.font.glyph(code).ok_or(DisplayError::UnknownGlyph)?;

        let mut pixel = Self::slot_start(self.cursor.slot);
        for &bits in glyph.iter().take(F::WIDTH) {
            self.framebuffer.write_column(pixel, bits)?;
            pixel = (pixel + 1) % RESOLUTION;
        }
        // Inter-character gap
        self.framebuffer.write_column(pixel, 0)?;

        let slot = (self.cursor.slot + 1) % slots;
        self.cursor = Cursor {
            slot,
            pixel: Self::slot_start(slot),
        };
        Ok(())
    }

    /// Draw `code` at `slot`, only if `slot` is valid
    pub fn write_char_at(&mut self, code: u8, slot: usize) -> Result<(), DisplayError> {
        if slot >= Self::slot_count() {
            return Err(DisplayError::OutOfRange);
        }
        self.set_cursor(slot)?;
        self.write_char(code)
    }

    /// Draw each code in turn from the cursor
    ///
    /// A NUL byte ends the string early. Stops at the first code the font
    /// does not cover; characters before it stay drawn.
    pub fn write_string(&mut self, codes: &[u8]) -> Result<(), DisplayError> {
        for &code in codes.iter().take_while(|&&code| code != 0) {
            self.write_char(code)?;
        }
        Ok(())
    }

    /// Move the cursor to `slot`, then draw the string
    ///
    /// An invalid `slot` leaves the cursor where it was; the string is still
    /// drawn from there and `OutOfRange` is reported afterwards.
    pub fn write_string_at(&mut self, codes: &[u8], slot: usize) -> Result<(), DisplayError> {
        let placed = self.set_cursor(slot);
        self.write_string(codes)?;
        placed
    }

    /// Draw a `str` from the cursor
    pub fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        self.write_string(text.as_bytes())
    }

    /// Draw one line of text from slot 0 without wrapping
    ///
    /// Codes past the last slot are dropped rather than drawn over the
    /// start of the line. Returns how many characters were drawn.
    pub fn write_line(&mut self, codes: &[u8]) -> Result<usize, DisplayError> {
        let end = codes.iter().position(|&code| code == 0).unwrap_or(codes.len());
        let fitted = &codes[..end.min(Self::slot_count())];
        self.write_string_at(fitted, 0)?;
        Ok(fitted.len())
    }
}
