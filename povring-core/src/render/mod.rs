//! Drawing primitives
//!
//! A [`Canvas`] owns the framebuffer, the font and the text cursor. Text
//! operations live in [`text`], geometry in [`geometry`]; both only mutate
//! the framebuffer and return immediately. Nothing here touches hardware.

pub mod geometry;
pub mod text;

use crate::font::Font;
use crate::framebuffer::{Column, DisplayError, Framebuffer, PixelState};

/// Text cursor
///
/// `slot` is the character position; `pixel` is the column where that slot
/// starts (`slot * (font width + 1)`, wrapped to the resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Character slot index
    pub slot: usize,
    /// First column of the slot
    pub pixel: usize,
}

/// Framebuffer plus font and cursor
pub struct Canvas<F, const RESOLUTION: usize> {
    framebuffer: Framebuffer<RESOLUTION>,
    font: F,
    cursor: Cursor,
}

impl<F: Font, const RESOLUTION: usize> Canvas<F, RESOLUTION> {
    /// Create a blank canvas drawing text with `font`
    pub const fn new(font: F) -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            font,
            cursor: Cursor { slot: 0, pixel: 0 },
        }
    }

    /// The underlying framebuffer
    pub fn framebuffer(&self) -> &Framebuffer<RESOLUTION> {
        &self.framebuffer
    }

    /// Current text cursor
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Blank the display and home the cursor
    pub fn clear(&mut self) {
        self.framebuffer.clear();
        self.cursor = Cursor::default();
    }

    /// Complement every column
    pub fn invert_display(&mut self) {
        self.framebuffer.invert();
    }

    /// Set or clear one pixel
    pub fn write_pixel(
        &mut self,
        row: u8,
        column: usize,
        state: PixelState,
    ) -> Result<(), DisplayError> {
        self.framebuffer.write_pixel(row, column, state)
    }

    /// Read one pixel (0 when out of range)
    pub fn read_pixel(&self, row: u8, column: usize) -> u8 {
        self.framebuffer.read_pixel(row, column)
    }

    /// Overwrite one column
    pub fn write_column(&mut self, index: usize, value: Column) -> Result<(), DisplayError> {
        self.framebuffer.write_column(index, value)
    }

    /// Read one column (0 when out of range)
    pub fn read_column(&self, index: usize) -> Column {
        self.framebuffer.read_column(index)
    }
}
