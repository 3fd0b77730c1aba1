//! Column framebuffer
//!
//! The image is a fixed sequence of columns, one per angular position.
//! Each column is a bitmask: bit `n` lights the element at row `n` of the
//! arm. Storage is allocated once and mutated in place.

/// One column of the display, one bit per row (bit 0 = row 0)
pub type Column = u8;

/// Number of rows (light-emitting elements) on the arm
pub const PIXELS: u8 = 8;

/// Errors from drawing and framebuffer access
///
/// These never abort a rotation: the operation is skipped and the
/// framebuffer is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// A row, column, slot or size argument was outside its domain
    OutOfRange,
    /// The font has no glyph for this character code
    UnknownGlyph,
}

/// Requested state of a single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelState {
    /// Element lit
    On,
    /// Element dark
    Off,
}

impl From<bool> for PixelState {
    fn from(on: bool) -> Self {
        if on {
            PixelState::On
        } else {
            PixelState::Off
        }
    }
}

/// Fixed-size column framebuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<const RESOLUTION: usize> {
    columns: [Column; RESOLUTION],
}

impl<const RESOLUTION: usize> Default for Framebuffer<RESOLUTION> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RESOLUTION: usize> Framebuffer<RESOLUTION> {
    /// Create a blank framebuffer
    pub const fn new() -> Self {
        Self {
            columns: [0; RESOLUTION],
        }
    }

    /// Number of columns in one revolution
    pub const fn len(&self) -> usize {
        RESOLUTION
    }

    /// Store `value` at column `index`
    pub fn write_column(&mut self, index: usize, value: Column) -> Result<(), DisplayError> {
        let column = self
            .columns
            .get_mut(index)
            .ok_or(DisplayError::OutOfRange)?;
        *column = value;
        Ok(())
    }

    /// Column at `index`, or `None` when out of range
    pub fn column(&self, index: usize) -> Option<Column> {
        self.columns.get(index).copied()
    }

    /// Column at `index`, or the zero sentinel when out of range
    pub fn read_column(&self, index: usize) -> Column {
        self.column(index).unwrap_or(0)
    }

    /// Set or clear the pixel at (`row`, `column`)
    pub fn write_pixel(
        &mut self,
        row: u8,
        column: usize,
        state: PixelState,
    ) -> Result<(), DisplayError> {
        if row >= PIXELS {
            return Err(DisplayError::OutOfRange);
        }
        let bits = self
            .columns
            .get_mut(column)
            .ok_or(DisplayError::OutOfRange)?;

        match state {
            PixelState::On => *bits |= 1 << row,
            PixelState::Off => *bits &= !(1 << row),
        }
        Ok(())
    }

    /// Bit at (`row`, `column`) as 0 or 1; 0 when out of range
    pub fn read_pixel(&self, row: u8, column: usize) -> u8 {
        if row >= PIXELS {
            return 0;
        }
        self.column(column).map_or(0, |bits| (bits >> row) & 1)
    }

    /// OR `mask` into column `index`
    pub(crate) fn set_bits(&mut self, index: usize, mask: Column) {
        if let Some(bits) = self.columns.get_mut(index) {
            *bits |= mask;
        }
    }

    /// Blank every column
    pub fn clear(&mut self) {
        self.columns.fill(0);
    }

    /// Complement every column
    ///
    /// Bits above [`PIXELS`] are flipped too; they carry no meaning.
    pub fn invert(&mut self) {
        for bits in &mut self.columns {
            *bits = !*bits;
        }
    }

    /// All columns in display order
    pub fn columns(&self) -> &[Column; RESOLUTION] {
        &self.columns
    }

    /// Copy `bitmap` into the leading columns, overwriting them
    pub(crate) fn copy_from(&mut self, bitmap: &[Column]) -> Result<(), DisplayError> {
        let target = self
            .columns
            .get_mut(..bitmap.len())
            .ok_or(DisplayError::OutOfRange)?;
        target.copy_from_slice(bitmap);
        Ok(())
    }
}
