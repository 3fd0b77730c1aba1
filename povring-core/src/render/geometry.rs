//! Geometry layer
//!
//! Coordinates are (column, row): the column is the angular position
//! around the revolution, the row is the bit within that column.
//! Shapes are outlines only and OR into the framebuffer.

use super::Canvas;
use crate::font::Font;
use crate::framebuffer::{Column, DisplayError, PixelState, PIXELS};

impl<F: Font, const RESOLUTION: usize> Canvas<F, RESOLUTION> {
    /// Copy `bitmap` verbatim into the leading columns
    ///
    /// A bitmap longer than the revolution is rejected as a whole.
    pub fn draw_bitmap(&mut self, bitmap: &[Column]) -> Result<(), DisplayError> {
        self.framebuffer.copy_from(bitmap)
    }

    /// Draw a rectangle outline spanning `col1..=col2` and `row1..=row2`
    ///
    /// Requires `row1 < row2 < PIXELS` and both columns in range. The span
    /// is walked upwards from `col1`, so `col1 > col2` draws nothing.
    pub fn draw_frame(
        &mut self,
        col1: usize,
        row1: u8,
        row2: u8,
        col2: usize,
    ) -> Result<(), DisplayError> {
        if row2 >= PIXELS || row2 <= row1 || col1 >= RESOLUTION || col2 >= RESOLUTION {
            return Err(DisplayError::OutOfRange);
        }

        let edges: Column = (1 << row1) | (1 << row2);
        // row1..=row2 as a mask
        let side: Column = (0xFF >> (PIXELS - 1 - row2)) & (0xFF << row1);

        for column in col1..=col2 {
            if column == col1 || column == col2 {
                self.framebuffer.set_bits(column, side);
            } else {
                self.framebuffer.set_bits(column, edges);
            }
        }
        Ok(())
    }

    /// Draw a line between two points with Bresenham's algorithm
    ///
    /// Both endpoints are always drawn. Any coordinate out of range
    /// rejects the whole line.
    pub fn draw_line(
        &mut self,
        col1: usize,
        row1: u8,
        col2: usize,
        row2: u8,
    ) -> Result<(), DisplayError> {
        if row1 >= PIXELS || row2 >= PIXELS || col1 >= RESOLUTION || col2 >= RESOLUTION {
            return Err(DisplayError::OutOfRange);
        }

        let (mut col, mut row) = (col1 as isize, row1 as isize);
        let (end_col, end_row) = (col2 as isize, row2 as isize);

        let dx = (end_col - col).abs();
        let sx = if col < end_col { 1 } else { -1 };
        let dy = (end_row - row).abs();
        let sy = if row < end_row { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;

        loop {
            self.framebuffer
                .write_pixel(row as u8, col as usize, PixelState::On)?;

            if col == end_col && row == end_row {
                break;
            }

            let e2 = err;
            if e2 > -dx {
                err -= dy;
                col += sx;
            }
            if e2 < dy {
                err += dx;
                row += sy;
            }
        }
        Ok(())
    }

    /// Draw the outline of a triangle: 1 to 2, 2 to 3, 3 to 1
    ///
    /// Each edge is checked on its own; the first rejection is reported
    /// after all three have been attempted.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(
        &mut self,
        col1: usize,
        row1: u8,
        col2: usize,
        row2: u8,
        col3: usize,
        row3: u8,
    ) -> Result<(), DisplayError> {
        let first = self.draw_line(col1, row1, col2, row2);
        let second = self.draw_line(col2, row2, col3, row3);
        let third = self.draw_line(col3, row3, col1, row1);
        first.and(second).and(third)
    }
}

#[cfg(test)]
mod tests {
    use crate::font::{Font5x7, FONT_5X7};
    use crate::framebuffer::{DisplayError, Framebuffer, PIXELS};
    use crate::render::Canvas;
    use proptest::prelude::*;

    const RES: usize = 60;

    fn canvas() -> Canvas<Font5x7, RES> {
        Canvas::new(FONT_5X7)
    }

    fn lit_pixels(canvas: &Canvas<Font5x7, RES>) -> u32 {
        canvas
            .framebuffer()
            .columns()
            .iter()
            .map(|bits| bits.count_ones())
            .sum()
    }

    #[test]
    fn test_bitmap_overwrites_leading_columns() {
        let mut c = canvas();
        c.write_column(1, 0xFF).unwrap();
        c.write_column(10, 0x42).unwrap();

        c.draw_bitmap(&[0x01, 0x02, 0x04]).unwrap();
        assert_eq!(c.read_column(0), 0x01);
        assert_eq!(c.read_column(1), 0x02);
        assert_eq!(c.read_column(2), 0x04);
        assert_eq!(c.read_column(10), 0x42);
    }

    #[test]
    fn test_bitmap_full_and_oversized() {
        let mut c = canvas();
        c.draw_bitmap(&[0x18; RES]).unwrap();
        assert_eq!(c.read_column(RES - 1), 0x18);

        let before = c.framebuffer().clone();
        assert_eq!(c.draw_bitmap(&[0xFF; RES + 1]), Err(DisplayError::OutOfRange));
        assert_eq!(c.framebuffer(), &before);

        // Empty bitmap is a valid no-op
        c.draw_bitmap(&[]).unwrap();
        assert_eq!(c.framebuffer(), &before);
    }

    #[test]
    fn test_frame_outline() {
        let mut c = canvas();
        c.draw_frame(2, 1, 4, 5).unwrap();

        // Sides cover rows 1..=4
        assert_eq!(c.read_column(2), 0b0001_1110);
        assert_eq!(c.read_column(5), 0b0001_1110);
        // Top and bottom edges only in between
        assert_eq!(c.read_column(3), 0b0001_0010);
        assert_eq!(c.read_column(4), 0b0001_0010);
        // Outside untouched
        assert_eq!(c.read_column(1), 0);
        assert_eq!(c.read_column(6), 0);
    }

    #[test]
    fn test_frame_full_height() {
        let mut c = canvas();
        c.draw_frame(0, 0, PIXELS - 1, RES - 1).unwrap();
        assert_eq!(c.read_column(0), 0xFF);
        assert_eq!(c.read_column(RES - 1), 0xFF);
        assert_eq!(c.read_column(30), 0x81);
    }

    #[test]
    fn test_frame_single_column() {
        let mut c = canvas();
        c.draw_frame(7, 2, 3, 7).unwrap();
        assert_eq!(c.read_column(7), 0b0000_1100);
    }

    #[test]
    fn test_frame_rejects_bad_rows_and_columns() {
        let mut c = canvas();
        assert_eq!(c.draw_frame(0, 3, 3, 5), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_frame(0, 4, 2, 5), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_frame(0, 0, PIXELS, 5), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_frame(RES, 0, 3, 5), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_frame(0, 0, 3, RES), Err(DisplayError::OutOfRange));
        assert_eq!(c.framebuffer(), &Framebuffer::new());
    }

    #[test]
    fn test_frame_reversed_columns_draws_nothing() {
        let mut c = canvas();
        assert_eq!(c.draw_frame(10, 1, 5, 4), Ok(()));
        assert_eq!(c.framebuffer(), &Framebuffer::new());
    }

    #[test]
    fn test_frame_ors_into_existing() {
        let mut c = canvas();
        c.write_column(3, 0b1000_0000).unwrap();
        c.draw_frame(2, 0, 1, 4).unwrap();
        assert_eq!(c.read_column(3), 0b1000_0011);
    }

    #[test]
    fn test_degenerate_line_is_single_pixel() {
        let mut c = canvas();
        c.draw_line(12, 5, 12, 5).unwrap();
        assert_eq!(lit_pixels(&c), 1);
        assert_eq!(c.read_pixel(5, 12), 1);
    }

    #[test]
    fn test_full_diagonal_hits_both_corners() {
        let mut c = canvas();
        c.draw_line(0, 0, RES - 1, PIXELS - 1).unwrap();
        assert_eq!(c.read_pixel(0, 0), 1);
        assert_eq!(c.read_pixel(PIXELS - 1, RES - 1), 1);
        // Shallow line: exactly one pixel per column
        for column in 0..RES {
            assert_eq!(c.read_column(column).count_ones(), 1, "column {}", column);
        }
    }

    #[test]
    fn test_horizontal_and_vertical_lines() {
        let mut c = canvas();
        c.draw_line(20, 3, 10, 3).unwrap();
        for column in 10..=20 {
            assert_eq!(c.read_column(column), 0b0000_1000);
        }
        assert_eq!(lit_pixels(&c), 11);

        let mut c = canvas();
        c.draw_line(4, 7, 4, 0).unwrap();
        assert_eq!(c.read_column(4), 0xFF);
        assert_eq!(lit_pixels(&c), 8);
    }

    #[test]
    fn test_line_rejects_out_of_range() {
        let mut c = canvas();
        assert_eq!(c.draw_line(0, 0, RES, 0), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_line(0, PIXELS, 5, 0), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_line(RES, 0, 0, 0), Err(DisplayError::OutOfRange));
        assert_eq!(c.draw_line(0, 0, 0, PIXELS), Err(DisplayError::OutOfRange));
        assert_eq!(c.framebuffer(), &Framebuffer::new());
    }

    #[test]
    fn test_triangle_vertices() {
        let mut c = canvas();
        c.draw_triangle(0, 0, 10, 7, 20, 0).unwrap();
        assert_eq!(c.read_pixel(0, 0), 1);
        assert_eq!(c.read_pixel(7, 10), 1);
        assert_eq!(c.read_pixel(0, 20), 1);
        // Base runs along row 0
        for column in 0..=20 {
            assert_eq!(c.read_pixel(0, column), 1);
        }
        // No fill
        assert_eq!(c.read_pixel(3, 10), 0);
    }

    #[test]
    fn test_triangle_draws_valid_edges() {
        let mut c = canvas();
        // Third vertex out of range: only the 1-2 edge is drawn
        assert_eq!(
            c.draw_triangle(0, 0, 5, 0, RES, 0),
            Err(DisplayError::OutOfRange)
        );
        for column in 0..=5 {
            assert_eq!(c.read_pixel(0, column), 1);
        }
        assert_eq!(lit_pixels(&c), 6);
    }

    proptest! {
        #[test]
        fn prop_line_endpoints_and_extent(
            col1 in 0usize..RES,
            row1 in 0u8..PIXELS,
            col2 in 0usize..RES,
            row2 in 0u8..PIXELS,
        ) {
            let mut c = canvas();
            c.draw_line(col1, row1, col2, row2).unwrap();

            prop_assert_eq!(c.read_pixel(row1, col1), 1);
            prop_assert_eq!(c.read_pixel(row2, col2), 1);

            // Nothing outside the bounding box
            let (lo_col, hi_col) = (col1.min(col2), col1.max(col2));
            let (lo_row, hi_row) = (row1.min(row2), row1.max(row2));
            for column in 0..RES {
                for row in 0..PIXELS {
                    if c.read_pixel(row, column) == 1 {
                        prop_assert!(column >= lo_col && column <= hi_col);
                        prop_assert!(row >= lo_row && row <= hi_row);
                    }
                }
            }

            // One pixel per step along the major axis
            let steps = (hi_col - lo_col).max((hi_row - lo_row) as usize) as u32 + 1;
            prop_assert_eq!(lit_pixels(&c), steps);
        }

        #[test]
        fn prop_line_is_symmetric_in_extent(
            col1 in 0usize..RES,
            row1 in 0u8..PIXELS,
            col2 in 0usize..RES,
            row2 in 0u8..PIXELS,
        ) {
            let mut forward = canvas();
            forward.draw_line(col1, row1, col2, row2).unwrap();
            let mut backward = canvas();
            backward.draw_line(col2, row2, col1, row1).unwrap();
            prop_assert_eq!(lit_pixels(&forward), lit_pixels(&backward));
        }
    }
}
