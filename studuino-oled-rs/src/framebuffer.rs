//! In-memory frame buffer and drawing primitives.
//!
//! The buffer uses the controller's native page layout: one byte holds
//! eight vertically stacked pixels of one column within one page, with
//! bit 0 the topmost row of the page. Page `p` occupies bytes
//! `p * width .. (p + 1) * width`.
//!
//! Nothing in this module touches the bus. Out-of-bounds coordinates are
//! clipped silently, the same way the MicroPython `framebuf` module does.

use embedded_graphics::pixelcolor::BinaryColor;
use heapless::Vec;

use crate::error::GeometryError;

/// Largest supported panel width in pixels.
pub const MAX_WIDTH: u32 = 128;

/// Largest supported panel height in pixels.
pub const MAX_HEIGHT: u32 = 64;

/// Rows per page.
pub const PAGE_HEIGHT: u32 = 8;

/// Backing storage capacity: 128 columns × 8 pages.
pub const BUFFER_CAPACITY: usize = (MAX_WIDTH * MAX_HEIGHT / PAGE_HEIGHT) as usize;

/// Rectangle drawing style for [`Framebuffer::draw_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectStyle {
    /// One-pixel outline only.
    Outline,
    /// Every pixel inside the rectangle.
    Filled,
}

/// An axis-aligned line for [`Framebuffer::draw_line`].
///
/// `length` counts pixels from the start point rightwards (horizontal) or
/// downwards (vertical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLine {
    /// Runs along a row.
    Horizontal { x: i32, y: i32, length: i32 },
    /// Runs along a column.
    Vertical { x: i32, y: i32, length: i32 },
}

/// Monochrome frame buffer in controller page layout.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    buffer: Vec<u8, BUFFER_CAPACITY>,
}

impl Framebuffer {
    /// Allocate a cleared buffer of exactly `height / 8 * width` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if `width` is outside 1–128 or `height` is
    /// not a multiple of 8 in 8–64.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        let err = GeometryError { width, height };
        if width == 0
            || width > MAX_WIDTH
            || height == 0
            || height > MAX_HEIGHT
            || height % PAGE_HEIGHT != 0
        {
            return Err(err);
        }

        let len = (height / PAGE_HEIGHT * width) as usize;
        let mut buffer = Vec::new();
        buffer.resize(len, 0).map_err(|_| err)?;

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of 8-row pages (`height / 8`).
    pub fn page_count(&self) -> u32 {
        self.height / PAGE_HEIGHT
    }

    /// Raw buffer bytes in page layout.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Iterate over the pages, each a `width`-byte slice, top page first.
    pub fn pages(&self) -> impl Iterator<Item = &[u8]> {
        self.buffer.chunks(self.width as usize)
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: BinaryColor) {
        let byte = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer.iter_mut().for_each(|b| *b = byte);
    }

    /// Set one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if let Some((index, mask)) = self.locate(x, y) {
            match color {
                BinaryColor::On => self.buffer[index] |= mask,
                BinaryColor::Off => self.buffer[index] &= !mask,
            }
        }
    }

    /// Read one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        self.locate(x, y).map(|(index, mask)| {
            if self.buffer[index] & mask != 0 {
                BinaryColor::On
            } else {
                BinaryColor::Off
            }
        })
    }

    /// Fill a `w`×`h` rectangle whose top-left corner is `(x, y)`, clipped
    /// to the surface. Non-positive sizes draw nothing.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: BinaryColor) {
        let width = self.width as i32;
        let height = self.height as i32;
        let x_end = x.saturating_add(w);
        let y_end = y.saturating_add(h);

        if w < 1 || h < 1 || x_end <= 0 || y_end <= 0 || x >= width || y >= height {
            return;
        }

        for row in y.max(0)..y_end.min(height) {
            for col in x.max(0)..x_end.min(width) {
                self.set_pixel(col, row, color);
            }
        }
    }

    /// Draw the one-pixel outline of a `w`×`h` rectangle, clipped.
    /// Non-positive sizes draw nothing.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: BinaryColor) {
        if w < 1 || h < 1 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y.saturating_add(h).saturating_sub(1), w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x.saturating_add(w).saturating_sub(1), y, 1, h, color);
    }

    /// Horizontal run of `w` pixels starting at `(x, y)`.
    pub fn hline(&mut self, x: i32, y: i32, w: i32, color: BinaryColor) {
        self.fill_rect(x, y, w, 1, color);
    }

    /// Vertical run of `h` pixels starting at `(x, y)`.
    pub fn vline(&mut self, x: i32, y: i32, h: i32, color: BinaryColor) {
        self.fill_rect(x, y, 1, h, color);
    }

    /// Draw a lit rectangle, either as an outline or filled.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, style: RectStyle) {
        match style {
            RectStyle::Outline => self.rect(x, y, w, h, BinaryColor::On),
            RectStyle::Filled => self.fill_rect(x, y, w, h, BinaryColor::On),
        }
    }

    /// Draw a lit horizontal or vertical line.
    pub fn draw_line(&mut self, line: AxisLine) {
        match line {
            AxisLine::Horizontal { x, y, length } => self.hline(x, y, length, BinaryColor::On),
            AxisLine::Vertical { x, y, length } => self.vline(x, y, length, BinaryColor::On),
        }
    }

    /// Buffer index and bit mask for an in-bounds pixel.
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let index = (y / PAGE_HEIGHT as usize) * self.width as usize + x;
        Some((index, 1 << (y % PAGE_HEIGHT as usize)))
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
