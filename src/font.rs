// src/font.rs

//! Embedded bitmap fonts: 8 pixels wide, one byte per glyph row, most
//! significant bit leftmost, glyphs stored back to back.

use log::debug;

use crate::error::DecodeError;

/// Glyphs per font page.
pub const GLYPHS_PER_PAGE: usize = 256;
/// Fixed glyph width in pixels.
pub const GLYPH_WIDTH: usize = 8;

/// A packed 1-bit-per-pixel font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapFont {
    height: usize,
    data: Vec<u8>,
}

impl BitmapFont {
    /// Wraps `data` as glyphs of `height` rows. The glyph count must be a
    /// non-zero multiple of 256.
    pub fn new(data: Vec<u8>, height: usize) -> Result<Self, DecodeError> {
        if height == 0 {
            return Err(DecodeError::Font("glyph height must be non-zero".into()));
        }
        if data.len() % height != 0 {
            return Err(DecodeError::Font(format!(
                "{} bytes is not a whole number of {}-row glyphs",
                data.len(),
                height
            )));
        }
        let glyphs = data.len() / height;
        if glyphs == 0 || glyphs % GLYPHS_PER_PAGE != 0 {
            return Err(DecodeError::Font(format!(
                "number of glyphs must be a multiple of {GLYPHS_PER_PAGE}, got {glyphs}"
            )));
        }
        debug!("font: new binary font with {} glyphs of 8x{}", glyphs, height);
        Ok(BitmapFont { height, data })
    }

    /// Glyph height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn glyph_count(&self) -> usize {
        self.data.len() / self.height
    }

    /// Raw font bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The rows of glyph `index`, one byte each.
    pub fn glyph(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.height)?;
        self.data.get(start..start.checked_add(self.height)?)
    }

    /// Whether pixel `(x, y)` of glyph `index` is set.
    pub fn pixel(&self, index: usize, x: usize, y: usize) -> bool {
        if x >= GLYPH_WIDTH {
            return false;
        }
        self.glyph(index)
            .and_then(|rows| rows.get(y))
            .is_some_and(|row| row & (0x80 >> x) != 0)
    }
}
