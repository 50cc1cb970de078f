// src/screen.rs

//! The cell grid: a growable, sparse grid of styled cells addressed by
//! linear offset (`y * width + x`), together with the write cursor and
//! used-extent tracking.
//!
//! Unwritten slots are `None` and render as blank. Reading a slot through
//! [`Buffer::tile`] or [`Buffer::tile_at`] materializes a default cell in it;
//! renderers that must not allocate use [`Buffer::cell`] instead.

pub mod cursor;

use bitflags::bitflags;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::iter;

use crate::error::DecodeError;
use crate::glyph::{Cell, PaletteIndex};
use crate::sauce::Sauce;

pub use cursor::Cursor;

bitflags! {
    /// Render hints carried alongside the grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RenderFlags: u8 {
        /// iCE colours: the blink bit selects a high-intensity background.
        const NON_BLINK          = 1 << 0;
        /// Glyphs are drawn 9 pixels wide.
        const LETTER_SPACING_9PX = 1 << 1;
        /// Stretch pixels to the legacy 4:3 aspect ratio.
        const ASPECT_LEGACY      = 1 << 2;
    }
}

impl RenderFlags {
    /// Extracts render hints from a SAUCE record's TFlags byte.
    pub fn from_sauce(sauce: &Sauce) -> Self {
        let mut flags = RenderFlags::empty();
        flags.set(RenderFlags::NON_BLINK, sauce.non_blink());
        flags.set(RenderFlags::LETTER_SPACING_9PX, sauce.letter_spacing_9px());
        flags.set(RenderFlags::ASPECT_LEGACY, sauce.aspect_legacy());
        flags
    }
}

/// Holds what would be displayed on a text-mode screen.
#[derive(Debug, Clone)]
pub struct Buffer {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
    pub cursor: Cursor,
    pub flags: RenderFlags,
    max_width: usize,
    max_height: usize,
}

impl Buffer {
    /// Creates a `width` x `height` grid of unwritten cells with the cursor at
    /// the origin and an empty used extent.
    pub fn new(width: usize, height: usize) -> Self {
        Buffer {
            width,
            height,
            cells: vec![None; width.saturating_mul(height)],
            cursor: Cursor::default(),
            flags: RenderFlags::empty(),
            max_width: 0,
            max_height: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells on the nominal canvas (`width * height`).
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of allocated cell slots; never less than [`Buffer::len`].
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// All cell slots in offset order.
    pub fn cells(&self) -> &[Option<Cell>] {
        &self.cells
    }

    /// Allocated size: the width, and the number of rows the allocated slots
    /// span.
    pub fn size(&self) -> (usize, usize) {
        if self.width == 0 {
            return (0, 0);
        }
        (self.width, self.cells.len().div_ceil(self.width))
    }

    /// Used extent: one past the farthest column and row ever written.
    pub fn size_max(&self) -> (usize, usize) {
        (self.max_width, self.max_height)
    }

    /// Forces the used extent to the nominal canvas size.
    pub fn size_max_to_size(&mut self) -> (usize, usize) {
        self.max_width = self.width;
        self.max_height = self.height;
        self.size_max()
    }

    /// Sets every slot to unwritten. Extent tracking is left alone.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Clears the slot at `offset`; out-of-range offsets are ignored.
    pub fn clear_at(&mut self, offset: usize) {
        if let Some(slot) = self.cells.get_mut(offset) {
            *slot = None;
        }
    }

    /// Clears from `offset` to the end of the grid.
    pub fn clear_from(&mut self, offset: usize) {
        let start = offset.min(self.cells.len());
        self.cells[start..].fill(None);
    }

    /// Clears from the start of the grid up to and including `offset`.
    pub fn clear_to(&mut self, offset: usize) {
        let end = offset.saturating_add(1).min(self.cells.len());
        self.cells[..end].fill(None);
    }

    /// Clears the half-open range `[start, end)`, clamped to the grid.
    pub fn clear_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.cells.len());
        if start < end {
            self.cells[start..end].fill(None);
        }
    }

    /// Splices `n` unwritten slots in at `offset`, shifting the tail right.
    pub fn insert(&mut self, offset: usize, n: usize) {
        let offset = offset.min(self.cells.len());
        trace!("buffer: inserting {} cells at offset {}", n, offset);
        self.cells.splice(offset..offset, iter::repeat(None).take(n));
    }

    /// Grows the allocation so that `offset` is addressable. Never shrinks.
    pub fn expand(&mut self, offset: usize) -> &mut Self {
        self.grow_to(offset.saturating_add(1));
        self
    }

    fn grow_to(&mut self, len: usize) {
        if self.cells.len() < len {
            self.cells.resize(len, None);
        }
    }

    /// Reinterprets the grid as `width` x `height`. Fails if that needs more
    /// slots than are allocated; grow with [`Buffer::expand`] first. Cells are
    /// not moved.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), DecodeError> {
        match width.checked_mul(height) {
            Some(needed) if needed <= self.cells.len() => {}
            _ => {
                return Err(DecodeError::Capacity {
                    width,
                    height,
                    len: self.cells.len(),
                })
            }
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Clamps the cursor into the allocated canvas.
    pub fn normalize(&mut self) -> &mut Self {
        let (w, h) = self.size();
        self.cursor.normalize(w, h);
        self
    }

    /// The cell at `offset`, materializing a default cell if the slot is
    /// unwritten. Returns `None` only when `offset` is past the allocation.
    pub fn tile(&mut self, offset: usize) -> Option<&mut Cell> {
        self.cells
            .get_mut(offset)
            .map(|slot| slot.get_or_insert_with(Cell::default))
    }

    /// The cell at `(x, y)`; see [`Buffer::tile`].
    pub fn tile_at(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        let offset = y.saturating_mul(self.width).saturating_add(x);
        self.tile(offset)
    }

    /// Peeks at a slot without materializing it.
    pub fn cell(&self, offset: usize) -> Option<&Cell> {
        self.cells.get(offset).and_then(Option::as_ref)
    }

    /// Peeks at `(x, y)` without materializing it.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cell(y.saturating_mul(self.width).saturating_add(x))
    }

    /// Writes `ch` with the cursor's pen style at the cursor, then advances
    /// the cursor one column, wrapping to the next row at the right edge.
    pub fn put_char(&mut self, ch: u8) {
        self.cursor.wrap(self.width);
        let (x, y) = self.cursor.pos();
        let offset = self.cursor.offset(self.width);
        let pen = self.cursor.pen;

        self.expand(offset);
        if let Some(cell) = self.tile(offset) {
            cell.stamp(&pen, ch);
        }

        self.max_width = self.max_width.max(x.saturating_add(1));
        self.max_height = self.max_height.max(y.saturating_add(1));

        self.cursor.right(1);
        self.cursor.wrap(self.width);
    }

    /// Imports a legacy two-bytes-per-cell memory dump: the character byte,
    /// then an attribute byte with the foreground in the low nibble and the
    /// background in the high nibble. The cursor and pen are not involved.
    pub fn from_memory(&mut self, memory: &[u8]) -> Result<(), DecodeError> {
        let cells = self.len();
        let need = cells.saturating_mul(2);
        if memory.len() < need {
            return Err(DecodeError::InsufficientData {
                got: memory.len(),
                need,
            });
        }
        if memory.len() != need {
            debug!("buffer: got {} bytes of memory, expected {}", memory.len(), need);
        }

        self.grow_to(cells);
        for (slot, pair) in self.cells.iter_mut().zip(memory[..need].chunks_exact(2)) {
            *slot = Some(Cell {
                ch: pair[0],
                fg: PaletteIndex::from(pair[1] & 0x0f),
                bg: PaletteIndex::from(pair[1] >> 4),
                ..Cell::default()
            });
        }

        self.max_width = self.width;
        self.max_height = self.height;
        Ok(())
    }

    /// The used extent as raw code page bytes, one line per row, with
    /// unwritten cells as spaces.
    pub fn plain_text(&self) -> Vec<u8> {
        let (w, h) = self.size_max();
        let mut out = Vec::with_capacity((w + 1) * h);
        for y in 0..h {
            for x in 0..w {
                out.push(self.cell_at(x, y).map_or(b' ', |cell| cell.ch));
            }
            out.push(b'\n');
        }
        out
    }
}
