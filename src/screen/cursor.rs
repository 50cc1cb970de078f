// src/screen/cursor.rs

//! The write cursor: a position plus the pen style for the next cell.

use crate::glyph::{Cell, DEFAULT_CELL};

/// Cursor position and pen state.
///
/// `pen.ch` is not used when writing; `Buffer::put_char` supplies the
/// character. Relative moves never take a coordinate below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub pen: Cell,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::new(0, 0)
    }
}

impl Cursor {
    pub fn new(x: usize, y: usize) -> Self {
        Cursor {
            x,
            y,
            pen: DEFAULT_CELL,
        }
    }

    /// Linear offset of the cursor in a grid with row stride `width`.
    pub fn offset(&self, width: usize) -> usize {
        self.y.saturating_mul(width).saturating_add(self.x)
    }

    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn goto(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }

    pub fn up(&mut self, n: usize) {
        self.y = self.y.saturating_sub(n);
    }

    pub fn down(&mut self, n: usize) {
        self.y = self.y.saturating_add(n);
    }

    pub fn left(&mut self, n: usize) {
        self.x = self.x.saturating_sub(n);
    }

    pub fn right(&mut self, n: usize) {
        self.x = self.x.saturating_add(n);
    }

    /// Clamps the cursor into `[0, width] x [0, height]`.
    pub fn normalize(&mut self, width: usize, height: usize) {
        self.x = self.x.min(width);
        self.y = self.y.min(height);
    }

    /// Folds any horizontal overflow past `width` into additional rows.
    pub fn wrap(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        self.y = self.y.saturating_add(self.x / width);
        self.x %= width;
    }

    /// Resets pen colours, font slot and attributes to the defaults.
    pub fn reset_pen(&mut self) {
        self.pen.reset_style();
    }
}
