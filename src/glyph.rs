// src/glyph.rs

//! Defines the `Cell` type, its styling flags (`AttrFlags`), and related
//! constants.
//!
//! A `Cell` represents a single character position on a text-mode screen.
//! The character is a raw code page byte, not a Unicode scalar; colours are
//! indices into the active palette (see `crate::color::Palette`).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into a palette. Custom palettes may grow past 256 entries when
/// true-color sequences are encountered, so this is wider than a byte.
pub type PaletteIndex = u32;

/// Default character: a space.
pub const DEFAULT_CHAR: u8 = 0x20;
/// Default foreground: light grey.
pub const DEFAULT_FOREGROUND: PaletteIndex = 7;
/// Default background: black.
pub const DEFAULT_BACKGROUND: PaletteIndex = 0;

bitflags! {
    /// Text rendition flags, one per ECMA-48 SGR attribute the decoder tracks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AttrFlags: u32 {
        const BOLD                      = 1 << 0;
        const FAINT                     = 1 << 1;
        const ITALIC                    = 1 << 2;
        const UNDERLINE                 = 1 << 3;
        const BLINK                     = 1 << 4;
        const NEGATIVE                  = 1 << 5;
        const CONCEAL                   = 1 << 6;
        const CROSSED_OUT               = 1 << 7;
        const GOTHIC                    = 1 << 8; // Fraktur
        const DOUBLE_UNDERLINE          = 1 << 9;
        const FRAME                     = 1 << 10;
        const ENCIRCLE                  = 1 << 11;
        const OVERLINE                  = 1 << 12;
        // Ideogram decorations (SGR 60-64).
        const IDEOGRAM_UNDERLINE        = 1 << 13;
        const IDEOGRAM_DOUBLE_UNDERLINE = 1 << 14;
        const IDEOGRAM_OVERLINE         = 1 << 15;
        const IDEOGRAM_DOUBLE_OVERLINE  = 1 << 16;
        const IDEOGRAM_STRESS_MARKING   = 1 << 17;

        const IDEOGRAM = Self::IDEOGRAM_UNDERLINE.bits()
            | Self::IDEOGRAM_DOUBLE_UNDERLINE.bits()
            | Self::IDEOGRAM_OVERLINE.bits()
            | Self::IDEOGRAM_DOUBLE_OVERLINE.bits()
            | Self::IDEOGRAM_STRESS_MARKING.bits();
    }
}

/// A single styled character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Code page character byte.
    pub ch: u8,
    /// Foreground palette index.
    pub fg: PaletteIndex,
    /// Background palette index.
    pub bg: PaletteIndex,
    /// Alternate font slot selected by SGR 10-19.
    pub font: u8,
    /// Rendition flags.
    pub attrs: AttrFlags,
}

/// Default cell: a space in light grey on black, no attributes.
pub const DEFAULT_CELL: Cell = Cell {
    ch: DEFAULT_CHAR,
    fg: DEFAULT_FOREGROUND,
    bg: DEFAULT_BACKGROUND,
    font: 0,
    attrs: AttrFlags::empty(),
};

impl Default for Cell {
    fn default() -> Self {
        DEFAULT_CELL
    }
}

impl Cell {
    /// Two cells are style-equal when colours and attributes match; the
    /// character does not take part. Renderers use this to merge runs.
    pub fn style_eq(&self, other: &Cell) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }

    /// Resets colours, font slot and attributes, keeping the character.
    pub fn reset_style(&mut self) {
        self.fg = DEFAULT_FOREGROUND;
        self.bg = DEFAULT_BACKGROUND;
        self.font = 0;
        self.attrs = AttrFlags::empty();
    }

    /// Copies the style of `pen` and sets the character to `ch`.
    pub(crate) fn stamp(&mut self, pen: &Cell, ch: u8) {
        *self = Cell { ch, ..*pen };
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "char=0x{:02x}, fg={:02}, bg={:02}, font={}, attrs={:?}",
            self.ch, self.fg, self.bg, self.font, self.attrs
        )
    }
}
