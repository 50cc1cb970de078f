// src/color.rs

//! Defines the `Rgba` colour type, the built-in text-mode colour tables, and
//! the copy-on-write `Palette` handle used by the decoders.

use log::{debug, trace};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::glyph::PaletteIndex;

/// An 8-bit-per-channel colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 0xff }
    }

    /// Builds an opaque colour from three 6-bit VGA DAC components.
    pub const fn from_vga_dac(r: u8, g: u8, b: u8) -> Self {
        Rgba::rgb((r & 0x3f) << 2, (g & 0x3f) << 2, (b & 0x3f) << 2)
    }

    /// True when the colour components (ignoring alpha) match.
    pub fn same_rgb(&self, r: u8, g: u8, b: u8) -> bool {
        self.r == r && self.g == g && self.b == b
    }
}

/// The 16 CGA colours in ANSI order (black, red, green, brown, ...).
pub const CGA: [Rgba; 16] = [
    Rgba::rgb(0x00, 0x00, 0x00), // Black
    Rgba::rgb(0xaa, 0x00, 0x00), // Red
    Rgba::rgb(0x00, 0xaa, 0x00), // Green
    Rgba::rgb(0xaa, 0x55, 0x00), // Brown
    Rgba::rgb(0x00, 0x00, 0xaa), // Blue
    Rgba::rgb(0xaa, 0x00, 0xaa), // Magenta
    Rgba::rgb(0x00, 0xaa, 0xaa), // Cyan
    Rgba::rgb(0xaa, 0xaa, 0xaa), // White (or grey)
    Rgba::rgb(0x55, 0x55, 0x55), // Bright black (dark grey)
    Rgba::rgb(0xff, 0x55, 0x55), // Bright red
    Rgba::rgb(0x55, 0xff, 0x55), // Bright green
    Rgba::rgb(0xff, 0xff, 0x55), // Bright yellow
    Rgba::rgb(0x55, 0x55, 0xff), // Bright blue
    Rgba::rgb(0xff, 0x55, 0xff), // Bright magenta
    Rgba::rgb(0x55, 0xff, 0xff), // Bright cyan
    Rgba::rgb(0xff, 0xff, 0xff), // Bright white
];

/// The 16 CGA colours in hardware attribute order, as used by raw memory
/// dumps and XBIN (black, blue, green, cyan, red, ...).
pub const BIN: [Rgba; 16] = [
    Rgba::rgb(0x00, 0x00, 0x00),
    Rgba::rgb(0x00, 0x00, 0xaa),
    Rgba::rgb(0x00, 0xaa, 0x00),
    Rgba::rgb(0x00, 0xaa, 0xaa),
    Rgba::rgb(0xaa, 0x00, 0x00),
    Rgba::rgb(0xaa, 0x00, 0xaa),
    Rgba::rgb(0xaa, 0x55, 0x00),
    Rgba::rgb(0xaa, 0xaa, 0xaa),
    Rgba::rgb(0x55, 0x55, 0x55),
    Rgba::rgb(0x55, 0x55, 0xff),
    Rgba::rgb(0x55, 0xff, 0x55),
    Rgba::rgb(0x55, 0xff, 0xff),
    Rgba::rgb(0xff, 0x55, 0x55),
    Rgba::rgb(0xff, 0x55, 0xff),
    Rgba::rgb(0xff, 0xff, 0x55),
    Rgba::rgb(0xff, 0xff, 0xff),
];

// Constants for the 256-colour table layout
const COLOR_CUBE_SIZE: u8 = 6; // 6x6x6 cube
const COLOR_CUBE_BASE: u8 = 0x37;
const COLOR_CUBE_STEP: u8 = 0x28;
const GRAYSCALE_LEVELS: u8 = 24;

/// The extended 256-colour table: the 16 CGA colours, a 6x6x6 colour cube and
/// a 24-step grey ramp.
pub static VGA: Lazy<Vec<Rgba>> = Lazy::new(|| {
    let mut table = Vec::with_capacity(256);
    table.extend_from_slice(&CGA);
    for r in 0..COLOR_CUBE_SIZE {
        for g in 0..COLOR_CUBE_SIZE {
            for b in 0..COLOR_CUBE_SIZE {
                table.push(Rgba::rgb(
                    COLOR_CUBE_BASE + r * COLOR_CUBE_STEP,
                    COLOR_CUBE_BASE + g * COLOR_CUBE_STEP,
                    COLOR_CUBE_BASE + b * COLOR_CUBE_STEP,
                ));
            }
        }
    }
    for i in 0..GRAYSCALE_LEVELS {
        let level = 10 * i + 8;
        table.push(Rgba::rgb(level, level, level));
    }
    table
});

/// Identifies one of the immutable built-in tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    /// 16 colours, ANSI order.
    Cga,
    /// 256 colours: CGA, colour cube, grey ramp.
    Vga,
    /// 16 colours, hardware attribute order.
    Bin,
}

impl Builtin {
    /// The shared colour table.
    pub fn colors(self) -> &'static [Rgba] {
        match self {
            Builtin::Cga => &CGA,
            Builtin::Vga => VGA.as_slice(),
            Builtin::Bin => &BIN,
        }
    }
}

/// A palette handle: either one of the shared built-in tables, or an owned
/// table that can grow. Any mutation first copies a built-in table into an
/// owned one, so the built-ins are never aliased mutably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Shared(Builtin),
    Owned(Vec<Rgba>),
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Shared(Builtin::Cga)
    }
}

impl Palette {
    /// The ordered colour list.
    pub fn colors(&self) -> &[Rgba] {
        match self {
            Palette::Shared(builtin) => builtin.colors(),
            Palette::Owned(colors) => colors,
        }
    }

    pub fn len(&self) -> usize {
        self.colors().len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors().is_empty()
    }

    /// Colour at `index`, if present.
    pub fn get(&self, index: PaletteIndex) -> Option<Rgba> {
        self.colors().get(index as usize).copied()
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Palette::Shared(_))
    }

    /// Returns the owned table, copying a built-in one first if needed.
    pub fn make_mut(&mut self) -> &mut Vec<Rgba> {
        if let Palette::Shared(builtin) = *self {
            trace!("palette: copying built-in {:?} table before mutation", builtin);
            *self = Palette::Owned(builtin.colors().to_vec());
        }
        match self {
            Palette::Owned(colors) => colors,
            Palette::Shared(_) => unreachable!("palette was just converted to an owned table"),
        }
    }

    /// Returns the index of the first entry with exactly these RGB components,
    /// appending a new opaque entry if none exists. A built-in table is copied
    /// before appending.
    pub fn add_rgb(&mut self, r: u8, g: u8, b: u8) -> PaletteIndex {
        if let Some(found) = self.colors().iter().position(|c| c.same_rgb(r, g, b)) {
            return found as PaletteIndex;
        }
        let colors = self.make_mut();
        colors.push(Rgba::rgb(r, g, b));
        let index = colors.len() - 1;
        debug!("palette: added #{:02x}{:02x}{:02x} at index {}", r, g, b, index);
        index as PaletteIndex
    }

    /// Switches the fixed 16-colour CGA table to the 256-colour table, so
    /// that indexed colours above 15 resolve. Other palettes are unchanged.
    pub fn upgrade_to_extended(&mut self) {
        if *self == Palette::Shared(Builtin::Cga) {
            trace!("palette: upgrading CGA table to VGA");
            *self = Palette::Shared(Builtin::Vga);
        }
    }
}
