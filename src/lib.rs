// src/lib.rs

//! Decoders for legacy text-mode art: ANSI escape streams, XBIN and BIN
//! memory dumps. Every decoder produces a [`screen::Buffer`] of styled cells
//! plus the [`color::Palette`] its colour indices refer to.

pub mod ansi;
pub mod bintext;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod glyph;
pub mod sauce;
pub mod screen;
pub mod xbin;

pub use ansi::AnsiParser;
pub use color::{Palette, Rgba};
pub use config::DecoderConfig;
pub use error::{DecodeError, SequenceError};
pub use glyph::{AttrFlags, Cell};
pub use screen::{Buffer, RenderFlags};
pub use xbin::Xbin;
