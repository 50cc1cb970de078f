// src/xbin/rle.rs

//! XBIN run-length decompression.
//!
//! Each run starts with a counter byte: the top two bits pick the run kind
//! and the low six bits hold the run length minus one, in cells. Every cell
//! expands to a character byte followed by an attribute byte.

use log::{debug, trace};
use std::io::Read;

use crate::error::DecodeError;

const KIND_MASK: u8 = 0b1100_0000;
const LENGTH_MASK: u8 = 0b0011_1111;

const SECTION: &str = "compressed image";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    /// `run` literal character/attribute pairs follow.
    Off = 0b0000_0000,
    /// One character, then `run` attributes.
    Char = 0b0100_0000,
    /// One attribute, then `run` characters.
    Attr = 0b1000_0000,
    /// One character/attribute pair, repeated `run` times.
    Full = 0b1100_0000,
}

impl Compression {
    fn from_counter(counter: u8) -> Self {
        match counter & KIND_MASK {
            0b0000_0000 => Compression::Off,
            0b0100_0000 => Compression::Char,
            0b1000_0000 => Compression::Attr,
            _ => Compression::Full,
        }
    }
}

/// Reads runs from `reader` until at least `size` bytes have been produced.
///
/// A final run that overshoots the image is read in full and its excess
/// dropped; running out of input fails with `ShortRead`.
pub fn decompress<R: Read>(reader: &mut R, size: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(size);
    while out.len() < size {
        let counter = read_byte(reader)?;
        let kind = Compression::from_counter(counter);
        let run = usize::from(counter & LENGTH_MASK) + 1;

        trace!("xbin: {:?} run of {} cells", kind, run);

        match kind {
            Compression::Off => {
                let start = out.len();
                out.resize(start + run * 2, 0);
                reader
                    .read_exact(&mut out[start..])
                    .map_err(DecodeError::read(SECTION))?;
            }
            Compression::Char => {
                let ch = read_byte(reader)?;
                for _ in 0..run {
                    let attr = read_byte(reader)?;
                    out.extend_from_slice(&[ch, attr]);
                }
            }
            Compression::Attr => {
                let attr = read_byte(reader)?;
                for _ in 0..run {
                    let ch = read_byte(reader)?;
                    out.extend_from_slice(&[ch, attr]);
                }
            }
            Compression::Full => {
                let mut pair = [0u8; 2];
                reader
                    .read_exact(&mut pair)
                    .map_err(DecodeError::read(SECTION))?;
                for _ in 0..run {
                    out.extend_from_slice(&pair);
                }
            }
        }
    }
    if out.len() > size {
        debug!("xbin: dropping {} bytes past the end of the image", out.len() - size);
        out.truncate(size);
    }
    Ok(out)
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8, DecodeError> {
    let mut byte = [0u8; 1];
    reader
        .read_exact(&mut byte)
        .map_err(DecodeError::read(SECTION))?;
    Ok(byte[0])
}
