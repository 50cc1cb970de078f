// src/xbin/mod.rs

//! Decoder for the eXtended BINary (`.xb`) format: an 11-byte header, then
//! an optional 16-colour palette, an optional embedded font and the cell
//! image, raw or run-length compressed. Anything left over may be a SAUCE
//! record.

pub mod rle;

use log::debug;
use std::io::Read;

use crate::color::{Builtin, Palette, Rgba};
use crate::error::DecodeError;
use crate::font::{BitmapFont, GLYPHS_PER_PAGE};
use crate::sauce::{DataType, Sauce};
use crate::screen::{Buffer, RenderFlags};

/// Magic bytes at the start of every XBIN stream.
pub const MAGIC: &[u8; 4] = b"XBIN";
/// Size of the fixed header.
pub const HEADER_LEN: usize = 11;

const PALETTE_ENTRIES: usize = 16;

bitflags::bitflags! {
    /// Header flag byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeaderFlags: u8 {
        const PALETTE   = 0b0000_0001;
        const FONT      = 0b0000_0010;
        const COMPRESS  = 0b0000_0100;
        const NON_BLINK = 0b0000_1000;
        const CHARS_512 = 0b0001_0000;
    }
}

/// The fixed XBIN header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: [u8; 4],
    pub eof_char: u8,
    pub width: u16,
    pub height: u16,
    /// Glyph height in pixel rows.
    pub font_size: u8,
    pub flags: HeaderFlags,
}

impl Header {
    /// Reads and validates the header.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut raw = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut raw)
            .map_err(DecodeError::read("header"))?;

        let id = [raw[0], raw[1], raw[2], raw[3]];
        if &id != MAGIC {
            return Err(DecodeError::BadMagic(id));
        }
        Ok(Header {
            id,
            eof_char: raw[4],
            width: u16::from_le_bytes([raw[5], raw[6]]),
            height: u16::from_le_bytes([raw[7], raw[8]]),
            font_size: raw[9],
            flags: HeaderFlags::from_bits_retain(raw[10]),
        })
    }

    /// Size of the image section once decompressed.
    pub fn image_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * 2
    }

    /// Size of the embedded font section.
    pub fn font_len(&self) -> usize {
        let pages = if self.flags.contains(HeaderFlags::CHARS_512) { 2 } else { 1 };
        usize::from(self.font_size) * GLYPHS_PER_PAGE * pages
    }
}

/// A decoded XBIN image.
#[derive(Debug, Clone)]
pub struct Xbin {
    header: Header,
    buffer: Buffer,
    palette: Palette,
    font: Option<BitmapFont>,
    sauce: Option<Sauce>,
}

impl Xbin {
    /// Decodes a complete XBIN stream.
    pub fn decode<R: Read>(mut reader: R) -> Result<Self, DecodeError> {
        let header = Header::read(&mut reader)?;
        debug!(
            "xbin: {}x{} cells, font height {}, flags {:?}",
            header.width, header.height, header.font_size, header.flags
        );

        let palette = if header.flags.contains(HeaderFlags::PALETTE) {
            read_palette(&mut reader)?
        } else {
            Palette::Shared(Builtin::Bin)
        };

        let font = if header.flags.contains(HeaderFlags::FONT) {
            let mut data = vec![0u8; header.font_len()];
            reader
                .read_exact(&mut data)
                .map_err(DecodeError::read("font"))?;
            Some(BitmapFont::new(data, usize::from(header.font_size))?)
        } else {
            None
        };

        let image = if header.flags.contains(HeaderFlags::COMPRESS) {
            rle::decompress(&mut reader, header.image_len())?
        } else {
            let mut image = vec![0u8; header.image_len()];
            reader
                .read_exact(&mut image)
                .map_err(DecodeError::read("image"))?;
            image
        };

        let mut buffer = Buffer::new(usize::from(header.width), usize::from(header.height));
        buffer.from_memory(&image)?;
        if header.flags.contains(HeaderFlags::NON_BLINK) {
            buffer.flags |= RenderFlags::NON_BLINK;
        }

        let sauce = read_trailer(&mut reader);
        if let Some(sauce) = sauce.as_ref().filter(|s| s.data_type == DataType::XBin) {
            buffer.flags |= RenderFlags::from_sauce(sauce);
        }

        Ok(Xbin {
            header,
            buffer,
            palette,
            font,
            sauce,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The embedded font, if the stream carried one.
    pub fn font(&self) -> Option<&BitmapFont> {
        self.font.as_ref()
    }

    pub fn sauce(&self) -> Option<&Sauce> {
        self.sauce.as_ref()
    }

    pub fn into_parts(self) -> (Buffer, Palette) {
        (self.buffer, self.palette)
    }
}

/// 16 VGA DAC triplets (6 bits per channel).
fn read_palette<R: Read>(reader: &mut R) -> Result<Palette, DecodeError> {
    let mut raw = [0u8; PALETTE_ENTRIES * 3];
    reader
        .read_exact(&mut raw)
        .map_err(DecodeError::read("palette"))?;
    let colors = raw
        .chunks_exact(3)
        .map(|rgb| Rgba::from_vga_dac(rgb[0], rgb[1], rgb[2]))
        .collect();
    Ok(Palette::Owned(colors))
}

/// Whatever follows the image; problems here never fail the decode.
fn read_trailer<R: Read>(reader: &mut R) -> Option<Sauce> {
    let mut rest = Vec::new();
    if let Err(err) = reader.read_to_end(&mut rest) {
        debug!("xbin: failed to read trailing data: {}", err);
        return None;
    }
    if rest.is_empty() {
        return None;
    }
    match Sauce::parse_bytes(&rest) {
        Ok(sauce) => Some(sauce),
        Err(err) => {
            debug!("xbin: {} trailing bytes without SAUCE: {}", rest.len(), err);
            None
        }
    }
}
