// src/bintext.rs

//! Loader for BIN files: a bare text-mode memory dump with no header. The
//! width comes from the SAUCE record when one is present.

use log::debug;
use std::io::Read;

use crate::color::{Builtin, Palette};
use crate::error::DecodeError;
use crate::sauce::{DataType, Sauce};
use crate::screen::{Buffer, RenderFlags};

/// Width used when no SAUCE record says otherwise.
pub const DEFAULT_WIDTH: usize = 80;

const EOF_MARKER: u8 = 0x1a;

/// A decoded BIN image.
#[derive(Debug, Clone)]
pub struct BinaryText {
    pub buffer: Buffer,
    pub palette: Palette,
    pub sauce: Option<Sauce>,
}

/// Reads the whole stream and loads it as rows of character/attribute pairs.
/// A trailing partial row is dropped.
pub fn decode<R: Read>(mut reader: R) -> Result<BinaryText, DecodeError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let sauce = Sauce::parse_bytes(&data).ok();
    let mut width = DEFAULT_WIDTH;
    if let Some(sauce) = &sauce {
        data.truncate(data.len().saturating_sub(sauce.trailer_len()));
        if data.last() == Some(&EOF_MARKER) {
            data.pop();
        }
        if sauce.file_type > 0 {
            width = usize::from(sauce.file_type) * 2;
        }
    }

    let height = data.len() / (width * 2);
    debug!("bintext: {} bytes as {}x{} cells", data.len(), width, height);

    let mut buffer = Buffer::new(width, height);
    buffer.from_memory(&data)?;
    if let Some(sauce) = sauce.as_ref().filter(|s| s.data_type == DataType::BinaryText) {
        buffer.flags = RenderFlags::from_sauce(sauce);
    }

    Ok(BinaryText {
        buffer,
        palette: Palette::Shared(Builtin::Bin),
        sauce,
    })
}
