// src/sauce.rs

//! SAUCE metadata that art scene files carry after their content: a fixed
//! 128-byte record, optionally preceded by a `COMNT` block of 64-byte
//! comment lines. Parsing is left to `icy_sauce`; this module keeps the
//! fields the decoders act on.

use icy_sauce::{SauceDataType, SauceRecord};
use log::trace;

use crate::error::SauceError;

/// Size of the fixed SAUCE record.
pub const RECORD_LEN: usize = 128;
const COMMENT_ID_LEN: usize = 5;
const COMMENT_LINE_LEN: usize = 64;

// TFlags bits for character and binary text data types.
const TFLAG_NON_BLINK: u8 = 0b0000_0001;
const TFLAG_LETTER_SPACING_MASK: u8 = 0b0000_0110;
const TFLAG_LETTER_SPACING_9PX: u8 = 0b0000_0100;
const TFLAG_ASPECT_MASK: u8 = 0b0001_1000;
const TFLAG_ASPECT_LEGACY: u8 = 0b0000_1000;

/// The kinds of content the decoders treat specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Character,
    BinaryText,
    XBin,
    Other,
}

impl From<SauceDataType> for DataType {
    fn from(value: SauceDataType) -> Self {
        match value {
            SauceDataType::Character => DataType::Character,
            SauceDataType::BinaryText => DataType::BinaryText,
            SauceDataType::XBin => DataType::XBin,
            _ => DataType::Other,
        }
    }
}

/// A parsed SAUCE record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sauce {
    pub title: String,
    pub author: String,
    pub group: String,
    pub data_type: DataType,
    pub file_type: u8,
    pub tinfo: [u16; 4],
    pub tflags: u8,
    /// Font name hint (TInfoS).
    pub font_name: String,
    pub comments: Vec<String>,
}

impl Sauce {
    /// Parses the SAUCE record at the end of `data`, along with its comment
    /// block when one is present.
    pub fn parse_bytes(data: &[u8]) -> Result<Sauce, SauceError> {
        let record = SauceRecord::from_bytes(data)
            .map_err(|err| SauceError::Invalid(err.to_string()))?
            .ok_or(SauceError::Missing)?;
        let sauce = Sauce::from(&record);
        trace!("sauce: parsed record {:?}", sauce);
        Ok(sauce)
    }

    /// Bytes taken up at the end of the stream by the record and its
    /// comment block.
    pub fn trailer_len(&self) -> usize {
        if self.comments.is_empty() {
            RECORD_LEN
        } else {
            RECORD_LEN + COMMENT_ID_LEN + self.comments.len() * COMMENT_LINE_LEN
        }
    }

    pub fn non_blink(&self) -> bool {
        self.tflags & TFLAG_NON_BLINK != 0
    }

    pub fn letter_spacing_9px(&self) -> bool {
        self.tflags & TFLAG_LETTER_SPACING_MASK == TFLAG_LETTER_SPACING_9PX
    }

    pub fn aspect_legacy(&self) -> bool {
        self.tflags & TFLAG_ASPECT_MASK == TFLAG_ASPECT_LEGACY
    }
}

impl From<&SauceRecord> for Sauce {
    fn from(record: &SauceRecord) -> Self {
        let header = record.header();
        Sauce {
            title: field(&header.title),
            author: field(&header.author),
            group: field(&header.group),
            data_type: DataType::from(header.data_type),
            file_type: header.file_type,
            tinfo: [header.t_info1, header.t_info2, header.t_info3, header.t_info4],
            tflags: header.t_flags,
            font_name: field(&header.t_info_s),
            comments: record.comments().iter().map(|line| field(line)).collect(),
        }
    }
}

/// Space or NUL padded text field.
fn field(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
