// src/error.rs

//! Error types shared by the decoders.
//!
//! `DecodeError` aborts a decode. `SequenceError` is recoverable: the ANSI
//! interpreter reports it and carries on with the next sequence.

use std::io;
use thiserror::Error;

/// Fatal format, capacity and I/O errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not an XBIN stream: magic {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("short read while decoding {section}")]
    ShortRead {
        section: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("insufficient memory data: got {got} bytes, need {need}")]
    InsufficientData { got: usize, need: usize },

    #[error("buffer: {width}x{height} exceeds {len} cells")]
    Capacity {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("invalid font: {0}")]
    Font(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Maps an `UnexpectedEof` into `ShortRead` for the named section and
    /// passes any other I/O error through.
    pub(crate) fn read(section: &'static str) -> impl FnOnce(io::Error) -> DecodeError {
        move |source| {
            if source.kind() == io::ErrorKind::UnexpectedEof {
                DecodeError::ShortRead { section, source }
            } else {
                DecodeError::Io(source)
            }
        }
    }
}

/// Recoverable errors inside a single escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("unsupported ANSI sequence <ESC>[{params}{final_byte}")]
    UnsupportedOpcode { params: String, final_byte: char },

    #[error("broken extended colour in sequence <ESC>[{0}")]
    MalformedExtendedColor(String),

    #[error("unsupported mode {0}")]
    UnsupportedMode(String),

    #[error("unsupported SGR {code} (<ESC>[{params})")]
    UnsupportedSgr { code: u16, params: String },

    #[error("expected a 4 element true-colour sequence, got {0}")]
    TrueColorArity(usize),

    #[error("unexpected true-colour selector {0}")]
    TrueColorSelector(u8),

    #[error("sequence too long, dropped <ESC>[{0}")]
    TooLong(String),

    #[error("row {row} is past the {limit} row limit")]
    RowLimit { row: usize, limit: usize },
}

/// Errors reading a trailing SAUCE record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SauceError {
    #[error("no SAUCE record in trailing data")]
    Missing,

    #[error("malformed SAUCE record: {0}")]
    Invalid(String),
}
