// src/ansi/mod.rs

//! Interpreter for ANSI/ECMA-48 art streams (`.ans`): code page text with
//! control sequences for cursor movement, erasing and rendition, decoded
//! into a [`Buffer`](crate::screen::Buffer).

pub mod commands;
mod handler;
mod parser;
pub mod sequence;

pub use commands::Opcode;
pub use parser::AnsiParser;
pub use sequence::Sequence;

use std::io::Read;

use crate::config::DecoderConfig;
use crate::error::DecodeError;

/// Decodes a whole stream with `config`, returning the finished parser.
pub fn decode<R: Read>(reader: R, config: DecoderConfig) -> Result<AnsiParser, DecodeError> {
    let mut parser = AnsiParser::new(config);
    parser.parse(reader)?;
    Ok(parser)
}

#[cfg(test)]
mod tests;
