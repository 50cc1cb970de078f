// src/ansi/parser.rs

//! The byte-level state machine. Plain text is written through the cursor;
//! `ESC [` opens a control sequence whose parameters accumulate until a
//! final byte dispatches it to a handler.

use log::{debug, log, trace, warn};
use std::io::{self, BufReader, Read};

use super::commands::{self, Opcode, CR, CSI_BRACKET, ESC, LF, PARAM_SEPARATOR, SUB, TAB};
use super::handler;
use super::sequence::Sequence;
use crate::color::Palette;
use crate::config::DecoderConfig;
use crate::error::{DecodeError, SequenceError};
use crate::sauce::{DataType, Sauce};
use crate::screen::{Buffer, RenderFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Text,
    /// Saw `ESC`, expecting `[`.
    WaitBracket,
    /// Inside a control sequence, collecting parameters.
    Accumulate,
}

/// Interprets an ANSI art stream into a [`Buffer`].
///
/// The grid, palette and saved cursor belong to the parser and outlive each
/// [`AnsiParser::parse`] call; the escape state does not, so every call starts
/// in plain text and a sequence cut off by the end of a stream is dropped.
#[derive(Debug, Clone)]
pub struct AnsiParser {
    pub(super) config: DecoderConfig,
    pub(super) buffer: Buffer,
    pub(super) palette: Palette,
    pub(super) saved_cursor: Option<(usize, usize)>,
    sauce: Option<Sauce>,
    diagnostics: Vec<SequenceError>,
}

impl Default for AnsiParser {
    fn default() -> Self {
        AnsiParser::new(DecoderConfig::default())
    }
}

impl AnsiParser {
    /// A parser writing into a `columns` x `rows` canvas taken from `config`,
    /// with the CGA palette.
    pub fn new(config: DecoderConfig) -> Self {
        let buffer = Buffer::new(config.columns, config.rows);
        AnsiParser {
            config,
            buffer,
            palette: Palette::default(),
            saved_cursor: None,
            sauce: None,
            diagnostics: Vec::new(),
        }
    }

    /// Default configuration with a `width` x `height` canvas.
    pub fn with_size(width: usize, height: usize) -> Self {
        AnsiParser::new(DecoderConfig {
            columns: width,
            rows: height,
            ..DecoderConfig::default()
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Consumes the parser, returning the decoded grid and its palette.
    pub fn into_parts(self) -> (Buffer, Palette) {
        (self.buffer, self.palette)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The SAUCE record found after the end-of-file marker, if any.
    pub fn sauce(&self) -> Option<&Sauce> {
        self.sauce.as_ref()
    }

    /// Recoverable sequence errors seen so far. Only populated when
    /// `collect_diagnostics` is set.
    pub fn diagnostics(&self) -> &[SequenceError] {
        &self.diagnostics
    }

    /// Replaces the grid's render hints.
    pub fn set_flags(&mut self, flags: RenderFlags) {
        self.buffer.flags = flags;
    }

    /// Forces the grid's used extent to its nominal size.
    pub fn force_size(&mut self) -> &mut Self {
        self.buffer.size_max_to_size();
        self
    }

    /// Feeds a whole stream through the interpreter, up to its end or the
    /// DOS end-of-file marker (`0x1A`), after which the remaining bytes are
    /// read as a SAUCE trailer. Only I/O failures are fatal; malformed
    /// sequences are reported and skipped.
    pub fn parse<R: Read>(&mut self, reader: R) -> Result<(), DecodeError> {
        let mut reader = BufReader::new(reader);
        let mut state = State::default();
        let mut seq = Sequence::new();
        let mut buf = [0u8; 1];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
            let byte = buf[0];
            state = match state {
                State::Text if byte == SUB => {
                    self.read_trailer(&mut reader);
                    break;
                }
                State::Text => {
                    let next = self.text(byte);
                    self.limit_rows();
                    next
                }
                State::WaitBracket if byte == CSI_BRACKET => {
                    seq.reset();
                    State::Accumulate
                }
                State::WaitBracket => {
                    // Not a control sequence: both bytes are glyphs.
                    self.buffer.put_char(ESC);
                    self.buffer.put_char(byte);
                    State::Text
                }
                State::Accumulate => self.accumulate(&mut seq, byte),
            };
        }

        if self.config.force_size {
            self.buffer.size_max_to_size();
        }
        Ok(())
    }

    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        self.parse(bytes)
    }

    fn text(&mut self, byte: u8) -> State {
        match byte {
            ESC => return State::WaitBracket,
            LF => {
                self.buffer.cursor.down(1);
                self.buffer.cursor.x = 0;
            }
            CR => self.buffer.cursor.x = 0,
            TAB => {
                self.buffer.cursor.wrap(self.buffer.width());
                let stop = self.config.tab_stop.max(1);
                let spaces = stop - self.buffer.cursor.x % stop;
                for _ in 0..spaces {
                    self.buffer.put_char(b' ');
                }
            }
            _ => self.buffer.put_char(byte),
        }
        State::Text
    }

    fn accumulate(&mut self, seq: &mut Sequence, byte: u8) -> State {
        if byte == PARAM_SEPARATOR {
            seq.flush();
        } else if commands::is_final_byte(byte) {
            seq.flush();
            self.dispatch(seq, byte);
            seq.reset();
            return State::Text;
        } else {
            seq.buffer(byte);
        }
        State::Accumulate
    }

    fn dispatch(&mut self, seq: &Sequence, final_byte: u8) {
        trace!("ansi: <ESC>[{}{}", seq, char::from(final_byte));

        let result = if seq.is_truncated() {
            Err(SequenceError::TooLong(seq.to_string()))
        } else {
            match Opcode::from_final_byte(final_byte) {
                Some(opcode) => handler::apply(self, opcode, seq),
                None => Err(SequenceError::UnsupportedOpcode {
                    params: seq.to_string(),
                    final_byte: char::from(final_byte),
                }),
            }
        };
        if let Err(err) = result {
            self.report(err);
        }
        self.limit_rows();
    }

    /// Pulls the cursor back to the last allowed row when the row it would
    /// write to next is at or past `max_rows`.
    fn limit_rows(&mut self) {
        let limit = self.config.max_rows.max(1);
        let width = self.buffer.width();
        let cursor = &mut self.buffer.cursor;
        let row = cursor
            .y
            .saturating_add(cursor.x.checked_div(width).unwrap_or(0));
        if row < limit {
            return;
        }
        if width > 0 {
            cursor.x %= width;
        }
        cursor.y = limit - 1;
        self.report(SequenceError::RowLimit { row, limit });
    }

    /// Logs a recoverable error at the configured level and keeps it when
    /// diagnostics are collected.
    pub(super) fn report(&mut self, err: SequenceError) {
        log!(self.config.diagnostics.level(), "ansi: {}", err);
        if self.config.collect_diagnostics {
            self.diagnostics.push(err);
        }
    }

    fn read_trailer<R: Read>(&mut self, reader: &mut R) {
        let mut rest = Vec::new();
        if let Err(err) = reader.read_to_end(&mut rest) {
            debug!("ansi: failed to read data after end-of-file marker: {}", err);
            return;
        }
        match Sauce::parse_bytes(&rest) {
            Ok(sauce) => {
                if sauce.data_type == DataType::Character {
                    self.buffer.flags |= RenderFlags::from_sauce(&sauce);
                }
                self.sauce = Some(sauce);
            }
            Err(err) => warn!("ansi: trailing data after end-of-file marker: {}", err),
        }
    }
}

#[cfg(test)]
mod tests;
