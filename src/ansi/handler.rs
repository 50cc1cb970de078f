// src/ansi/handler.rs

//! Applies dispatched control sequences to the parser's grid, cursor and
//! palette.

use log::trace;

use super::commands::Opcode;
use super::parser::AnsiParser;
use super::sequence::Sequence;
use crate::error::SequenceError;
use crate::glyph::{AttrFlags, Cell, PaletteIndex, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use crate::screen::RenderFlags;

// --- SGR codes with a dedicated arm ---
const SGR_RESET: u16 = 0;
const SGR_FOREGROUND_EXTENDED: u16 = 38;
const SGR_BACKGROUND_EXTENDED: u16 = 48;

// Sub-selectors after 38/48.
const EXTENDED_RGB: u16 = 2;
const EXTENDED_INDEXED: u16 = 5;

// Private modes that switch the blink bit to bright backgrounds.
const MODE_NON_BLINK: u16 = 33;
const MODE_NON_BLINK_ALT: u16 = 31;

// Selector values of the vendor true-colour sequence.
const TRUE_COLOR_BACKGROUND: u8 = 0;
const TRUE_COLOR_FOREGROUND: u8 = 1;

pub(super) fn apply(
    parser: &mut AnsiParser,
    opcode: Opcode,
    seq: &Sequence,
) -> Result<(), SequenceError> {
    match opcode {
        Opcode::CursorUp => parser.buffer.cursor.up(count(seq)),
        Opcode::CursorDown => parser.buffer.cursor.down(count(seq)),
        Opcode::CursorForward => parser.buffer.cursor.right(count(seq)),
        Opcode::CursorBackward => parser.buffer.cursor.left(count(seq)),
        Opcode::CursorNextLine => {
            parser.buffer.cursor.down(count(seq));
            parser.buffer.cursor.x = 0;
        }
        Opcode::CursorPrevLine => {
            parser.buffer.cursor.up(count(seq));
            parser.buffer.cursor.x = 0;
        }
        Opcode::CursorCharacterAbsolute => {
            parser.buffer.cursor.x = usize::from(seq.param_or(0, 1).saturating_sub(1));
        }
        Opcode::CursorPosition | Opcode::HorizontalVerticalPosition => cursor_position(parser, seq),
        Opcode::EraseInPage => erase_in_page(parser, seq),
        Opcode::EraseInLine => return erase_in_line(parser, seq),
        Opcode::InsertLine => insert_lines(parser, seq),
        Opcode::SetMode => return set_mode(parser, seq, true),
        Opcode::ResetMode => return set_mode(parser, seq, false),
        Opcode::SelectGraphicRendition => return select_graphic_rendition(parser, seq),
        Opcode::SaveCursor => parser.saved_cursor = Some(parser.buffer.cursor.pos()),
        Opcode::RestoreCursor => {
            if let Some((x, y)) = parser.saved_cursor {
                parser.buffer.cursor.goto(x, y);
            }
        }
        Opcode::TrueColor => return true_color(parser, seq),
    }
    Ok(())
}

/// First parameter as a repeat count: missing or zero means one.
fn count(seq: &Sequence) -> usize {
    usize::from(seq.param_or(0, 1).max(1))
}

fn cursor_position(parser: &mut AnsiParser, seq: &Sequence) {
    let row = usize::from(seq.param_or(0, 1).saturating_sub(1));
    let col = usize::from(seq.param_or(1, 1).saturating_sub(1));
    parser.buffer.cursor.goto(col, row);
}

fn erase_in_page(parser: &mut AnsiParser, seq: &Sequence) {
    let offset = parser.buffer.cursor.offset(parser.buffer.width());
    match seq.param_or(0, 0) {
        0 => parser.buffer.clear_from(offset),
        1 => parser.buffer.clear_to(offset),
        _ => parser.buffer.clear(),
    }
}

fn erase_in_line(parser: &mut AnsiParser, seq: &Sequence) -> Result<(), SequenceError> {
    let width = parser.buffer.width();
    let row = parser.buffer.cursor.y.saturating_mul(width);
    let x = parser.buffer.cursor.x.min(width);
    let row_end = row.saturating_add(width);
    match seq.param_or(0, 0) {
        0 => parser.buffer.clear_range(row.saturating_add(x), row_end),
        1 => parser.buffer.clear_range(row, row.saturating_add(x).saturating_add(1).min(row_end)),
        2 => parser.buffer.clear_range(row, row_end),
        mode => return Err(SequenceError::UnsupportedMode(format!("erase in line {mode}"))),
    }
    Ok(())
}

fn insert_lines(parser: &mut AnsiParser, seq: &Sequence) {
    let requested = usize::from(seq.param_or(0, 1));
    let width = parser.buffer.width();
    parser.buffer.normalize();

    // Inserted rows count against the same limit as cursor moves.
    let limit = parser.config.max_rows;
    let rows = parser.buffer.capacity().checked_div(width).unwrap_or(0);
    let lines = requested.min(limit.saturating_sub(rows));
    if lines < requested {
        parser.report(SequenceError::RowLimit {
            row: rows.saturating_add(requested),
            limit,
        });
    }

    let offset = parser.buffer.cursor.y.saturating_mul(width);
    trace!("ansi: inserting {} lines at row {}", lines, parser.buffer.cursor.y);
    parser.buffer.insert(offset, lines.saturating_mul(width));
}

/// Only the private `?`/`=` modes 31 and 33 (iCE colours) are understood.
fn set_mode(parser: &mut AnsiParser, seq: &Sequence, enable: bool) -> Result<(), SequenceError> {
    let token = match seq.token(0) {
        Some(token) if !token.is_empty() => token,
        _ => return Ok(()),
    };
    let mode = match token.split_first() {
        Some((&(b'?' | b'='), rest)) => super::sequence::parse_number(rest),
        _ => None,
    };
    match mode {
        Some(MODE_NON_BLINK | MODE_NON_BLINK_ALT) => {
            parser.buffer.flags.set(RenderFlags::NON_BLINK, enable);
            Ok(())
        }
        _ => Err(SequenceError::UnsupportedMode(seq.to_string())),
    }
}

fn select_graphic_rendition(parser: &mut AnsiParser, seq: &Sequence) -> Result<(), SequenceError> {
    let mut codes = seq.ints();
    if codes.is_empty() {
        codes.push(SGR_RESET);
    }

    let mut i = 0;
    while i < codes.len() {
        let code = codes[i];
        i += 1;
        match code {
            SGR_FOREGROUND_EXTENDED | SGR_BACKGROUND_EXTENDED => {
                let (index, used) = extended_color(parser, &codes[i..])
                    .ok_or_else(|| SequenceError::MalformedExtendedColor(seq.to_string()))?;
                i += used;
                if code == SGR_FOREGROUND_EXTENDED {
                    parser.buffer.cursor.pen.fg = index;
                } else {
                    parser.buffer.cursor.pen.bg = index;
                }
            }
            _ => {
                if !apply_sgr(&mut parser.buffer.cursor.pen, code) {
                    parser.report(SequenceError::UnsupportedSgr {
                        code,
                        params: seq.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Resolves the arguments following 38/48 to a palette index, returning it
/// together with the number of arguments consumed.
fn extended_color(parser: &mut AnsiParser, args: &[u16]) -> Option<(PaletteIndex, usize)> {
    match args {
        [EXTENDED_RGB, r, g, b, ..] => {
            let index = parser.palette.add_rgb(channel(*r), channel(*g), channel(*b));
            Some((index, 4))
        }
        [EXTENDED_INDEXED, n, ..] => {
            parser.palette.upgrade_to_extended();
            Some((PaletteIndex::from(*n), 2))
        }
        _ => None,
    }
}

fn channel(value: u16) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// Applies a single SGR code to the pen. Returns false for codes with no
/// meaning here.
fn apply_sgr(pen: &mut Cell, code: u16) -> bool {
    match code {
        0 => pen.reset_style(),
        1 => pen.attrs.insert(AttrFlags::BOLD),
        2 => pen.attrs.insert(AttrFlags::FAINT),
        3 => pen.attrs.insert(AttrFlags::ITALIC),
        4 => {
            pen.attrs.insert(AttrFlags::UNDERLINE);
            pen.attrs.remove(AttrFlags::DOUBLE_UNDERLINE);
        }
        5 | 6 => pen.attrs.insert(AttrFlags::BLINK),
        7 => pen.attrs.insert(AttrFlags::NEGATIVE),
        8 => pen.attrs.insert(AttrFlags::CONCEAL),
        9 => pen.attrs.insert(AttrFlags::CROSSED_OUT),
        10..=19 => pen.font = (code - 10) as u8,
        20 => pen.attrs.insert(AttrFlags::GOTHIC),
        21 => {
            pen.attrs.insert(AttrFlags::DOUBLE_UNDERLINE);
            pen.attrs.remove(AttrFlags::UNDERLINE);
        }
        22 => pen.attrs.remove(AttrFlags::BOLD | AttrFlags::FAINT),
        23 => pen.attrs.remove(AttrFlags::ITALIC | AttrFlags::GOTHIC),
        24 => pen.attrs.remove(AttrFlags::UNDERLINE | AttrFlags::DOUBLE_UNDERLINE),
        25 => pen.attrs.remove(AttrFlags::BLINK),
        27 => pen.attrs.remove(AttrFlags::NEGATIVE),
        28 => pen.attrs.remove(AttrFlags::CONCEAL),
        29 => pen.attrs.remove(AttrFlags::CROSSED_OUT),
        30..=37 => pen.fg = PaletteIndex::from(code - 30),
        39 => pen.fg = DEFAULT_FOREGROUND,
        40..=47 => pen.bg = PaletteIndex::from(code - 40),
        49 => pen.bg = DEFAULT_BACKGROUND,
        51 => pen.attrs.insert(AttrFlags::FRAME),
        52 => pen.attrs.insert(AttrFlags::ENCIRCLE),
        53 => pen.attrs.insert(AttrFlags::OVERLINE),
        54 => pen.attrs.remove(AttrFlags::FRAME | AttrFlags::ENCIRCLE),
        55 => pen.attrs.remove(AttrFlags::OVERLINE),
        60 => pen.attrs.insert(AttrFlags::IDEOGRAM_UNDERLINE),
        61 => pen.attrs.insert(AttrFlags::IDEOGRAM_DOUBLE_UNDERLINE),
        62 => pen.attrs.insert(AttrFlags::IDEOGRAM_OVERLINE),
        63 => pen.attrs.insert(AttrFlags::IDEOGRAM_DOUBLE_OVERLINE),
        64 => pen.attrs.insert(AttrFlags::IDEOGRAM_STRESS_MARKING),
        65 => pen.attrs.remove(AttrFlags::IDEOGRAM),
        90..=97 => pen.fg = PaletteIndex::from(code - 90 + 8),
        100..=107 => pen.bg = PaletteIndex::from(code - 100 + 8),
        // Reserved.
        26 | 50 | 56..=59 => {}
        _ => return false,
    }
    true
}

/// `ESC [ selector ; r ; g ; b t`: parameters above 255 are discarded before
/// the arity check.
fn true_color(parser: &mut AnsiParser, seq: &Sequence) -> Result<(), SequenceError> {
    let values: Vec<u8> = seq
        .ints()
        .into_iter()
        .filter_map(|v| u8::try_from(v).ok())
        .collect();
    let &[selector, r, g, b] = values.as_slice() else {
        return Err(SequenceError::TrueColorArity(values.len()));
    };
    let index = match selector {
        TRUE_COLOR_BACKGROUND | TRUE_COLOR_FOREGROUND => parser.palette.add_rgb(r, g, b),
        other => return Err(SequenceError::TrueColorSelector(other)),
    };
    if selector == TRUE_COLOR_FOREGROUND {
        parser.buffer.cursor.pen.fg = index;
    } else {
        parser.buffer.cursor.pen.bg = index;
    }
    Ok(())
}
