// src/ansi/parser/tests.rs

//! Tests for the byte-level state machine: text handling, escape detection
//! and sequence dispatch. Sequence semantics are covered in `ansi/tests.rs`.

use super::AnsiParser;
use crate::config::DecoderConfig;
use crate::error::SequenceError;
use crate::sauce::tests::record;
use crate::screen::RenderFlags;
use log::LevelFilter;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

fn collecting(columns: usize, rows: usize) -> AnsiParser {
    init_logging();
    AnsiParser::new(DecoderConfig {
        columns,
        rows,
        collect_diagnostics: true,
        ..DecoderConfig::default()
    })
}

fn parse(bytes: &[u8]) -> AnsiParser {
    let mut parser = collecting(80, 25);
    parser.parse_bytes(bytes).unwrap();
    parser
}

fn row(parser: &AnsiParser, y: usize, len: usize) -> String {
    (0..len)
        .map(|x| parser.buffer().cell_at(x, y).map_or('.', |c| c.ch as char))
        .collect()
}

#[test]
fn plain_text_is_written_in_order() {
    let parser = parse(b"Hello");
    assert_eq!(row(&parser, 0, 6), "Hello.");
    assert_eq!(parser.buffer().cursor.pos(), (5, 0));
    assert_eq!(parser.buffer().size_max(), (5, 1));
    assert!(parser.diagnostics().is_empty());
}

#[test]
fn newline_moves_down_and_to_column_zero() {
    let parser = parse(b"ab\ncd\r\nef\rg");
    assert_eq!(row(&parser, 0, 2), "ab");
    assert_eq!(row(&parser, 1, 2), "cd");
    assert_eq!(row(&parser, 2, 2), "gf");
    assert_eq!(parser.buffer().cursor.pos(), (1, 2));
}

#[test]
fn tab_writes_spaces_to_next_stop() {
    let parser = parse(b"ab\tc");
    assert_eq!(parser.buffer().cursor.pos(), (9, 0));
    assert_eq!(parser.buffer().cell_at(8, 0).map(|c| c.ch), Some(b'c'));
    assert_eq!(parser.buffer().cell_at(5, 0).map(|c| c.ch), Some(b' '));

    let parser = parse(b"\t");
    assert_eq!(parser.buffer().cursor.pos(), (8, 0));
}

#[test]
fn tab_after_move_past_right_edge_lands_on_a_stop() {
    let mut parser = collecting(10, 25);
    parser.parse_bytes(b"\x1b[12C\tx").unwrap();
    assert_eq!(parser.buffer().cell_at(8, 1).map(|c| c.ch), Some(b'x'));
    assert_eq!(parser.buffer().cell_at(2, 1).map(|c| c.ch), Some(b' '));
    assert_eq!(parser.buffer().cursor.pos(), (9, 1));
}

#[test]
fn esc_without_bracket_prints_both_bytes() {
    let parser = parse(b"\x1bXy");
    assert_eq!(parser.buffer().cell_at(0, 0).map(|c| c.ch), Some(0x1b));
    assert_eq!(parser.buffer().cell_at(1, 0).map(|c| c.ch), Some(b'X'));
    assert_eq!(parser.buffer().cell_at(2, 0).map(|c| c.ch), Some(b'y'));
}

#[test]
fn unknown_final_byte_is_reported_and_skipped() {
    let parser = parse(b"\x1b[5;1zA");
    assert_eq!(
        parser.diagnostics(),
        &[SequenceError::UnsupportedOpcode {
            params: "5;1".into(),
            final_byte: 'z',
        }]
    );
    assert_eq!(row(&parser, 0, 2), "A.");
}

#[test]
fn each_parse_starts_in_text_state() {
    let mut parser = collecting(80, 25);
    parser.parse_bytes(b"ab\x1b[2").unwrap();
    parser.parse_bytes(b";5HA").unwrap();
    assert_eq!(row(&parser, 0, 7), "ab;5HA.");
    assert_eq!(parser.buffer().cursor.pos(), (6, 0));
    assert!(parser.diagnostics().is_empty());
}

#[test]
fn overlong_sequence_is_dropped() {
    let mut input = b"\x1b[".to_vec();
    input.extend(std::iter::repeat(b"1;").take(40).flatten());
    input.extend(b"mA");
    let parser = parse(&input);
    assert!(matches!(parser.diagnostics(), [SequenceError::TooLong(_)]));
    assert!(parser.buffer().cursor.pen.attrs.is_empty());
    assert_eq!(row(&parser, 0, 1), "A");
}

#[test]
fn eof_marker_stops_text_and_reads_sauce() {
    let mut input = b"hi\x1a".to_vec();
    input.extend(record(1, 1, 80, 0b0000_0001));
    let parser = parse(&input);

    assert_eq!(row(&parser, 0, 3), "hi.");
    let sauce = parser.sauce().unwrap();
    assert_eq!(sauce.title, "Title");
    assert!(parser.buffer().flags.contains(RenderFlags::NON_BLINK));
}

#[test]
fn eof_marker_without_sauce_is_not_fatal() {
    let mut parser = collecting(80, 25);
    parser.parse_bytes(b"hi\x1agarbage").unwrap();
    assert!(parser.sauce().is_none());
    assert_eq!(parser.buffer().size_max(), (2, 1));

    // The grid outlives the call; a new stream keeps writing into it.
    parser.parse_bytes(b"!").unwrap();
    assert_eq!(row(&parser, 0, 4), "hi!.");
}

#[test]
fn force_size_reports_nominal_canvas() {
    init_logging();
    let mut parser = AnsiParser::new(DecoderConfig {
        force_size: true,
        ..DecoderConfig::default()
    });
    parser.parse_bytes(b"x").unwrap();
    assert_eq!(parser.buffer().size_max(), (80, 25));
}

#[test]
fn diagnostics_are_not_kept_by_default() {
    init_logging();
    let mut parser = AnsiParser::default();
    parser.parse_bytes(b"\x1b[1z").unwrap();
    assert!(parser.diagnostics().is_empty());
}
