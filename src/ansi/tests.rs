// src/ansi/tests.rs

//! Control sequence semantics, exercised through the public parser API.

use crate::ansi::{decode, AnsiParser};
use crate::color::{Builtin, Palette, Rgba};
use crate::config::DecoderConfig;
use crate::error::SequenceError;
use crate::glyph::{AttrFlags, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use crate::screen::RenderFlags;
use pretty_assertions::assert_eq;

fn config() -> DecoderConfig {
    DecoderConfig {
        collect_diagnostics: true,
        ..DecoderConfig::default()
    }
}

fn run(bytes: &[u8]) -> AnsiParser {
    decode(bytes, config()).unwrap()
}

fn run_with_row_limit(bytes: &[u8], max_rows: usize) -> AnsiParser {
    let config = DecoderConfig {
        max_rows,
        ..config()
    };
    decode(bytes, config).unwrap()
}

fn ch_at(parser: &AnsiParser, x: usize, y: usize) -> Option<u8> {
    parser.buffer().cell_at(x, y).map(|c| c.ch)
}

// --- Cursor movement ---

#[test_log::test]
fn cursor_position_is_one_based() {
    let parser = run(b"\x1b[2;5HA");
    let cell = parser.buffer().cell(84).unwrap();
    assert_eq!(cell.ch, b'A');
    assert_eq!(parser.buffer().cursor.pos(), (5, 1));

    let parser = run(b"\x1b[HB\x1b[3fC");
    assert_eq!(ch_at(&parser, 0, 0), Some(b'B'));
    assert_eq!(ch_at(&parser, 0, 2), Some(b'C'));

    let parser = run(b"\x1b[0;0HD");
    assert_eq!(ch_at(&parser, 0, 0), Some(b'D'));
}

#[test_log::test]
fn relative_moves_default_to_one() {
    let parser = run(b"\x1b[10;10H\x1b[A\x1b[2D\x1b[0B\x1b[3C");
    assert_eq!(parser.buffer().cursor.pos(), (10, 9));
}

#[test_log::test]
fn relative_moves_stop_at_origin() {
    let parser = run(b"\x1b[5A\x1b[5D");
    assert_eq!(parser.buffer().cursor.pos(), (0, 0));
}

#[test_log::test]
fn forward_move_is_not_clamped_and_wraps_on_write() {
    let parser = run(b"\x1b[85CX");
    assert_eq!(ch_at(&parser, 5, 1), Some(b'X'));
}

#[test_log::test]
fn line_moves_return_to_column_zero() {
    let parser = run(b"\x1b[5;5H\x1b[2E");
    assert_eq!(parser.buffer().cursor.pos(), (0, 6));
    let parser = run(b"\x1b[5;5H\x1b[F");
    assert_eq!(parser.buffer().cursor.pos(), (0, 3));
}

#[test_log::test]
fn character_absolute_sets_column() {
    let parser = run(b"abc\x1b[Gx\x1b[10Gy");
    assert_eq!(ch_at(&parser, 0, 0), Some(b'x'));
    assert_eq!(ch_at(&parser, 9, 0), Some(b'y'));
}

#[test_log::test]
fn save_and_restore_cursor_position() {
    let parser = run(b"\x1b[3;4H\x1b[s\x1b[10;10H\x1b[u");
    assert_eq!(parser.buffer().cursor.pos(), (3, 2));

    // Restore with nothing saved is a no-op.
    let parser = run(b"\x1b[3;4H\x1b[u");
    assert_eq!(parser.buffer().cursor.pos(), (3, 2));
}

// --- Erasing and inserting ---

#[test_log::test]
fn erase_in_page_modes() {
    let parser = run(b"aaaa\x1b[1;3H\x1b[J");
    assert_eq!(ch_at(&parser, 1, 0), Some(b'a'));
    assert_eq!(ch_at(&parser, 2, 0), None);

    let parser = run(b"aaaa\x1b[1;3H\x1b[1J");
    assert_eq!(ch_at(&parser, 2, 0), None);
    assert_eq!(ch_at(&parser, 3, 0), Some(b'a'));

    let parser = run(b"aaaa\x1b[2J");
    assert!(parser.buffer().cells().iter().all(Option::is_none));
}

#[test_log::test]
fn erase_in_line_modes() {
    let input = b"aaaa\r\nbbbb\x1b[2;3H";
    let with = |tail: &[u8]| {
        let mut bytes = input.to_vec();
        bytes.extend_from_slice(tail);
        run(&bytes)
    };

    let parser = with(b"\x1b[K");
    assert_eq!(ch_at(&parser, 1, 1), Some(b'b'));
    assert_eq!(ch_at(&parser, 2, 1), None);
    assert_eq!(ch_at(&parser, 3, 1), None);
    assert_eq!(ch_at(&parser, 3, 0), Some(b'a'));

    let parser = with(b"\x1b[1K");
    assert_eq!(ch_at(&parser, 2, 1), None);
    assert_eq!(ch_at(&parser, 3, 1), Some(b'b'));

    let parser = with(b"\x1b[2K");
    assert!((0..4).all(|x| ch_at(&parser, x, 1).is_none()));
    assert_eq!(ch_at(&parser, 0, 0), Some(b'a'));

    let parser = with(b"\x1b[7K");
    assert!(matches!(parser.diagnostics(), [SequenceError::UnsupportedMode(_)]));
}

#[test_log::test]
fn insert_line_shifts_rows_down() {
    let parser = run(b"top\r\nbottom\x1b[2;1H\x1b[2L");
    assert_eq!(ch_at(&parser, 0, 0), Some(b't'));
    assert_eq!(ch_at(&parser, 0, 1), None);
    assert_eq!(ch_at(&parser, 0, 2), None);
    assert_eq!(ch_at(&parser, 0, 3), Some(b'b'));
    assert_eq!(parser.buffer().capacity(), 80 * 25 + 2 * 80);
}

#[test_log::test]
fn large_insert_line_matches_repeated_single_inserts() {
    let once = run(b"top\r\nbottom\x1b[2;1H\x1b[300L");

    let mut input = b"top\r\nbottom".to_vec();
    for _ in 0..300 {
        input.extend_from_slice(b"\x1b[2;1H\x1b[L");
    }
    let repeated = run(&input);

    assert_eq!(once.buffer().capacity(), 80 * 25 + 300 * 80);
    assert_eq!(once.buffer().cells(), repeated.buffer().cells());
    assert_eq!(ch_at(&once, 0, 301), Some(b'b'));
}

#[test_log::test]
fn insert_line_stops_at_row_limit() {
    let parser = run_with_row_limit(b"\x1b[9999L\x1b[L", 100);
    assert_eq!(parser.buffer().capacity(), 100 * 80);
    assert_eq!(
        parser.diagnostics(),
        &[
            SequenceError::RowLimit { row: 25 + 9999, limit: 100 },
            SequenceError::RowLimit { row: 101, limit: 100 },
        ]
    );
}

// --- Row limit ---

#[test_log::test]
fn repeated_cursor_down_is_clamped_to_row_limit() {
    let mut input = Vec::new();
    for _ in 0..20 {
        input.extend_from_slice(b"\x1b[9999B");
    }
    input.push(b'A');
    let parser = run(&input);

    assert_eq!(ch_at(&parser, 0, 9999), Some(b'A'));
    assert_eq!(parser.buffer().cursor.pos(), (1, 9999));
    assert!(parser.buffer().capacity() <= 80 * 10_000);
    assert_eq!(parser.diagnostics().len(), 19);
    assert!(parser
        .diagnostics()
        .iter()
        .all(|err| matches!(err, SequenceError::RowLimit { limit: 10_000, .. })));
}

#[test_log::test]
fn newline_and_forward_moves_respect_row_limit() {
    let parser = run_with_row_limit(b"a\nb\nc\nd", 3);
    assert_eq!(ch_at(&parser, 0, 2), Some(b'd'));
    assert_eq!(parser.buffer().cursor.pos(), (1, 2));
    assert_eq!(
        parser.diagnostics(),
        &[SequenceError::RowLimit { row: 3, limit: 3 }]
    );

    let parser = run_with_row_limit(b"\x1b[500C", 3);
    assert_eq!(parser.buffer().cursor.pos(), (20, 2));
}

// --- Graphic rendition ---

#[test_log::test]
fn sgr_reset_then_set() {
    let parser = run(b"\x1b[0;1;31mX");
    let cell = parser.buffer().cell(0).unwrap();
    assert_eq!(cell.attrs, AttrFlags::BOLD);
    assert_eq!(cell.fg, 1);
    assert_eq!(cell.bg, DEFAULT_BACKGROUND);
}

#[test_log::test]
fn empty_sgr_resets_pen() {
    let parser = run(b"\x1b[1;4;33;44m\x1b[mX");
    let cell = parser.buffer().cell(0).unwrap();
    assert!(cell.attrs.is_empty());
    assert_eq!((cell.fg, cell.bg), (DEFAULT_FOREGROUND, DEFAULT_BACKGROUND));
}

#[test_log::test]
fn sgr_attribute_pairs() {
    let pen = |bytes: &[u8]| run(bytes).buffer().cursor.pen;

    assert_eq!(pen(b"\x1b[4;21m").attrs, AttrFlags::DOUBLE_UNDERLINE);
    assert_eq!(pen(b"\x1b[21;4m").attrs, AttrFlags::UNDERLINE);
    assert!(pen(b"\x1b[4;24m").attrs.is_empty());
    assert!(pen(b"\x1b[1;2;22m").attrs.is_empty());
    assert!(pen(b"\x1b[3;20;23m").attrs.is_empty());
    assert_eq!(
        pen(b"\x1b[5;7;8;9;25m").attrs,
        AttrFlags::NEGATIVE | AttrFlags::CONCEAL | AttrFlags::CROSSED_OUT
    );
    assert!(pen(b"\x1b[51;52;53;54;55m").attrs.is_empty());
    assert_eq!(pen(b"\x1b[60;61;62;63;64m").attrs, AttrFlags::IDEOGRAM);
    assert!(pen(b"\x1b[60;64;65m").attrs.is_empty());
    assert_eq!(pen(b"\x1b[13m").font, 3);
    assert_eq!(pen(b"\x1b[13;0m").font, 0);
}

#[test_log::test]
fn sgr_colours() {
    let pen = |bytes: &[u8]| run(bytes).buffer().cursor.pen;

    let p = pen(b"\x1b[37;40m");
    assert_eq!((p.fg, p.bg), (7, 0));
    let p = pen(b"\x1b[92;103m");
    assert_eq!((p.fg, p.bg), (10, 11));
    let p = pen(b"\x1b[31;42;39;49m");
    assert_eq!((p.fg, p.bg), (DEFAULT_FOREGROUND, DEFAULT_BACKGROUND));
}

#[test_log::test]
fn sgr_extended_rgb_adds_palette_entry() {
    let parser = run(b"\x1b[38;2;10;20;30mX");
    assert_eq!(parser.palette().len(), 17);
    assert_eq!(parser.palette().get(16), Some(Rgba::rgb(10, 20, 30)));
    assert_eq!(parser.palette().get(16).map(|c| c.a), Some(255));
    assert_eq!(parser.buffer().cell(0).map(|c| c.fg), Some(16));
}

#[test_log::test]
fn sgr_extended_rgb_reuses_existing_entries() {
    let first = Palette::default().colors()[1];
    let seq = format!("\x1b[48;2;{};{};{}m", first.r, first.g, first.b);
    let parser = run(seq.as_bytes());
    assert_eq!(parser.buffer().cursor.pen.bg, 1);
    assert!(parser.palette().is_builtin());

    let parser = run(b"\x1b[38;2;1;2;3;48;2;1;2;3m");
    assert_eq!(parser.palette().len(), 17);
    assert_eq!(parser.buffer().cursor.pen.fg, 16);
    assert_eq!(parser.buffer().cursor.pen.bg, 16);
}

#[test_log::test]
fn sgr_extended_index_upgrades_palette() {
    let parser = run(b"\x1b[38;5;200;1m");
    assert_eq!(parser.palette(), &Palette::Shared(Builtin::Vga));
    assert_eq!(parser.buffer().cursor.pen.fg, 200);
    assert!(parser.buffer().cursor.pen.attrs.contains(AttrFlags::BOLD));
}

#[test_log::test]
fn sgr_malformed_extended_colour_drops_rest_of_sequence() {
    let parser = run(b"\x1b[1;38;2;10m\x1b[38;9;4m");
    assert!(parser.buffer().cursor.pen.attrs.contains(AttrFlags::BOLD));
    assert_eq!(parser.buffer().cursor.pen.fg, DEFAULT_FOREGROUND);
    assert_eq!(
        parser.diagnostics(),
        &[
            SequenceError::MalformedExtendedColor("1;38;2;10".into()),
            SequenceError::MalformedExtendedColor("38;9;4".into()),
        ]
    );
}

#[test_log::test]
fn sgr_unknown_code_is_reported_and_skipped() {
    let parser = run(b"\x1b[1;70;31m");
    assert_eq!(parser.buffer().cursor.pen.fg, 1);
    assert_eq!(
        parser.diagnostics(),
        &[SequenceError::UnsupportedSgr {
            code: 70,
            params: "1;70;31".into(),
        }]
    );

    // Reserved codes are accepted silently.
    let parser = run(b"\x1b[26;50;56m");
    assert!(parser.diagnostics().is_empty());
}

#[test_log::test]
fn large_parameters_are_capped() {
    let parser = run(b"\x1b[123456;2H");
    assert_eq!(parser.buffer().cursor.pos(), (1, 9998));
}

// --- Vendor true colour ---

#[test_log::test]
fn true_color_sets_foreground_and_background() {
    let parser = run(b"\x1b[1;255;128;0t\x1b[0;1;2;3tX");
    let cell = parser.buffer().cell(0).unwrap();
    assert_eq!(parser.palette().get(cell.fg), Some(Rgba::rgb(255, 128, 0)));
    assert_eq!(parser.palette().get(cell.bg), Some(Rgba::rgb(1, 2, 3)));
}

#[test_log::test]
fn true_color_arity_and_selector_errors() {
    let parser = run(b"\x1b[1;2;3t\x1b[1;999;2;3;4t\x1b[7;1;2;3t");
    assert_eq!(
        parser.diagnostics(),
        &[
            SequenceError::TrueColorArity(3),
            SequenceError::TrueColorSelector(7),
        ]
    );
    // Values above 255 are discarded, leaving a valid sequence.
    assert_eq!(parser.palette().get(parser.buffer().cursor.pen.fg), Some(Rgba::rgb(2, 3, 4)));
}

// --- Modes ---

#[test_log::test]
fn private_blink_modes_toggle_non_blink() {
    let parser = run(b"\x1b[?33h");
    assert!(parser.buffer().flags.contains(RenderFlags::NON_BLINK));

    let parser = run(b"\x1b[=31h\x1b[?33l");
    assert!(!parser.buffer().flags.contains(RenderFlags::NON_BLINK));
    assert!(parser.diagnostics().is_empty());
}

#[test_log::test]
fn other_modes_are_reported() {
    let parser = run(b"\x1b[?7h\x1b[4h");
    assert_eq!(
        parser.diagnostics(),
        &[
            SequenceError::UnsupportedMode("?7".into()),
            SequenceError::UnsupportedMode("4".into()),
        ]
    );
}

#[test_log::test]
fn set_flags_replaces_render_hints() {
    let mut parser = AnsiParser::with_size(40, 10);
    parser.set_flags(RenderFlags::LETTER_SPACING_9PX);
    assert_eq!(parser.buffer().flags, RenderFlags::LETTER_SPACING_9PX);
    assert_eq!(parser.buffer().width(), 40);
}
