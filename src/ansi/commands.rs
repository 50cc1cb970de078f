// src/ansi/commands.rs

//! Control bytes and the control sequence opcodes the interpreter handles.

// --- C0 control bytes acted on in text ---
pub(super) const TAB: u8 = 0x09;
pub(super) const LF: u8 = 0x0A;
pub(super) const CR: u8 = 0x0D;
/// DOS end-of-file; everything after it is trailing metadata.
pub(super) const SUB: u8 = 0x1A;
pub(super) const ESC: u8 = 0x1B;

/// Second byte of a control sequence introducer (`ESC [`).
pub(super) const CSI_BRACKET: u8 = b'[';
pub(super) const PARAM_SEPARATOR: u8 = b';';

/// Control sequences with a handler, keyed by final byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `A`: cursor up.
    CursorUp,
    /// `B`: cursor down.
    CursorDown,
    /// `C`: cursor right.
    CursorForward,
    /// `D`: cursor left.
    CursorBackward,
    /// `E`: cursor next line.
    CursorNextLine,
    /// `F`: cursor preceding line.
    CursorPrevLine,
    /// `G`: cursor character absolute.
    CursorCharacterAbsolute,
    /// `H`: cursor position.
    CursorPosition,
    /// `J`: erase in page.
    EraseInPage,
    /// `K`: erase in line.
    EraseInLine,
    /// `L`: insert line.
    InsertLine,
    /// `f`: character and line position; same as `H`.
    HorizontalVerticalPosition,
    /// `h`: set mode.
    SetMode,
    /// `l`: reset mode.
    ResetMode,
    /// `m`: select graphic rendition.
    SelectGraphicRendition,
    /// `s`: save cursor position (ANSI.SYS).
    SaveCursor,
    /// `t`: PabloDraw 24-bit colour, `ESC [ s ; r ; g ; b t`.
    TrueColor,
    /// `u`: restore cursor position (ANSI.SYS).
    RestoreCursor,
}

impl Opcode {
    pub fn from_final_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Opcode::CursorUp),
            b'B' => Some(Opcode::CursorDown),
            b'C' => Some(Opcode::CursorForward),
            b'D' => Some(Opcode::CursorBackward),
            b'E' => Some(Opcode::CursorNextLine),
            b'F' => Some(Opcode::CursorPrevLine),
            b'G' => Some(Opcode::CursorCharacterAbsolute),
            b'H' => Some(Opcode::CursorPosition),
            b'J' => Some(Opcode::EraseInPage),
            b'K' => Some(Opcode::EraseInLine),
            b'L' => Some(Opcode::InsertLine),
            b'f' => Some(Opcode::HorizontalVerticalPosition),
            b'h' => Some(Opcode::SetMode),
            b'l' => Some(Opcode::ResetMode),
            b'm' => Some(Opcode::SelectGraphicRendition),
            b's' => Some(Opcode::SaveCursor),
            b't' => Some(Opcode::TrueColor),
            b'u' => Some(Opcode::RestoreCursor),
            _ => None,
        }
    }
}

/// True for bytes that end a control sequence.
pub(super) fn is_final_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}
