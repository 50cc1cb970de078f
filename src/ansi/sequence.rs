// src/ansi/sequence.rs

//! Parameter accumulator for one control sequence.

use std::fmt;

/// Numeric parameters are capped at this value.
pub const MAX_PARAM_VALUE: u16 = 9999;
/// Parameters beyond this count are dropped.
pub const MAX_PARAMS: usize = 32;
/// Bytes per parameter beyond this count are dropped.
pub const MAX_TOKEN_LEN: usize = 16;

/// The parameter tokens of an escape sequence, split on `;`, plus the token
/// currently being read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    tokens: Vec<Vec<u8>>,
    current: Vec<u8>,
    truncated: bool,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence::default()
    }

    /// Appends a byte to the in-progress token.
    pub fn buffer(&mut self, byte: u8) {
        if self.current.len() < MAX_TOKEN_LEN {
            self.current.push(byte);
        } else {
            self.truncated = true;
        }
    }

    /// Moves the in-progress token onto the parameter list.
    pub fn flush(&mut self) {
        let token = std::mem::take(&mut self.current);
        if self.tokens.len() < MAX_PARAMS {
            self.tokens.push(token);
        } else {
            self.truncated = true;
        }
    }

    pub fn reset(&mut self) {
        self.tokens.clear();
        self.current.clear();
        self.truncated = false;
    }

    /// Number of flushed tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether bytes were dropped because the sequence was too long.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Raw token `n`.
    pub fn token(&self, n: usize) -> Option<&[u8]> {
        self.tokens.get(n).map(Vec::as_slice)
    }

    /// Numeric parameter `n`; `None` when absent, empty or not a number.
    pub fn param(&self, n: usize) -> Option<u16> {
        self.token(n).and_then(parse_number)
    }

    /// Numeric parameter `n`, or `default` when it is missing.
    pub fn param_or(&self, n: usize, default: u16) -> u16 {
        self.param(n).unwrap_or(default)
    }

    /// All parameters as numbers, in order. Empty tokens count as 0 and
    /// non-numeric tokens are skipped.
    pub fn ints(&self) -> Vec<u16> {
        self.tokens
            .iter()
            .filter_map(|token| {
                if token.is_empty() {
                    Some(0)
                } else {
                    parse_number(token)
                }
            })
            .collect()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            f.write_str(&String::from_utf8_lossy(token))?;
        }
        Ok(())
    }
}

/// Parses an all-digit token, saturating at `MAX_PARAM_VALUE`.
pub(super) fn parse_number(token: &[u8]) -> Option<u16> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = token.iter().fold(0u16, |acc, &digit| {
        acc.saturating_mul(10)
            .saturating_add(u16::from(digit - b'0'))
            .min(MAX_PARAM_VALUE)
    });
    Some(value)
}
