// src/config.rs

//! Decoder configuration.
//!
//! `DecoderConfig` can be deserialized from JSON; every field has a default,
//! so a partial (or empty) document is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::DecodeError;

/// How loudly recoverable sequence errors are reported through `log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Reported at `trace`.
    Quiet,
    /// Reported at `debug`.
    #[default]
    Normal,
    /// Reported at `warn`.
    Verbose,
}

impl Verbosity {
    pub fn level(self) -> log::Level {
        match self {
            Verbosity::Quiet => log::Level::Trace,
            Verbosity::Normal => log::Level::Debug,
            Verbosity::Verbose => log::Level::Warn,
        }
    }
}

/// Settings for a decode session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Initial canvas width for text streams.
    pub columns: usize,
    /// Initial canvas height for text streams. The canvas grows as needed.
    pub rows: usize,
    /// Rows the cursor may reach in text streams. Moves and inserted lines
    /// beyond it are clamped.
    pub max_rows: usize,
    /// Horizontal tab interval.
    pub tab_stop: usize,
    /// Report the nominal canvas as the used extent after decoding.
    pub force_size: bool,
    /// Log level for unsupported or malformed sequences.
    pub diagnostics: Verbosity,
    /// Also keep recoverable error messages for the caller to inspect.
    pub collect_diagnostics: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            columns: 80,
            rows: 25,
            max_rows: 10_000,
            tab_stop: 8,
            force_size: false,
            diagnostics: Verbosity::default(),
            collect_diagnostics: false,
        }
    }
}

impl DecoderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, DecodeError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }
}
