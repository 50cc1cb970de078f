// src/main.rs

//! Decodes text-mode art files and prints their text content.
//!
//! Usage: `core-art FILE...`. The format is picked from the file extension
//! (`.xb` for XBIN, `.bin` for BIN, anything else is read as ANSI). A JSON
//! decoder configuration may be supplied through `CORE_ART_CONFIG`.

use anyhow::{bail, Context};
use log::{info, warn};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use core_art::{ansi, bintext, Buffer, DecoderConfig, Xbin};

const CONFIG_ENV: &str = "CORE_ART_CONFIG";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: core-art FILE...");
    }

    let config = match env::var_os(CONFIG_ENV) {
        Some(path) => DecoderConfig::load(Path::new(&path))
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => DecoderConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in &paths {
        let buffer = decode_file(path, &config)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        out.write_all(&buffer.plain_text())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn decode_file(path: &Path, config: &DecoderConfig) -> anyhow::Result<Buffer> {
    let file = File::open(path).context("Failed to open file")?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let buffer = match extension.as_deref() {
        Some("xb") => Xbin::decode(file)?.into_parts().0,
        Some("bin") => bintext::decode(file)?.buffer,
        _ => {
            let parser = ansi::decode(file, config.clone())?;
            if !parser.diagnostics().is_empty() {
                warn!(
                    "{}: {} unsupported or malformed sequences",
                    path.display(),
                    parser.diagnostics().len()
                );
            }
            parser.into_parts().0
        }
    };

    let (width, height) = buffer.size_max();
    info!("{}: {}x{} cells", path.display(), width, height);
    Ok(buffer)
}
