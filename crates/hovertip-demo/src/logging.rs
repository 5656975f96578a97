#![forbid(unsafe_code)]

//! Log setup.
//!
//! The terminal belongs to the UI, so logs only go to a file. Without
//! `HOVERTIP_LOG_FILE` no subscriber is installed and events are dropped.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Default filter when the configured one does not parse.
const FALLBACK_FILTER: &str = "info";

pub(crate) fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Install a file-backed subscriber. Returns whether one was installed.
pub fn init(directive: &str, file: Option<&Path>) -> io::Result<bool> {
    let Some(path) = file else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok();
    Ok(installed)
}
