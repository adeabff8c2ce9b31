// SPDX-License-Identifier: MIT
//
// Log setup.
//
// The terminal is the screen, so logs go to a file or nowhere. With
// `LADDER_LOG_FILE` unset no subscriber is installed and every `tracing`
// macro in the crates is a cheap no-op.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DEFAULT_LOG_FILTER};

/// Install the file logger described by `config`, if any.
///
/// Returns `Ok(false)` when logging is not configured.
///
/// # Errors
///
/// Returns an error if the log file can't be opened for appending.
pub fn init(config: &Config) -> io::Result<bool> {
    let Some(path) = &config.log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .is_ok();

    Ok(installed)
}
