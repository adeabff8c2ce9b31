// SPDX-License-Identifier: MIT
//
// Startup configuration: what to run and where to log.
//
// Read once, before the terminal is touched. The command line picks the
// mode; the environment controls logging:
//
//   LADDER_LOG_FILE   path to append log lines to (unset: no logging)
//   LADDER_LOG        tracing filter directive (default: "info")
//
// Logs never go to stdout or stderr: both are the screen while the editor
// is running.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the log file.
pub const LOG_FILE_VAR: &str = "LADDER_LOG_FILE";
/// Environment variable holding the log filter.
pub const LOG_FILTER_VAR: &str = "LADDER_LOG";
/// Filter used when `LADDER_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const USAGE: &str = "\
usage: ladder [--keys | --version | --help]

  (no arguments)  open the editor (Ctrl+Q quits)
  --keys          print the byte code of every key pressed, `q` exits
  -V, --version   print the version
  -h, --help      print this help

environment:
  LADDER_LOG_FILE  append logs to this file
  LADDER_LOG       log filter (default: info)";

/// What the binary should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editor,
    KeyEcho,
    Version,
    Help,
}

/// Bad command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("unknown argument `{0}`")]
    Unknown(String),
    #[error("unexpected extra argument `{0}`")]
    Extra(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    /// Read the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] for an unknown or extra argument.
    pub fn load() -> Result<Self, UsageError> {
        Self::from_parts(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Build a config from explicit arguments (program name excluded) and an
    /// environment lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] for an unknown or extra argument.
    pub fn from_parts<I, F>(args: I, var: F) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();

        let mode = match args.next().as_deref() {
            None => Mode::Editor,
            Some("--keys") => Mode::KeyEcho,
            Some("-V" | "--version") => Mode::Version,
            Some("-h" | "--help") => Mode::Help,
            Some(other) => return Err(UsageError::Unknown(other.to_owned())),
        };
        if let Some(extra) = args.next() {
            return Err(UsageError::Extra(extra));
        }

        let log_file = var(LOG_FILE_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let log_filter = var(LOG_FILTER_VAR)
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Self {
            mode,
            log_file,
            log_filter,
        })
    }
}
