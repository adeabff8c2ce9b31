// SPDX-License-Identifier: MIT
//
// Error type for terminal operations.
//
// Every variant here is fatal to the editor: the binary resets the screen,
// prints the message and exits with status 1. Recoverable conditions (a
// garbled escape sequence, a failed buffer growth) never become an `Error`.

use std::io;

use thiserror::Error;

/// Terminal engine error.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the terminal attributes failed.
    #[error("tcgetattr: {0}")]
    GetAttributes(#[source] io::Error),

    /// Applying terminal attributes failed.
    #[error("tcsetattr: {0}")]
    SetAttributes(#[source] io::Error),

    /// Reading from the terminal failed.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),

    /// Neither the window-size query nor the cursor-report fallback
    /// produced a usable geometry.
    #[error("unable to determine window size")]
    Geometry,
}

/// Result type for terminal operations.
pub type Result<T> = std::result::Result<T, Error>;
