// SPDX-License-Identifier: MIT
//
// ladder-term — terminal engine for the ladder editor.
//
// Everything between the editor and the tty lives here: switching the line
// discipline to raw mode and back, measuring the screen, decoding the byte
// stream from the keyboard into logical keys, and assembling each frame in
// memory so it reaches the terminal in a single write.
//
// No TUI framework sits underneath. The terminal is driven directly through
// termios and a handful of VT100 escape sequences.

#[cfg(not(unix))]
compile_error!("ladder-term drives the terminal through termios and needs a Unix target");

pub mod ansi;
pub mod error;
pub mod geometry;
pub mod input;
pub mod output;
pub mod terminal;

pub use error::{Error, Result};
