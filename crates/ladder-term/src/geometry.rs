// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal geometry.
//
// Two ways to learn how big the screen is:
//
//   1. Ask the kernel: `ioctl(TIOCGWINSZ)` on the terminal fd. Cheap and
//      usually right, but some terminals report zero columns and some
//      environments don't support the ioctl at all.
//
//   2. Ask the terminal: push the cursor to the far bottom-right corner
//      (CUF/CUD clamp at the edge), then request a cursor position report.
//      The reply `ESC [ rows ; cols R` is the screen size.
//
// The probe runs once at startup; the result is cached by the caller.

use std::io::{self, Read, Write};
use std::os::unix::io::RawFd;

use crate::ansi::{self, ESC};
use crate::error::{Error, Result};

/// Scratch space for the cursor position reply.
const REPORT_BUF_SIZE: usize = 32;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells. Both are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    cols: u16,
    rows: u16,
}

impl Size {
    /// A size with both dimensions non-zero.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Option<Self> {
        if cols == 0 || rows == 0 {
            None
        } else {
            Some(Self { cols, rows })
        }
    }

    /// Number of columns (width in character cells).
    #[inline]
    #[must_use]
    pub const fn cols(self) -> u16 {
        self.cols
    }

    /// Number of rows (height in character cells).
    #[inline]
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }
}

// ─── Primary: ioctl ─────────────────────────────────────────────────────────

/// Query the window size of the terminal behind `fd` via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if the query fails or reports zero columns or rows.
#[must_use]
pub fn window_size(fd: RawFd) -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    if result == -1 {
        return None;
    }
    Size::new(ws.ws_col, ws.ws_row)
}

// ─── Fallback: cursor position report ───────────────────────────────────────

/// Parse a cursor position report: `ESC [ <row> ; <col> R` with the final
/// `R` already stripped or still present.
///
/// Returns `None` for anything that isn't exactly that shape, or for a
/// zero or out-of-range coordinate.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_suffix(b"R").unwrap_or(reply);
    let body = body.strip_prefix(&[ESC, b'['])?;

    let split = body.iter().position(|&b| b == b';')?;
    let rows = parse_decimal(&body[..split])?;
    let cols = parse_decimal(&body[split + 1..])?;

    Size::new(cols, rows)
}

/// Parse a non-empty run of ASCII digits.
fn parse_decimal(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Ask the terminal where the cursor is.
///
/// Writes the DSR request to `output`, then reads the reply from `input`
/// one byte at a time until `R` arrives, the scratch buffer fills up, or a
/// read comes back empty.
///
/// # Errors
///
/// Returns [`Error::Write`] if the request can't be sent, [`Error::Read`]
/// on a read error, and [`Error::Geometry`] if the reply is malformed.
pub fn cursor_position(input: &mut impl Read, output: &mut impl Write) -> Result<Size> {
    ansi::request_cursor_position(output)
        .and_then(|()| output.flush())
        .map_err(Error::Write)?;

    let mut buf = [0u8; REPORT_BUF_SIZE];
    let mut len = 0;

    while len < buf.len() {
        match input.read(&mut buf[len..=len]) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Read(e)),
        }
        len += 1;
        if buf[len - 1] == b'R' {
            break;
        }
    }

    parse_cursor_report(&buf[..len]).ok_or_else(|| {
        tracing::debug!(reply = ?&buf[..len], "malformed cursor position report");
        Error::Geometry
    })
}

/// Measure the screen by moving the cursor to the far corner and asking
/// where it ended up.
///
/// # Errors
///
/// Same as [`cursor_position`].
pub fn size_from_cursor(input: &mut impl Read, output: &mut impl Write) -> Result<Size> {
    ansi::cursor_to_far_corner(output).map_err(Error::Write)?;
    cursor_position(input, output)
}

// ─── Probe ──────────────────────────────────────────────────────────────────

/// Determine the terminal size: ioctl on `fd` first, cursor report second.
///
/// # Errors
///
/// Returns an error if neither strategy yields a usable size.
pub fn probe(fd: RawFd, input: &mut impl Read, output: &mut impl Write) -> Result<Size> {
    if let Some(size) = window_size(fd) {
        tracing::debug!(cols = size.cols, rows = size.rows, "window size from ioctl");
        return Ok(size);
    }

    tracing::debug!("ioctl window size unavailable, falling back to cursor report");
    let size = size_from_cursor(input, output)?;
    tracing::debug!(cols = size.cols, rows = size.rows, "window size from cursor report");
    Ok(size)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
