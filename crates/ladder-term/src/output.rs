// SPDX-License-Identifier: MIT
//
// Frame output buffering.
//
// A frame is a few dozen escape sequences and one short line per screen row.
// Writing each piece separately lets the terminal paint half-built frames,
// which shows up as flicker. Instead everything for one frame goes into a
// `RenderBuffer` and reaches the terminal in a single `write_all`.
//
// Growth is best-effort: if the allocator refuses to grow the buffer, the
// append is dropped and the buffer keeps its previous contents. A frame with
// a missing line is better than an aborted editor.

use std::io::{self, Write};

use crate::error::{Error, Result};

/// An append-only byte buffer holding one frame.
///
/// Created at the start of a refresh, consumed by [`flush_to`](Self::flush_to)
/// at the end. Implements [`Write`] so the [`ansi`](crate::ansi) encoders can
/// write into it directly.
#[derive(Debug, Default)]
pub struct RenderBuffer {
    buf: Vec<u8>,
}

impl RenderBuffer {
    /// Create an empty buffer. Nothing is allocated until the first append.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `bytes` at the end of the buffer.
    ///
    /// If the buffer cannot grow, the append is silently dropped.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.reserve(bytes.len()) {
            self.buf.extend_from_slice(bytes);
        }
    }

    /// Write the whole frame to `w` in one operation and release the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if writing to `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf).map_err(Error::Write)?;
        }
        w.flush().map_err(Error::Write)
    }

    fn reserve(&mut self, additional: usize) -> bool {
        match self.buf.try_reserve(additional) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(additional, %err, "render buffer growth failed, dropping append");
                false
            }
        }
    }
}

impl Write for RenderBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // The real flush is `flush_to`.
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
