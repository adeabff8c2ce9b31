//! View — composing a full-screen frame.
//!
//! Each refresh redraws the whole screen into one [`RenderBuffer`] and
//! writes it in a single call:
//!
//! ```text
//! ESC[?25l ESC[H                 hide cursor, go home
//! ~ ESC[K \r\n                   one line per row ...
//! ~      Ladder editor ESC[K \r\n  ... the banner a third of the way down
//! ~ ESC[K                        last row: no \r\n (it would scroll)
//! ESC[<y>;<x>H ESC[?25h          place and show the cursor
//! ```
//!
//! Hiding the cursor while drawing keeps it from flickering across the
//! screen; erasing each line as it is drawn replaces a full-screen clear.

use std::io::Write;

use unicode_width::UnicodeWidthChar;

use ladder_term::ansi;
use ladder_term::output::RenderBuffer;

use crate::state::EditorState;

/// Shown a third of the way down an empty screen.
pub const WELCOME: &str = concat!("Ladder editor -- version ", env!("CARGO_PKG_VERSION"));

/// Glyph marking a row with no content.
const FILLER: &[u8] = b"~";

/// The row that carries the welcome banner.
#[must_use]
pub const fn banner_row(rows: u16) -> u16 {
    rows / 3
}

/// The longest prefix of `text` that fits in `cols` terminal columns.
#[must_use]
pub fn clip_to_width(text: &str, cols: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > cols {
            return &text[..idx];
        }
    }
    text
}

/// Emit the centred banner row (without the trailing erase).
fn draw_banner(out: &mut RenderBuffer, cols: u16) {
    let cols = usize::from(cols);
    let banner = clip_to_width(WELCOME, cols);
    let width: usize = banner.chars().map(|c| c.width().unwrap_or(0)).sum();

    let mut padding = (cols - width) / 2;
    if padding > 0 {
        out.append(FILLER);
        padding -= 1;
    }
    for _ in 0..padding {
        out.append(b" ");
    }
    out.append(banner.as_bytes());
}

/// Emit every screen row: filler or banner, erase, line break.
fn draw_rows(out: &mut RenderBuffer, state: &EditorState) {
    let rows = state.screen_rows();
    let banner_at = banner_row(rows);

    for y in 0..rows {
        if y == banner_at {
            draw_banner(out, state.screen_cols());
        } else {
            out.append(FILLER);
        }

        ansi::erase_line(out).ok();
        if y + 1 < rows {
            out.append(b"\r\n");
        }
    }
}

/// Build one complete frame for `state`.
#[must_use]
pub fn compose(state: &EditorState) -> RenderBuffer {
    let mut out = RenderBuffer::new();

    ansi::cursor_hide(&mut out).ok();
    ansi::cursor_home(&mut out).ok();

    draw_rows(&mut out, state);

    ansi::cursor_to(&mut out, state.cursor_x(), state.cursor_y()).ok();
    ansi::cursor_show(&mut out).ok();

    out
}

/// Redraw the screen: compose a frame and write it to `w` in one go.
///
/// # Errors
///
/// Returns [`ladder_term::Error::Write`] if the write fails.
pub fn refresh(state: &EditorState, w: &mut impl Write) -> ladder_term::Result<()> {
    compose(state).flush_to(w)
}
