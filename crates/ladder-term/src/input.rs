// SPDX-License-Identifier: MIT
//
// Terminal key decoder.
//
// Turns the raw byte stream from a terminal in raw mode into logical keys.
// Plain bytes map straight to characters (or to Quit for Ctrl+Q). Escape
// sequences for the navigation keys are recognised by a small state machine:
//
//   ESC [ A|B|C|D|H|F        arrows, Home, End
//   ESC [ 1|3|4|5|6|7|8 ~    Home, Delete, End, PageUp, PageDown
//   ESC O H|F                Home, End (SS3 form)
//   ESC <other> <any>        Escape, both follow-up bytes dropped
//
// Every path through the machine ends within four bytes. When the terminal
// stops delivering bytes in the middle of a sequence (the read times out),
// or a byte doesn't fit any known sequence, the decoder emits a bare Escape.
// Decoding never fails; only the underlying read can.

use std::io::{self, Read};

use crate::ansi::ESC;
use crate::error::{Error, Result};

// ─── Keys ───────────────────────────────────────────────────────────────────

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// Any byte that isn't part of an escape sequence or the quit key.
    Character(u8),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    /// A lone ESC, or an escape sequence we don't recognise.
    Escape,
    /// Ctrl+Q.
    Quit,
}

/// The byte a terminal sends for Ctrl+`letter`: bits 5–7 cleared.
#[inline]
#[must_use]
pub const fn ctrl_key(letter: u8) -> u8 {
    letter & 0x1f
}

/// Ctrl+Q.
pub const QUIT_BYTE: u8 = ctrl_key(b'q');

/// Longest sequence the decoder ever looks at (`ESC [ <digit> ~`).
pub const MAX_SEQUENCE_LEN: usize = 4;

// ─── State Machine ──────────────────────────────────────────────────────────

/// Where the decoder is inside a (possible) escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    /// Waiting for the first byte of a key.
    #[default]
    Ground,
    /// Seen `ESC`.
    Escape,
    /// Seen `ESC` and a follow-up that starts no known sequence; one more
    /// byte is read and dropped before giving up.
    EscapeOther,
    /// Seen `ESC [`.
    Csi,
    /// Seen `ESC [ <digit>`.
    CsiParam(u8),
    /// Seen `ESC O`.
    Ss3,
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The sequence is complete.
    Key(LogicalKey),
    /// More bytes are needed; continue from this state.
    Pending(DecodeState),
}

impl DecodeState {
    /// Feed one byte.
    #[must_use]
    pub const fn step(self, byte: u8) -> Step {
        match self {
            Self::Ground => match byte {
                ESC => Step::Pending(Self::Escape),
                QUIT_BYTE => Step::Key(LogicalKey::Quit),
                b => Step::Key(LogicalKey::Character(b)),
            },
            Self::Escape => match byte {
                b'[' => Step::Pending(Self::Csi),
                b'O' => Step::Pending(Self::Ss3),
                _ => Step::Pending(Self::EscapeOther),
            },
            Self::EscapeOther => Step::Key(LogicalKey::Escape),
            Self::Csi => match byte {
                b'A' => Step::Key(LogicalKey::MoveUp),
                b'B' => Step::Key(LogicalKey::MoveDown),
                b'C' => Step::Key(LogicalKey::MoveRight),
                b'D' => Step::Key(LogicalKey::MoveLeft),
                b'H' => Step::Key(LogicalKey::Home),
                b'F' => Step::Key(LogicalKey::End),
                d @ b'0'..=b'9' => Step::Pending(Self::CsiParam(d)),
                _ => Step::Key(LogicalKey::Escape),
            },
            Self::CsiParam(digit) => {
                if byte == b'~' {
                    Step::Key(tilde_key(digit))
                } else {
                    Step::Key(LogicalKey::Escape)
                }
            }
            Self::Ss3 => match byte {
                b'H' => Step::Key(LogicalKey::Home),
                b'F' => Step::Key(LogicalKey::End),
                _ => Step::Key(LogicalKey::Escape),
            },
        }
    }

    /// The key to emit when no further byte arrives in this state.
    #[must_use]
    pub const fn on_timeout(self) -> LogicalKey {
        LogicalKey::Escape
    }
}

/// Map the digit of an `ESC [ <digit> ~` sequence.
const fn tilde_key(digit: u8) -> LogicalKey {
    match digit {
        b'1' | b'7' => LogicalKey::Home,
        b'3' => LogicalKey::Delete,
        b'4' | b'8' => LogicalKey::End,
        b'5' => LogicalKey::PageUp,
        b'6' => LogicalKey::PageDown,
        _ => LogicalKey::Escape,
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Reads logical keys from a byte source.
///
/// The source is expected to behave like a terminal in raw mode with a read
/// timeout: a read returns zero bytes when nothing arrived in time.
///
/// # Example
///
/// ```
/// use ladder_term::input::{KeyDecoder, LogicalKey};
///
/// let mut keys = KeyDecoder::new(&b"\x1b[Ax"[..]);
/// assert_eq!(keys.next_key()?, LogicalKey::MoveUp);
/// assert_eq!(keys.next_key()?, LogicalKey::Character(b'x'));
/// # Ok::<(), ladder_term::Error>(())
/// ```
pub struct KeyDecoder<R> {
    source: R,
}

impl<R: Read> KeyDecoder<R> {
    /// Wrap a byte source.
    pub const fn new(source: R) -> Self {
        Self { source }
    }

    /// Block until a key arrives.
    ///
    /// Each timed-out read is retried, so with a terminal this returns as
    /// soon as the user presses something.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the source reports a real read error.
    pub fn next_key(&mut self) -> Result<LogicalKey> {
        loop {
            if let Some(key) = self.try_next_key()? {
                return Ok(key);
            }
        }
    }

    /// Decode one key, or `None` if the first read timed out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the source reports a real read error.
    pub fn try_next_key(&mut self) -> Result<Option<LogicalKey>> {
        let Some(mut byte) = self.read_byte()? else {
            return Ok(None);
        };

        let mut seq = [0u8; MAX_SEQUENCE_LEN];
        let mut len = 0;
        let mut state = DecodeState::Ground;

        loop {
            seq[len] = byte;
            len += 1;

            match state.step(byte) {
                Step::Key(key) => {
                    if key == LogicalKey::Escape && len > 1 {
                        tracing::debug!(sequence = ?&seq[..len], "unrecognized escape sequence");
                    }
                    return Ok(Some(key));
                }
                Step::Pending(next) => {
                    state = next;
                    match self.read_byte()? {
                        Some(b) => byte = b,
                        None => return Ok(Some(state.on_timeout())),
                    }
                }
            }
        }
    }

    /// Read a single byte. Timeouts and interrupted reads yield `None`.
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.source.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(Error::Read(e)),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: decode exactly one key from `data`.
    fn decode_one(data: &[u8]) -> LogicalKey {
        let mut decoder = KeyDecoder::new(data);
        decoder.try_next_key().unwrap().expect("a key")
    }

    /// Helper: decode every key in `data`.
    fn decode_all(data: &[u8]) -> Vec<LogicalKey> {
        let mut decoder = KeyDecoder::new(data);
        let mut keys = Vec::new();
        while let Some(key) = decoder.try_next_key().unwrap() {
            keys.push(key);
        }
        keys
    }

    /// A source that hands out scripted results, one per read.
    struct Scripted(Vec<io::Result<u8>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            match self.0.remove(0) {
                Ok(b) => {
                    buf[0] = b;
                    Ok(1)
                }
                Err(e) => Err(e),
            }
        }
    }

    // ── Plain bytes ─────────────────────────────────────────────────────

    #[test]
    fn printable_byte() {
        assert_eq!(decode_one(b"x"), LogicalKey::Character(b'x'));
    }

    #[test]
    fn ctrl_q_quits() {
        assert_eq!(QUIT_BYTE, 0x11);
        assert_eq!(decode_one(b"\x11"), LogicalKey::Quit);
    }

    #[test]
    fn other_control_bytes_are_characters() {
        assert_eq!(decode_one(b"\x01"), LogicalKey::Character(0x01));
        assert_eq!(decode_one(b"\r"), LogicalKey::Character(b'\r'));
        assert_eq!(decode_one(b"\x7f"), LogicalKey::Character(0x7f));
    }

    #[test]
    fn high_bytes_are_characters() {
        assert_eq!(decode_one(&[0xc3]), LogicalKey::Character(0xc3));
    }

    #[test]
    fn ctrl_key_clears_upper_bits() {
        assert_eq!(ctrl_key(b'a'), 0x01);
        assert_eq!(ctrl_key(b'Q'), 0x11);
        assert_eq!(ctrl_key(b'z'), 0x1a);
    }

    // ── CSI letters ─────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(decode_one(b"\x1b[A"), LogicalKey::MoveUp);
        assert_eq!(decode_one(b"\x1b[B"), LogicalKey::MoveDown);
        assert_eq!(decode_one(b"\x1b[C"), LogicalKey::MoveRight);
        assert_eq!(decode_one(b"\x1b[D"), LogicalKey::MoveLeft);
    }

    #[test]
    fn csi_home_end() {
        assert_eq!(decode_one(b"\x1b[H"), LogicalKey::Home);
        assert_eq!(decode_one(b"\x1b[F"), LogicalKey::End);
    }

    #[test]
    fn csi_unknown_letter_is_escape() {
        assert_eq!(decode_one(b"\x1b[Z"), LogicalKey::Escape);
    }

    // ── CSI tilde ───────────────────────────────────────────────────────

    #[test]
    fn tilde_sequences() {
        assert_eq!(decode_one(b"\x1b[1~"), LogicalKey::Home);
        assert_eq!(decode_one(b"\x1b[3~"), LogicalKey::Delete);
        assert_eq!(decode_one(b"\x1b[4~"), LogicalKey::End);
        assert_eq!(decode_one(b"\x1b[5~"), LogicalKey::PageUp);
        assert_eq!(decode_one(b"\x1b[6~"), LogicalKey::PageDown);
        assert_eq!(decode_one(b"\x1b[7~"), LogicalKey::Home);
        assert_eq!(decode_one(b"\x1b[8~"), LogicalKey::End);
    }

    #[test]
    fn tilde_unknown_digit_is_escape() {
        // Insert (ESC [ 2 ~) is not a key we handle.
        assert_eq!(decode_one(b"\x1b[2~"), LogicalKey::Escape);
    }

    #[test]
    fn digit_without_tilde_is_escape() {
        assert_eq!(decode_one(b"\x1b[3x"), LogicalKey::Escape);
    }

    #[test]
    fn multi_digit_parameter_degrades_to_escape() {
        // ESC [ 1 5 ~ (F5): the second digit isn't `~`.
        let keys = decode_all(b"\x1b[15~");
        assert_eq!(keys[0], LogicalKey::Escape);
    }

    // ── SS3 ─────────────────────────────────────────────────────────────

    #[test]
    fn ss3_home_end() {
        assert_eq!(decode_one(b"\x1bOH"), LogicalKey::Home);
        assert_eq!(decode_one(b"\x1bOF"), LogicalKey::End);
    }

    #[test]
    fn ss3_unknown_is_escape() {
        assert_eq!(decode_one(b"\x1bOP"), LogicalKey::Escape);
    }

    // ── Incomplete sequences ────────────────────────────────────────────

    #[test]
    fn lone_escape() {
        assert_eq!(decode_one(b"\x1b"), LogicalKey::Escape);
    }

    #[test]
    fn truncated_csi_is_escape() {
        assert_eq!(decode_one(b"\x1b["), LogicalKey::Escape);
        assert_eq!(decode_one(b"\x1b[5"), LogicalKey::Escape);
        assert_eq!(decode_one(b"\x1bO"), LogicalKey::Escape);
    }

    #[test]
    fn escape_reads_two_follow_ups_whatever_the_first() {
        assert_eq!(decode_all(b"\x1bxy"), vec![LogicalKey::Escape]);
        assert_eq!(decode_all(b"\x1bxyz"), vec![LogicalKey::Escape, LogicalKey::Character(b'z')]);
    }

    #[test]
    fn escape_then_other_byte_then_timeout() {
        let source = Scripted(vec![
            Ok(ESC),
            Ok(b'x'),
            Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Ok(b'z'),
        ]);
        let mut decoder = KeyDecoder::new(source);
        assert_eq!(decoder.try_next_key().unwrap(), Some(LogicalKey::Escape));
        assert_eq!(decoder.try_next_key().unwrap(), Some(LogicalKey::Character(b'z')));
    }

    #[test]
    fn double_escape_swallows_the_next_byte() {
        assert_eq!(decode_all(b"\x1b\x1b[A"), vec![LogicalKey::Character(b'A')]);
    }

    #[test]
    fn would_block_mid_sequence_is_escape() {
        let source = Scripted(vec![
            Ok(ESC),
            Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Ok(b'A'),
        ]);
        let mut decoder = KeyDecoder::new(source);
        assert_eq!(decoder.try_next_key().unwrap(), Some(LogicalKey::Escape));
        assert_eq!(decoder.try_next_key().unwrap(), Some(LogicalKey::Character(b'A')));
    }

    // ── Streams ─────────────────────────────────────────────────────────

    #[test]
    fn stream_of_mixed_keys() {
        assert_eq!(
            decode_all(b"a\x1b[Bb\x1b[6~\x1bOF\x11"),
            vec![
                LogicalKey::Character(b'a'),
                LogicalKey::MoveDown,
                LogicalKey::Character(b'b'),
                LogicalKey::PageDown,
                LogicalKey::End,
                LogicalKey::Quit,
            ]
        );
    }

    #[test]
    fn empty_source_times_out() {
        let mut decoder = KeyDecoder::new(&b""[..]);
        assert_eq!(decoder.try_next_key().unwrap(), None);
    }

    #[test]
    fn next_key_retries_timeouts() {
        let source = Scripted(vec![
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Ok(b'k'),
        ]);
        let mut decoder = KeyDecoder::new(source);
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Character(b'k'));
    }

    #[test]
    fn real_read_error_propagates() {
        let source = Scripted(vec![Err(io::Error::from_raw_os_error(libc::EIO))]);
        let mut decoder = KeyDecoder::new(source);
        assert!(matches!(decoder.try_next_key(), Err(Error::Read(_))));
    }

    // ── State machine ───────────────────────────────────────────────────

    #[test]
    fn every_state_times_out_to_escape() {
        for state in [
            DecodeState::Escape,
            DecodeState::EscapeOther,
            DecodeState::Csi,
            DecodeState::CsiParam(b'3'),
            DecodeState::Ss3,
        ] {
            assert_eq!(state.on_timeout(), LogicalKey::Escape);
        }
    }

    #[test]
    fn sequences_never_exceed_lookahead() {
        // Walk the longest path through the machine.
        let mut state = DecodeState::Ground;
        let mut steps = 0;
        for &b in b"\x1b[5~" {
            steps += 1;
            match state.step(b) {
                Step::Pending(next) => state = next,
                Step::Key(key) => {
                    assert_eq!(key, LogicalKey::PageUp);
                    break;
                }
            }
        }
        assert_eq!(steps, MAX_SEQUENCE_LEN);
    }
}
