// SPDX-License-Identifier: MIT
//
// Key echo — a diagnostic mode that shows what the terminal sends.
//
// With the terminal in raw mode, every byte read is printed as its decimal
// value, plus the character itself when it is printable ASCII. Useful for
// finding out which escape sequence a key produces. `q` ends the session.
//
//   $ ladder --keys
//   27
//   91 ('[')
//   65 ('A')
//   113 ('q')

use std::io::{self, Read, Write};

use ladder_term::Error;

/// The byte that ends the session (after being echoed).
pub const EXIT_BYTE: u8 = b'q';

/// One output line for `byte`, including the trailing `\r\n`.
///
/// Raw mode turns off output post-processing, so the carriage return has
/// to be explicit.
#[must_use]
pub fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        format!("{byte} ('{}')\r\n", char::from(byte))
    } else {
        format!("{byte}\r\n")
    }
}

/// Echo bytes from `input` to `output` until [`EXIT_BYTE`] arrives.
///
/// Timed-out reads (zero bytes, `EAGAIN`, `EINTR`) print nothing.
///
/// # Errors
///
/// Returns [`Error::Read`] or [`Error::Write`] on an I/O failure.
pub fn run(input: &mut impl Read, output: &mut impl Write) -> ladder_term::Result<()> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => continue,
            Ok(_) => {}
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                continue;
            }
            Err(e) => return Err(Error::Read(e)),
        }

        output
            .write_all(describe_byte(byte[0]).as_bytes())
            .and_then(|()| output.flush())
            .map_err(Error::Write)?;

        if byte[0] == EXIT_BYTE {
            return Ok(());
        }
    }
}
