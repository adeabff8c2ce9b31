// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and guaranteed restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and a raw fd write in the panic hook. These are the standard
// POSIX interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `RawMode` is a guard: creating it snapshots the terminal attributes and
// switches the line discipline to raw mode, dropping it puts the snapshot
// back. Every way out of the editor goes through that drop:
//
//   - Ctrl+Q returns from the main loop and the guard falls out of scope.
//   - A fatal error propagates with `?` up to `main`, unwinding the guard
//     before the message is printed.
//   - A panic runs the hook installed here, which resets the screen and
//     restores the attributes from a global backup before the default
//     handler prints the panic message. With no session live, the hook
//     only forwards to the default handler.
//
// Raw mode here means: no echo, no canonical line buffering, no signal keys,
// no XON/XOFF, no IEXTEN, no CR/NL translation in either direction, no
// parity check or 8th-bit strip, no SIGINT on break, 8-bit characters, and
// reads that return after at most 100 ms even when nothing was typed.

use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::{Error, Result};

/// `VTIME` in deciseconds: reads give up after 100 ms.
pub const READ_TIMEOUT_DECISECONDS: u8 = 1;

// ─── TerminalConfig ─────────────────────────────────────────────────────────

/// A snapshot of a terminal's line-discipline attributes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TerminalConfig(libc::termios);

impl TerminalConfig {
    /// Read the current attributes of the terminal behind `fd`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GetAttributes`] if `fd` is not a terminal or the
    /// query fails.
    pub fn capture(fd: RawFd) -> Result<Self> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
            return Err(Error::GetAttributes(io::Error::last_os_error()));
        }
        Ok(Self(termios))
    }

    /// Apply these attributes to `fd`, discarding pending input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetAttributes`] if the terminal rejects them.
    pub fn apply(&self, fd: RawFd) -> Result<()> {
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const self.0) } != 0 {
            return Err(Error::SetAttributes(io::Error::last_os_error()));
        }
        Ok(())
    }

    /// Whether canonical (line-buffered) input is on.
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        self.0.c_lflag & libc::ICANON != 0
    }

    /// Whether typed characters are echoed.
    #[must_use]
    pub const fn echoes(&self) -> bool {
        self.0.c_lflag & libc::ECHO != 0
    }

    /// `(VMIN, VTIME)` read policy.
    #[must_use]
    pub const fn read_policy(&self) -> (u8, u8) {
        (self.0.c_cc[libc::VMIN], self.0.c_cc[libc::VTIME])
    }
}

impl std::fmt::Debug for TerminalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalConfig")
            .field("iflag", &format_args!("{:#x}", self.0.c_iflag))
            .field("oflag", &format_args!("{:#x}", self.0.c_oflag))
            .field("cflag", &format_args!("{:#x}", self.0.c_cflag))
            .field("lflag", &format_args!("{:#x}", self.0.c_lflag))
            .finish_non_exhaustive()
    }
}

/// Derive the raw-mode attribute set from `original`.
#[must_use]
pub fn raw_attributes(original: &TerminalConfig) -> TerminalConfig {
    let mut raw = original.0;

    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    // VMIN=0, VTIME=1: read() returns whatever is there, waiting at most 100 ms.
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;

    TerminalConfig(raw)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original attributes for the panic hook.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't reach
/// it. Only one raw-mode session exists at a time, so one slot is enough.
static TERMIOS_BACKUP: Mutex<Option<(RawFd, TerminalConfig)>> = Mutex::new(None);

/// Undo a raw-mode session that is still live: run `reset`, then put
/// the backed-up attributes back. Best-effort, ignores errors.
///
/// Returns `false` without touching anything when no session is active.
fn restore_from_backup(reset: impl FnOnce()) -> bool {
    let backup = TERMIOS_BACKUP.lock().ok().and_then(|mut guard| guard.take());
    let Some((fd, original)) = backup else {
        return false;
    };
    reset();
    let _ = original.apply(fd);
    true
}

/// Screen reset used on every fatal path: erase everything, cursor home.
const SCREEN_RESET: &[u8] = b"\x1b[2J\x1b[H";

/// Panic hook guard — the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that resets the screen and restores the terminal
/// before the original hook prints the panic message. Panics outside a
/// raw-mode session leave the screen alone.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_from_backup(emergency_reset);
            original(info);
        }));
    });
}

/// Write [`SCREEN_RESET`] straight to fd 1, bypassing the stdout lock in
/// case the panic happened while it was held.
fn emergency_reset() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            SCREEN_RESET.as_ptr().cast::<libc::c_void>(),
            SCREEN_RESET.len(),
        );
    }
}

/// Erase the screen and put the cursor in the top-left corner.
///
/// # Errors
///
/// Returns [`Error::Write`] if `w` fails.
pub fn reset_screen(w: &mut impl Write) -> Result<()> {
    ansi::clear_screen(w)
        .and_then(|()| ansi::cursor_home(w))
        .and_then(|()| w.flush())
        .map_err(Error::Write)
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode session on a terminal, restored on drop.
///
/// # Example
///
/// ```no_run
/// use ladder_term::terminal::RawMode;
///
/// let raw = RawMode::enable(libc::STDIN_FILENO)?;
/// // ... read keys, draw frames ...
/// drop(raw); // original attributes are back
/// # Ok::<(), ladder_term::Error>(())
/// ```
#[derive(Debug)]
pub struct RawMode {
    fd: RawFd,
    original: TerminalConfig,
    active: bool,
}

impl RawMode {
    /// Snapshot the attributes of `fd` and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GetAttributes`] or [`Error::SetAttributes`] if the
    /// terminal can't be read or configured. On error the terminal is left
    /// as it was.
    pub fn enable(fd: RawFd) -> Result<Self> {
        let original = TerminalConfig::capture(fd)?;

        install_panic_hook();
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some((fd, original));
        }

        if let Err(err) = raw_attributes(&original).apply(fd) {
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            return Err(err);
        }

        tracing::debug!(fd, "raw mode enabled");
        Ok(Self {
            fd,
            original,
            active: true,
        })
    }

    /// The attributes captured before raw mode was applied.
    #[must_use]
    pub const fn original(&self) -> &TerminalConfig {
        &self.original
    }

    /// Whether raw mode is still in effect.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the captured attributes.
    ///
    /// Only the first call touches the terminal; later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetAttributes`] if the terminal rejects the restore.
    pub fn disable(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }

        self.original.apply(self.fd)?;
        tracing::debug!(fd = self.fd, "terminal attributes restored");
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
