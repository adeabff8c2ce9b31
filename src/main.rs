// SPDX-License-Identifier: MIT
//
// ladder — a minimal full-screen terminal text editor.
//
// This is the binary that wires the two crates together:
//
//   ladder-term   → raw mode, geometry probe, key decoding, frame output
//   ladder-editor → cursor state, key dispatch, frame composition
//
// The editor loop alternates two steps until Ctrl+Q:
//
//   refresh  state → compose frame → one write to stdout
//   dispatch stdin → KeyDecoder → LogicalKey → cursor motion / quit
//
// Exit status: 0 on quit, 1 on any terminal failure (after the screen has
// been reset and raw mode undone), 2 on a bad command line.

mod config;
mod key_echo;
mod logging;

use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::process::ExitCode;

use ladder_editor::dispatch::{self, Action};
use ladder_editor::state::EditorState;
use ladder_editor::view;
use ladder_term::geometry::{self, Size};
use ladder_term::input::KeyDecoder;
use ladder_term::terminal::{self, RawMode};

use crate::config::{Config, Mode, USAGE};

/// Put stdin in raw mode, probe the screen and run the editor on it.
///
/// The raw-mode guard lives for the whole function, so every return path
/// (including `?`) restores the terminal.
fn run_editor() -> ladder_term::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let _raw = RawMode::enable(stdin.as_raw_fd())?;

    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let size = geometry::probe(stdout.as_raw_fd(), &mut input, &mut out)?;
    edit(size, input, &mut out)
}

/// Redraw and dispatch keys until Ctrl+Q, then clear the screen.
fn edit(size: Size, input: impl Read, out: &mut impl Write) -> ladder_term::Result<()> {
    tracing::info!(cols = size.cols(), rows = size.rows(), "editor started");

    let mut state = EditorState::new(size);
    let mut keys = KeyDecoder::new(input);

    loop {
        view::refresh(&state, out)?;
        if dispatch::process_next(&mut state, &mut keys)? == Action::Quit {
            break;
        }
    }

    terminal::reset_screen(out)?;
    tracing::info!("quit");
    Ok(())
}

/// Echo raw key bytes until `q`.
fn run_key_echo() -> ladder_term::Result<()> {
    let stdin = io::stdin();
    let _raw = RawMode::enable(stdin.as_raw_fd())?;
    key_echo::run(&mut stdin.lock(), &mut io::stdout().lock())
}

/// Turn the outcome of a run into the exit status.
///
/// A failure resets `screen` first, so the diagnostic written to `diag`
/// lands on a clean terminal.
fn finish(
    result: ladder_term::Result<()>,
    screen: &mut impl Write,
    diag: &mut impl Write,
) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = terminal::reset_screen(screen);
            tracing::error!(error = %e, "fatal terminal error");
            let _ = writeln!(diag, "ladder: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ladder: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match config.mode {
        Mode::Help => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Mode::Version => {
            println!("ladder {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Mode::Editor | Mode::KeyEcho => {}
    }

    if let Err(e) = logging::init(&config) {
        eprintln!("ladder: cannot open log file: {e}");
    }

    let result = match config.mode {
        Mode::KeyEcho => run_key_echo(),
        _ => run_editor(),
    };

    finish(result, &mut io::stdout(), &mut io::stderr())
}
