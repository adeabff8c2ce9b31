//! Key dispatch — logical keys to cursor motion.
//!
//! One key per call. Navigation keys move the cursor inside the screen,
//! Ctrl+Q asks the main loop to stop, everything else is ignored for now.

use std::io::Read;

use ladder_term::input::{KeyDecoder, LogicalKey};

use crate::state::{Direction, EditorState};

/// What the main loop should do after a key has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going: redraw and read the next key.
    Continue,
    /// Reset the screen and exit with status 0.
    Quit,
}

/// Apply one key to `state`.
pub fn process_key(state: &mut EditorState, key: LogicalKey) -> Action {
    match key {
        LogicalKey::Quit => return Action::Quit,
        LogicalKey::MoveUp => state.step(Direction::Up),
        LogicalKey::MoveDown => state.step(Direction::Down),
        LogicalKey::MoveLeft => state.step(Direction::Left),
        LogicalKey::MoveRight => state.step(Direction::Right),
        LogicalKey::PageUp => state.page(Direction::Up),
        LogicalKey::PageDown => state.page(Direction::Down),
        LogicalKey::Home => state.line_start(),
        LogicalKey::End => state.line_end(),
        LogicalKey::Delete | LogicalKey::Escape | LogicalKey::Character(_) => {}
    }
    Action::Continue
}

/// Wait for the next key from `keys` and apply it.
///
/// # Errors
///
/// Propagates read errors from the decoder.
pub fn process_next<R: Read>(
    state: &mut EditorState,
    keys: &mut KeyDecoder<R>,
) -> ladder_term::Result<Action> {
    let key = keys.next_key()?;
    let action = process_key(state, key);
    tracing::trace!(
        ?key,
        ?action,
        x = state.cursor_x(),
        y = state.cursor_y(),
        "key dispatched"
    );
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_term::geometry::Size;

    const SCREEN: Size = Size::new(80, 24).unwrap();

    fn cursor(state: &EditorState) -> (u16, u16) {
        (state.cursor_x(), state.cursor_y())
    }

    // -- process_key --------------------------------------------------------

    #[test]
    fn quit_stops_the_loop() {
        let mut s = EditorState::new(SCREEN);
        assert_eq!(process_key(&mut s, LogicalKey::Quit), Action::Quit);
        assert_eq!(cursor(&s), (0, 0));
    }

    #[test]
    fn arrows_move_one_cell() {
        let mut s = EditorState::at(SCREEN, 5, 5);
        process_key(&mut s, LogicalKey::MoveRight);
        process_key(&mut s, LogicalKey::MoveDown);
        assert_eq!(cursor(&s), (6, 6));
        process_key(&mut s, LogicalKey::MoveLeft);
        process_key(&mut s, LogicalKey::MoveUp);
        assert_eq!(cursor(&s), (5, 5));
    }

    #[test]
    fn move_left_at_origin_is_absorbed() {
        let mut s = EditorState::new(SCREEN);
        assert_eq!(process_key(&mut s, LogicalKey::MoveLeft), Action::Continue);
        assert_eq!(cursor(&s), (0, 0));
    }

    #[test]
    fn home_and_end() {
        let mut s = EditorState::at(SCREEN, 30, 7);
        process_key(&mut s, LogicalKey::End);
        assert_eq!(cursor(&s), (79, 7));
        process_key(&mut s, LogicalKey::Home);
        assert_eq!(cursor(&s), (0, 7));
    }

    #[test]
    fn page_keys_cross_the_screen() {
        let mut s = EditorState::at(SCREEN, 3, 10);
        process_key(&mut s, LogicalKey::PageDown);
        assert_eq!(cursor(&s), (3, 23));
        process_key(&mut s, LogicalKey::PageUp);
        assert_eq!(cursor(&s), (3, 0));
    }

    #[test]
    fn inert_keys_change_nothing() {
        for key in [LogicalKey::Delete, LogicalKey::Escape, LogicalKey::Character(b'x')] {
            let mut s = EditorState::at(SCREEN, 12, 4);
            assert_eq!(process_key(&mut s, key), Action::Continue);
            assert_eq!(cursor(&s), (12, 4));
        }
    }

    // -- process_next -------------------------------------------------------

    #[test]
    fn process_next_decodes_then_dispatches() {
        let mut s = EditorState::new(SCREEN);
        let mut keys = KeyDecoder::new(&b"\x1b[C\x1b[B\x11"[..]);

        assert_eq!(process_next(&mut s, &mut keys).unwrap(), Action::Continue);
        assert_eq!(process_next(&mut s, &mut keys).unwrap(), Action::Continue);
        assert_eq!(cursor(&s), (1, 1));
        assert_eq!(process_next(&mut s, &mut keys).unwrap(), Action::Quit);
    }

    #[test]
    fn process_next_left_at_origin() {
        let mut s = EditorState::new(SCREEN);
        let mut keys = KeyDecoder::new(&b"\x1b[D"[..]);
        process_next(&mut s, &mut keys).unwrap();
        assert_eq!(cursor(&s), (0, 0));
    }
}
