//! Editor state — cursor position and screen geometry.
//!
//! The state is a plain value created once at startup from the probed
//! screen size and passed by reference to whatever needs it: the dispatcher
//! mutates it, the view reads it.
//!
//! # Invariant
//!
//! `cursor_x < screen.cols()` and `cursor_y < screen.rows()` at all times.
//! A [`Size`] can't be empty, so there is always a cell to stand on.
//! Movement past an edge is absorbed: the coordinate simply stays put.

use ladder_term::geometry::Size;

/// A single-cell cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cursor position plus the cached screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorState {
    cursor_x: u16,
    cursor_y: u16,
    screen: Size,
}

impl EditorState {
    /// Cursor at the top-left corner of a screen of the given size.
    #[must_use]
    pub const fn new(screen: Size) -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            screen,
        }
    }

    /// Cursor at `(x, y)`, clamped onto the screen.
    #[must_use]
    pub fn at(screen: Size, x: u16, y: u16) -> Self {
        Self {
            cursor_x: x.min(screen.cols().saturating_sub(1)),
            cursor_y: y.min(screen.rows().saturating_sub(1)),
            screen,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Cursor column, 0-indexed.
    #[inline]
    #[must_use]
    pub const fn cursor_x(&self) -> u16 {
        self.cursor_x
    }

    /// Cursor row, 0-indexed.
    #[inline]
    #[must_use]
    pub const fn cursor_y(&self) -> u16 {
        self.cursor_y
    }

    /// The screen size probed at startup.
    #[inline]
    #[must_use]
    pub const fn screen(&self) -> Size {
        self.screen
    }

    /// Screen height in rows, never zero.
    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> u16 {
        self.screen.rows()
    }

    /// Screen width in columns, never zero.
    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> u16 {
        self.screen.cols()
    }

    // -- Movement -----------------------------------------------------------

    /// Move one cell. Steps past an edge are ignored.
    pub const fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Up => {
                if self.cursor_y > 0 {
                    self.cursor_y -= 1;
                }
            }
            Direction::Down => {
                if self.cursor_y + 1 < self.screen.rows() {
                    self.cursor_y += 1;
                }
            }
            Direction::Left => {
                if self.cursor_x > 0 {
                    self.cursor_x -= 1;
                }
            }
            Direction::Right => {
                if self.cursor_x + 1 < self.screen.cols() {
                    self.cursor_x += 1;
                }
            }
        }
    }

    /// Move a whole screen up or down. Rows are bounded by the row count,
    /// never by the column count.
    pub const fn page(&mut self, direction: Direction) {
        let mut remaining = self.screen.rows();
        while remaining > 0 {
            self.step(direction);
            remaining -= 1;
        }
    }

    /// Jump to the first column.
    pub const fn line_start(&mut self) {
        self.cursor_x = 0;
    }

    /// Jump to the last column.
    pub const fn line_end(&mut self) {
        self.cursor_x = self.screen.cols().saturating_sub(1);
    }
}
