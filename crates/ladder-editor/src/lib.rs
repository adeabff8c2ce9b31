//! # ladder-editor — Editor core for ladder
//!
//! - **[`state`]** — `EditorState`: cursor position and cached screen size
//! - **[`dispatch`]** — logical keys to cursor motion, quit detection
//! - **[`view`]** — full-screen frame composition and single-write refresh
//!
//! Text buffers are not here yet: every row renders as an empty `~` line.

pub mod dispatch;
pub mod state;
pub mod view;
