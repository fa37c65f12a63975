//! Terminal host for fbrowse.
//!
//! - [keymap]: configurable key bindings.
//! - [prompt]: the input line, filtered rows and selection.
//! - [render]: drawing a frame.
//! - [terminal]: terminal setup and the event loop.

pub mod keymap;
pub mod prompt;
pub mod render;
pub mod terminal;

pub use keymap::Keymap;
pub use terminal::run_terminal;
