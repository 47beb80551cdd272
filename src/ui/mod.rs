//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `posts` - Sectioned post list
//! - `detail` - Post detail, tile grid and the label dialog
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod detail;
mod events;
mod help;
mod input;
mod loop_runner;
mod posts;
mod render;
mod status;

pub use loop_runner::{run, Action};
