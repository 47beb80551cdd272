//! Post browser for a remote JSON endpoint.
//!
//! Posts are fetched over HTTP, grouped by author for a sectioned list, and
//! opened into a detail screen carrying a grid of relabelable tiles.

pub mod app;
pub mod config;
pub mod keybindings;
pub mod posts;
pub mod theme;
pub mod tiles;
pub mod ui;
pub mod util;
