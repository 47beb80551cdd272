//! Small helpers shared by the fetch layer and the renderer.
//!
//! - **Text**: control-sequence stripping for remote text and width-aware
//!   truncation for terminal cells
//! - **Tasks**: panic capture for spawned background work

mod task;
mod text;

pub use task::catch_task_panic;
pub use text::{sanitize_text, truncate_to_width};
