//! Remote posts: decoding, fetching, publishing and grouping.
//!
//! - [`model`] - The `Post` record and its JSON decoding
//! - [`fetcher`] - HTTP retrieval with size limits and UI-loop delivery
//! - [`store`] - The published collection and its change notifications
//! - [`group`] - Grouping by author for the sectioned list
//!
//! # Example
//!
//! ```ignore
//! use postboard::posts::{group_by_author, PostFetcher, PostStore};
//!
//! let store = PostStore::new();
//! let posts = fetcher.fetch().await?;
//! store.replace(posts);
//!
//! let snapshot = store.snapshot();
//! for (author, posts) in group_by_author(&snapshot) {
//!     println!("User {}: {} posts", author, posts.len());
//! }
//! ```

mod fetcher;
mod group;
mod model;
mod store;

pub use fetcher::{FailureKind, FetchError, PostFetcher, DEFAULT_ENDPOINT};
pub use group::{flatten_rows, group_by_author, GroupedPosts};
pub use model::{decode_posts, Post};
pub use store::{PostCollection, PostStore};
