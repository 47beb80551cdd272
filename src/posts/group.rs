//! Grouping of posts by author for the sectioned list view.

use super::model::Post;
use std::collections::BTreeMap;

/// Posts keyed by author id.
///
/// `BTreeMap` iterates keys in ascending order, which is the display order
/// for sections. Values borrow from the collection they were built from.
pub type GroupedPosts<'a> = BTreeMap<i64, Vec<&'a Post>>;

/// Group posts by `author_id`.
///
/// Every post lands under exactly one key, and posts sharing a key keep
/// their relative input order. An empty slice yields an empty map.
pub fn group_by_author(posts: &[Post]) -> GroupedPosts<'_> {
    let mut by_author: GroupedPosts<'_> = BTreeMap::new();
    for post in posts {
        by_author.entry(post.author_id).or_default().push(post);
    }
    by_author
}

/// Flatten groups into display order: ascending author, then input order.
///
/// The list view navigates over this sequence; section headers are not part
/// of it.
pub fn flatten_rows<'a>(grouped: &GroupedPosts<'a>) -> Vec<&'a Post> {
    grouped.values().flat_map(|posts| posts.iter().copied()).collect()
}
