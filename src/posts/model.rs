use serde::Deserialize;

/// A single post as served by the remote endpoint.
///
/// Decoded from objects of the form
/// `{"userId": 1, "id": 1, "title": "...", "body": "..."}`.
/// Keys beyond these four are ignored; a missing key or a value of the wrong
/// type fails the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Grouping key: the id of the user who wrote the post.
    #[serde(rename = "userId")]
    pub author_id: i64,
    /// Unique within a single fetch.
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Decode a response body into posts, preserving server order.
///
/// The body must be a JSON array; any other top-level shape is an error.
pub fn decode_posts(bytes: &[u8]) -> Result<Vec<Post>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
