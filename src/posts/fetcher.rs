use super::model::{decode_posts, Post};
use crate::app::AppEvent;
use crate::util::catch_task_panic;
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Endpoint used when neither config nor CLI provide one.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 3;
const USER_AGENT: &str = concat!("postboard/", env!("CARGO_PKG_VERSION"));

/// Errors that end a fetch.
///
/// Every variant is terminal for the invocation that produced it: the post
/// collection is left as it was and nothing is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was not a JSON array of posts
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two failure classes a fetch can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable body.
    Transport,
    /// A body arrived but did not have the expected shape.
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Decode(_) => FailureKind::Decode,
            Self::Network(_)
            | Self::HttpStatus(_)
            | Self::ResponseTooLarge
            | Self::IncompleteResponse { .. } => FailureKind::Transport,
        }
    }
}

/// Create a redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev == url) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Client for the posts endpoint.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Clone)]
pub struct PostFetcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl PostFetcher {
    /// Build a fetcher with its own HTTP client.
    ///
    /// `timeout` bounds each request end to end; `None` leaves the request
    /// unbounded apart from the OS-level connect behavior.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(30));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue one GET and decode the body into posts, in server order.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - Connection, TLS or timeout errors
    /// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
    /// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
    /// - [`FetchError::Decode`] - Body is not a JSON array of posts
    pub async fn fetch(&self) -> Result<Vec<Post>, FetchError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let posts = decode_posts(&bytes)?;

        tracing::info!(
            endpoint = %self.endpoint,
            count = posts.len(),
            bytes = bytes.len(),
            "Fetched posts"
        );
        Ok(posts)
    }

    /// Start a fetch in the background and return immediately.
    ///
    /// The outcome is delivered as [`AppEvent::PostsFetched`] on `event_tx`,
    /// so the UI loop applies it alongside every other state change. The task
    /// only keeps a weak handle to the channel: if the loop has shut down by
    /// the time the request finishes, the result is dropped.
    ///
    /// Overlapping fetches are not cancelled or versioned; their results are
    /// applied in completion order.
    pub fn spawn_fetch(&self, event_tx: &mpsc::Sender<AppEvent>) -> JoinHandle<()> {
        let fetcher = self.clone();
        let weak_tx = event_tx.downgrade();

        tracing::debug!(endpoint = %self.endpoint, "Spawning post fetch");

        tokio::spawn(async move {
            let event = match catch_task_panic(fetcher.fetch()).await {
                Ok(result) => AppEvent::PostsFetched(result),
                Err(panic_msg) => {
                    tracing::error!(error = %panic_msg, "Post fetch task panicked");
                    AppEvent::TaskPanicked {
                        task: "fetch_posts",
                        error: panic_msg,
                    }
                }
            };

            let Some(tx) = weak_tx.upgrade() else {
                tracing::debug!("Event loop gone, discarding fetch result");
                return;
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Failed to deliver fetch result (receiver dropped)");
            }
        })
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: reject on Content-Length before reading anything
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::with_capacity(expected_length.unwrap_or(0) as usize);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TWO_POSTS: &str = r#"[
        {"userId": 1, "id": 1, "title": "first", "body": "one"},
        {"userId": 1, "id": 2, "title": "second", "body": "two"}
    ]"#;

    fn fetcher_for(server: &MockServer) -> PostFetcher {
        let url = Url::parse(&format!("{}/posts", server.uri())).unwrap();
        PostFetcher::new(url, Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(TWO_POSTS)
                    .insert_header("Content-Type", "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let posts = fetcher_for(&mock_server).fetch().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "first");
        assert_eq!(posts[1].title, "second");
    }

    #[tokio::test]
    async fn test_fetch_404_is_transport_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server).fetch().await.unwrap_err();
        match err {
            FetchError::HttpStatus(404) => {}
            ref e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_500_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn test_fetch_not_json_is_decode_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.kind(), FailureKind::Decode);
    }

    #[tokio::test]
    async fn test_fetch_wrong_shape_is_decode_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"posts": []}"#))
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server).fetch().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_failure() {
        // Bind an ephemeral port, then release it so nothing is listening
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let fetcher = PostFetcher::new(
            Url::parse(&format!("http://{}/posts", addr)).unwrap(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_spawn_fetch_delivers_event() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_POSTS))
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = mpsc::channel::<AppEvent>(4);
        fetcher_for(&mock_server).spawn_fetch(&tx).await.unwrap();

        match rx.recv().await {
            Some(AppEvent::PostsFetched(Ok(posts))) => assert_eq!(posts.len(), 2),
            _ => panic!("Expected PostsFetched(Ok(_))"),
        }
    }

    #[tokio::test]
    async fn test_spawn_fetch_is_noop_when_loop_gone() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_POSTS))
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = mpsc::channel::<AppEvent>(4);
        let handle = fetcher_for(&mock_server).spawn_fetch(&tx);
        // Dropping the only strong sender before the task runs
        drop(tx);
        handle.await.unwrap();

        assert!(rx.recv().await.is_none());
    }
}
