//! Integration tests for the fetch lifecycle: request, delivery, store update.
//!
//! Each test runs its own wiremock server. Fetch outcomes travel through the
//! same `AppEvent` channel the UI loop drains.

use postboard::app::{App, AppEvent};
use postboard::posts::{group_by_author, FailureKind, FetchError, PostFetcher, PostStore};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TWO_POSTS: &str = r#"[
    {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"},
    {"userId": 2, "id": 2, "title": "qui est esse", "body": "est rerum tempore"}
]"#;

fn fetcher_for(server: &MockServer) -> PostFetcher {
    let url = Url::parse(&format!("{}/posts", server.uri())).unwrap();
    PostFetcher::new(url, Some(Duration::from_secs(5))).unwrap()
}

async fn serve(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Run one fetch and return the event the UI loop would receive.
async fn fetch_once(app: &mut App) -> AppEvent {
    let (tx, mut rx) = mpsc::channel(4);
    app.fetch_posts(&tx);
    rx.recv().await.unwrap()
}

// ============================================================================
// Success
// ============================================================================

#[tokio::test]
async fn test_fetch_success_fills_store_in_response_order() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(200).set_body_string(TWO_POSTS)).await;

    let mut app = App::new(fetcher_for(&server));
    let mut posts_rx = app.store.subscribe();

    let AppEvent::PostsFetched(result) = fetch_once(&mut app).await else {
        panic!("expected PostsFetched");
    };
    app.apply_fetch_result(result);

    assert!(posts_rx.has_changed().unwrap());
    let ids: Vec<i64> = app.store.snapshot().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(!app.is_fetching());
}

#[tokio::test]
async fn test_fetched_posts_group_by_author() {
    let server = MockServer::start().await;
    let body = r#"[
        {"userId": 3, "id": 1, "title": "a", "body": ""},
        {"userId": 1, "id": 2, "title": "b", "body": ""},
        {"userId": 3, "id": 3, "title": "c", "body": ""}
    ]"#;
    serve(&server, ResponseTemplate::new(200).set_body_string(body)).await;

    let store = PostStore::new();
    store.replace(fetcher_for(&server).fetch().await.unwrap());

    let snapshot = store.snapshot();
    let grouped = group_by_author(&snapshot);
    let layout: Vec<(i64, Vec<i64>)> = grouped
        .iter()
        .map(|(author, posts)| (*author, posts.iter().map(|p| p.id).collect()))
        .collect();
    assert_eq!(layout, vec![(1, vec![2]), (3, vec![1, 3])]);
}

// ============================================================================
// Failures leave the store untouched
// ============================================================================

#[tokio::test]
async fn test_decode_failure_keeps_previous_posts() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(200).set_body_string(TWO_POSTS)).await;

    let mut app = App::new(fetcher_for(&server));
    if let AppEvent::PostsFetched(result) = fetch_once(&mut app).await {
        app.apply_fetch_result(result);
    }
    assert_eq!(app.row_count(), 2);

    server.reset().await;
    serve(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let AppEvent::PostsFetched(result) = fetch_once(&mut app).await else {
        panic!("expected PostsFetched");
    };
    let err = result.as_ref().unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);

    app.apply_fetch_result(result);
    assert_eq!(app.row_count(), 2);
    assert_eq!(app.store.snapshot()[0].title, "sunt aut facere");
}

#[tokio::test]
async fn test_transport_failure_keeps_empty_store() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(503)).await;

    let mut app = App::new(fetcher_for(&server));
    let AppEvent::PostsFetched(result) = fetch_once(&mut app).await else {
        panic!("expected PostsFetched");
    };
    assert_eq!(result.as_ref().unwrap_err().kind(), FailureKind::Transport);

    app.apply_fetch_result(result);
    assert_eq!(app.row_count(), 0);
    let (msg, _) = app.status_message.as_ref().unwrap();
    assert!(msg.contains("503"));
}

#[tokio::test]
async fn test_network_failure_keeps_loaded_posts() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(200).set_body_string(TWO_POSTS)).await;

    let mut app = App::new(fetcher_for(&server));
    let AppEvent::PostsFetched(result) = fetch_once(&mut app).await else {
        panic!("expected PostsFetched");
    };
    app.apply_fetch_result(result);
    assert_eq!(app.row_count(), 2);

    // Point the app at a port nobody listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let url = Url::parse(&format!("http://{}/posts", addr)).unwrap();
    app.fetcher = PostFetcher::new(url, Some(Duration::from_secs(5))).unwrap();

    let AppEvent::PostsFetched(result) = fetch_once(&mut app).await else {
        panic!("expected PostsFetched");
    };
    let err = result.as_ref().unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert_eq!(err.kind(), FailureKind::Transport);

    app.apply_fetch_result(result);
    let titles: Vec<String> = app.store.snapshot().iter().map(|p| p.title.clone()).collect();
    assert_eq!(titles, vec!["sunt aut facere", "qui est esse"]);
    let (msg, _) = app.status_message.as_ref().unwrap();
    assert!(msg.starts_with("Fetch failed"));
}

#[tokio::test]
async fn test_each_refresh_issues_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let mut app = App::new(fetcher_for(&server));
    for _ in 0..2 {
        if let AppEvent::PostsFetched(result) = fetch_once(&mut app).await {
            app.apply_fetch_result(result);
        }
    }
    assert_eq!(app.row_count(), 0);
}

#[tokio::test]
async fn test_result_dropped_when_loop_gone() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200)
            .set_body_string(TWO_POSTS)
            .set_delay(Duration::from_millis(100)),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let (tx, rx) = mpsc::channel::<AppEvent>(4);
    let handle = fetcher.spawn_fetch(&tx);
    drop(tx);
    drop(rx);

    // Completes quietly with nobody to deliver to
    handle.await.unwrap();
}
