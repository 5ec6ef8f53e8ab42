//! End-to-end page loads against a fake counting server

mod support;

use pretty_assertions::assert_eq;
use repo_lines::overlay::{
    RecordingSurface, CONNECTION_FAILED_TEXT, LOADING_TEXT, UNCONFIGURED_TEXT,
};
use repo_lines::parser::FixedMetadata;
use repo_lines::storage::SERVER_URL;
use repo_lines::{
    run_page, DetectionRecord, LineCountOutcome, LocalStorage, Page, PageOptions, PageOutcome,
    Timings,
};
use std::time::Duration;
use support::FakeServer;

const REPO_PAGE: &str = include_str!("fixtures/repo_page.html");
const REPO_URL: &str = "https://github.com/BurntSushi/ripgrep/tree/master/crates";

fn options() -> PageOptions {
    PageOptions {
        timings: Timings::immediate(),
        ..PageOptions::default()
    }
}

fn configured(server_url: &str) -> LocalStorage {
    let storage = LocalStorage::memory();
    storage.set(SERVER_URL, &server_url.to_string()).unwrap();
    storage
}

#[tokio::test]
async fn counted_lines_are_shown_with_grouping() {
    let mut server = FakeServer::start("200 OK", r#"{"success": true, "lines": 12345}"#).await;
    let storage = configured(&server.url("/analyze"));
    let mut surface = RecordingSurface::default();

    let outcome = run_page(Page::new(REPO_URL, REPO_PAGE, 3), storage, options(), &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.frames.first().map(|f| f.text.as_str()), Some(LOADING_TEXT));
    assert_eq!(surface.final_text(), Some("代码总行数: 12,345 行"));
    assert!(surface.is_removed());

    match outcome {
        PageOutcome::Displayed { repo, outcome } => {
            assert_eq!(repo.full_name(), "BurntSushi/ripgrep");
            assert_eq!(outcome.lines(), Some(12345));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let request = server.next_request().await.expect("server should be called");
    assert_eq!(request.request_line(), "POST /analyze HTTP/1.1");
    assert_eq!(request.header("content-type").as_deref(), Some("application/json"));

    let body = request.json();
    assert_eq!(body["repoUrl"], "https://github.com/BurntSushi/ripgrep");
    assert_eq!(body["cloneUrl"], "https://github.com/BurntSushi/ripgrep.git");
    assert_eq!(body["owner"], "BurntSushi");
    assert_eq!(body["repo"], "ripgrep");
    assert_eq!(body["stars"], "47,012");
    assert_eq!(body["language"], "Rust 93.4%");
}

#[tokio::test]
async fn missing_server_url_prompts_without_request() {
    let mut server = FakeServer::start("200 OK", r#"{"lines": 1}"#).await;
    let mut surface = RecordingSurface::default();

    let outcome = run_page(
        Page::new(REPO_URL, REPO_PAGE, 1),
        LocalStorage::memory(),
        options(),
        &mut surface,
    )
    .await
    .unwrap();

    assert_eq!(surface.final_text(), Some(UNCONFIGURED_TEXT));
    assert!(matches!(
        outcome,
        PageOutcome::Displayed { outcome: LineCountOutcome::Unconfigured, .. }
    ));
    assert!(server
        .next_request_within(Duration::from_millis(200))
        .await
        .is_none());
}

#[tokio::test]
async fn server_error_shows_connection_failure() {
    let server = FakeServer::start("500 Internal Server Error", r#"{"success": false, "error": "boom"}"#).await;
    let storage = configured(&server.url("/analyze"));
    let mut surface = RecordingSurface::default();

    let outcome = run_page(Page::new(REPO_URL, REPO_PAGE, 1), storage, options(), &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.final_text(), Some(CONNECTION_FAILED_TEXT));
    assert!(matches!(
        outcome,
        PageOutcome::Displayed { outcome: LineCountOutcome::Unavailable, .. }
    ));
}

#[tokio::test]
async fn malformed_body_shows_connection_failure() {
    let server = FakeServer::start("200 OK", r#"{"status": "queued"}"#).await;
    let storage = configured(&server.url("/analyze"));
    let mut surface = RecordingSurface::default();

    run_page(Page::new(REPO_URL, REPO_PAGE, 1), storage, options(), &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.final_text(), Some(CONNECTION_FAILED_TEXT));
}

#[tokio::test]
async fn unreachable_server_shows_connection_failure() {
    // Bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let storage = configured(&format!("http://127.0.0.1:{port}/analyze"));
    let mut surface = RecordingSurface::default();

    run_page(Page::new(REPO_URL, REPO_PAGE, 1), storage, options(), &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.final_text(), Some(CONNECTION_FAILED_TEXT));
}

#[tokio::test]
async fn detection_record_is_stored_by_background() {
    let storage = LocalStorage::memory();
    let mut surface = RecordingSurface::default();

    run_page(Page::new(REPO_URL, REPO_PAGE, 42), storage.clone(), options(), &mut surface)
        .await
        .unwrap();

    let record = DetectionRecord::load(&storage).unwrap().expect("record should be stored");
    assert_eq!(record.tab_id, 42);
    let repo = record.current_repo.repository().unwrap();
    assert_eq!(repo.url, "https://github.com/BurntSushi/ripgrep");
    assert_eq!(repo.stars.as_deref(), Some("47,012"));
}

#[tokio::test]
async fn non_repo_page_does_nothing() {
    let storage = configured("counter.example.com");
    let mut surface = RecordingSurface::default();

    let outcome = run_page(Page::new("https://github.com/", "", 5), storage.clone(), options(), &mut surface)
        .await
        .unwrap();

    assert_eq!(outcome, PageOutcome::NotARepo);
    assert!(surface.frames.is_empty());
    assert!(DetectionRecord::load(&storage).unwrap().is_none());
}

#[tokio::test]
async fn fixed_metadata_overrides_page() {
    let mut server = FakeServer::start("200 OK", r#"{"lines": 0}"#).await;
    let storage = configured(&server.url("/analyze"));
    let mut surface = RecordingSurface::default();
    let options = PageOptions {
        metadata: Some(FixedMetadata {
            stars: Some("1".to_string()),
            language: Some("Zig".to_string()),
        }),
        ..options()
    };

    run_page(Page::new(REPO_URL, REPO_PAGE, 1), storage, options, &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.final_text(), Some("代码总行数: 0 行"));
    let body = server.next_request().await.unwrap().json();
    assert_eq!(body["stars"], "1");
    assert_eq!(body["language"], "Zig");
}
