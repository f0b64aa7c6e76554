//! HTTP front for the snapshot store.
//!
//! Three routes: `/save` writes a snapshot, `/load` returns the last one and
//! `/ping` reports liveness. Saves are serialized through a single gate held
//! in [`AppState`]; loads are not gated.

pub mod error;
mod handlers;

pub use handlers::StatusBody;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{any, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::storage::SnapshotStore;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// The on-disk snapshot store.
    pub store: Arc<SnapshotStore>,
    /// Held for the full duration of a save so saves never interleave.
    pub save_gate: Arc<Mutex<()>>,
    /// Largest body `/save` accepts.
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(store: SnapshotStore, max_body_bytes: usize) -> Self {
        Self {
            store: Arc::new(store),
            save_gate: Arc::new(Mutex::new(())),
            max_body_bytes,
        }
    }
}

/// Build the router for the three snapshot routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/save",
            post(handlers::save).fallback(handlers::save_wrong_method),
        )
        .route(
            "/load",
            get(handlers::load)
                .head(handlers::load_wrong_method)
                .fallback(handlers::load_wrong_method),
        )
        .route("/ping", any(handlers::ping))
        .with_state(state)
}

/// Bootstrap the stores, bind, and serve until `shutdown` resolves.
///
/// Only a bind failure is fatal; bootstrap problems are logged and the
/// server starts anyway.
pub async fn serve<F>(config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = SnapshotStore::new(config.data_dir.clone());
    let outcome = store.bootstrap();
    info!(?outcome, data_dir = %config.data_dir.display(), "store bootstrap finished");

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server started at http://{}", addr);

    let app = build_router(AppState::new(store, config.max_body_bytes));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{parse_snapshot, render_readable, Content, Note};
    use crate::storage::BootstrapOutcome;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup_test_app() -> (Router, AppState, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        assert_eq!(store.bootstrap(), BootstrapOutcome::Created);
        let state = AppState::new(store, 1024 * 1024);
        (build_router(state.clone()), state, tmp)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, Option<String>, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body.into())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, bytes.to_vec())
    }

    fn compact(state: &AppState) -> Vec<u8> {
        fs::read(state.store.paths().compact()).unwrap()
    }

    fn readable(state: &AppState) -> Vec<u8> {
        fs::read(state.store.paths().readable()).unwrap()
    }

    fn sample_notes() -> Vec<Note> {
        let mut first = Note::new("n-1", "Shopping");
        first
            .content
            .push(Content::new("c-1", "Monday", "eggs and bread"));
        first
            .content
            .push(Content::new("c-2", "Tuesday", "coffee"));
        let second = Note::new("n-2", "Ideas");
        vec![first, second]
    }

    // ========================================================================
    // /ping
    // ========================================================================

    #[tokio::test]
    async fn test_ping_any_method() {
        let (app, _state, _tmp) = setup_test_app();

        for method in [Method::GET, Method::POST, Method::DELETE] {
            let (status, _, body) = send(&app, method, "/ping", Body::empty()).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, br#"{"status":"ok","message":"Server is running"}"#);
        }
    }

    // ========================================================================
    // /load
    // ========================================================================

    #[tokio::test]
    async fn test_load_after_bootstrap_is_empty_array() {
        let (app, _state, _tmp) = setup_test_app();

        let (status, content_type, body) = send(&app, Method::GET, "/load", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_load_without_store_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(AppState::new(SnapshotStore::new(tmp.path()), 1024));

        let (status, _, body) = send(&app, Method::GET, "/load", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"No saved data found\n");
    }

    #[tokio::test]
    async fn test_load_read_failure_is_server_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("data.txt")).unwrap();
        let app = build_router(AppState::new(SnapshotStore::new(tmp.path()), 1024));

        let (status, _, body) = send(&app, Method::GET, "/load", Body::empty()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8_lossy(&body).starts_with("Error reading saved data: "));
    }

    #[tokio::test]
    async fn test_load_wrong_method() {
        let (app, state, _tmp) = setup_test_app();

        let (status, _, body) = send(&app, Method::POST, "/load", "[{\"id\":\"x\"}]").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, b"Only GET method is allowed\n");

        let (status, _, _) = send(&app, Method::HEAD, "/load", Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(compact(&state), b"[]");
    }

    // ========================================================================
    // /save
    // ========================================================================

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (app, state, _tmp) = setup_test_app();
        let notes = sample_notes();
        let payload = serde_json::to_vec(&notes).unwrap();

        let (status, _, body) = send(&app, Method::POST, "/save", payload.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let reply: StatusBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply, StatusBody::saved());

        let (status, _, loaded) = send(&app, Method::GET, "/load", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loaded, payload);
        assert_eq!(parse_snapshot(&loaded).unwrap(), notes);

        assert_eq!(readable(&state), render_readable(&notes).unwrap());
    }

    #[tokio::test]
    async fn test_save_non_json_is_stored_verbatim() {
        let (app, state, _tmp) = setup_test_app();
        send(&app, Method::POST, "/save", serde_json::to_vec(&sample_notes()).unwrap()).await;
        let readable_before = readable(&state);

        let garbage = b"\x00\x01 this is { not json".to_vec();
        let (status, _, _) = send(&app, Method::POST, "/save", garbage.clone()).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(compact(&state), garbage);
        assert_eq!(readable(&state), readable_before);

        let (_, _, loaded) = send(&app, Method::GET, "/load", Body::empty()).await;
        assert_eq!(loaded, garbage);
    }

    #[tokio::test]
    async fn test_save_with_null_fields_updates_readable() {
        let (app, state, _tmp) = setup_test_app();
        let payload = br#"[{"id":"n1","title":"Draft","content":null,"createdAt":null,"updatedAt":"2024-06-01T12:00:00Z"},null]"#;

        let (status, _, _) = send(&app, Method::POST, "/save", payload.to_vec()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compact(&state), payload);

        let mirrored = parse_snapshot(&readable(&state)).unwrap();
        assert_eq!(mirrored.len(), 2);
        assert_eq!(mirrored[0].id, "n1");
        assert_eq!(mirrored[0].title, "Draft");
        assert!(mirrored[0].content.is_empty());
        assert_eq!(mirrored[1], Note::default());

        let text = String::from_utf8(readable(&state)).unwrap();
        assert!(text.contains("\"createdAt\": \"0001-01-01T00:00:00Z\""));
    }

    #[tokio::test]
    async fn test_save_wrong_method() {
        let (app, state, _tmp) = setup_test_app();

        let (status, _, body) = send(&app, Method::GET, "/save", Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, b"Only POST method is allowed\n");

        let (status, _, _) = send(&app, Method::PUT, "/save", "[]").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(compact(&state), b"[]");
    }

    #[tokio::test]
    async fn test_save_oversized_body_is_bad_request() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store.bootstrap();
        let state = AppState::new(store, 8);
        let app = build_router(state.clone());

        let (status, _, body) = send(&app, Method::POST, "/save", vec![b'x'; 64]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, b"Error reading request body\n");
        assert_eq!(compact(&state), b"[]");
    }

    #[tokio::test]
    async fn test_save_write_failure_is_server_error() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path().join("does-not-exist"));
        let state = AppState::new(store, 1024);
        let app = build_router(state.clone());

        let (status, _, body) = send(&app, Method::POST, "/save", "[]").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8_lossy(&body).starts_with("Error saving to data.txt: "));
        assert!(!state.store.paths().readable().exists());
    }

    #[tokio::test]
    async fn test_save_waits_for_gate() {
        let (app, state, _tmp) = setup_test_app();

        let guard = state.save_gate.lock().await;
        let pending = tokio::spawn({
            let app = app.clone();
            async move { send(&app, Method::POST, "/save", "[{\"id\":\"gated\"}]").await }
        });

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!pending.is_finished());
        assert_eq!(compact(&state), b"[]");

        drop(guard);
        let (status, _, _) = pending.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compact(&state), b"[{\"id\":\"gated\"}]");
    }

    fn temp_files(state: &AppState) -> usize {
        fs::read_dir(state.store.paths().data_dir())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(".tmp")
            })
            .count()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dropped_save_keeps_gate_until_write_finishes() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store.bootstrap();
        let state = AppState::new(store, 256 * 1024 * 1024);
        let app = build_router(state.clone());

        let payload = vec![b'x'; 64 * 1024 * 1024];
        let pending = tokio::spawn({
            let app = app.clone();
            let payload = payload.clone();
            async move { send(&app, Method::POST, "/save", payload).await }
        });

        // wait for the blocking write to start, or finish outright
        for _ in 0..5_000 {
            if temp_files(&state) > 0 || compact(&state).len() == payload.len() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }

        pending.abort();
        let _ = pending.await;

        // once the gate is free again the write must be complete
        let _gate = state.save_gate.lock().await;
        assert_eq!(temp_files(&state), 0);
        assert_eq!(compact(&state), payload);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_last_writer_wins() {
        let (app, state, _tmp) = setup_test_app();

        let left: Vec<u8> = serde_json::to_vec(&vec![Note::new("left", &"L".repeat(50_000))]).unwrap();
        let right: Vec<u8> = serde_json::to_vec(&vec![Note::new("right", &"R".repeat(50_000))]).unwrap();

        let (a, b) = tokio::join!(
            send(&app, Method::POST, "/save", left.clone()),
            send(&app, Method::POST, "/save", right.clone()),
        );
        assert_eq!(a.0, StatusCode::OK);
        assert_eq!(b.0, StatusCode::OK);

        let stored = compact(&state);
        assert!(stored == left || stored == right);

        let mirrored = parse_snapshot(&readable(&state)).unwrap();
        assert_eq!(mirrored, parse_snapshot(&stored).unwrap());
    }
}
