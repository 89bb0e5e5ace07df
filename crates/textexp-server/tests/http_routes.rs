//! Router behaviour end to end (no socket; `tower::ServiceExt::oneshot`).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use textexp_core::About;
use textexp_server::{app_state::AppState, config::ExporterConfig, router::build_router};

fn about() -> About {
    About::new("Text Exporter", "0.3.0")
}

fn cfg_for(dir: &Path, sort: bool) -> ExporterConfig {
    let mut cfg = ExporterConfig::default();
    cfg.export.path = dir.display().to_string();
    cfg.export.sort_by_name = sort;
    cfg
}

fn app_for(dir: &Path, sort: bool) -> Router {
    build_router(AppState::new(cfg_for(dir, sort), about()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn scrape_returns_concatenated_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "up 1\n").unwrap();
    fs::write(dir.path().join("b.txt"), "up 1\n").unwrap();
    fs::create_dir(dir.path().join("ignored")).unwrap();

    let resp = app_for(dir.path(), false).oneshot(get("/metrics")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_bytes(resp).await, b"up 1\nup 1\n");
}

#[tokio::test]
async fn scrape_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.prom"), "b 2\n").unwrap();
    fs::write(dir.path().join("a.prom"), "a 1\n").unwrap();

    let resp = app_for(dir.path(), true).oneshot(get("/metrics")).await.unwrap();
    assert_eq!(body_bytes(resp).await, b"a 1\nb 2\n");
}

#[tokio::test]
async fn missing_export_dir_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("export");
    fs::create_dir(&export).unwrap();
    fs::write(export.join("a.prom"), "a 1\n").unwrap();

    let app = app_for(&export, false);
    fs::remove_dir_all(&export).unwrap();

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_bytes(resp).await;
    assert!(!String::from_utf8(body).unwrap().contains("a 1"));
}

#[tokio::test]
async fn startup_rejects_missing_export_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = match AppState::new(cfg_for(&dir.path().join("nope"), false), about()) {
        Ok(_) => panic!("must fail"),
        Err(e) => e,
    };
    assert_eq!(err.code().as_str(), "EXPORT_DIR");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_scrapes_are_not_interleaved() {
    let dir = tempfile::tempdir().unwrap();
    let mut expected = Vec::new();
    for i in 0..5 {
        // large enough to span several body chunks
        let content: String = (0..4000).map(|n| format!("file{i}_sample{n} {n}\n")).collect();
        fs::write(dir.path().join(format!("f{i}.prom")), &content).unwrap();
        expected.extend_from_slice(content.as_bytes());
    }

    let app = app_for(dir.path(), true);
    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let resp = app.oneshot(get("/metrics")).await.unwrap();
                assert_eq!(resp.status(), StatusCode::OK);
                body_bytes(resp).await
            })
        })
        .collect();

    for t in tasks {
        assert_eq!(t.await.unwrap(), expected);
    }
}

#[tokio::test]
async fn info_page_renders_build_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let resp = app_for(dir.path(), false).oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let html = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(html.contains("Text Exporter"));
    assert!(html.contains("0.3.0"));
}

#[tokio::test]
async fn broken_template_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let state =
        AppState::with_template(cfg_for(dir.path(), false), about(), "<h1>{{tool</h1>").unwrap();
    let resp = build_router(state).oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn only_get_is_routed() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(dir.path(), false);

    let post = Request::builder()
        .method(Method::POST)
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(post).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
