//! Scrape and info records reach the log file with the default filter.
//!
//! Installs the global subscriber, so it lives in its own test binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::time::Duration;

use axum::{body::Body, http::Request, http::StatusCode};
use tower::ServiceExt;

use textexp_core::About;
use textexp_server::{
    app_state::AppState, config::ExporterConfig, obs, router::build_router,
};

#[tokio::test]
async fn scrape_writes_per_file_and_summary_lines() {
    let logs = tempfile::tempdir().unwrap();
    let log_path = logs.path().join("local.log");
    let sink = obs::LogSink::open(&log_path).unwrap();
    obs::init_logging(&sink, false).unwrap();

    let export = tempfile::tempdir().unwrap();
    fs::write(export.path().join("a.txt"), "up 1\n").unwrap();
    fs::create_dir(export.path().join("sub")).unwrap();

    let mut cfg = ExporterConfig::default();
    cfg.export.path = export.path().display().to_string();
    let app = build_router(AppState::new(cfg, About::new("Text Exporter", "0.3.0")).unwrap());

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"up 1\n");

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // the summary is written before the body stream closes; allow the
    // blocking thread to finish its record anyway
    let mut log = String::new();
    for _ in 0..100 {
        log = fs::read_to_string(&log_path).unwrap();
        if log.contains("scrape done") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(log.contains("file=a.txt"), "per-file line missing: {log}");
    let summary = log
        .lines()
        .find(|l| l.contains("scrape done"))
        .unwrap_or_else(|| panic!("summary line missing: {log}"));
    assert!(summary.contains("INFO"));
    assert!(summary.contains("files=1"));
    assert!(summary.contains("skipped=1"));
    assert!(summary.contains("bytes=5"));
    assert!(log.contains("path=/"), "info access line missing: {log}");
}
