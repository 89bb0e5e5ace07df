//! HTTP handlers.
//!
//! - `/`        : info page (build metadata)
//! - `/metrics` : concatenated export directory, streamed as it is read

pub mod info_page;
pub mod stream;

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Method, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use textexp_core::Requester;

use crate::app_state::AppState;

fn peer_label(peer: Option<ConnectInfo<SocketAddr>>) -> String {
    peer.map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Internal Server Error\n",
    )
        .into_response()
}

pub async fn info(
    State(app): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    version: Version,
) -> Response {
    tracing::info!(peer = %peer_label(peer), %method, path = %uri.path(), proto = ?version, "info");

    match info_page::render(app.template(), app.about()) {
        Ok(html) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "info page render failed");
            internal_error()
        }
    }
}

pub async fn metrics(
    State(app): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    version: Version,
) -> Response {
    let who = Requester::new(peer_label(peer), format!("{version:?}"));
    let export = app.export().clone();
    let order = app.order();

    // Listing decides the status; nothing has been sent yet.
    let listing = match tokio::task::spawn_blocking(move || export.list(order)).await {
        Ok(Ok(listing)) => listing,
        Ok(Err(e)) => {
            tracing::error!(peer = %who.peer, error = %e, "scrape failed");
            return internal_error();
        }
        Err(e) => {
            tracing::error!(peer = %who.peer, error = %e, "listing task failed");
            return internal_error();
        }
    };

    let (mut writer, body) = stream::body_channel();
    tokio::task::spawn_blocking(move || {
        let report = listing.stream_to(&mut writer, &who);
        tracing::info!(
            peer = %who.peer,
            files = report.copied().count(),
            skipped = report.skipped().count(),
            bytes = report.bytes_written(),
            interrupted = report.interrupted.is_some(),
            "scrape done"
        );
    });

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}
