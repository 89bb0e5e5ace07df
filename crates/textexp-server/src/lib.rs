//! Text exporter server library entry.
//!
//! Wires config, logging (rotating sink + SIGHUP watcher) and the HTTP
//! frontend together. It is intended to be consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod signal;
