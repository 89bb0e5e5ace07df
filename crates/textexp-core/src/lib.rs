//! Text exporter core: export directory handling, file aggregation, build
//! metadata and the shared error type.
//!
//! This crate carries no HTTP or async runtime dependencies; aggregation
//! writes into any `std::io::Write` sink so the server can stream it and tests
//! can collect it into a `Vec<u8>`.
//!
//! Panics, `unwrap`, and `expect` are compile-denied outside tests. Every
//! fallible path surfaces as `TextExpError`/`Result`.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

pub mod about;
pub mod error;
pub mod export;

pub use about::About;
/// Shared result type.
pub use error::{ErrorCode, Result, TextExpError};
pub use export::{aggregate, AggregateReport, EntryOrder, ExportDir, Requester};
