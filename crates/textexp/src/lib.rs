//! Top-level facade crate for the text exporter.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use textexp_core::*;
}

pub mod server {
    pub use textexp_server::*;
}
