//! # tape-core
//!
//! Core crate for the tape market-data simulation service, providing:
//!
//! - **Types** (`types`) — quotes, alerts, instrument seed specs
//! - **Configuration** (`config`) — JSON config deserialization with defaults
//! - **Error types** (`error`) — domain-specific `TapeError` via thiserror
//! - **Tick statistics** (`stats`) — histogram of per-tick wall durations
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod stats;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
