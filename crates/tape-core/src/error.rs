//! Typed error definitions for the tape service.
//!
//! Provides [`TapeError`] for domain-specific errors that are more informative
//! than plain `anyhow::Error` strings. All variants implement `std::error::Error`
//! via `thiserror`, so they integrate seamlessly with `anyhow::Result`.

use thiserror::Error;

/// Domain-specific errors for the tape service.
#[derive(Debug, Error)]
pub enum TapeError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Alert store read or decode error.
    #[error("alert store error: {0}")]
    Store(String),

    /// Price update addressed to a symbol outside the fixed table key set.
    /// The symbol set never changes after startup, so hitting this is a
    /// programming-invariant violation rather than a runtime condition.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}
