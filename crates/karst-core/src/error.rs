//! Error types for the renderer core.

use thiserror::Error;

/// Renderer-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected configuration (zero extents, negative distances, zero budget)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Render sink failure (GPU buffer acquisition)
    #[error("render sink error: {0}")]
    Sink(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
