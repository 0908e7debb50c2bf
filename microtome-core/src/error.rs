//! Error types for microtome

use thiserror::Error;

/// Main error type for microtome operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {axis} dimension: {value} (must be finite and > 0)")]
    InvalidDimension { axis: &'static str, value: f32 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for microtome operations
pub type Result<T> = std::result::Result<T, Error>;
