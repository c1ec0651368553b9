//! Error types for the dashboard client

/// Errors that can occur in the dashboard client
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for dashboard client operations
pub type Result<T> = std::result::Result<T, DashboardError>;
