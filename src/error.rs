use thiserror::Error;

// Failure of a single load, classified so the retry loop knows what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Transport(String), // Connection refused, DNS, reset... anything before a status line.

    #[error("HTTP {0}")]
    Status(u16), // Non-2xx response.

    #[error("{0}")]
    Schema(String), // Body parsed but has the wrong shape.

    #[error("The operation was aborted.")]
    Cancelled, // Superseded or torn down; never shown to the user.

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid request: {0}")]
    Request(String), // Malformed URL or a request that could never be sent.
}

impl LoadError {
    // 408, 425 and 429 are retried alongside every 5xx.
    pub fn is_retriable_status(status: u16) -> bool {
        matches!(status, 408 | 425 | 429) || status >= 500
    }

    pub fn is_retriable(&self) -> bool {
        match self {
            LoadError::Transport(_) => true,
            LoadError::Status(status) => Self::is_retriable_status(*status),
            LoadError::Schema(_) | LoadError::Cancelled | LoadError::Io(_) | LoadError::Request(_) => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadError::Cancelled)
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => LoadError::Status(status.as_u16()),
            None if err.is_builder() || err.is_redirect() => LoadError::Request(err.to_string()),
            None if err.is_decode() => LoadError::Schema(err.to_string()),
            None => LoadError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Schema(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Unknown helper script: {0}")]
    UnknownScript(String),

    #[error("Usage: {0}")]
    Usage(String),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
