use std::fmt;

/// Errors that can occur during asset storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The requested asset was not found.
    NotFound(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The public id cannot name an asset in this store.
    InvalidPublicId(String),
    /// The upload exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The asset host could not be reached or returned an unreadable response.
    Transport(String),
    /// The asset host rejected the request.
    Rejected { status: u16, message: String },
    /// The backend is missing required settings.
    Misconfigured(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "asset not found: {id}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::InvalidPublicId(id) => write!(f, "invalid asset public id: {id}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "upload exceeds size limit ({actual} > {limit} bytes)")
            }
            Self::Transport(msg) => write!(f, "asset host request failed: {msg}"),
            Self::Rejected { status, message } => {
                write!(f, "asset host rejected request ({status}): {message}")
            }
            Self::Misconfigured(msg) => write!(f, "asset storage misconfigured: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
