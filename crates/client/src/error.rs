use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("no token configured; the backend is read-only")]
    ReadOnly,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    /// Maps a non-success status and its error body.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict(body),
            422 => Self::Validation(body),
            _ => Self::Server(body),
        }
    }
}
