// sheets/src/errors.rs

use models::ValidationError;
pub use thiserror::Error;

/// A failure talking to the remote sheet store. One attempt per call, no
/// automatic retry: on an ambiguous failure the commit state is unknown and
/// callers verify via `fetch_all` before resubmitting.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("authentication with the sheet service failed: {0}")]
    Auth(String),
    #[error("network error talking to the sheet service: {0}")]
    Network(#[from] reqwest::Error),
    #[error("sheet service rejected the call (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("sheet service returned an unexpected payload: {0}")]
    BadPayload(String),
    #[error("sheet row {row} is malformed: {source}")]
    MalformedRow {
        row: usize,
        #[source]
        source: ValidationError,
    },
    #[error("could not read credentials file {path}: {message}")]
    Credentials { path: String, message: String },
}

/// A type alias for a `Result` that returns a `PersistenceError` on failure.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
