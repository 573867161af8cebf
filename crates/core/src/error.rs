//! Unified error types for the ombra workspace.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the store, the network backends, and the proxy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest fetch failed during install; nothing was seeded.
    #[error("install aborted: {0}")]
    InstallAborted(String),

    /// Transport-level network failure (DNS, connect, timeout, read).
    #[error("network failure: {0}")]
    Network(String),

    /// Response body exceeded the configured size cap.
    #[error("response too large: {0}")]
    TooLarge(String),

    /// A URL failed to parse or resolve.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Store operation failed.
    #[error("store failure: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("store failure: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_aborted_display() {
        let err = Error::InstallAborted("/offline.html: connection refused".to_string());
        assert!(err.to_string().contains("install aborted"));
        assert!(err.to_string().contains("/offline.html"));
    }

    #[test]
    fn test_network_display() {
        let err = Error::Network("timed out".to_string());
        assert!(err.to_string().starts_with("network failure"));
    }
}
