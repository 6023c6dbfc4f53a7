use thiserror::Error;

/// Failure to retrieve the target page
#[cfg(feature = "fetch")]
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connect, TLS, timeout, redirect loop or a dropped body
    #[error("Unable to connect to the website. Please check the URL and try again.")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("Error fetching website: {status} {reason}")]
    ServerError {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[cfg(feature = "fetch")]
impl FetchError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Unreachable { .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, FetchError::ServerError { .. })
    }
}

/// Failure inside an analysis store
#[derive(Debug, Error)]
pub enum StorageError {
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Everything that can go wrong during `analyze`
#[cfg(feature = "fetch")]
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    FetchFailed(#[from] FetchError),

    #[error("An error occurred while saving the analysis")]
    Storage(#[from] StorageError),
}
