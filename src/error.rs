//! Error types for geolocus

use thiserror::Error;

/// Main error type for geolocus operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed coordinate, address, or query parameters. Caller error,
    /// never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider executed the request but found no match. Raised only by
    /// operations that expect exactly one result (geocode, reverse geocode,
    /// IP location); searches return empty collections instead.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transient network failure or timeout talking to a configured provider.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Provider reachable but returned an error status or malformed payload.
    #[error("Provider error: {0}")]
    Provider(String),

    /// No geocoding provider is configured at all. Distinct from
    /// `Unavailable`, which means a configured provider could not be reached.
    #[error("No geolocation provider configured")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geolocus operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Map a reqwest transport error to the taxonomy: timeouts and connection
    /// failures are `Unavailable`, everything else is `Provider`.
    pub fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Error::Unavailable(format!("{provider}: {err}"))
        } else {
            Error::Provider(format!("{provider}: {err}"))
        }
    }
}
