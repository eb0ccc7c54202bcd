//! Error types for the Meridian client.
//!
//! This module defines the centralized error type [`MeridianError`] and a type
//! alias [`Result`] used throughout the crate. All errors are implemented with
//! the `thiserror` crate. Fetch-path failures never escape the coordinator
//! boundary: they are converted there into a user-facing message plus a
//! visible banner flag.

use thiserror::Error;

/// The main error type for Meridian operations.
///
/// Consolidates every failure the client can encounter, from transport
/// problems to unexpected response shapes and authentication rejections.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeridianError {
    /// The search service returned a body with an unexpected JSON shape.
    ///
    /// Carries the offending JSON type name, or the decode failure detail
    /// when an element does not match the organ record shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A transport-level failure: timeout, connection refused, TLS, or a
    /// body that could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The search service answered with a non-2xx status.
    #[error("http status {status}")]
    Http {
        /// Status code as reported by the server.
        status: u16,
    },

    /// Authentication was rejected before or by the auth collaborator.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration is invalid or could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeridianError {
    /// Returns display copy suitable for the error banner.
    ///
    /// The HTTP variant always embeds the status code so the user (and the
    /// clinic staff triaging reports) can tell a bad query from an outage.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedResponse(_) => {
                "The server returned data the app could not read. Please try a different search."
                    .to_string()
            }
            Self::Network(_) => {
                "The server is taking too long to respond. Please try again in a moment."
                    .to_string()
            }
            Self::Http { status } => {
                format!("Search failed (status {status}). Please adjust the search and try again.")
            }
            Self::Auth(reason) => reason.clone(),
            Self::Config(_) | Self::Io(_) => "An unexpected error occurred.".to_string(),
        }
    }

    /// Returns whether a user-initiated retry is worth offering.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }
}

impl From<reqwest::Error> for MeridianError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// A specialized `Result` type for Meridian operations.
pub type Result<T> = std::result::Result<T, MeridianError>;
