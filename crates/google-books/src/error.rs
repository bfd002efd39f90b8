//! Error types for the Google Books client.

use thiserror::Error;

/// Errors that can occur when fetching a page of volumes.
#[derive(Debug, Error)]
pub enum GoogleBooksError {
    /// Network-level error during HTTP communication.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Upstream quota or rate limit exceeded.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Body could not be decoded as a volumes page.
    #[error("invalid response from Google Books: {0}")]
    InvalidResponse(String),

    /// Google Books returned a non-success status.
    #[error("Google Books API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// A recorded fixture could not be loaded.
    #[error("fixture {path}: {message}")]
    Fixture { path: String, message: String },
}
