use thiserror::Error;

use crate::models::ErrorResult;

/// Main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The submitted URL carries no recognizable video id
    #[error("no video id found in URL: {0}")]
    InvalidUrl(String),

    /// The resolving lookup returned no such video
    #[error("video not found: {0}")]
    VideoNotFound(String),

    /// The video exists but carries no owning channel
    #[error("video {0} has no channel attached")]
    ChannelNotFound(String),

    /// Transport-level failure, including timeouts
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("YouTube API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered 2xx but the payload was not what we expect
    #[error("unexpected API payload: {0}")]
    Payload(String),

    /// Video discovery hit the page safety cap without exhausting results
    #[error("video search did not finish within {0} pages")]
    PaginationOverflow(usize),

    /// The inbound request was cancelled mid-pipeline
    #[error("analysis cancelled")]
    Cancelled,

    /// Host-side misconfiguration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse status class the caller maps to its own response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadInput,
    NotFound,
    Upstream,
    Internal,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::InvalidUrl(_) => ErrorClass::BadInput,
            Error::VideoNotFound(_) | Error::ChannelNotFound(_) => ErrorClass::NotFound,
            Error::Http(_)
            | Error::Api { .. }
            | Error::Payload(_)
            | Error::PaginationOverflow(_) => ErrorClass::Upstream,
            Error::Cancelled | Error::Config(_) => ErrorClass::Internal,
        }
    }

    /// Message safe to show to the end user. The `Display` form may embed
    /// response bodies and stays in the logs.
    pub fn user_message(&self) -> String {
        match self.class() {
            ErrorClass::BadInput => "Could not find a video id in that URL.".to_string(),
            ErrorClass::NotFound => "That video or its channel could not be found.".to_string(),
            ErrorClass::Upstream => {
                "Failed to fetch data from YouTube. Please try again later.".to_string()
            }
            ErrorClass::Internal => match self {
                Error::Cancelled => "The analysis was cancelled.".to_string(),
                _ => "The analysis could not be completed.".to_string(),
            },
        }
    }

    pub fn to_error_result(&self) -> ErrorResult {
        ErrorResult {
            error: self.user_message(),
        }
    }
}
