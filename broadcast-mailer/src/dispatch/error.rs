//! Dispatch error types

use thiserror::Error;

/// Transport-level failures talking to the mail dispatch service
///
/// A logical refusal (`success: false`) is not an error; see
/// [`DispatchReply::Declined`](super::DispatchReply::Declined).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network or HTTP client failure
    #[error("mail dispatch transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status code
    #[error("mail dispatch returned HTTP {0}")]
    Status(u16),

    /// Response parsed but is missing required fields
    #[error("malformed mail dispatch response: {0}")]
    MalformedResponse(String),

    /// Response body is not valid JSON
    #[error("mail dispatch serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
