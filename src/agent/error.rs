//! Error types for agent invocation

use thiserror::Error;

/// Errors that can occur while invoking an agent and consuming its stream
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The request was rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Submitting the request failed
    #[error("Request failed: {0}")]
    Request(String),

    /// Reading the next event from the response stream failed
    #[error("Streaming error: {0}")]
    Stream(String),

    /// A chunk payload was not valid UTF-8
    #[error("Failed to decode chunk as UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// An event was missing a field it must carry
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// The exchange did not finish in time
    #[error("Invocation timed out after {0}s")]
    Timeout(u64),
}

/// Result type alias for invocation operations
pub type InvocationResult<T> = Result<T, InvocationError>;
