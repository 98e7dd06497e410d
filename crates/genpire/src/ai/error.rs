//! Generative provider error types.

use thiserror::Error;

/// Errors from calls to the generative providers.
#[derive(Error, Debug)]
pub enum GenAiError {
    /// Transport-level failure from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 200 with nothing usable in it.
    #[error("Provider returned an empty completion")]
    EmptyCompletion,

    /// The provider's response body did not have the expected shape.
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    /// All synthesis attempts failed.
    #[error("Image synthesis failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    /// The generated payload could not be materialized locally.
    #[error("Failed to materialize generated payload: {0}")]
    Payload(String),
}
