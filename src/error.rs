//! Error types
//!
//! Nothing in this crate surfaces an error to the host as a hard fault:
//! transport failures feed the reconnect schedule and become status values,
//! and malformed payloads are logged per message and dropped. These types
//! exist for the seams where a failure is still in flight.

use thiserror::Error;

/// Failures inside the live update subsystem.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The transport could not be opened or died mid-stream.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A pushed payload did not parse as a stock batch.
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type StreamResult<T> = Result<T, StreamError>;
