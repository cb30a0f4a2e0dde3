//! Classified remote-call failures.

use thiserror::Error;

/// Failure of a remote service call, surfaced after retries are exhausted.
///
/// The status is always populated: it carries the final response status when
/// one was received, and falls back to 500 when the transport never produced
/// a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote call failed ({status}): {message}")]
pub struct RemoteCallError {
    pub status: u16,
    pub message: String,
}

impl RemoteCallError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Whether the remote reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}
