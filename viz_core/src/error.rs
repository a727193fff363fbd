use thiserror::Error;

use crate::transport::TransportError;

/// Failure taxonomy for the sync core.
///
/// Transport and decode failures are handled inside the fetch cycle (the
/// affected step logs and aborts, the loop keeps running). Invariant
/// violations are surfaced to the operator: silently truncating or padding a
/// snapshot would corrupt the view.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invariant violation: {0}")]
    Invariant(String),
}
