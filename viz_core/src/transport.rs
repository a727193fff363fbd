use async_trait::async_trait;
use thiserror::Error;
use viz_proto::SessionConfig;

/// Transport-level failure. Decode failures are a separate concern and live
/// in [`crate::SyncError`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request timed out")]
    Timeout,
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Contract with the network layer.
///
/// Fetches return raw response bodies; decoding happens in the core so a
/// malformed payload and a dead connection stay distinguishable. All
/// methods are non-blocking; completions resume the cooperative loop.
#[async_trait]
pub trait Transport {
    /// POST the session configuration. Fired once at session start.
    async fn send_config(&self, config: &SessionConfig) -> Result<(), TransportError>;

    /// Liveness/tick check. Any successful response means "proceed".
    async fn check_update(&self) -> Result<(), TransportError>;

    async fn fetch_robots(&self) -> Result<String, TransportError>;

    async fn fetch_boxes(&self) -> Result<String, TransportError>;

    async fn fetch_objective(&self) -> Result<String, TransportError>;
}
