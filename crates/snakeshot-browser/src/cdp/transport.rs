//! The seam between page sessions and the WebSocket connection.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use super::error::CdpError;
use super::events::CdpEvent;

/// Command/event transport underneath a [`PageSession`](super::PageSession).
///
/// The live implementation is the client's WebSocket connection.
#[async_trait]
pub trait CdpTransport: Send + Sync {
    /// Send a command and wait for its reply.
    async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError>;

    /// A new receiver for every event seen from now on, all sessions mixed.
    fn subscribe(&self) -> broadcast::Receiver<CdpEvent>;
}
