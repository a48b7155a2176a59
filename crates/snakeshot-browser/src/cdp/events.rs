//! CDP event fan-out.

use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::warn;

use super::error::CdpError;

/// Capacity of the per-connection event channel.
pub(crate) const EVENT_CAPACITY: usize = 1024;

/// A CDP event (a message with `method` and no `id`).
#[derive(Debug, Clone, PartialEq)]
pub struct CdpEvent {
    pub method: String,
    pub params: Value,
    pub session_id: Option<String>,
}

impl CdpEvent {
    pub fn new(method: impl Into<String>, params: Value, session_id: Option<String>) -> Self {
        Self {
            method: method.into(),
            params,
            session_id,
        }
    }
}

/// Events for one page session, in arrival order.
///
/// Each subscriber has its own cursor, so a listener created before an
/// action sees every event that action triggers. `next` is cancel-safe:
/// dropping its future loses nothing.
pub struct SessionEvents {
    rx: broadcast::Receiver<CdpEvent>,
    session_id: String,
}

impl SessionEvents {
    pub(crate) fn new(rx: broadcast::Receiver<CdpEvent>, session_id: String) -> Self {
        Self { rx, session_id }
    }

    /// Next event addressed to this session.
    pub async fn next(&mut self) -> Result<CdpEvent, CdpError> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.session_id.as_deref() == Some(self.session_id.as_str()) => {
                    return Ok(event);
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        "Event listener for session {} lagged, {} events dropped",
                        self.session_id, skipped
                    );
                }
                Err(RecvError::Closed) => return Err(CdpError::SessionClosed),
            }
        }
    }

    /// Remove and return this session's events that are already buffered.
    pub fn drain_buffered(&mut self) -> Vec<CdpEvent> {
        let mut drained = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.session_id.as_deref() == Some(self.session_id.as_str()) => {
                    drained.push(event);
                }
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return drained,
            }
        }
    }

    /// Next event of kind `method` addressed to this session.
    pub async fn next_of(&mut self, method: &str) -> Result<CdpEvent, CdpError> {
        loop {
            let event = self.next().await?;
            if event.method == method {
                return Ok(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(method: &str, session: &str) -> CdpEvent {
        CdpEvent::new(method, json!({}), Some(session.to_string()))
    }

    #[tokio::test]
    async fn test_filters_other_sessions() {
        let (tx, rx) = broadcast::channel(16);
        let mut events = SessionEvents::new(rx, "S1".to_string());

        tx.send(event("Page.loadEventFired", "S2")).unwrap();
        tx.send(CdpEvent::new("Target.targetCreated", json!({}), None)).unwrap();
        tx.send(event("Page.loadEventFired", "S1")).unwrap();

        let got = events.next().await.unwrap();
        assert_eq!(got.session_id.as_deref(), Some("S1"));
    }

    #[tokio::test]
    async fn test_next_of_skips_other_methods() {
        let (tx, rx) = broadcast::channel(16);
        let mut events = SessionEvents::new(rx, "S1".to_string());

        tx.send(event("Network.requestWillBeSent", "S1")).unwrap();
        tx.send(event("Network.loadingFinished", "S1")).unwrap();

        let got = events.next_of("Network.loadingFinished").await.unwrap();
        assert_eq!(got.method, "Network.loadingFinished");
    }

    #[tokio::test]
    async fn test_drain_buffered_keeps_later_events() {
        let (tx, rx) = broadcast::channel(16);
        let mut events = SessionEvents::new(rx, "S1".to_string());

        tx.send(event("Network.webSocketFrameReceived", "S1")).unwrap();
        tx.send(event("Network.webSocketFrameReceived", "S2")).unwrap();
        let drained = events.drain_buffered();
        assert_eq!(drained.len(), 1);
        assert!(events.drain_buffered().is_empty());

        tx.send(event("Page.loadEventFired", "S1")).unwrap();
        assert_eq!(events.next().await.unwrap().method, "Page.loadEventFired");
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (tx, rx) = broadcast::channel::<CdpEvent>(4);
        let mut events = SessionEvents::new(rx, "S1".to_string());
        drop(tx);
        assert!(matches!(events.next().await, Err(CdpError::SessionClosed)));
    }

    #[tokio::test]
    async fn test_lagged_receiver_keeps_going() {
        let (tx, rx) = broadcast::channel(2);
        let mut events = SessionEvents::new(rx, "S1".to_string());
        for i in 0..5 {
            tx.send(CdpEvent::new(format!("E{}", i), json!({}), Some("S1".to_string())))
                .unwrap();
        }
        let got = events.next().await.unwrap();
        assert_eq!(got.method, "E3");
    }
}
