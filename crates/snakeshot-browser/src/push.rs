//! [`PushChannel`] fed by the page's own WebSocket traffic.

use async_trait::async_trait;
use snakeshot_protocols::{PushChannel, PushMessage, UiError};
use tracing::{debug, trace};

use crate::cdp::{CdpError, PageSession, SessionEvents};

const FRAME_RECEIVED: &str = "Network.webSocketFrameReceived";

/// Server pushes observed through `Network.webSocketFrameReceived`.
///
/// Frames are buffered from construction on, so create the channel before
/// triggering anything that makes the server push. Frames buffered before
/// matchmaking are dropped through [`PushChannel::discard_pending`].
pub struct CdpPushChannel {
    events: SessionEvents,
}

impl CdpPushChannel {
    pub fn new(page: &PageSession) -> Self {
        Self {
            events: page.events(),
        }
    }
}

#[async_trait]
impl PushChannel for CdpPushChannel {
    async fn next_message(&mut self) -> Result<PushMessage, UiError> {
        loop {
            let event = match self.events.next_of(FRAME_RECEIVED).await {
                Ok(event) => event,
                Err(CdpError::SessionClosed) => return Err(UiError::ChannelClosed),
                Err(e) => return Err(e.into()),
            };

            let Some(payload) = event.params["response"]["payloadData"].as_str() else {
                debug!("Skipping WebSocket frame without text payload");
                continue;
            };

            match PushMessage::parse(payload) {
                Ok(message) => {
                    trace!("Push message: {}", message.event);
                    return Ok(message);
                }
                Err(e) => debug!("Skipping non-JSON WebSocket frame: {}", e),
            }
        }
    }

    fn discard_pending(&mut self) -> usize {
        self.events
            .drain_buffered()
            .iter()
            .filter(|event| event.method == FRAME_RECEIVED)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_transport::{MockTransport, page_event};
    use serde_json::json;
    use snakeshot_protocols::PushEvent;

    fn frame(payload: &str) -> crate::cdp::CdpEvent {
        page_event(
            FRAME_RECEIVED,
            json!({"requestId": "ws", "response": {"opcode": 1, "payloadData": payload}}),
        )
    }

    #[tokio::test]
    async fn test_yields_json_frames_in_order() {
        let mock = MockTransport::new(|_, _| Ok(json!({})));
        let mut channel = CdpPushChannel::new(&mock.session());

        mock.emit(frame(r#"{"event": "start-matching", "game": {"a_id": 1, "b_id": 2, "map": []}}"#));
        mock.emit(frame(r#"{"event": "move", "a_direction": 0}"#));

        assert_eq!(channel.next_message().await.unwrap().kind(), PushEvent::StartMatching);
        assert_eq!(
            channel.next_message().await.unwrap().kind(),
            PushEvent::Other("move".to_string())
        );
    }

    #[tokio::test]
    async fn test_skips_non_json_and_foreign_events() {
        let mock = MockTransport::new(|_, _| Ok(json!({})));
        let mut channel = CdpPushChannel::new(&mock.session());

        mock.emit(frame("ping"));
        mock.emit(page_event("Network.webSocketFrameSent", json!({"response": {"payloadData": "{\"event\":\"x\"}"}})));
        mock.emit(crate::cdp::CdpEvent::new(
            FRAME_RECEIVED,
            json!({"response": {"payloadData": "{\"event\":\"other-tab\"}"}}),
            Some("S2".to_string()),
        ));
        mock.emit(frame(r#"{"event": "result", "loser": "A"}"#));

        assert!(channel.next_message().await.unwrap().is_result());
    }

    #[tokio::test]
    async fn test_discard_pending_drops_earlier_frames_only() {
        let mock = MockTransport::new(|_, _| Ok(json!({})));
        let mut channel = CdpPushChannel::new(&mock.session());

        mock.emit(frame(r#"{"event": "online-count", "count": 12}"#));
        mock.emit(page_event("Page.loadEventFired", json!({})));
        assert_eq!(channel.discard_pending(), 1);
        assert_eq!(channel.discard_pending(), 0);

        mock.emit(frame(r#"{"event": "start-matching", "game": {"a_id": 1, "b_id": 2, "map": []}}"#));
        assert_eq!(channel.next_message().await.unwrap().kind(), PushEvent::StartMatching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_loses_nothing() {
        let mock = MockTransport::new(|_, _| Ok(json!({})));
        let mut channel = CdpPushChannel::new(&mock.session());

        let waited =
            tokio::time::timeout(std::time::Duration::from_secs(1), channel.next_message()).await;
        assert!(waited.is_err());

        mock.emit(frame(r#"{"event": "result"}"#));
        assert!(channel.next_message().await.unwrap().is_result());
    }

    #[tokio::test]
    async fn test_closed_transport() {
        let (tx, rx) = tokio::sync::broadcast::channel(4);
        let mut channel = CdpPushChannel {
            events: SessionEvents::new(rx, "S1".to_string()),
        };
        drop(tx);
        assert!(matches!(
            channel.next_message().await,
            Err(UiError::ChannelClosed)
        ));
    }
}
