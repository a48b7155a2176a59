//! Scripted [`CdpTransport`] for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::cdp::{CdpError, CdpEvent, CdpTransport, PageSession};

pub(crate) const SESSION_ID: &str = "S1";

type Responder = Box<dyn Fn(&str, &Value) -> Result<Value, CdpError> + Send + Sync>;

struct Trigger {
    method: String,
    remaining: usize,
    events: Vec<CdpEvent>,
}

pub(crate) struct MockTransport {
    responder: Responder,
    calls: Mutex<Vec<(String, Value)>>,
    events: broadcast::Sender<CdpEvent>,
    triggers: Mutex<Vec<Trigger>>,
}

impl MockTransport {
    /// Answer every command with `responder(method, params)`.
    pub(crate) fn new(
        responder: impl Fn(&str, &Value) -> Result<Value, CdpError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            events,
            triggers: Mutex::new(Vec::new()),
        })
    }

    /// Page session on this transport with session id [`SESSION_ID`].
    pub(crate) fn session(self: &Arc<Self>) -> PageSession {
        let transport: Arc<dyn CdpTransport> = self.clone();
        PageSession::new("T1".to_string(), SESSION_ID.to_string(), transport)
    }

    /// Emit `events` right after the `nth` (1-based) call of `method`.
    pub(crate) fn emit_after(&self, method: &str, nth: usize, events: Vec<CdpEvent>) {
        self.triggers.lock().push(Trigger {
            method: method.to_string(),
            remaining: nth,
            events,
        });
    }

    pub(crate) fn emit(&self, event: CdpEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    pub(crate) fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    pub(crate) fn calls_of(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn fire_triggers(&self, method: &str) {
        let mut fired = Vec::new();
        self.triggers.lock().retain_mut(|trigger| {
            if trigger.method != method {
                return true;
            }
            trigger.remaining -= 1;
            if trigger.remaining == 0 {
                fired.append(&mut trigger.events);
                false
            } else {
                true
            }
        });
        for event in fired {
            self.emit(event);
        }
    }
}

#[async_trait]
impl CdpTransport for MockTransport {
    async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        _session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let params = params.unwrap_or(Value::Null);
        self.calls.lock().push((method.to_string(), params.clone()));
        let result = (self.responder)(method, &params);
        self.fire_triggers(method);
        result
    }

    fn subscribe(&self) -> broadcast::Receiver<CdpEvent> {
        self.events.subscribe()
    }
}

/// Event addressed to [`SESSION_ID`].
pub(crate) fn page_event(method: &str, params: Value) -> CdpEvent {
    CdpEvent::new(method, params, Some(SESSION_ID.to_string()))
}
