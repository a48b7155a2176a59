//! Core session struct and CDP command dispatch.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::events::SessionEvents;
use crate::cdp::protocol::{ScreenshotFormat, Viewport};
use crate::cdp::transport::CdpTransport;

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Transport shared with the client.
    pub(super) transport: Arc<dyn CdpTransport>,
}

impl PageSession {
    /// Create a new page session.
    pub fn new(target_id: String, session_id: String, transport: Arc<dyn CdpTransport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Listen to this page's events from now on.
    pub fn events(&self) -> SessionEvents {
        SessionEvents::new(self.transport.subscribe(), self.session_id.clone())
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Network.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Override the viewport size and device pixel ratio.
    pub async fn set_viewport(
        &self,
        width: u32,
        height: u32,
        device_scale_factor: f64,
    ) -> Result<(), CdpError> {
        self.call(
            "Emulation.setDeviceMetricsOverride",
            Some(json!({
                "width": width,
                "height": height,
                "deviceScaleFactor": device_scale_factor,
                "mobile": false,
            })),
        )
        .await?;
        Ok(())
    }

    /// Take screenshot, returned base64-encoded as Chrome sends it.
    pub async fn screenshot(
        &self,
        format: ScreenshotFormat,
        clip: Option<Viewport>,
    ) -> Result<String, CdpError> {
        let mut params = json!({ "format": format });

        if let Some(c) = clip {
            params["clip"] = serde_json::to_value(c)?;
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;

        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }

    /// PNG bytes of the given page region.
    pub async fn capture_png(&self, clip: Viewport) -> Result<Vec<u8>, CdpError> {
        let data = self.screenshot(ScreenshotFormat::Png, Some(clip)).await?;
        Ok(BASE64.decode(data)?)
    }
}
