//! [`GameUi`] over a CDP page session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use snakeshot_protocols::{Credentials, Direction, GameUi, IdentityResponse, UiError};
use tracing::{debug, info};
use url::Url;

use crate::cdp::{CdpError, PageSession, SessionEvents};

/// CSS selectors for the game page's controls.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    /// Button that opens the login drawer.
    pub open_login: String,
    /// Matches the name and password inputs, in that order.
    pub credential_inputs: String,
    pub login_button: String,
    pub match_button: String,
    /// The game surface.
    pub canvas: String,
}

/// `KeyboardEvent.code` per direction.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub up: String,
    pub right: String,
    pub down: String,
    pub left: String,
}

impl KeyBindings {
    pub fn code_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.up,
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
        }
    }
}

/// Game page settings for [`BrowserGameUi`].
#[derive(Debug, Clone)]
pub struct GameUiConfig {
    /// The account-info endpoint the page queries after login.
    pub identity_url: Url,
    pub selectors: SelectorSet,
    pub keys: KeyBindings,
    /// Pause for the login drawer to close before clicking match.
    pub drawer_settle: Duration,
    /// Bound on waiting for an element to appear.
    pub element_timeout: Duration,
}

/// Drives the game page: login, matchmaking, canvas capture and key input.
pub struct BrowserGameUi {
    page: Arc<PageSession>,
    config: GameUiConfig,
}

impl BrowserGameUi {
    pub fn new(page: Arc<PageSession>, config: GameUiConfig) -> Self {
        Self { page, config }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Value, CdpError> {
        let selectors = &self.config.selectors;
        let timeout = self.config.element_timeout;

        let open = self.page.wait_for_selector(&selectors.open_login, timeout).await?;
        self.page.click_node(open, &selectors.open_login).await?;

        self.page
            .wait_for_selector(&selectors.credential_inputs, timeout)
            .await?;
        let login = self.page.wait_for_selector(&selectors.login_button, timeout).await?;

        let inputs = self.page.query_selector_all(&selectors.credential_inputs).await?;
        let [name_input, password_input, ..] = *inputs.as_slice() else {
            return Err(CdpError::ElementNotFound(format!(
                "{} (need name and password inputs, found {})",
                selectors.credential_inputs,
                inputs.len()
            )));
        };
        self.page.type_into(name_input, &credentials.name).await?;
        self.page.type_into(password_input, &credentials.password).await?;

        // Subscribe before clicking so the identity request cannot be missed.
        let mut events = self.page.events();
        self.page.click_node(login, &selectors.login_button).await?;

        let body = self.await_identity(&mut events).await?;
        serde_json::from_str(&body).map_err(|e| {
            CdpError::InvalidResponse(format!("Identity response is not JSON: {}", e))
        })
    }

    /// Body of the next GET to the identity endpoint.
    ///
    /// Preflight `OPTIONS` requests to the same URL are skipped.
    async fn await_identity(&self, events: &mut SessionEvents) -> Result<String, CdpError> {
        let request_id = loop {
            let event = events.next_of("Network.requestWillBeSent").await?;
            let request = &event.params["request"];
            let is_identity = request["url"]
                .as_str()
                .and_then(|u| Url::parse(u).ok())
                .is_some_and(|u| u == self.config.identity_url);
            if is_identity && request["method"] == "GET" {
                if let Some(id) = event.params["requestId"].as_str() {
                    break id.to_string();
                }
            }
        };
        debug!("Identity request {} sent", request_id);

        loop {
            let event = events.next().await?;
            if event.params["requestId"].as_str() != Some(request_id.as_str()) {
                continue;
            }
            match event.method.as_str() {
                "Network.loadingFinished" => break,
                "Network.loadingFailed" => {
                    let reason = event.params["errorText"].as_str().unwrap_or("unknown error");
                    return Err(CdpError::InvalidResponse(format!(
                        "Identity request failed: {}",
                        reason
                    )));
                }
                _ => {}
            }
        }

        self.page.get_response_body(&request_id).await
    }

    async fn click_match(&self) -> Result<(), CdpError> {
        let selector = &self.config.selectors.match_button;
        let button = self
            .page
            .wait_for_selector(selector, self.config.element_timeout)
            .await?;
        tokio::time::sleep(self.config.drawer_settle).await;
        self.page.click_node(button, selector).await
    }

    async fn screenshot_canvas(&self) -> Result<Vec<u8>, CdpError> {
        let selector = &self.config.selectors.canvas;
        let canvas = self
            .page
            .wait_for_selector(selector, self.config.element_timeout)
            .await?;
        let clip = self.page.element_clip(canvas, selector).await?;
        self.page.capture_png(clip).await
    }
}

#[async_trait]
impl GameUi for BrowserGameUi {
    async fn submit_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<IdentityResponse, UiError> {
        let body = self.login(credentials).await?;
        info!("Logged in as {}", credentials.name);
        Ok(IdentityResponse::new(body))
    }

    async fn request_match(&self) -> Result<(), UiError> {
        self.click_match().await?;
        info!("Match requested");
        Ok(())
    }

    async fn capture_frame(&self) -> Result<Vec<u8>, UiError> {
        self.screenshot_canvas().await.map_err(|e| match e {
            CdpError::ElementNotFound(s) => UiError::ElementNotFound(s),
            other => UiError::CaptureFailed(other.to_string()),
        })
    }

    async fn dispatch_input(&self, direction: Direction) -> Result<(), UiError> {
        let code = self.config.keys.code_for(direction);
        self.page.press_key(code).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "game_ui_tests.rs"]
mod tests;
