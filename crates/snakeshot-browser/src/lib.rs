//! Browser side of the snakeshot recorder.
//!
//! Drives the game page through the Chrome DevTools Protocol (CDP) and
//! implements the collaborator traits the session controller consumes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐    WebSocket     ┌──────────────────┐
//! │ SessionController│                  │   Chrome/Edge    │
//! │   BrowserGameUi  │ ◄──────────────► │  (game page with │
//! │   CdpPushChannel │       CDP        │   its own WS)    │
//! └──────────────────┘                  └──────────────────┘
//! ```
//!
//! The push channel never opens its own connection to the game server. It
//! observes the page's WebSocket through `Network.webSocketFrameReceived`
//! events, so the page and the recorder see exactly the same messages.
//!
//! ## Setup
//!
//! [`BrowserManager`] launches Chrome with remote debugging on its own
//! port and profile, or attaches to one already listening there:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```

pub mod cdp;
mod game_ui;
pub mod manager;
mod push;

#[cfg(test)]
pub(crate) mod mock_transport;

pub use cdp::{CdpClient, CdpError, CdpEvent, CdpTransport, PageSession, SessionEvents};
pub use game_ui::{BrowserGameUi, GameUiConfig, KeyBindings, SelectorSet};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use push::CdpPushChannel;
