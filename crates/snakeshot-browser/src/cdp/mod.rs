//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome/Chromium via WebSocket and speaks the CDP JSON-RPC
//! protocol. Command replies are routed back to the caller by request id;
//! events are fanned out to every subscriber over a broadcast channel and
//! filtered per page session on the receiving side.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page(None).await?;
//! page.navigate("http://1.15.175.5/").await?;
//! ```

mod client;
mod error;
mod events;
mod protocol;
mod session;
mod transport;

pub use client::CdpClient;
pub use error::CdpError;
pub use events::{CdpEvent, SessionEvents};
pub use protocol::*;
pub use session::PageSession;
pub use transport::CdpTransport;
