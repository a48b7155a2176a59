//! CDP protocol types and message definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// CDP response message.
///
/// Replies carry `id`; events carry `method` and `params` instead.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// CDP error in response.
#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

/// Page info from /json endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub title: String,
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
}

/// Browser version info.
///
/// Note: Chrome returns PascalCase field names for this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

// ============================================================================
// DOM Types
// ============================================================================

/// DOM node from CDP.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    pub node_id: i64,
    pub backend_node_id: Option<i64>,
    pub node_name: Option<String>,
}

/// Box model from CDP.
///
/// Each quad is four `x, y` corner pairs, clockwise from top-left.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxModel {
    pub content: Vec<f64>,
    pub padding: Vec<f64>,
    pub border: Vec<f64>,
    pub margin: Vec<f64>,
    pub width: i64,
    pub height: i64,
}

// ============================================================================
// Input Types
// ============================================================================

/// Mouse button.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
}

/// Mouse event type.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    MousePressed,
    MouseReleased,
    MouseMoved,
}

/// Key event type.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
    RawKeyDown,
    Char,
}

/// Everything `Input.dispatchKeyEvent` needs to reproduce a physical key.
///
/// Pages that listen on `KeyboardEvent.code` ignore events without it, and
/// older handlers still read `keyCode`, so both are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub key: String,
    pub code: String,
    pub text: Option<String>,
    pub key_code: u32,
}

impl KeyDefinition {
    /// Build the definition for a `KeyboardEvent.code` value such as `KeyW`.
    pub fn from_code(code: &str) -> Self {
        let (key, text, key_code) = if let Some(letter) = single_char(code.strip_prefix("Key")) {
            let lower = letter.to_ascii_lowercase();
            (lower.to_string(), Some(lower.to_string()), letter.to_ascii_uppercase() as u32)
        } else if let Some(digit) = single_char(code.strip_prefix("Digit")) {
            (digit.to_string(), Some(digit.to_string()), digit as u32)
        } else {
            match code {
                "ArrowLeft" => (code.to_string(), None, 37),
                "ArrowUp" => (code.to_string(), None, 38),
                "ArrowRight" => (code.to_string(), None, 39),
                "ArrowDown" => (code.to_string(), None, 40),
                "Space" => (" ".to_string(), Some(" ".to_string()), 32),
                "Enter" => ("Enter".to_string(), Some("\r".to_string()), 13),
                "Escape" => ("Escape".to_string(), None, 27),
                _ => (code.to_string(), None, 0),
            }
        };

        Self {
            key,
            code: code.to_string(),
            text,
            key_code,
        }
    }
}

fn single_char(rest: Option<&str>) -> Option<char> {
    let mut chars = rest?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c),
        _ => None,
    }
}

// ============================================================================
// Screenshot Types
// ============================================================================

/// Screenshot format.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    Jpeg,
    Png,
    Webp,
}

/// Viewport for screenshot clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    /// Axis-aligned rectangle enclosing a CDP quad, at scale 1.
    pub fn from_quad(quad: &[f64]) -> Option<Self> {
        if quad.len() < 8 {
            return None;
        }
        let xs = quad.iter().step_by(2);
        let ys = quad.iter().skip(1).step_by(2);
        let (min_x, max_x) = xs.fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let (min_y, max_y) = ys.fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
            scale: 1.0,
        })
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
