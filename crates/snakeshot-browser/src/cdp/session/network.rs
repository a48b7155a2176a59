//! Network domain operations for CDP page session.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Body of a finished response, decoded to text.
    pub async fn get_response_body(&self, request_id: &str) -> Result<String, CdpError> {
        let result = self
            .call(
                "Network.getResponseBody",
                Some(json!({"requestId": request_id})),
            )
            .await?;

        let body = result["body"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing response body".to_string()))?;

        if result["base64Encoded"].as_bool().unwrap_or(false) {
            let bytes = BASE64.decode(body)?;
            String::from_utf8(bytes)
                .map_err(|e| CdpError::InvalidResponse(format!("Response body is not UTF-8: {}", e)))
        } else {
            Ok(body.to_string())
        }
    }
}
