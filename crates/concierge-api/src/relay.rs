//! Messaging-gateway client: the engine's `MediaRelay` over HTTP.
//!
//! Covers the four relay operations: inbound media transfer, document
//! storage, text sends, and image sends. All calls carry the configured
//! bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use concierge_core::config::GatewayConfig;
use concierge_core::error::ConciergeError;
use concierge_engine::capabilities::MediaRelay;
use concierge_engine::error::EngineError;

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    message_id: String,
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    #[serde(rename = "ref")]
    storage_ref: String,
}

/// HTTP client for the messaging gateway's REST surface.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, ConciergeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConciergeError::Gateway(format!("Failed to build client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn relay_err(context: &str, e: impl std::fmt::Display) -> EngineError {
        EngineError::Relay(format!("{}: {}", context, e))
    }
}

#[async_trait]
impl MediaRelay for GatewayClient {
    async fn fetch_inbound_media(
        &self,
        media_id: &str,
    ) -> Result<(Vec<u8>, String), EngineError> {
        let response = self
            .http
            .get(format!("{}/media/{}", self.base_url, media_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Self::relay_err("media fetch failed", e))?
            .error_for_status()
            .map_err(|e| Self::relay_err("media fetch rejected", e))?;

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::relay_err("media body read failed", e))?;
        Ok((bytes.to_vec(), mime_type))
    }

    async fn store_document(
        &self,
        booking_code: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, EngineError> {
        let response = self
            .http
            .post(format!(
                "{}/bookings/{}/documents",
                self.base_url, booking_code
            ))
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| Self::relay_err("document upload failed", e))?
            .error_for_status()
            .map_err(|e| Self::relay_err("document upload rejected", e))?;

        let stored: StoredDocument = response
            .json()
            .await
            .map_err(|e| Self::relay_err("document response malformed", e))?;
        Ok(stored.storage_ref)
    }

    async fn send_text(&self, contact_id: &str, text: &str) -> Result<String, EngineError> {
        self.send_message(OutboundMessage {
            to: contact_id,
            kind: "text",
            text: Some(text),
            url: None,
            caption: None,
        })
        .await
    }

    async fn send_image(
        &self,
        contact_id: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<String, EngineError> {
        self.send_message(OutboundMessage {
            to: contact_id,
            kind: "image",
            text: None,
            url: Some(url),
            caption,
        })
        .await
    }
}

impl GatewayClient {
    async fn send_message(&self, message: OutboundMessage<'_>) -> Result<String, EngineError> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.api_token)
            .json(&message)
            .send()
            .await
            .map_err(|e| Self::relay_err("send failed", e))?
            .error_for_status()
            .map_err(|e| Self::relay_err("send rejected", e))?;

        let message_ref: MessageRef = response
            .json()
            .await
            .map_err(|e| Self::relay_err("send response malformed", e))?;
        Ok(message_ref.message_id)
    }
}
