//! Route handler functions for the webhook edge.
//!
//! The webhook payload mirrors the gateway's delivery format and is mapped
//! onto the engine's `InboundEvent` before dispatch.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use concierge_engine::types::{Attachment, AttachmentKind, InboundEvent};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Payload types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AttachmentPayload {
    /// "image" or "document".
    pub kind: String,
    pub media_id: String,
    pub mime_type: String,
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InboundPayload {
    /// Channel number the message arrived on.
    pub channel_id: String,
    /// Originating contact identifier.
    pub from: String,
    #[serde(default)]
    pub text: String,
    pub attachment: Option<AttachmentPayload>,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /webhook
///
/// Processes one inbound gateway event. A 500 response tells the gateway
/// to redeliver; anything handled (including unconfigured channels and
/// unrecognized guest input) is a 200.
pub async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<InboundPayload>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let attachment = match payload.attachment {
        Some(att) => Some(Attachment {
            kind: parse_kind(&att.kind)?,
            media_id: att.media_id,
            mime_type: att.mime_type,
            filename: att.filename,
        }),
        None => None,
    };

    let event = InboundEvent {
        channel_id: payload.channel_id,
        contact_id: payload.from,
        text: payload.text,
        attachment,
    };

    state
        .engine
        .handle_inbound(event)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(WebhookResponse { status: "ok" }))
}

fn parse_kind(kind: &str) -> Result<AttachmentKind, ApiError> {
    match kind {
        "image" => Ok(AttachmentKind::Image),
        "document" => Ok(AttachmentKind::Document),
        other => Err(ApiError::BadRequest(format!(
            "Unknown attachment kind: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_accepts_known_kinds() {
        assert!(matches!(parse_kind("image"), Ok(AttachmentKind::Image)));
        assert!(matches!(
            parse_kind("document"),
            Ok(AttachmentKind::Document)
        ));
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        assert!(parse_kind("video").is_err());
        assert!(parse_kind("").is_err());
    }

    #[test]
    fn test_inbound_payload_text_defaults_empty() {
        let payload: InboundPayload = serde_json::from_str(
            r#"{"channel_id": "15550001111", "from": "9198000000"}"#,
        )
        .unwrap();
        assert_eq!(payload.text, "");
        assert!(payload.attachment.is_none());
    }
}
