//! Engine-facing value types: inbound events, prefetched context, and the
//! result of one dialogue step.

use chrono::NaiveDate;
use concierge_core::types::{Booking, BookingDraft, Hotel, RoomType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Inbound
// =============================================================================

/// MIME class of an inbound attachment, as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Document,
}

/// Descriptor for an inbound media attachment. The engine never sees the
/// bytes; the transfer handle is resolved by the media relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    /// Gateway transfer handle used to fetch the bytes.
    pub media_id: String,
    pub mime_type: String,
    pub filename: Option<String>,
}

/// One inbound message event from the messaging gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Channel number the message arrived on (selects the active hotel).
    pub channel_id: String,
    /// Originating contact identifier.
    pub contact_id: String,
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// Transcript direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

// =============================================================================
// Prefetched context
// =============================================================================

/// Everything the pure state machine needs for one step, prefetched by the
/// facade so the dialogue transform itself performs no I/O.
#[derive(Debug, Clone)]
pub struct EngineContext {
    /// Tenant-local calendar date, for check-in validation.
    pub today: NaiveDate,
    pub hotel: Hotel,
    /// Available rooms in display order.
    pub rooms: Vec<RoomType>,
    /// Resolved only when the session is awaiting a booking code.
    pub booking_by_code: Option<Booking>,
    /// Resolved only when the not-found branch may list recent bookings.
    pub recent_bookings: Vec<Booking>,
}

// =============================================================================
// Step results
// =============================================================================

/// Request to send a room's photo set after the text reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRequest {
    pub room_type_id: Uuid,
    pub caption: Option<String>,
}

/// An ordinary dialogue transition: reply text, next state, optional media.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// None only in handoff relay mode, where the engine stays silent.
    pub reply: Option<String>,
    pub next: crate::state::DialogueState,
    pub photos: Vec<PhotoRequest>,
}

impl Outcome {
    pub fn reply(text: String, next: crate::state::DialogueState) -> Self {
        Self {
            reply: Some(text),
            next,
            photos: Vec::new(),
        }
    }

    pub fn silent(next: crate::state::DialogueState) -> Self {
        Self {
            reply: None,
            next,
            photos: Vec::new(),
        }
    }

    pub fn with_photos(mut self, photos: Vec<PhotoRequest>) -> Self {
        self.photos = photos;
        self
    }
}

/// What the state machine asks the facade to do after one step.
///
/// `Reply` is self-contained; the other variants carry a persistence step
/// whose success or failure decides the reply and next state.
#[derive(Debug, Clone)]
pub enum StepAction {
    Reply(Outcome),
    /// Final confirmation reached: persist the booking.
    CommitBooking { draft: BookingDraft },
    /// An accepted identity-document upload to relay into storage.
    StoreDocument {
        booking_code: String,
        attachment: Attachment,
        /// Uploads already accepted before this one.
        received: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DialogueState;

    #[test]
    fn test_outcome_reply_helper() {
        let out = Outcome::reply("hello".to_string(), DialogueState::MainMenu);
        assert_eq!(out.reply.as_deref(), Some("hello"));
        assert!(out.photos.is_empty());
    }

    #[test]
    fn test_outcome_silent_helper() {
        let out = Outcome::silent(DialogueState::HumanHandoff);
        assert!(out.reply.is_none());
    }

    #[test]
    fn test_outcome_with_photos() {
        let id = Uuid::new_v4();
        let out = Outcome::reply("room".to_string(), DialogueState::MainMenu).with_photos(vec![
            PhotoRequest {
                room_type_id: id,
                caption: Some("Deluxe".to_string()),
            },
        ]);
        assert_eq!(out.photos.len(), 1);
        assert_eq!(out.photos[0].room_type_id, id);
    }

    #[test]
    fn test_attachment_kind_serde() {
        let json = serde_json::to_string(&AttachmentKind::Document).unwrap();
        assert_eq!(json, "\"document\"");
    }
}
