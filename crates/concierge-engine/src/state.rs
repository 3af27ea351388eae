//! Typed dialogue state.
//!
//! Each state variant carries only the fields meaningful to that state and
//! its successors, so invalid field combinations cannot be represented.
//! Returning to the main menu discards flow data by construction. The enum
//! serializes as tagged JSON and is the durable payload of the session row.

use chrono::NaiveDate;
use concierge_core::types::{RoomType, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Menu snapshot of a room, captured at display time. Numeric selections
/// resolve against this frozen list, never against a live catalog re-query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenRoom {
    pub id: Uuid,
    pub name: String,
    pub base_price: Option<i64>,
    pub max_adults: u8,
    pub max_children: u8,
}

impl From<&RoomType> for FrozenRoom {
    fn from(room: &RoomType) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            base_price: room.base_price,
            max_adults: room.max_adults,
            max_children: room.max_children,
        }
    }
}

impl FrozenRoom {
    pub fn fits(&self, adults: u8, children: u8) -> bool {
        adults <= self.max_adults && children <= self.max_children
    }
}

/// Guest details collected by the booking flow, complete up to room choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayDetails {
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u8,
    pub children: u8,
}

impl StayDetails {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// The dialogue state machine's states, one variant per dialogue position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum DialogueState {
    Welcome,
    MainMenu,
    RoomsList {
        shown: Vec<FrozenRoom>,
    },
    RoomDetail {
        room: FrozenRoom,
    },
    Location,
    HumanHandoff,
    BookingName {
        /// Pre-selected room when the flow started from a room detail view.
        room: Option<FrozenRoom>,
    },
    BookingCheckIn {
        room: Option<FrozenRoom>,
        guest_name: String,
    },
    BookingCheckOut {
        room: Option<FrozenRoom>,
        guest_name: String,
        check_in: NaiveDate,
    },
    BookingAdults {
        room: Option<FrozenRoom>,
        guest_name: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    BookingChildren {
        room: Option<FrozenRoom>,
        guest_name: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u8,
    },
    BookingConfirmDetails {
        room: Option<FrozenRoom>,
        details: StayDetails,
    },
    BookingRoomSelect {
        details: StayDetails,
        shown: Vec<FrozenRoom>,
    },
    BookingFinalConfirm {
        details: StayDetails,
        room: FrozenRoom,
    },
    IdUploadPrompt {
        booking_code: String,
    },
    IdUploadWaiting {
        booking_code: String,
        received: u8,
    },
    CheckBookingId,
    BookingStatusOptions {
        code: String,
    },
    BookingNotFound {
        attempted: String,
    },
}

impl DialogueState {
    /// True while the document-intake sub-flow owns raw text, which exempts
    /// the state from global command interception.
    pub fn owns_raw_input(&self) -> bool {
        matches!(self, DialogueState::IdUploadWaiting { .. })
    }
}

/// Durable per-contact dialogue session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub state: DialogueState,
    pub last_interaction_at: Timestamp,
}

impl Session {
    /// Fresh session in the initial state, created lazily on first contact.
    pub fn new() -> Self {
        Self {
            state: DialogueState::Welcome,
            last_interaction_at: chrono::Utc::now(),
        }
    }

    pub fn advance(state: DialogueState) -> Self {
        Self {
            state,
            last_interaction_at: chrono::Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
