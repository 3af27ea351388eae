//! Core domain types shared across the workspace.
//!
//! Catalog records (hotels, room types, photos) are read-only to the
//! dialogue engine; bookings are written once by the engine and mutated
//! afterwards only by staff tooling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Canonical timestamp type used across the workspace.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// =============================================================================
// Enums
// =============================================================================

/// Booking lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    CheckedIn,
    CheckedOut,
}

impl BookingStatus {
    /// Guest-facing emoji for this status.
    pub fn emoji(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "\u{23f3}",
            BookingStatus::Confirmed => "\u{2705}",
            BookingStatus::Cancelled => "\u{274c}",
            BookingStatus::CheckedIn => "\u{1f6ce}",
            BookingStatus::CheckedOut => "\u{1f44b}",
        }
    }

    /// Guest-facing label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending confirmation",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::CheckedIn => "Checked in",
            BookingStatus::CheckedOut => "Checked out",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::CheckedIn => write!(f, "checked_in"),
            BookingStatus::CheckedOut => write!(f, "checked_out"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "checked_in" => Ok(BookingStatus::CheckedIn),
            "checked_out" => Ok(BookingStatus::CheckedOut),
            _ => Err(format!("Unknown booking status: {}", s)),
        }
    }
}

// =============================================================================
// Catalog records (read-only to the engine)
// =============================================================================

/// Tenant-scoped hotel profile. At most one active hotel exists per
/// originating channel number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Channel number this hotel answers on (gateway identifier).
    pub channel_id: String,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub map_link: Option<String>,
    pub reception_hours: String,
    pub active: bool,
}

/// A bookable room category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomType {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub description: String,
    pub max_adults: u8,
    pub max_children: u8,
    /// Nightly base price in whole currency units. None means price on request.
    pub base_price: Option<i64>,
    pub amenities: Vec<String>,
    pub air_conditioned: bool,
    pub available: bool,
    pub display_order: i64,
}

/// An ordered photo attached to a room type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPhoto {
    pub id: Uuid,
    pub room_type_id: Uuid,
    pub url: String,
    pub position: i64,
}

// =============================================================================
// Bookings
// =============================================================================

/// Everything the dialogue flow collects before committing a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub hotel_id: Uuid,
    pub guest_name: String,
    pub contact_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u8,
    pub children: u8,
    pub room_type_id: Uuid,
    pub room_name: String,
    /// nights x base price; None when the room is price-on-request.
    pub total_price: Option<i64>,
}

/// A persisted booking row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub hotel_id: Uuid,
    /// Human-readable booking code, unique per store.
    pub code: String,
    pub guest_name: String,
    pub contact_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u8,
    pub children: u8,
    pub room_type_id: Uuid,
    pub room_name: String,
    pub total_price: Option<i64>,
    pub status: BookingStatus,
    pub document_refs: Vec<String>,
    pub created_at: Timestamp,
}

impl Booking {
    /// Stay length in nights. The store enforces `check_out > check_in`.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // ---- BookingStatus round-trips ----

    #[test]
    fn test_status_display_from_str_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::CheckedIn,
            BookingStatus::CheckedOut,
        ] {
            let parsed = BookingStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_from_str_unknown() {
        assert!(BookingStatus::from_str("no_show").is_err());
        assert!(BookingStatus::from_str("").is_err());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&BookingStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checked_in\"");
        let back: BookingStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BookingStatus::CheckedIn);
    }

    #[test]
    fn test_status_labels_and_emoji() {
        assert_eq!(BookingStatus::Pending.label(), "Pending confirmation");
        assert_eq!(BookingStatus::Confirmed.emoji(), "\u{2705}");
        assert_eq!(BookingStatus::Cancelled.emoji(), "\u{274c}");
    }

    // ---- Booking ----

    #[test]
    fn test_booking_nights() {
        let booking = Booking {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            code: "AB12CD34".to_string(),
            guest_name: "John Smith".to_string(),
            contact_id: "9198000000".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
            adults: 2,
            children: 0,
            room_type_id: Uuid::new_v4(),
            room_name: "Deluxe".to_string(),
            total_price: Some(4000),
            status: BookingStatus::Pending,
            document_refs: vec![],
            created_at: chrono::Utc::now(),
        };
        assert_eq!(booking.nights(), 2);
    }
}
