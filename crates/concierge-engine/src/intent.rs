//! Keyword intent detection for free text at the main menu.
//!
//! Pure substring matching against five fixed keyword sets, tried in a
//! fixed priority order; first match wins. Never consulted inside a
//! multi-step flow, so a stray keyword cannot derail a partial booking.

/// Coarse guest intent, classified from free text. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestIntent {
    Rooms,
    Book,
    Location,
    Reception,
    Status,
    None,
}

const ROOMS_KEYWORDS: [&str; 5] = ["room", "availability", "available", "suite", "accommodation"];
const BOOK_KEYWORDS: [&str; 4] = ["book", "reserve", "reservation", "stay"];
const LOCATION_KEYWORDS: [&str; 5] = ["location", "address", "direction", "map", "where"];
const RECEPTION_KEYWORDS: [&str; 5] = ["hour", "timing", "open", "close", "front desk"];
const STATUS_KEYWORDS: [&str; 3] = ["status", "my booking", "track"];

/// Classify lowercased free text. Priority order is fixed: rooms, book,
/// location, reception, status.
pub fn detect(lowercased: &str) -> GuestIntent {
    let sets: [(&[&str], GuestIntent); 5] = [
        (&ROOMS_KEYWORDS, GuestIntent::Rooms),
        (&BOOK_KEYWORDS, GuestIntent::Book),
        (&LOCATION_KEYWORDS, GuestIntent::Location),
        (&RECEPTION_KEYWORDS, GuestIntent::Reception),
        (&STATUS_KEYWORDS, GuestIntent::Status),
    ];
    for (keywords, intent) in sets {
        if keywords.iter().any(|kw| lowercased.contains(kw)) {
            return intent;
        }
    }
    GuestIntent::None
}
