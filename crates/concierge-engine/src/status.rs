//! Booking status lookup: read-only code lookup with guided recovery.

use crate::replies;
use crate::state::DialogueState;
use crate::types::{EngineContext, Outcome, StepAction};

/// How many recent bookings the phone-based fallback lists.
pub const RECENT_BOOKINGS_LIMIT: u32 = 5;

/// The inbound text is the candidate code; the facade has already resolved
/// it into `ctx.booking_by_code`.
pub(crate) fn handle_check_booking_id(text: &str, ctx: &EngineContext) -> StepAction {
    let attempted = text.trim();
    if attempted.is_empty() {
        return StepAction::Reply(Outcome::reply(
            replies::ask_booking_code(),
            DialogueState::CheckBookingId,
        ));
    }
    match &ctx.booking_by_code {
        Some(booking) => StepAction::Reply(Outcome::reply(
            replies::status_card(booking),
            DialogueState::BookingStatusOptions {
                code: booking.code.clone(),
            },
        )),
        None => StepAction::Reply(Outcome::reply(
            replies::booking_not_found(attempted),
            DialogueState::BookingNotFound {
                attempted: attempted.to_string(),
            },
        )),
    }
}

pub(crate) fn handle_status_options(code: &str, text: &str) -> StepAction {
    match text.trim() {
        // Changes go through staff; the engine never mutates a booking.
        "1" => StepAction::Reply(Outcome::reply(
            replies::handoff_for_booking(code),
            DialogueState::HumanHandoff,
        )),
        "2" => StepAction::Reply(Outcome::reply(
            replies::handoff(),
            DialogueState::HumanHandoff,
        )),
        _ => StepAction::Reply(Outcome::reply(
            replies::dont_understand(),
            DialogueState::BookingStatusOptions {
                code: code.to_string(),
            },
        )),
    }
}

pub(crate) fn handle_not_found(attempted: &str, text: &str, ctx: &EngineContext) -> StepAction {
    match text.trim() {
        "1" => StepAction::Reply(Outcome::reply(
            replies::ask_booking_code(),
            DialogueState::CheckBookingId,
        )),
        "2" => {
            let reply = if ctx.recent_bookings.is_empty() {
                replies::no_recent_bookings()
            } else {
                replies::recent_bookings_list(&ctx.recent_bookings)
            };
            // The next message is treated as a code again.
            StepAction::Reply(Outcome::reply(reply, DialogueState::CheckBookingId))
        }
        "3" => StepAction::Reply(Outcome::reply(
            replies::handoff(),
            DialogueState::HumanHandoff,
        )),
        _ => StepAction::Reply(Outcome::reply(
            replies::dont_understand(),
            DialogueState::BookingNotFound {
                attempted: attempted.to_string(),
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use concierge_core::types::{Booking, BookingStatus, Hotel};
    use uuid::Uuid;

    fn sample_booking() -> Booking {
        Booking {
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
            room_name: "Deluxe King".to_string(),
            total_price: Some(4000),
            status: BookingStatus::Confirmed,
            document_refs: vec![],
            created_at: chrono::Utc::now(),
        }
    }

    fn ctx(found: Option<Booking>, recent: Vec<Booking>) -> EngineContext {
        EngineContext {
            today: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            hotel: Hotel {
                id: Uuid::new_v4(),
                tenant_id: Uuid::new_v4(),
                channel_id: "15550001111".to_string(),
                name: "Seaview Palace".to_string(),
                address: String::new(),
                contact_phone: String::new(),
                map_link: None,
                reception_hours: String::new(),
                active: true,
            },
            rooms: vec![],
            booking_by_code: found,
            recent_bookings: recent,
        }
    }

    fn reply_of(action: StepAction) -> Outcome {
        match action {
            StepAction::Reply(out) => out,
            other => panic!("expected Reply, got {:?}", other),
        }
    }

    #[test]
    fn test_hit_renders_status_card() {
        let out = reply_of(handle_check_booking_id("ab12cd34", &ctx(Some(sample_booking()), vec![])));
        assert!(out.reply.unwrap().contains("Confirmed"));
        assert_eq!(
            out.next,
            DialogueState::BookingStatusOptions {
                code: "AB12CD34".to_string()
            }
        );
    }

    #[test]
    fn test_miss_offers_recovery() {
        let out = reply_of(handle_check_booking_id("ZZZZ", &ctx(None, vec![])));
        assert!(out.reply.unwrap().contains("ZZZZ"));
        assert_eq!(
            out.next,
            DialogueState::BookingNotFound {
                attempted: "ZZZZ".to_string()
            }
        );
    }

    #[test]
    fn test_empty_text_asks_again() {
        let out = reply_of(handle_check_booking_id("   ", &ctx(None, vec![])));
        assert_eq!(out.next, DialogueState::CheckBookingId);
    }

    #[test]
    fn test_status_options_change_hands_off_with_code() {
        let out = reply_of(handle_status_options("AB12CD34", "1"));
        assert_eq!(out.next, DialogueState::HumanHandoff);
        assert!(out.reply.unwrap().contains("AB12CD34"));
    }

    #[test]
    fn test_status_options_unknown_stays() {
        let out = reply_of(handle_status_options("AB12CD34", "9"));
        assert!(matches!(out.next, DialogueState::BookingStatusOptions { .. }));
    }

    #[test]
    fn test_not_found_retry_goes_back_to_code_entry() {
        let out = reply_of(handle_not_found("ZZZZ", "1", &ctx(None, vec![])));
        assert_eq!(out.next, DialogueState::CheckBookingId);
    }

    #[test]
    fn test_not_found_recent_list() {
        let out = reply_of(handle_not_found("ZZZZ", "2", &ctx(None, vec![sample_booking()])));
        assert!(out.reply.unwrap().contains("AB12CD34"));
        assert_eq!(out.next, DialogueState::CheckBookingId);
    }

    #[test]
    fn test_not_found_no_recent_bookings() {
        let out = reply_of(handle_not_found("ZZZZ", "2", &ctx(None, vec![])));
        assert!(out.reply.unwrap().contains("couldn't find any bookings"));
    }

    #[test]
    fn test_not_found_handoff() {
        let out = reply_of(handle_not_found("ZZZZ", "3", &ctx(None, vec![])));
        assert_eq!(out.next, DialogueState::HumanHandoff);
    }
}
