//! Booking orchestration: the strictly ordered collection sub-flow.
//!
//! name -> check-in -> check-out -> adults -> children -> details
//! confirmation -> (room selection unless pre-selected) -> final price
//! confirmation -> commit. Invalid input at any step re-prompts without a
//! state change, so progress is never lost.

use concierge_core::types::BookingDraft;

use crate::state::{DialogueState, FrozenRoom, StayDetails};
use crate::types::{EngineContext, InboundEvent, Outcome, StepAction};
use crate::{dates, replies};

pub(crate) const MIN_NAME_LEN: usize = 2;
pub(crate) const MAX_ADULTS: u8 = 20;
pub(crate) const MAX_CHILDREN: u8 = 10;

/// nights x base price; None when the room is price-on-request.
pub fn total_price(room: &FrozenRoom, nights: i64) -> Option<i64> {
    room.base_price.map(|base| base * nights)
}

pub(crate) fn handle_name(room: &Option<FrozenRoom>, text: &str) -> StepAction {
    let name = text.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return StepAction::Reply(Outcome::reply(
            replies::invalid_name(),
            DialogueState::BookingName { room: room.clone() },
        ));
    }
    StepAction::Reply(Outcome::reply(
        replies::ask_checkin(name),
        DialogueState::BookingCheckIn {
            room: room.clone(),
            guest_name: name.to_string(),
        },
    ))
}

pub(crate) fn handle_check_in(
    room: &Option<FrozenRoom>,
    guest_name: &str,
    text: &str,
    ctx: &EngineContext,
) -> StepAction {
    let stay = DialogueState::BookingCheckIn {
        room: room.clone(),
        guest_name: guest_name.to_string(),
    };
    let Some(parsed) = dates::parse(text) else {
        return StepAction::Reply(Outcome::reply(replies::invalid_date(), stay));
    };
    if parsed.date < ctx.today {
        return StepAction::Reply(Outcome::reply(replies::checkin_before_today(), stay));
    }
    StepAction::Reply(Outcome::reply(
        replies::ask_checkout(&parsed.display),
        DialogueState::BookingCheckOut {
            room: room.clone(),
            guest_name: guest_name.to_string(),
            check_in: parsed.date,
        },
    ))
}

pub(crate) fn handle_check_out(
    room: &Option<FrozenRoom>,
    guest_name: &str,
    check_in: chrono::NaiveDate,
    text: &str,
) -> StepAction {
    let stay = DialogueState::BookingCheckOut {
        room: room.clone(),
        guest_name: guest_name.to_string(),
        check_in,
    };
    let Some(parsed) = dates::parse(text) else {
        return StepAction::Reply(Outcome::reply(replies::invalid_date(), stay));
    };
    if parsed.date <= check_in {
        return StepAction::Reply(Outcome::reply(
            replies::checkout_not_after(&dates::display(check_in)),
            stay,
        ));
    }
    StepAction::Reply(Outcome::reply(
        replies::ask_adults(),
        DialogueState::BookingAdults {
            room: room.clone(),
            guest_name: guest_name.to_string(),
            check_in,
            check_out: parsed.date,
        },
    ))
}

pub(crate) fn handle_adults(
    room: &Option<FrozenRoom>,
    guest_name: &str,
    check_in: chrono::NaiveDate,
    check_out: chrono::NaiveDate,
    text: &str,
) -> StepAction {
    let stay = DialogueState::BookingAdults {
        room: room.clone(),
        guest_name: guest_name.to_string(),
        check_in,
        check_out,
    };
    match text.trim().parse::<u8>() {
        Ok(adults) if (1..=MAX_ADULTS).contains(&adults) => StepAction::Reply(Outcome::reply(
            replies::ask_children(),
            DialogueState::BookingChildren {
                room: room.clone(),
                guest_name: guest_name.to_string(),
                check_in,
                check_out,
                adults,
            },
        )),
        _ => StepAction::Reply(Outcome::reply(replies::invalid_adults(), stay)),
    }
}

pub(crate) fn handle_children(
    room: &Option<FrozenRoom>,
    guest_name: &str,
    check_in: chrono::NaiveDate,
    check_out: chrono::NaiveDate,
    adults: u8,
    text: &str,
) -> StepAction {
    let stay = DialogueState::BookingChildren {
        room: room.clone(),
        guest_name: guest_name.to_string(),
        check_in,
        check_out,
        adults,
    };
    match text.trim().parse::<u8>() {
        Ok(children) if children <= MAX_CHILDREN => {
            let details = StayDetails {
                guest_name: guest_name.to_string(),
                check_in,
                check_out,
                adults,
                children,
            };
            StepAction::Reply(Outcome::reply(
                replies::confirm_details(&details, room.as_ref()),
                DialogueState::BookingConfirmDetails {
                    room: room.clone(),
                    details,
                },
            ))
        }
        _ => StepAction::Reply(Outcome::reply(replies::invalid_children(), stay)),
    }
}

pub(crate) fn handle_confirm_details(
    room: &Option<FrozenRoom>,
    details: &StayDetails,
    text: &str,
    ctx: &EngineContext,
) -> StepAction {
    match text.trim() {
        "1" => {
            // Pre-selected room carries through only if it still fits the party.
            if let Some(room) = room {
                if room.fits(details.adults, details.children) {
                    return StepAction::Reply(Outcome::reply(
                        replies::final_confirm(details, room),
                        DialogueState::BookingFinalConfirm {
                            details: details.clone(),
                            room: room.clone(),
                        },
                    ));
                }
            }
            offer_room_selection(details, ctx)
        }
        "2" => StepAction::Reply(Outcome::reply(
            replies::ask_name(),
            DialogueState::BookingName { room: room.clone() },
        )),
        _ => StepAction::Reply(Outcome::reply(
            replies::dont_understand(),
            DialogueState::BookingConfirmDetails {
                room: room.clone(),
                details: details.clone(),
            },
        )),
    }
}

/// Freeze the capacity-filtered room list for selection. An empty list is
/// the catalog-empty branch, not an error.
fn offer_room_selection(details: &StayDetails, ctx: &EngineContext) -> StepAction {
    let shown: Vec<FrozenRoom> = ctx
        .rooms
        .iter()
        .map(FrozenRoom::from)
        .filter(|room| room.fits(details.adults, details.children))
        .collect();
    if shown.is_empty() {
        return StepAction::Reply(Outcome::reply(
            replies::no_rooms_fit(),
            DialogueState::MainMenu,
        ));
    }
    StepAction::Reply(Outcome::reply(
        replies::room_select(&shown, details.nights()),
        DialogueState::BookingRoomSelect {
            details: details.clone(),
            shown,
        },
    ))
}

pub(crate) fn handle_room_select(
    details: &StayDetails,
    shown: &[FrozenRoom],
    text: &str,
) -> StepAction {
    let stay = DialogueState::BookingRoomSelect {
        details: details.clone(),
        shown: shown.to_vec(),
    };
    match text.trim().parse::<usize>() {
        Ok(choice) if choice >= 1 && choice <= shown.len() => {
            let room = shown[choice - 1].clone();
            StepAction::Reply(Outcome::reply(
                replies::final_confirm(details, &room),
                DialogueState::BookingFinalConfirm {
                    details: details.clone(),
                    room,
                },
            ))
        }
        _ => StepAction::Reply(Outcome::reply(replies::dont_understand(), stay)),
    }
}

pub(crate) fn handle_final_confirm(
    details: &StayDetails,
    room: &FrozenRoom,
    event: &InboundEvent,
    ctx: &EngineContext,
) -> StepAction {
    let token = event.text.trim().to_lowercase();
    if token == "1" || token == "yes" || token == "confirm" {
        let draft = BookingDraft {
            hotel_id: ctx.hotel.id,
            guest_name: details.guest_name.clone(),
            contact_id: event.contact_id.clone(),
            check_in: details.check_in,
            check_out: details.check_out,
            adults: details.adults,
            children: details.children,
            room_type_id: room.id,
            room_name: room.name.clone(),
            total_price: total_price(room, details.nights()),
        };
        return StepAction::CommitBooking { draft };
    }
    StepAction::Reply(Outcome::reply(
        replies::dont_understand(),
        DialogueState::BookingFinalConfirm {
            details: details.clone(),
            room: room.clone(),
        },
    ))
}
