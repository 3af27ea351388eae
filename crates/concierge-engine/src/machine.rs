//! Dialogue state machine dispatch.
//!
//! `step` is a pure, synchronous transform of (session, inbound message,
//! prefetched context) into a `StepAction`. Dispatch order: global command
//! interceptor (skipped while the upload flow owns raw input), then
//! free-text intent detection at the main menu, then the state-keyed
//! handler. Unrecognized input never changes state.

use crate::commands::{self, Command};
use crate::intent::{self, GuestIntent};
use crate::state::{DialogueState, FrozenRoom, Session};
use crate::types::{EngineContext, InboundEvent, Outcome, PhotoRequest, StepAction};
use crate::{booking, documents, replies, status};

/// Process one inbound message against the current session.
pub fn step(session: &Session, event: &InboundEvent, ctx: &EngineContext) -> StepAction {
    let text = event.text.trim();
    let lower = text.to_lowercase();

    // "0" doubles as a valid answer where a zero count is legal; there it
    // belongs to the flow, not the interceptor.
    let zero_is_flow_input =
        lower == "0" && matches!(session.state, DialogueState::BookingChildren { .. });

    if !session.state.owns_raw_input() && !zero_is_flow_input {
        if let Some(command) = commands::intercept(&lower) {
            match command {
                Command::MainMenu => {
                    return reply(replies::main_menu(&ctx.hotel), DialogueState::MainMenu)
                }
                Command::Handoff => {
                    return reply(replies::handoff(), DialogueState::HumanHandoff)
                }
                Command::Greeting => {
                    // Greetings never interrupt a live handoff.
                    if session.state != DialogueState::HumanHandoff {
                        return reply(replies::welcome(&ctx.hotel), DialogueState::MainMenu);
                    }
                }
            }
        }
    }

    match &session.state {
        DialogueState::Welcome => reply(replies::welcome(&ctx.hotel), DialogueState::MainMenu),
        DialogueState::MainMenu => handle_main_menu(&lower, ctx),
        DialogueState::RoomsList { shown } => handle_rooms_list(shown, text, ctx),
        DialogueState::RoomDetail { room } => handle_room_detail(room, &lower),
        DialogueState::Location => reply(replies::dont_understand(), DialogueState::Location),
        // Relay mode: staff are talking; the engine stays silent.
        DialogueState::HumanHandoff => {
            StepAction::Reply(Outcome::silent(DialogueState::HumanHandoff))
        }
        DialogueState::BookingName { room } => booking::handle_name(room, text),
        DialogueState::BookingCheckIn { room, guest_name } => {
            booking::handle_check_in(room, guest_name, text, ctx)
        }
        DialogueState::BookingCheckOut {
            room,
            guest_name,
            check_in,
        } => booking::handle_check_out(room, guest_name, *check_in, text),
        DialogueState::BookingAdults {
            room,
            guest_name,
            check_in,
            check_out,
        } => booking::handle_adults(room, guest_name, *check_in, *check_out, text),
        DialogueState::BookingChildren {
            room,
            guest_name,
            check_in,
            check_out,
            adults,
        } => booking::handle_children(room, guest_name, *check_in, *check_out, *adults, text),
        DialogueState::BookingConfirmDetails { room, details } => {
            booking::handle_confirm_details(room, details, text, ctx)
        }
        DialogueState::BookingRoomSelect { details, shown } => {
            booking::handle_room_select(details, shown, text)
        }
        DialogueState::BookingFinalConfirm { details, room } => {
            booking::handle_final_confirm(details, room, event, ctx)
        }
        DialogueState::IdUploadPrompt { booking_code } => {
            documents::handle_upload_prompt(booking_code, event)
        }
        DialogueState::IdUploadWaiting {
            booking_code,
            received,
        } => documents::handle_upload_waiting(booking_code, *received, event),
        DialogueState::CheckBookingId => status::handle_check_booking_id(text, ctx),
        DialogueState::BookingStatusOptions { code } => {
            status::handle_status_options(code, text)
        }
        DialogueState::BookingNotFound { attempted } => {
            status::handle_not_found(attempted, text, ctx)
        }
    }
}

fn reply(text: String, next: DialogueState) -> StepAction {
    StepAction::Reply(Outcome::reply(text, next))
}

fn handle_main_menu(lower: &str, ctx: &EngineContext) -> StepAction {
    // Numeric menu choices take precedence over keyword intents.
    match lower {
        "1" => return show_rooms(ctx),
        "2" => return start_booking(),
        "3" => return reply(replies::location(&ctx.hotel), DialogueState::Location),
        "4" => return reply(replies::reception_hours(&ctx.hotel), DialogueState::MainMenu),
        "5" => return reply(replies::ask_booking_code(), DialogueState::CheckBookingId),
        "6" => return reply(replies::handoff(), DialogueState::HumanHandoff),
        _ => {}
    }
    match intent::detect(lower) {
        GuestIntent::Rooms => show_rooms(ctx),
        GuestIntent::Book => start_booking(),
        GuestIntent::Location => reply(replies::location(&ctx.hotel), DialogueState::Location),
        GuestIntent::Reception => {
            reply(replies::reception_hours(&ctx.hotel), DialogueState::MainMenu)
        }
        GuestIntent::Status => reply(replies::ask_booking_code(), DialogueState::CheckBookingId),
        GuestIntent::None => reply(replies::dont_understand(), DialogueState::MainMenu),
    }
}

/// Freeze the displayed room list into the session so later numeric
/// replies resolve against exactly what the guest saw.
fn show_rooms(ctx: &EngineContext) -> StepAction {
    if ctx.rooms.is_empty() {
        return reply(replies::no_rooms(), DialogueState::MainMenu);
    }
    let shown: Vec<FrozenRoom> = ctx.rooms.iter().map(FrozenRoom::from).collect();
    reply(replies::rooms_list(&ctx.rooms), DialogueState::RoomsList { shown })
}

fn start_booking() -> StepAction {
    reply(replies::ask_name(), DialogueState::BookingName { room: None })
}

fn handle_rooms_list(shown: &[FrozenRoom], text: &str, ctx: &EngineContext) -> StepAction {
    match text.parse::<usize>() {
        Ok(choice) if choice >= 1 && choice <= shown.len() => {
            let frozen = &shown[choice - 1];
            // Render from the live catalog when the room still exists;
            // selection itself is resolved from the frozen snapshot.
            let body = match ctx.rooms.iter().find(|r| r.id == frozen.id) {
                Some(live) => replies::room_detail(live),
                None => replies::room_detail_frozen(frozen),
            };
            StepAction::Reply(
                Outcome::reply(body, DialogueState::RoomDetail {
                    room: frozen.clone(),
                })
                .with_photos(vec![PhotoRequest {
                    room_type_id: frozen.id,
                    caption: Some(frozen.name.clone()),
                }]),
            )
        }
        _ => reply(
            replies::dont_understand(),
            DialogueState::RoomsList {
                shown: shown.to_vec(),
            },
        ),
    }
}

fn handle_room_detail(room: &FrozenRoom, lower: &str) -> StepAction {
    if lower == "1" || lower == "book" {
        return reply(
            replies::ask_name(),
            DialogueState::BookingName {
                room: Some(room.clone()),
            },
        );
    }
    reply(
        replies::dont_understand(),
        DialogueState::RoomDetail { room: room.clone() },
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use concierge_core::types::{Hotel, RoomType};
    use uuid::Uuid;

    fn sample_hotel() -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            channel_id: "15550001111".to_string(),
            name: "Seaview Palace".to_string(),
            address: "12 Beach Road, Goa".to_string(),
            contact_phone: "+91 98000 00000".to_string(),
            map_link: None,
            reception_hours: "7:00-23:00".to_string(),
            active: true,
        }
    }

    fn room(name: &str, price: Option<i64>, order: i64) -> RoomType {
        RoomType {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{} description", name),
            max_adults: 2,
            max_children: 1,
            base_price: price,
            amenities: vec![],
            air_conditioned: true,
            available: true,
            display_order: order,
        }
    }

    fn ctx_with_rooms(rooms: Vec<RoomType>) -> EngineContext {
        EngineContext {
            today: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            hotel: sample_hotel(),
            rooms,
            booking_by_code: None,
            recent_bookings: vec![],
        }
    }

    fn event(text: &str) -> InboundEvent {
        InboundEvent {
            channel_id: "15550001111".to_string(),
            contact_id: "9198000000".to_string(),
            text: text.to_string(),
            attachment: None,
        }
    }

    fn session(state: DialogueState) -> Session {
        Session::advance(state)
    }

    fn reply_of(action: StepAction) -> Outcome {
        match action {
            StepAction::Reply(out) => out,
            other => panic!("expected Reply, got {:?}", other),
        }
    }

    // ---- Welcome and greetings ----

    #[test]
    fn test_first_message_yields_welcome_menu() {
        let ctx = ctx_with_rooms(vec![]);
        let out = reply_of(step(&session(DialogueState::Welcome), &event("qwerty"), &ctx));
        assert!(out.reply.unwrap().contains("Welcome to *Seaview Palace*"));
        assert_eq!(out.next, DialogueState::MainMenu);
    }

    #[test]
    fn test_greeting_resets_to_menu_from_flow() {
        let ctx = ctx_with_rooms(vec![]);
        let state = DialogueState::BookingName { room: None };
        let out = reply_of(step(&session(state), &event("hello"), &ctx));
        assert_eq!(out.next, DialogueState::MainMenu);
    }

    #[test]
    fn test_greeting_does_not_interrupt_handoff() {
        let ctx = ctx_with_rooms(vec![]);
        let out = reply_of(step(&session(DialogueState::HumanHandoff), &event("hi"), &ctx));
        assert_eq!(out.next, DialogueState::HumanHandoff);
        assert!(out.reply.is_none());
    }

    // ---- Global reset ----

    #[test]
    fn test_menu_reset_is_idempotent_across_states() {
        let ctx = ctx_with_rooms(vec![room("Deluxe", Some(2000), 0)]);
        let states = vec![
            DialogueState::MainMenu,
            DialogueState::Location,
            DialogueState::HumanHandoff,
            DialogueState::BookingCheckIn {
                room: None,
                guest_name: "John".to_string(),
            },
            DialogueState::CheckBookingId,
            DialogueState::IdUploadPrompt {
                booking_code: "AB12CD34".to_string(),
            },
        ];
        let mut seen: Option<String> = None;
        for state in states {
            let out = reply_of(step(&session(state), &event("0"), &ctx));
            assert_eq!(out.next, DialogueState::MainMenu);
            let text = out.reply.unwrap();
            if let Some(prev) = &seen {
                assert_eq!(&text, prev, "reset reply must be identical from every state");
            }
            seen = Some(text);
        }
    }

    #[test]
    fn test_menu_reset_excluded_in_upload_waiting() {
        // Deliberate contract decision: the upload flow owns raw text, so
        // "0" is flow input there, not a global reset.
        let ctx = ctx_with_rooms(vec![]);
        let state = DialogueState::IdUploadWaiting {
            booking_code: "AB12CD34".to_string(),
            received: 2,
        };
        let out = reply_of(step(&session(state.clone()), &event("0"), &ctx));
        assert_eq!(out.next, state);
    }

    #[test]
    fn test_zero_children_is_a_count_not_a_reset() {
        let ctx = ctx_with_rooms(vec![room("Deluxe", Some(2000), 0)]);
        let state = DialogueState::BookingChildren {
            room: None,
            guest_name: "John Smith".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
            adults: 2,
        };
        let out = reply_of(step(&session(state), &event("0"), &ctx));
        assert!(matches!(out.next, DialogueState::BookingConfirmDetails { .. }));
        assert!(out.reply.unwrap().contains("2 adults, 0 children"));

        // "menu" still resets from the same state.
        let state = DialogueState::BookingChildren {
            room: None,
            guest_name: "John Smith".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
            adults: 2,
        };
        let out = reply_of(step(&session(state), &event("menu"), &ctx));
        assert_eq!(out.next, DialogueState::MainMenu);
    }

    #[test]
    fn test_handoff_tokens_from_any_state() {
        let ctx = ctx_with_rooms(vec![]);
        for token in ["#", "human", "staff", "help", "reception"] {
            let out = reply_of(step(&session(DialogueState::MainMenu), &event(token), &ctx));
            assert_eq!(out.next, DialogueState::HumanHandoff, "token {:?}", token);
        }
    }

    // ---- Main menu ----

    #[test]
    fn test_menu_numbers_route() {
        let ctx = ctx_with_rooms(vec![room("Deluxe", Some(2000), 0)]);
        let cases: Vec<(&str, DialogueState)> = vec![
            ("3", DialogueState::Location),
            ("4", DialogueState::MainMenu),
            ("5", DialogueState::CheckBookingId),
            ("6", DialogueState::HumanHandoff),
        ];
        for (input, expected) in cases {
            let out = reply_of(step(&session(DialogueState::MainMenu), &event(input), &ctx));
            assert_eq!(out.next, expected, "input {:?}", input);
        }

        let out = reply_of(step(&session(DialogueState::MainMenu), &event("1"), &ctx));
        assert!(matches!(out.next, DialogueState::RoomsList { .. }));

        let out = reply_of(step(&session(DialogueState::MainMenu), &event("2"), &ctx));
        assert_eq!(out.next, DialogueState::BookingName { room: None });
    }

    #[test]
    fn test_menu_free_text_intent_routing() {
        let ctx = ctx_with_rooms(vec![room("Deluxe", Some(2000), 0)]);
        let out = reply_of(step(
            &session(DialogueState::MainMenu),
            &event("do you have any rooms available"),
            &ctx,
        ));
        assert!(matches!(out.next, DialogueState::RoomsList { .. }));

        let out = reply_of(step(
            &session(DialogueState::MainMenu),
            &event("i want to reserve"),
            &ctx,
        ));
        assert_eq!(out.next, DialogueState::BookingName { room: None });
    }

    #[test]
    fn test_menu_unrecognized_does_not_change_state() {
        let ctx = ctx_with_rooms(vec![]);
        let out = reply_of(step(
            &session(DialogueState::MainMenu),
            &event("zzzzzz"),
            &ctx,
        ));
        assert_eq!(out.next, DialogueState::MainMenu);
        assert!(out.reply.unwrap().contains("didn't catch"));
    }

    #[test]
    fn test_intent_not_consulted_mid_flow() {
        // A name containing a keyword must not derail the booking flow.
        let ctx = ctx_with_rooms(vec![]);
        let state = DialogueState::BookingName { room: None };
        let out = reply_of(step(&session(state), &event("Roomina Bookman"), &ctx));
        assert!(matches!(out.next, DialogueState::BookingCheckIn { .. }));
    }

    // ---- Rooms list ----

    #[test]
    fn test_rooms_empty_catalog_returns_to_menu() {
        let ctx = ctx_with_rooms(vec![]);
        let out = reply_of(step(&session(DialogueState::MainMenu), &event("1"), &ctx));
        assert_eq!(out.next, DialogueState::MainMenu);
        assert!(out.reply.unwrap().contains("don't have any rooms"));
    }

    #[test]
    fn test_rooms_list_selection_sends_photos() {
        let rooms = vec![room("Standard", Some(1500), 0), room("Deluxe", Some(2000), 1)];
        let ctx = ctx_with_rooms(rooms.clone());
        let shown: Vec<FrozenRoom> = rooms.iter().map(FrozenRoom::from).collect();
        let out = reply_of(step(
            &session(DialogueState::RoomsList { shown: shown.clone() }),
            &event("2"),
            &ctx,
        ));
        assert_eq!(out.photos.len(), 1);
        assert_eq!(out.photos[0].room_type_id, shown[1].id);
        assert!(matches!(out.next, DialogueState::RoomDetail { .. }));
    }

    #[test]
    fn test_frozen_menu_selection_survives_catalog_mutation() {
        let room_a = room("Alpha", Some(1000), 0);
        let room_b = room("Bravo", Some(2000), 1);
        let room_c = room("Charlie", Some(3000), 2);
        let shown: Vec<FrozenRoom> =
            [&room_a, &room_b, &room_c].into_iter().map(FrozenRoom::from).collect();

        // Room B is removed from the catalog between messages.
        let ctx = ctx_with_rooms(vec![room_a.clone(), room_c.clone()]);
        let out = reply_of(step(
            &session(DialogueState::RoomsList { shown: shown.clone() }),
            &event("2"),
            &ctx,
        ));
        match out.next {
            DialogueState::RoomDetail { room } => {
                assert_eq!(room.id, room_b.id, "selection must resolve to the displayed item");
                assert_eq!(room.name, "Bravo");
            }
            other => panic!("expected RoomDetail, got {:?}", other),
        }
        assert!(out.reply.unwrap().contains("Bravo"));
    }

    #[test]
    fn test_rooms_list_out_of_range_stays() {
        let rooms = vec![room("Standard", Some(1500), 0)];
        let ctx = ctx_with_rooms(rooms.clone());
        let shown: Vec<FrozenRoom> = rooms.iter().map(FrozenRoom::from).collect();
        let out = reply_of(step(
            &session(DialogueState::RoomsList { shown }),
            &event("5"),
            &ctx,
        ));
        assert!(matches!(out.next, DialogueState::RoomsList { .. }));
    }

    // ---- Room detail ----

    #[test]
    fn test_room_detail_book_preselects_room() {
        let ctx = ctx_with_rooms(vec![]);
        let frozen = FrozenRoom {
            id: Uuid::new_v4(),
            name: "Deluxe".to_string(),
            base_price: Some(2000),
            max_adults: 2,
            max_children: 1,
        };
        for input in ["1", "book", "BOOK"] {
            let out = reply_of(step(
                &session(DialogueState::RoomDetail { room: frozen.clone() }),
                &event(input),
                &ctx,
            ));
            assert_eq!(
                out.next,
                DialogueState::BookingName {
                    room: Some(frozen.clone())
                },
                "input {:?}",
                input
            );
        }
    }

    // ---- Handoff relay ----

    #[test]
    fn test_handoff_is_silent_for_ordinary_messages() {
        let ctx = ctx_with_rooms(vec![]);
        let out = reply_of(step(
            &session(DialogueState::HumanHandoff),
            &event("my AC is broken"),
            &ctx,
        ));
        assert!(out.reply.is_none());
        assert_eq!(out.next, DialogueState::HumanHandoff);
    }

    #[test]
    fn test_handoff_menu_command_returns_to_assistant() {
        let ctx = ctx_with_rooms(vec![]);
        let out = reply_of(step(&session(DialogueState::HumanHandoff), &event("menu"), &ctx));
        assert_eq!(out.next, DialogueState::MainMenu);
        assert!(out.reply.is_some());
    }
}
