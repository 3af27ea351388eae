//! Benchmark tests for the per-message dialogue transform.
//!
//! Every inbound message pays for one date parse or one dispatch, so both
//! must stay well under a millisecond to keep the webhook handler cheap.

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use uuid::Uuid;

use concierge_core::types::{Hotel, RoomType};
use concierge_engine::state::{DialogueState, Session};
use concierge_engine::types::{EngineContext, InboundEvent};
use concierge_engine::{dates, machine};

fn bench_context() -> EngineContext {
    let hotel_id = Uuid::new_v4();
    let rooms = (0..6)
        .map(|i| RoomType {
            id: Uuid::new_v4(),
            hotel_id,
            name: format!("Room {}", i),
            description: "A fine room with a balcony".to_string(),
            max_adults: 2,
            max_children: 1,
            base_price: Some(1500 + 250 * i),
            amenities: vec!["wifi".to_string(), "tv".to_string()],
            air_conditioned: true,
            available: true,
            display_order: i,
        })
        .collect();

    EngineContext {
        today: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        hotel: Hotel {
            id: hotel_id,
            tenant_id: Uuid::new_v4(),
            channel_id: "15550001111".to_string(),
            name: "Seaview Palace".to_string(),
            address: "12 Beach Road, Goa".to_string(),
            contact_phone: "+91 98000 00000".to_string(),
            map_link: None,
            reception_hours: "7:00-23:00".to_string(),
            active: true,
        },
        rooms,
        booking_by_code: None,
        recent_bookings: vec![],
    }
}

fn event(text: &str) -> InboundEvent {
    InboundEvent {
        channel_id: "15550001111".to_string(),
        contact_id: "919800000001".to_string(),
        text: text.to_string(),
        attachment: None,
    }
}

fn bench_date_parse(c: &mut Criterion) {
    c.bench_function("date_parse_numeric", |b| {
        b.iter(|| dates::parse(std::hint::black_box("10/02/2026")))
    });
    c.bench_function("date_parse_worded", |b| {
        b.iter(|| dates::parse(std::hint::black_box("10 February 2026")))
    });
    c.bench_function("date_parse_invalid", |b| {
        b.iter(|| dates::parse(std::hint::black_box("sometime next week maybe")))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let ctx = bench_context();

    let menu_session = Session::advance(DialogueState::MainMenu);
    let menu_event = event("1");
    c.bench_function("dispatch_menu_choice", |b| {
        b.iter(|| machine::step(&menu_session, &menu_event, &ctx))
    });

    let intent_event = event("do you have any rooms available this weekend");
    c.bench_function("dispatch_free_text_intent", |b| {
        b.iter(|| machine::step(&menu_session, &intent_event, &ctx))
    });

    let booking_session = Session::advance(DialogueState::BookingCheckIn {
        room: None,
        guest_name: "John Smith".to_string(),
    });
    let date_event = event("10/02/2026");
    c.bench_function("dispatch_booking_date_step", |b| {
        b.iter(|| machine::step(&booking_session, &date_event, &ctx))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets = bench_date_parse, bench_dispatch
}
criterion_main!(benches);
