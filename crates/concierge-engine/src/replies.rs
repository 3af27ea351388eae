//! Guest-facing reply composition.
//!
//! Every outbound text the engine produces is built here, so wording and
//! formatting stay in one place. Messages use the gateway's plain-text
//! conventions (asterisk bold, emoji markers).

use concierge_core::types::{Booking, Hotel, RoomType};

use crate::state::{FrozenRoom, StayDetails};
use crate::{dates, documents};

/// Thousands-separated price rendering.
pub fn fmt_price(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if amount < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn nights_word(nights: i64) -> String {
    if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{} nights", nights)
    }
}

// =============================================================================
// Menu and info
// =============================================================================

pub fn not_configured() -> String {
    "This number is not set up for bookings yet. Please try again later.".to_string()
}

fn menu_body() -> &'static str {
    "1\u{fe0f}\u{20e3} View our rooms\n\
     2\u{fe0f}\u{20e3} Book a room\n\
     3\u{fe0f}\u{20e3} Location & contact\n\
     4\u{fe0f}\u{20e3} Reception hours\n\
     5\u{fe0f}\u{20e3} Check my booking\n\
     6\u{fe0f}\u{20e3} Talk to reception\n\n\
     Reply with a number. Type *menu* at any time to come back here."
}

pub fn welcome(hotel: &Hotel) -> String {
    format!(
        "\u{1f44b} Welcome to *{}*! I'm the booking assistant.\n\n{}",
        hotel.name,
        menu_body()
    )
}

pub fn main_menu(hotel: &Hotel) -> String {
    format!("\u{1f3e8} *{}* \u{2014} how can I help?\n\n{}", hotel.name, menu_body())
}

pub fn dont_understand() -> String {
    "Sorry, I didn't catch that. Please reply with one of the options shown, \
     or type *menu* to start over."
        .to_string()
}

pub fn rooms_list(rooms: &[RoomType]) -> String {
    let mut out = String::from("\u{1f6cf} Our rooms:\n\n");
    for (i, room) in rooms.iter().enumerate() {
        let price = match room.base_price {
            Some(p) => format!("{}/night", fmt_price(p)),
            None => "price on request".to_string(),
        };
        out.push_str(&format!("{}. *{}* \u{2014} {}\n", i + 1, room.name, price));
    }
    out.push_str("\nReply with a room number for details and photos.");
    out
}

pub fn no_rooms() -> String {
    "We don't have any rooms open for booking right now. Type *6* to reach \
     our reception team, or *menu* for the main menu."
        .to_string()
}

pub fn room_detail(room: &RoomType) -> String {
    let mut out = format!("*{}*\n", room.name);
    if !room.description.is_empty() {
        out.push_str(&room.description);
        out.push('\n');
    }
    out.push_str(&format!(
        "\n\u{1f465} Up to {} adults, {} children",
        room.max_adults, room.max_children
    ));
    if room.air_conditioned {
        out.push_str("\n\u{2744} Air conditioned");
    }
    if !room.amenities.is_empty() {
        out.push_str(&format!("\n\u{2728} {}", room.amenities.join(", ")));
    }
    match room.base_price {
        Some(p) => out.push_str(&format!("\n\u{1f4b0} {}/night", fmt_price(p))),
        None => out.push_str("\n\u{1f4b0} Price on request"),
    }
    out.push_str("\n\nReply *1* to book this room, or *0* for the menu.");
    out
}

/// Detail fallback when the displayed room is gone from the live catalog.
pub fn room_detail_frozen(room: &FrozenRoom) -> String {
    let mut out = format!(
        "*{}*\n\n\u{1f465} Up to {} adults, {} children",
        room.name, room.max_adults, room.max_children
    );
    match room.base_price {
        Some(p) => out.push_str(&format!("\n\u{1f4b0} {}/night", fmt_price(p))),
        None => out.push_str("\n\u{1f4b0} Price on request"),
    }
    out.push_str("\n\nReply *1* to book this room, or *0* for the menu.");
    out
}

pub fn location(hotel: &Hotel) -> String {
    let mut out = format!("\u{1f4cd} *{}*\n{}", hotel.name, hotel.address);
    if let Some(link) = &hotel.map_link {
        out.push_str(&format!("\n\u{1f5fa} {}", link));
    }
    out.push_str(&format!("\n\u{1f4de} {}", hotel.contact_phone));
    out.push_str("\n\nType *0* for the main menu.");
    out
}

pub fn reception_hours(hotel: &Hotel) -> String {
    format!(
        "\u{1f6ce} Reception at *{}* is open {}.\n\u{1f4de} {}\n\nType *0* for \
         the main menu.",
        hotel.name, hotel.reception_hours, hotel.contact_phone
    )
}

pub fn handoff() -> String {
    "\u{1f9d1}\u{200d}\u{1f4bc} Connecting you with our reception team \u{2014} \
     a staff member will reply here shortly. Type *menu* to return to the \
     assistant."
        .to_string()
}

pub fn handoff_for_booking(code: &str) -> String {
    format!(
        "\u{1f9d1}\u{200d}\u{1f4bc} Our team will help you with booking *{}* \
         shortly. Type *menu* to return to the assistant.",
        code
    )
}

// =============================================================================
// Booking flow
// =============================================================================

pub fn ask_name() -> String {
    "Great, let's get you booked! \u{270d} What name should the booking be under?"
        .to_string()
}

pub fn invalid_name() -> String {
    "That name looks too short. Please send the full name for the booking."
        .to_string()
}

pub fn ask_checkin(guest_name: &str) -> String {
    format!(
        "Thanks, {}! \u{1f4c5} What's your check-in date? For example: \
         10/02/2026 or 10 Feb 2026.",
        guest_name
    )
}

pub fn invalid_date() -> String {
    "I couldn't read that date. Please use a format like *10/02/2026* or \
     *10 Feb 2026*."
        .to_string()
}

pub fn checkin_before_today() -> String {
    "That date has already passed. Please send a check-in date of today or \
     later."
        .to_string()
}

pub fn ask_checkout(checkin_display: &str) -> String {
    format!(
        "\u{1f4c5} Check-in {}. And your check-out date?",
        checkin_display
    )
}

pub fn checkout_not_after(checkin_display: &str) -> String {
    format!(
        "Check-out must be after your check-in ({}). Please send a later date.",
        checkin_display
    )
}

pub fn ask_adults() -> String {
    "\u{1f465} How many adults? (1-20)".to_string()
}

pub fn invalid_adults() -> String {
    "Please send the number of adults as a figure between 1 and 20.".to_string()
}

pub fn ask_children() -> String {
    "\u{1f476} And how many children? (0-10)".to_string()
}

pub fn invalid_children() -> String {
    "Please send the number of children as a figure between 0 and 10.".to_string()
}

pub fn confirm_details(details: &StayDetails, room: Option<&FrozenRoom>) -> String {
    let mut out = format!(
        "Please confirm your details:\n\n\
         \u{1f464} {}\n\
         \u{1f4c5} {} \u{2192} {} ({})\n\
         \u{1f465} {} adults, {} children",
        details.guest_name,
        dates::display(details.check_in),
        dates::display(details.check_out),
        nights_word(details.nights()),
        details.adults,
        details.children
    );
    if let Some(room) = room {
        out.push_str(&format!("\n\u{1f6cf} {}", room.name));
    }
    out.push_str("\n\n1\u{fe0f}\u{20e3} Looks right, continue\n2\u{fe0f}\u{20e3} Start over\n0\u{fe0f}\u{20e3} Cancel");
    out
}

pub fn no_rooms_fit() -> String {
    "Sorry, none of our rooms fit a party that size for those dates. Type \
     *6* to reach reception \u{2014} they may be able to arrange something."
        .to_string()
}

pub fn room_select(shown: &[FrozenRoom], nights: i64) -> String {
    let mut out = format!("\u{1f6cf} Available for your {}:\n\n", nights_word(nights));
    for (i, room) in shown.iter().enumerate() {
        let price = match room.base_price {
            Some(p) => format!("{} total", fmt_price(p * nights)),
            None => "price on request".to_string(),
        };
        out.push_str(&format!("{}. *{}* \u{2014} {}\n", i + 1, room.name, price));
    }
    out.push_str("\nReply with a room number to continue.");
    out
}

pub fn final_confirm(details: &StayDetails, room: &FrozenRoom) -> String {
    let nights = details.nights();
    let mut out = format!(
        "Almost done! \u{1f389}\n\n\
         \u{1f6cf} {}\n\
         \u{1f4c5} {} \u{2192} {} ({})\n\
         \u{1f465} {} adults, {} children",
        room.name,
        dates::display(details.check_in),
        dates::display(details.check_out),
        nights_word(nights),
        details.adults,
        details.children
    );
    if let Some(base) = room.base_price {
        out.push_str(&format!(
            "\n\u{1f4b0} Total: *{}* ({} x {})",
            fmt_price(base * nights),
            nights_word(nights),
            fmt_price(base)
        ));
    }
    out.push_str("\n\n1\u{fe0f}\u{20e3} Confirm booking\n0\u{fe0f}\u{20e3} Cancel");
    out
}

pub fn booking_confirmed(booking: &Booking) -> String {
    let mut out = format!(
        "\u{2705} Booking received! Your booking code is *{}*.\n\n\
         We'll confirm it shortly \u{2014} keep the code handy to check your \
         status any time.",
        booking.code
    );
    out.push_str(&format!(
        "\n\nTo speed up check-in, you can send photos of your ID now \
         (up to {}). Send them here, or type *skip*.",
        documents::MAX_UPLOADS
    ));
    out
}

pub fn persistence_apology() -> String {
    "Sorry, something went wrong on our side and your request wasn't saved. \
     Please try again in a moment."
        .to_string()
}

// =============================================================================
// Document intake
// =============================================================================

pub fn upload_received(received: u8) -> String {
    if received >= documents::MAX_UPLOADS {
        format!(
            "\u{1f4c4} Received {} of {} \u{2014} that's everything we need. \
             Type *done* to finish.",
            received,
            documents::MAX_UPLOADS
        )
    } else {
        format!(
            "\u{1f4c4} Received {} of {}. Send the next one, or type *done* \
             to finish.",
            received,
            documents::MAX_UPLOADS
        )
    }
}

pub fn upload_cap_reached() -> String {
    format!(
        "We already have {} documents \u{2014} the most we can accept. Type \
         *done* to finish.",
        documents::MAX_UPLOADS
    )
}

pub fn upload_done(received: u8) -> String {
    if received == 0 {
        "No problem \u{2014} you can share your documents at the front desk \
         instead. Back to the main menu: type *menu*."
            .to_string()
    } else {
        format!(
            "\u{1f44d} Thanks, {} document(s) saved against your booking. \
             Type *menu* for the main menu.",
            received
        )
    }
}

pub fn upload_skipped() -> String {
    "No problem \u{2014} you can share your documents at the front desk \
     instead. Type *menu* for the main menu."
        .to_string()
}

pub fn upload_reprompt() -> String {
    format!(
        "Please send your ID as a photo or document (up to {} files), or \
         type *done* when finished, *skip* to do this later.",
        documents::MAX_UPLOADS
    )
}

pub fn upload_bad_format() -> String {
    "That file type isn't supported \u{2014} please send a photo or a PDF \
     document."
        .to_string()
}

pub fn document_store_failed() -> String {
    "Sorry, we couldn't save that file. Please send it again.".to_string()
}

// =============================================================================
// Status lookup
// =============================================================================

pub fn ask_booking_code() -> String {
    "\u{1f50e} Please send your booking code (for example *AB12CD34*)."
        .to_string()
}

pub fn status_card(booking: &Booking) -> String {
    let mut out = format!(
        "{} *{}* \u{2014} {}\n\n\
         \u{1f464} {}\n\
         \u{1f6cf} {}\n\
         \u{1f4c5} {} \u{2192} {}",
        booking.status.emoji(),
        booking.code,
        booking.status.label(),
        booking.guest_name,
        booking.room_name,
        dates::display(booking.check_in),
        dates::display(booking.check_out)
    );
    if let Some(total) = booking.total_price {
        out.push_str(&format!("\n\u{1f4b0} Total: {}", fmt_price(total)));
    }
    out.push_str(
        "\n\n1\u{fe0f}\u{20e3} Request a change\n2\u{fe0f}\u{20e3} Talk to \
         reception\n0\u{fe0f}\u{20e3} Main menu",
    );
    out
}

pub fn booking_not_found(attempted: &str) -> String {
    format!(
        "I couldn't find a booking with the code *{}*.\n\n\
         1\u{fe0f}\u{20e3} Try another code\n\
         2\u{fe0f}\u{20e3} Show my recent bookings\n\
         3\u{fe0f}\u{20e3} Talk to reception\n\
         0\u{fe0f}\u{20e3} Main menu",
        attempted
    )
}

pub fn recent_bookings_list(bookings: &[Booking]) -> String {
    let mut out = String::from("\u{1f4d3} Your recent bookings:\n\n");
    for booking in bookings {
        out.push_str(&format!(
            "{} *{}* \u{2014} {} ({} \u{2192} {})\n",
            booking.status.emoji(),
            booking.code,
            booking.room_name,
            dates::display(booking.check_in),
            dates::display(booking.check_out)
        ));
    }
    out.push_str("\nSend a booking code to see its full status.");
    out
}

pub fn no_recent_bookings() -> String {
    "I couldn't find any bookings from this number. Send a booking code to \
     try again, or type *menu* for the main menu."
        .to_string()
}
