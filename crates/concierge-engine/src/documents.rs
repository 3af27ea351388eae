//! Post-booking identity-document intake.
//!
//! Accepts up to `MAX_UPLOADS` media attachments and hands each one to the
//! facade for transfer. While `id_upload_waiting` is active the global
//! command interceptor is skipped, so only the tokens below leave the flow.

use crate::replies;
use crate::state::DialogueState;
use crate::types::{Attachment, AttachmentKind, InboundEvent, Outcome, StepAction};

/// Upload cap per booking.
pub const MAX_UPLOADS: u8 = 3;

const DONE_TOKENS: [&str; 3] = ["done", "finish", "complete"];
const SKIP_TOKEN: &str = "skip";

/// Image or document MIME classes only.
fn acceptable(attachment: &Attachment) -> bool {
    match attachment.kind {
        AttachmentKind::Image => attachment.mime_type.starts_with("image/"),
        AttachmentKind::Document => {
            attachment.mime_type.starts_with("image/")
                || attachment.mime_type == "application/pdf"
        }
    }
}

/// First message after the booking confirmation. Global commands are still
/// live here; the flow only takes over raw input once an upload arrives.
pub(crate) fn handle_upload_prompt(booking_code: &str, event: &InboundEvent) -> StepAction {
    if let Some(attachment) = &event.attachment {
        if acceptable(attachment) {
            return StepAction::StoreDocument {
                booking_code: booking_code.to_string(),
                attachment: attachment.clone(),
                received: 0,
            };
        }
        return StepAction::Reply(Outcome::reply(
            replies::upload_bad_format(),
            DialogueState::IdUploadPrompt {
                booking_code: booking_code.to_string(),
            },
        ));
    }

    let token = event.text.trim().to_lowercase();
    if DONE_TOKENS.contains(&token.as_str()) {
        return StepAction::Reply(Outcome::reply(
            replies::upload_done(0),
            DialogueState::MainMenu,
        ));
    }
    if token == SKIP_TOKEN {
        return StepAction::Reply(Outcome::reply(
            replies::upload_skipped(),
            DialogueState::MainMenu,
        ));
    }
    StepAction::Reply(Outcome::reply(
        replies::upload_reprompt(),
        DialogueState::IdUploadPrompt {
            booking_code: booking_code.to_string(),
        },
    ))
}

/// Active upload state. Non-media, non-control input re-prompts without
/// touching the counter; the cap stops acceptance but not `done`.
pub(crate) fn handle_upload_waiting(
    booking_code: &str,
    received: u8,
    event: &InboundEvent,
) -> StepAction {
    let stay = DialogueState::IdUploadWaiting {
        booking_code: booking_code.to_string(),
        received,
    };

    if let Some(attachment) = &event.attachment {
        if received >= MAX_UPLOADS {
            return StepAction::Reply(Outcome::reply(replies::upload_cap_reached(), stay));
        }
        if !acceptable(attachment) {
            return StepAction::Reply(Outcome::reply(replies::upload_bad_format(), stay));
        }
        return StepAction::StoreDocument {
            booking_code: booking_code.to_string(),
            attachment: attachment.clone(),
            received,
        };
    }

    let token = event.text.trim().to_lowercase();
    if DONE_TOKENS.contains(&token.as_str()) {
        return StepAction::Reply(Outcome::reply(
            replies::upload_done(received),
            DialogueState::MainMenu,
        ));
    }
    if token == SKIP_TOKEN {
        return StepAction::Reply(Outcome::reply(
            replies::upload_skipped(),
            DialogueState::MainMenu,
        ));
    }
    StepAction::Reply(Outcome::reply(replies::upload_reprompt(), stay))
}
