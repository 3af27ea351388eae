//! Dialogue engine facade.
//!
//! Wraps the pure state machine with everything stateful: per-contact
//! serialization, session load/persist, catalog prefetch, booking and
//! document side effects, best-effort outbound sends, and the transcript.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::capabilities::{BookingWriter, CatalogReader, MediaRelay, SessionStore, TranscriptSink};
use crate::error::EngineError;
use crate::machine;
use crate::replies;
use crate::state::{DialogueState, Session};
use crate::status::RECENT_BOOKINGS_LIMIT;
use crate::types::{Direction, EngineContext, InboundEvent, PhotoRequest, StepAction};

/// Per-contact dialogue processor over injected capabilities.
pub struct DialogueEngine {
    sessions: Arc<dyn SessionStore>,
    catalog: Arc<dyn CatalogReader>,
    bookings: Arc<dyn BookingWriter>,
    relay: Arc<dyn MediaRelay>,
    transcript: Arc<dyn TranscriptSink>,
    /// One lock per (tenant, contact): messages from the same contact are
    /// processed strictly in arrival order, read-modify-write as a unit.
    locks: Mutex<HashMap<(Uuid, String), Arc<tokio::sync::Mutex<()>>>>,
}

impl DialogueEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        catalog: Arc<dyn CatalogReader>,
        bookings: Arc<dyn BookingWriter>,
        relay: Arc<dyn MediaRelay>,
        transcript: Arc<dyn TranscriptSink>,
    ) -> Self {
        Self {
            sessions,
            catalog,
            bookings,
            relay,
            transcript,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Process one inbound gateway event end to end.
    ///
    /// Only infrastructure faults (session prefetch or persist failing)
    /// surface as errors; the gateway's redelivery handles those. Send
    /// failures are logged and never block session advancement.
    pub async fn handle_inbound(&self, event: InboundEvent) -> Result<(), EngineError> {
        let Some(hotel) = self.catalog.active_hotel(&event.channel_id).await? else {
            warn!(channel = %event.channel_id, "Inbound message for unconfigured channel");
            if let Err(e) = self
                .relay
                .send_text(&event.contact_id, &replies::not_configured())
                .await
            {
                warn!(error = %e, "Failed to send not-configured notice");
            }
            return Ok(());
        };

        let tenant_id = hotel.tenant_id;
        let lock = self.contact_lock(tenant_id, &event.contact_id)?;
        let _guard = lock.lock().await;

        let session = self
            .sessions
            .get(tenant_id, &event.contact_id)
            .await?
            .unwrap_or_default();

        let rooms = self.catalog.available_rooms(hotel.id).await?;
        let booking_by_code = match &session.state {
            DialogueState::CheckBookingId if !event.text.trim().is_empty() => {
                self.bookings
                    .find_by_code(hotel.id, event.text.trim())
                    .await?
            }
            _ => None,
        };
        let recent_bookings = match &session.state {
            DialogueState::BookingNotFound { .. } => {
                self.bookings
                    .recent_for_contact(hotel.id, &event.contact_id, RECENT_BOOKINGS_LIMIT)
                    .await?
            }
            _ => Vec::new(),
        };

        let ctx = EngineContext {
            today: chrono::Local::now().date_naive(),
            hotel,
            rooms,
            booking_by_code,
            recent_bookings,
        };

        let action = machine::step(&session, &event, &ctx);
        let (reply, next_state, photos) = self.run_action(action, &session, &event).await;

        // Session persistence must succeed before anything is sent; a lost
        // upsert would desynchronize the dialogue.
        self.sessions
            .upsert(tenant_id, &event.contact_id, &Session::advance(next_state))
            .await?;

        let mut delivered = true;
        if let Some(text) = &reply {
            if let Err(e) = self.relay.send_text(&event.contact_id, text).await {
                warn!(contact = %event.contact_id, error = %e, "Outbound send failed");
                delivered = false;
            }
        }

        self.send_photos(&event.contact_id, &photos).await;

        if let Some(text) = &reply {
            if let Err(e) = self
                .transcript
                .append(tenant_id, &event.contact_id, Direction::Outbound, text, delivered)
                .await
            {
                warn!(error = %e, "Transcript append failed");
            }
        }

        Ok(())
    }

    /// Execute the persistence half of a step and decide the final reply.
    async fn run_action(
        &self,
        action: StepAction,
        session: &Session,
        event: &InboundEvent,
    ) -> (Option<String>, DialogueState, Vec<PhotoRequest>) {
        match action {
            StepAction::Reply(outcome) => (outcome.reply, outcome.next, outcome.photos),

            StepAction::CommitBooking { draft } => match self.bookings.create(draft).await {
                Ok(booking) => {
                    info!(code = %booking.code, contact = %event.contact_id, "Booking created");
                    (
                        Some(replies::booking_confirmed(&booking)),
                        DialogueState::IdUploadPrompt {
                            booking_code: booking.code,
                        },
                        Vec::new(),
                    )
                }
                Err(e) => {
                    // Abandon the flow rather than leaving the guest stuck
                    // mid-booking with nothing persisted.
                    error!(error = %e, "Booking persistence failed");
                    (
                        Some(replies::persistence_apology()),
                        DialogueState::MainMenu,
                        Vec::new(),
                    )
                }
            },

            StepAction::StoreDocument {
                booking_code,
                attachment,
                received,
            } => {
                match self.store_document(&booking_code, &attachment.media_id).await {
                    Ok(()) => {
                        let count = received + 1;
                        (
                            Some(replies::upload_received(count)),
                            DialogueState::IdUploadWaiting {
                                booking_code,
                                received: count,
                            },
                            Vec::new(),
                        )
                    }
                    Err(e) => {
                        // Counter stays where it was; the slot is not lost.
                        warn!(code = %booking_code, error = %e, "Document storage failed");
                        (
                            Some(replies::document_store_failed()),
                            session.state.clone(),
                            Vec::new(),
                        )
                    }
                }
            }
        }
    }

    async fn store_document(&self, booking_code: &str, media_id: &str) -> Result<(), EngineError> {
        let (bytes, mime_type) = self.relay.fetch_inbound_media(media_id).await?;
        let storage_ref = self
            .relay
            .store_document(booking_code, &bytes, &mime_type)
            .await?;
        self.bookings
            .append_document_ref(booking_code, &storage_ref)
            .await?;
        info!(code = %booking_code, storage_ref = %storage_ref, "Identity document stored");
        Ok(())
    }

    /// Photo sends are best-effort; a failed image never blocks the flow.
    async fn send_photos(&self, contact_id: &str, photos: &[PhotoRequest]) {
        for request in photos {
            let photo_set = match self.catalog.room_photos(request.room_type_id).await {
                Ok(set) => set,
                Err(e) => {
                    warn!(room = %request.room_type_id, error = %e, "Photo lookup failed");
                    continue;
                }
            };
            for photo in photo_set {
                if let Err(e) = self
                    .relay
                    .send_image(contact_id, &photo.url, request.caption.as_deref())
                    .await
                {
                    warn!(url = %photo.url, error = %e, "Image send failed");
                }
            }
        }
    }

    fn contact_lock(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
    ) -> Result<Arc<tokio::sync::Mutex<()>>, EngineError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| EngineError::Internal(format!("lock map poisoned: {}", e)))?;
        Ok(locks
            .entry((tenant_id, contact_id.to_string()))
            .or_default()
            .clone())
    }
}
