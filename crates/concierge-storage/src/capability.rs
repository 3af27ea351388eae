//! Storage-backed implementations of the engine's capability traits.
//!
//! Thin adapters from the async trait surface onto the synchronous
//! repositories, with error mapping into `EngineError`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use concierge_core::types::{Booking, BookingDraft, Hotel, RoomPhoto, RoomType};
use concierge_engine::capabilities::{BookingWriter, CatalogReader, SessionStore, TranscriptSink};
use concierge_engine::error::EngineError;
use concierge_engine::state::{DialogueState, Session};
use concierge_engine::types::Direction;

use crate::db::Database;
use crate::repository::{
    BookingRepository, CatalogRepository, SessionRepository, TranscriptRepository,
};

/// SQLite-backed session store. The dialogue state is stored as tagged
/// JSON; the timestamp rides in its own column for retention tooling.
pub struct SqliteSessionStore {
    repo: SessionRepository,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: SessionRepository::new(db),
        }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
    ) -> Result<Option<Session>, EngineError> {
        let row = self
            .repo
            .get(tenant_id, contact_id)
            .map_err(|e| EngineError::SessionStore(e.to_string()))?;
        match row {
            Some(row) => {
                let state: DialogueState = serde_json::from_str(&row.state_json)
                    .map_err(|e| EngineError::SessionStore(format!("Corrupt session state: {}", e)))?;
                let last_interaction_at =
                    chrono::DateTime::from_timestamp(row.last_interaction_at, 0).ok_or_else(
                        || EngineError::SessionStore("Invalid session timestamp".to_string()),
                    )?;
                Ok(Some(Session {
                    state,
                    last_interaction_at,
                }))
            }
            None => Ok(None),
        }
    }

    async fn upsert(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
        session: &Session,
    ) -> Result<(), EngineError> {
        let state_json = serde_json::to_string(&session.state)
            .map_err(|e| EngineError::SessionStore(e.to_string()))?;
        self.repo
            .upsert(
                tenant_id,
                contact_id,
                &state_json,
                session.last_interaction_at.timestamp(),
            )
            .map_err(|e| EngineError::SessionStore(e.to_string()))
    }
}

/// SQLite-backed catalog reader.
pub struct SqliteCatalogReader {
    repo: CatalogRepository,
}

impl SqliteCatalogReader {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: CatalogRepository::new(db),
        }
    }
}

#[async_trait]
impl CatalogReader for SqliteCatalogReader {
    async fn active_hotel(&self, channel_id: &str) -> Result<Option<Hotel>, EngineError> {
        self.repo
            .active_hotel(channel_id)
            .map_err(|e| EngineError::Catalog(e.to_string()))
    }

    async fn available_rooms(&self, hotel_id: Uuid) -> Result<Vec<RoomType>, EngineError> {
        self.repo
            .available_rooms(hotel_id)
            .map_err(|e| EngineError::Catalog(e.to_string()))
    }

    async fn room_photos(&self, room_type_id: Uuid) -> Result<Vec<RoomPhoto>, EngineError> {
        self.repo
            .room_photos(room_type_id)
            .map_err(|e| EngineError::Catalog(e.to_string()))
    }
}

/// SQLite-backed booking writer.
pub struct SqliteBookingWriter {
    repo: BookingRepository,
}

impl SqliteBookingWriter {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: BookingRepository::new(db),
        }
    }
}

#[async_trait]
impl BookingWriter for SqliteBookingWriter {
    async fn create(&self, draft: BookingDraft) -> Result<Booking, EngineError> {
        self.repo
            .create(&draft)
            .map_err(|e| EngineError::BookingStore(e.to_string()))
    }

    async fn find_by_code(
        &self,
        hotel_id: Uuid,
        code: &str,
    ) -> Result<Option<Booking>, EngineError> {
        self.repo
            .find_by_code(hotel_id, code)
            .map_err(|e| EngineError::BookingStore(e.to_string()))
    }

    async fn recent_for_contact(
        &self,
        hotel_id: Uuid,
        contact_id: &str,
        limit: u32,
    ) -> Result<Vec<Booking>, EngineError> {
        self.repo
            .recent_for_contact(hotel_id, contact_id, limit)
            .map_err(|e| EngineError::BookingStore(e.to_string()))
    }

    async fn append_document_ref(
        &self,
        booking_code: &str,
        storage_ref: &str,
    ) -> Result<(), EngineError> {
        self.repo
            .append_document_ref(booking_code, storage_ref)
            .map_err(|e| EngineError::BookingStore(e.to_string()))
    }
}

/// SQLite-backed transcript sink.
pub struct SqliteTranscriptSink {
    repo: TranscriptRepository,
}

impl SqliteTranscriptSink {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: TranscriptRepository::new(db),
        }
    }
}

#[async_trait]
impl TranscriptSink for SqliteTranscriptSink {
    async fn append(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
        direction: Direction,
        body: &str,
        delivered: bool,
    ) -> Result<(), EngineError> {
        let direction = match direction {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        };
        self.repo
            .append(tenant_id, contact_id, direction, body, delivered)
            .map_err(|e| EngineError::Transcript(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_engine::state::DialogueState;

    fn test_db() -> Arc<Database> {
        Arc::new(Database::in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_session_store_round_trip() {
        let store = SqliteSessionStore::new(test_db());
        let tenant = Uuid::new_v4();

        assert!(store.get(tenant, "contact-1").await.unwrap().is_none());

        let session = Session::advance(DialogueState::CheckBookingId);
        store.upsert(tenant, "contact-1", &session).await.unwrap();

        let loaded = store.get(tenant, "contact-1").await.unwrap().unwrap();
        assert_eq!(loaded.state, DialogueState::CheckBookingId);
    }

    #[tokio::test]
    async fn test_session_store_preserves_flow_data() {
        let store = SqliteSessionStore::new(test_db());
        let tenant = Uuid::new_v4();

        let state = DialogueState::IdUploadWaiting {
            booking_code: "AB12CD34".to_string(),
            received: 2,
        };
        store
            .upsert(tenant, "contact-1", &Session::advance(state.clone()))
            .await
            .unwrap();

        let loaded = store.get(tenant, "contact-1").await.unwrap().unwrap();
        assert_eq!(loaded.state, state);
    }

    #[tokio::test]
    async fn test_session_store_corrupt_state_is_an_error() {
        let db = test_db();
        let repo = SessionRepository::new(Arc::clone(&db));
        let tenant = Uuid::new_v4();
        repo.upsert(tenant, "contact-1", "not json", 0).unwrap();

        let store = SqliteSessionStore::new(db);
        assert!(store.get(tenant, "contact-1").await.is_err());
    }
}
