//! Capability traits the engine is wired against.
//!
//! Each collaborator from the system contract gets one object-safe async
//! trait. Implementations live at the edges (SQLite repositories, the
//! gateway HTTP client); tests substitute in-memory fakes.

use async_trait::async_trait;
use concierge_core::types::{Booking, BookingDraft, Hotel, RoomPhoto, RoomType};
use uuid::Uuid;

use crate::error::EngineError;
use crate::state::Session;
use crate::types::Direction;

/// Durable per-contact session records. `get` and `upsert` are invoked as
/// one logical unit per inbound message; the facade serializes access
/// per (tenant, contact).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, tenant_id: Uuid, contact_id: &str)
        -> Result<Option<Session>, EngineError>;
    async fn upsert(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
        session: &Session,
    ) -> Result<(), EngineError>;
}

/// Read-only catalog access for the active tenant.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// The single active hotel answering on a channel number, if any.
    async fn active_hotel(&self, channel_id: &str) -> Result<Option<Hotel>, EngineError>;
    /// Available rooms in display order.
    async fn available_rooms(&self, hotel_id: Uuid) -> Result<Vec<RoomType>, EngineError>;
    /// Ordered photo set for a room type.
    async fn room_photos(&self, room_type_id: Uuid) -> Result<Vec<RoomPhoto>, EngineError>;
}

/// Booking persistence. `create` assigns a collision-resistant
/// human-readable code (store-level uniqueness with retry on conflict).
#[async_trait]
pub trait BookingWriter: Send + Sync {
    async fn create(&self, draft: BookingDraft) -> Result<Booking, EngineError>;
    /// Case-insensitive exact code match, scoped to the hotel.
    async fn find_by_code(
        &self,
        hotel_id: Uuid,
        code: &str,
    ) -> Result<Option<Booking>, EngineError>;
    async fn recent_for_contact(
        &self,
        hotel_id: Uuid,
        contact_id: &str,
        limit: u32,
    ) -> Result<Vec<Booking>, EngineError>;
    async fn append_document_ref(
        &self,
        booking_code: &str,
        storage_ref: &str,
    ) -> Result<(), EngineError>;
}

/// Messaging-gateway transport: inbound media transfer, document storage,
/// and outbound sends.
#[async_trait]
pub trait MediaRelay: Send + Sync {
    async fn fetch_inbound_media(&self, media_id: &str)
        -> Result<(Vec<u8>, String), EngineError>;
    async fn store_document(
        &self,
        booking_code: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, EngineError>;
    async fn send_text(&self, contact_id: &str, text: &str) -> Result<String, EngineError>;
    async fn send_image(
        &self,
        contact_id: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<String, EngineError>;
}

/// Append-only conversation record for the live-chat UI. Never read by
/// the engine.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn append(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
        direction: Direction,
        body: &str,
        delivered: bool,
    ) -> Result<(), EngineError>;
}
