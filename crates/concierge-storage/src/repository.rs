//! Repository implementations for SQLite-backed persistence.
//!
//! SessionRepository, CatalogRepository, BookingRepository, and
//! TranscriptRepository operate on the Database struct using raw SQL.

use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use concierge_core::error::ConciergeError;
use concierge_core::types::{Booking, BookingDraft, BookingStatus, Hotel, RoomPhoto, RoomType};

use crate::db::Database;

fn storage_err(e: rusqlite::Error) -> ConciergeError {
    ConciergeError::Storage(e.to_string())
}

fn parse_uuid(s: &str) -> Result<Uuid, ConciergeError> {
    Uuid::parse_str(s).map_err(|e| ConciergeError::Storage(format!("Invalid UUID {}: {}", s, e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, ConciergeError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ConciergeError::Storage(format!("Invalid date {}: {}", s, e)))
}

// =============================================================================
// Sessions
// =============================================================================

/// A raw session row; the engine owns the typed view of `state_json`.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub state_json: String,
    pub last_interaction_at: i64,
}

/// Repository for dialogue session rows, keyed by (tenant, contact).
pub struct SessionRepository {
    db: Arc<Database>,
}

impl SessionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get(&self, tenant_id: Uuid, contact_id: &str) -> Result<Option<SessionRow>, ConciergeError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT state, last_interaction_at FROM sessions
                 WHERE tenant_id = ?1 AND contact_id = ?2",
                rusqlite::params![tenant_id.to_string(), contact_id],
                |row| {
                    Ok(SessionRow {
                        state_json: row.get(0)?,
                        last_interaction_at: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(storage_err)
        })
    }

    pub fn upsert(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
        state_json: &str,
        last_interaction_at: i64,
    ) -> Result<(), ConciergeError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (tenant_id, contact_id, state, last_interaction_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (tenant_id, contact_id) DO UPDATE SET
                     state = excluded.state,
                     last_interaction_at = excluded.last_interaction_at",
                rusqlite::params![tenant_id.to_string(), contact_id, state_json, last_interaction_at],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to upsert session: {}", e)))?;
            Ok(())
        })
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Read access to hotels, room types, and photos, plus save methods used
/// by provisioning and tests.
pub struct CatalogRepository {
    db: Arc<Database>,
}

impl CatalogRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn save_hotel(&self, hotel: &Hotel) -> Result<(), ConciergeError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO hotels (id, tenant_id, channel_id, name, address, contact_phone,
                                     map_link, reception_hours, active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    hotel.id.to_string(),
                    hotel.tenant_id.to_string(),
                    hotel.channel_id,
                    hotel.name,
                    hotel.address,
                    hotel.contact_phone,
                    hotel.map_link,
                    hotel.reception_hours,
                    hotel.active as i32,
                ],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to save hotel: {}", e)))?;
            Ok(())
        })
    }

    pub fn save_room(&self, room: &RoomType) -> Result<(), ConciergeError> {
        let amenities = serde_json::to_string(&room.amenities)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO room_types (id, hotel_id, name, description, max_adults,
                                         max_children, base_price, amenities, air_conditioned,
                                         available, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                rusqlite::params![
                    room.id.to_string(),
                    room.hotel_id.to_string(),
                    room.name,
                    room.description,
                    room.max_adults,
                    room.max_children,
                    room.base_price,
                    amenities,
                    room.air_conditioned as i32,
                    room.available as i32,
                    room.display_order,
                ],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to save room: {}", e)))?;
            Ok(())
        })
    }

    pub fn save_photo(&self, photo: &RoomPhoto) -> Result<(), ConciergeError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO room_photos (id, room_type_id, url, position)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    photo.id.to_string(),
                    photo.room_type_id.to_string(),
                    photo.url,
                    photo.position,
                ],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to save photo: {}", e)))?;
            Ok(())
        })
    }

    /// The single active hotel answering on a channel number, if any.
    pub fn active_hotel(&self, channel_id: &str) -> Result<Option<Hotel>, ConciergeError> {
        self.db.with_conn(|conn| {
            let result = conn
                .query_row(
                    "SELECT id, tenant_id, channel_id, name, address, contact_phone, map_link,
                            reception_hours, active
                     FROM hotels WHERE channel_id = ?1 AND active = 1",
                    rusqlite::params![channel_id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, String>(5)?,
                            row.get::<_, Option<String>>(6)?,
                            row.get::<_, String>(7)?,
                            row.get::<_, i32>(8)?,
                        ))
                    },
                )
                .optional()
                .map_err(storage_err)?;

            match result {
                Some((id, tenant_id, channel_id, name, address, phone, map_link, hours, active)) => {
                    Ok(Some(Hotel {
                        id: parse_uuid(&id)?,
                        tenant_id: parse_uuid(&tenant_id)?,
                        channel_id,
                        name,
                        address,
                        contact_phone: phone,
                        map_link,
                        reception_hours: hours,
                        active: active != 0,
                    }))
                }
                None => Ok(None),
            }
        })
    }

    /// Available rooms for a hotel, in display order.
    pub fn available_rooms(&self, hotel_id: Uuid) -> Result<Vec<RoomType>, ConciergeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, hotel_id, name, description, max_adults, max_children,
                            base_price, amenities, air_conditioned, available, display_order
                     FROM room_types
                     WHERE hotel_id = ?1 AND available = 1
                     ORDER BY display_order ASC",
                )
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(rusqlite::params![hotel_id.to_string()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, u8>(4)?,
                        row.get::<_, u8>(5)?,
                        row.get::<_, Option<i64>>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, i32>(8)?,
                        row.get::<_, i32>(9)?,
                        row.get::<_, i64>(10)?,
                    ))
                })
                .map_err(storage_err)?;

            let mut rooms = Vec::new();
            for row in rows {
                let (id, hotel_id, name, description, max_adults, max_children, base_price,
                     amenities, ac, available, display_order) = row.map_err(storage_err)?;
                rooms.push(RoomType {
                    id: parse_uuid(&id)?,
                    hotel_id: parse_uuid(&hotel_id)?,
                    name,
                    description,
                    max_adults,
                    max_children,
                    base_price,
                    amenities: serde_json::from_str(&amenities)?,
                    air_conditioned: ac != 0,
                    available: available != 0,
                    display_order,
                });
            }
            Ok(rooms)
        })
    }

    /// Ordered photo set for a room type.
    pub fn room_photos(&self, room_type_id: Uuid) -> Result<Vec<RoomPhoto>, ConciergeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, room_type_id, url, position FROM room_photos
                     WHERE room_type_id = ?1 ORDER BY position ASC",
                )
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(rusqlite::params![room_type_id.to_string()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(storage_err)?;

            let mut photos = Vec::new();
            for row in rows {
                let (id, room_type_id, url, position) = row.map_err(storage_err)?;
                photos.push(RoomPhoto {
                    id: parse_uuid(&id)?,
                    room_type_id: parse_uuid(&room_type_id)?,
                    url,
                    position,
                });
            }
            Ok(photos)
        })
    }
}

// =============================================================================
// Bookings
// =============================================================================

const CODE_LEN: usize = 8;
/// Lookalike characters (0/O, 1/I) are excluded from codes.
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MAX_CODE_ATTEMPTS: usize = 5;

fn generate_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

enum InsertOutcome {
    Inserted,
    CodeConflict,
}

/// Repository for booking rows and their document references.
pub struct BookingRepository {
    db: Arc<Database>,
}

impl BookingRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persist a booking with a freshly generated code, status `pending`.
    ///
    /// Code uniqueness is enforced by the store; a conflicting code is
    /// regenerated and the insert retried a bounded number of times.
    pub fn create(&self, draft: &BookingDraft) -> Result<Booking, ConciergeError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let id = Uuid::new_v4();
            let code = generate_code();
            let created_at = chrono::Utc::now();

            let outcome = self.db.with_conn(|conn| {
                let result = conn.execute(
                    "INSERT INTO bookings (id, hotel_id, code, guest_name, contact_id, check_in,
                                           check_out, adults, children, room_type_id, room_name,
                                           total_price, status, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    rusqlite::params![
                        id.to_string(),
                        draft.hotel_id.to_string(),
                        code,
                        draft.guest_name,
                        draft.contact_id,
                        draft.check_in.format("%Y-%m-%d").to_string(),
                        draft.check_out.format("%Y-%m-%d").to_string(),
                        draft.adults,
                        draft.children,
                        draft.room_type_id.to_string(),
                        draft.room_name,
                        draft.total_price,
                        BookingStatus::Pending.to_string(),
                        created_at.timestamp(),
                    ],
                );
                match result {
                    Ok(_) => Ok(InsertOutcome::Inserted),
                    Err(rusqlite::Error::SqliteFailure(e, Some(msg)))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation
                            && msg.contains("bookings.code") =>
                    {
                        Ok(InsertOutcome::CodeConflict)
                    }
                    Err(e) => Err(ConciergeError::Storage(format!(
                        "Failed to insert booking: {}",
                        e
                    ))),
                }
            })?;

            match outcome {
                InsertOutcome::Inserted => {
                    return Ok(Booking {
                        id,
                        hotel_id: draft.hotel_id,
                        code,
                        guest_name: draft.guest_name.clone(),
                        contact_id: draft.contact_id.clone(),
                        check_in: draft.check_in,
                        check_out: draft.check_out,
                        adults: draft.adults,
                        children: draft.children,
                        room_type_id: draft.room_type_id,
                        room_name: draft.room_name.clone(),
                        total_price: draft.total_price,
                        status: BookingStatus::Pending,
                        document_refs: Vec::new(),
                        created_at,
                    })
                }
                InsertOutcome::CodeConflict => {
                    tracing::debug!("Booking code collision, regenerating");
                }
            }
        }
        Err(ConciergeError::Storage(
            "Exhausted booking code attempts".to_string(),
        ))
    }

    /// Case-insensitive exact code match, scoped to a hotel.
    pub fn find_by_code(&self, hotel_id: Uuid, code: &str) -> Result<Option<Booking>, ConciergeError> {
        self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("{} WHERE hotel_id = ?1 AND code = ?2", SELECT_BOOKING),
                    rusqlite::params![hotel_id.to_string(), code],
                    booking_columns,
                )
                .optional()
                .map_err(storage_err)?;

            match row {
                Some(cols) => {
                    let mut booking = columns_to_booking(cols)?;
                    booking.document_refs = load_document_refs(conn, booking.id)?;
                    Ok(Some(booking))
                }
                None => Ok(None),
            }
        })
    }

    /// Most recent bookings made from a contact identifier.
    pub fn recent_for_contact(
        &self,
        hotel_id: Uuid,
        contact_id: &str,
        limit: u32,
    ) -> Result<Vec<Booking>, ConciergeError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "{} WHERE hotel_id = ?1 AND contact_id = ?2
                     ORDER BY created_at DESC LIMIT ?3",
                    SELECT_BOOKING
                ))
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(
                    rusqlite::params![hotel_id.to_string(), contact_id, limit],
                    booking_columns,
                )
                .map_err(storage_err)?;

            let mut bookings = Vec::new();
            for row in rows {
                let mut booking = columns_to_booking(row.map_err(storage_err)?)?;
                booking.document_refs = load_document_refs(conn, booking.id)?;
                bookings.push(booking);
            }
            Ok(bookings)
        })
    }

    /// Append an uploaded document reference to a booking, by code.
    pub fn append_document_ref(&self, code: &str, storage_ref: &str) -> Result<(), ConciergeError> {
        self.db.with_conn(|conn| {
            let booking_id: Option<String> = conn
                .query_row(
                    "SELECT id FROM bookings WHERE code = ?1",
                    rusqlite::params![code],
                    |row| row.get(0),
                )
                .optional()
                .map_err(storage_err)?;

            let booking_id = booking_id.ok_or_else(|| {
                ConciergeError::Storage(format!("Unknown booking code: {}", code))
            })?;

            conn.execute(
                "INSERT INTO booking_documents (booking_id, storage_ref) VALUES (?1, ?2)",
                rusqlite::params![booking_id, storage_ref],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to append document: {}", e)))?;
            Ok(())
        })
    }
}

const SELECT_BOOKING: &str =
    "SELECT id, hotel_id, code, guest_name, contact_id, check_in, check_out, adults, children,
            room_type_id, room_name, total_price, status, created_at
     FROM bookings";

type BookingColumns = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    u8,
    u8,
    String,
    String,
    Option<i64>,
    String,
    i64,
);

fn booking_columns(row: &rusqlite::Row) -> rusqlite::Result<BookingColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
        row.get(13)?,
    ))
}

fn columns_to_booking(cols: BookingColumns) -> Result<Booking, ConciergeError> {
    let (id, hotel_id, code, guest_name, contact_id, check_in, check_out, adults, children,
         room_type_id, room_name, total_price, status, created_at) = cols;
    Ok(Booking {
        id: parse_uuid(&id)?,
        hotel_id: parse_uuid(&hotel_id)?,
        code,
        guest_name,
        contact_id,
        check_in: parse_date(&check_in)?,
        check_out: parse_date(&check_out)?,
        adults,
        children,
        room_type_id: parse_uuid(&room_type_id)?,
        room_name,
        total_price,
        status: status
            .parse()
            .map_err(|e: String| ConciergeError::Storage(e))?,
        document_refs: Vec::new(),
        created_at: chrono::DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| ConciergeError::Storage(format!("Invalid timestamp {}", created_at)))?,
    })
}

fn load_document_refs(
    conn: &rusqlite::Connection,
    booking_id: Uuid,
) -> Result<Vec<String>, ConciergeError> {
    let mut stmt = conn
        .prepare(
            "SELECT storage_ref FROM booking_documents
             WHERE booking_id = ?1 ORDER BY uploaded_at ASC, id ASC",
        )
        .map_err(storage_err)?;
    let rows = stmt
        .query_map(rusqlite::params![booking_id.to_string()], |row| row.get(0))
        .map_err(storage_err)?;
    let mut refs = Vec::new();
    for row in rows {
        refs.push(row.map_err(storage_err)?);
    }
    Ok(refs)
}

// =============================================================================
// Transcript
// =============================================================================

/// Append-only outbound transcript writer.
pub struct TranscriptRepository {
    db: Arc<Database>,
}

impl TranscriptRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn append(
        &self,
        tenant_id: Uuid,
        contact_id: &str,
        direction: &str,
        body: &str,
        delivered: bool,
    ) -> Result<(), ConciergeError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO transcript (tenant_id, contact_id, direction, body, delivered)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    tenant_id.to_string(),
                    contact_id,
                    direction,
                    body,
                    delivered as i32,
                ],
            )
            .map_err(|e| ConciergeError::Storage(format!("Failed to append transcript: {}", e)))?;
            Ok(())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
