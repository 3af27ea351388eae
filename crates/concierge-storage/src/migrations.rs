//! Database schema migrations.
//!
//! Applies the initial schema: hotels, room_types, room_photos, sessions,
//! bookings, booking_documents, transcript, and the schema_migrations
//! tracking table.

use rusqlite::Connection;
use tracing::info;

use concierge_core::error::ConciergeError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), ConciergeError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| ConciergeError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| ConciergeError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<(), ConciergeError> {
    conn.execute_batch(
        "
        -- Tenant hotels. At most one active hotel per channel number.
        CREATE TABLE IF NOT EXISTS hotels (
            id              TEXT PRIMARY KEY NOT NULL,
            tenant_id       TEXT NOT NULL,
            channel_id      TEXT NOT NULL,
            name            TEXT NOT NULL,
            address         TEXT NOT NULL DEFAULT '',
            contact_phone   TEXT NOT NULL DEFAULT '',
            map_link        TEXT,
            reception_hours TEXT NOT NULL DEFAULT '',
            active          INTEGER NOT NULL DEFAULT 1,
            created_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_hotels_active_channel
            ON hotels (channel_id)
            WHERE active = 1;

        CREATE INDEX IF NOT EXISTS idx_hotels_tenant
            ON hotels (tenant_id);

        -- Room categories.
        CREATE TABLE IF NOT EXISTS room_types (
            id              TEXT PRIMARY KEY NOT NULL,
            hotel_id        TEXT NOT NULL,
            name            TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            max_adults      INTEGER NOT NULL DEFAULT 2,
            max_children    INTEGER NOT NULL DEFAULT 0,
            base_price      INTEGER,
            amenities       TEXT NOT NULL DEFAULT '[]',
            air_conditioned INTEGER NOT NULL DEFAULT 0,
            available       INTEGER NOT NULL DEFAULT 1,
            display_order   INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_room_types_hotel
            ON room_types (hotel_id, display_order ASC);

        -- Ordered room photo sets.
        CREATE TABLE IF NOT EXISTS room_photos (
            id              TEXT PRIMARY KEY NOT NULL,
            room_type_id    TEXT NOT NULL,
            url             TEXT NOT NULL,
            position        INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (room_type_id) REFERENCES room_types(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_room_photos_room
            ON room_photos (room_type_id, position ASC);

        -- Dialogue sessions, exactly one active per (tenant, contact).
        CREATE TABLE IF NOT EXISTS sessions (
            tenant_id           TEXT NOT NULL,
            contact_id          TEXT NOT NULL,
            state               TEXT NOT NULL,
            last_interaction_at INTEGER NOT NULL,
            PRIMARY KEY (tenant_id, contact_id)
        );

        -- Bookings. Codes are unique store-wide, matched case-insensitively.
        CREATE TABLE IF NOT EXISTS bookings (
            id              TEXT PRIMARY KEY NOT NULL,
            hotel_id        TEXT NOT NULL,
            code            TEXT NOT NULL UNIQUE COLLATE NOCASE,
            guest_name      TEXT NOT NULL,
            contact_id      TEXT NOT NULL,
            check_in        TEXT NOT NULL,
            check_out       TEXT NOT NULL,
            adults          INTEGER NOT NULL,
            children        INTEGER NOT NULL DEFAULT 0,
            room_type_id    TEXT NOT NULL,
            room_name       TEXT NOT NULL,
            total_price     INTEGER,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'confirmed', 'cancelled',
                                              'checked_in', 'checked_out')),
            created_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE,
            CHECK (check_out > check_in)
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_contact
            ON bookings (hotel_id, contact_id, created_at DESC);

        -- Identity documents uploaded against a booking.
        CREATE TABLE IF NOT EXISTS booking_documents (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            booking_id      TEXT NOT NULL,
            storage_ref     TEXT NOT NULL,
            uploaded_at     INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY (booking_id) REFERENCES bookings(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_booking_documents_booking
            ON booking_documents (booking_id, uploaded_at ASC);

        -- Append-only outbound transcript for the live-chat UI.
        CREATE TABLE IF NOT EXISTS transcript (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id       TEXT NOT NULL,
            contact_id      TEXT NOT NULL,
            direction       TEXT NOT NULL
                            CHECK (direction IN ('inbound', 'outbound')),
            body            TEXT NOT NULL,
            delivered       INTEGER NOT NULL DEFAULT 1,
            created_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_transcript_contact
            ON transcript (tenant_id, contact_id, created_at ASC);

        -- Record migration.
        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| ConciergeError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
