//! SQLite persistence for the Concierge booking assistant.
//!
//! Provides the `Database` wrapper, schema migrations, repository structs,
//! and the storage-backed implementations of the engine's capability traits.

pub mod capability;
pub mod db;
pub mod migrations;
pub mod repository;

pub use capability::{
    SqliteBookingWriter, SqliteCatalogReader, SqliteSessionStore, SqliteTranscriptSink,
};
pub use db::Database;
pub use repository::{
    BookingRepository, CatalogRepository, SessionRepository, SessionRow, TranscriptRepository,
};
