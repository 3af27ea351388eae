//! Shared domain model for the Concierge booking assistant.
//!
//! Defines the tenant-scoped catalog and booking types, the TOML
//! configuration, and the top-level error type used across crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::ConciergeConfig;
pub use error::{ConciergeError, Result};
pub use types::{
    Booking, BookingDraft, BookingStatus, Hotel, RoomPhoto, RoomType, Timestamp,
};
