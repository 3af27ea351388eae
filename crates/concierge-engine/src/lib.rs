//! Conversational automation engine for the hotel-booking assistant.
//!
//! The per-contact dialogue processor: a pure, synchronous state machine
//! (`machine::step`) wrapped by an async facade (`DialogueEngine`) that
//! loads the session, prefetches catalog context, executes side effects
//! through injected capability traits, and persists the new state.

pub mod booking;
pub mod capabilities;
pub mod commands;
pub mod dates;
pub mod documents;
pub mod error;
pub mod facade;
pub mod intent;
pub mod machine;
pub mod replies;
pub mod state;
pub mod status;
pub mod types;

pub use capabilities::{BookingWriter, CatalogReader, MediaRelay, SessionStore, TranscriptSink};
pub use error::EngineError;
pub use facade::DialogueEngine;
pub use state::{DialogueState, FrozenRoom, Session, StayDetails};
pub use types::{
    Attachment, AttachmentKind, Direction, EngineContext, InboundEvent, Outcome, PhotoRequest,
    StepAction,
};
