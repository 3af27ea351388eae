//! HTTP edge for the Concierge engine.
//!
//! Receives inbound message webhooks from the messaging gateway and hosts
//! the outbound gateway client (the engine's `MediaRelay` implementation).

pub mod error;
pub mod handlers;
pub mod relay;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use relay::GatewayClient;
pub use routes::{create_router, start_server};
pub use state::AppState;
