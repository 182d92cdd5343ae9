//! Shared building blocks for the PawsomePals services: response and
//! error envelopes, the JWT auth extractor, event types with their
//! RabbitMQ plumbing, and the Postgres/Redis client helpers.

pub mod clients;
pub mod errors;
pub mod middleware;
pub mod types;

pub use errors::{AppError, AppResult, ErrorCode};
pub use types::*;
