//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, pure rules and domain error types.

pub mod access;
pub mod errors;
pub mod etag;
pub mod repositories;

pub use access::{AccessDecision, Caller, Role, Scope};
pub use errors::DomainError;
pub use repositories::*;
