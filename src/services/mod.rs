//! Service layer for business logic
//!
//! The two core subsystems live here: the mapping engine (encode/decode)
//! and the token lifecycle manager (signup/login/logout/validate). Both are
//! stateless in memory and coordinate only through the injected store.

mod auth_service;
mod mapping_service;

pub use auth_service::{AuthService, AuthedUser};
pub use mapping_service::{EncodeOutcome, EncodeResult, MappingService};
