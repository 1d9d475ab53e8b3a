//! Order models used by the backend
//!
//! Re-exports the engine models from the shared crate together with the
//! reference types orders carry

pub use shared::models::*;
pub use shared::types::{CustomerRef, WorkshopRef};
