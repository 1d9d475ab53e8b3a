//! Shared types and the pure order engine for the Tailoring Orders Platform
//!
//! This crate contains the models and computations shared between the
//! backend and the browser forms (via WASM): unit conversion, pricing,
//! piece identity, item composition and history reconstruction. Nothing in
//! here performs I/O.

pub mod composer;
pub mod error;
pub mod models;
pub mod pricing;
pub mod types;
pub mod validation;

pub use composer::*;
pub use error::*;
pub use models::*;
pub use pricing::*;
pub use types::*;
pub use validation::*;
