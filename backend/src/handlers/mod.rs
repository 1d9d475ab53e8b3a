//! HTTP handlers for the Tailoring Orders Platform

pub mod health;
pub mod measurement;
pub mod orders;
pub mod piece;
pub mod pricing;

pub use health::health_check;
pub use measurement::convert_measurements;
pub use orders::{
    advance_status, build_repeat_draft, finalize_draft, get_order, list_orders, place_order,
    record_payment,
};
pub use piece::resolve_piece;
pub use pricing::{price_item, price_order};
