//! Business logic services for the Tailoring Orders Platform

pub mod order;
pub mod repeat_order;
pub mod resolver;
pub mod store;

pub use order::OrderService;
pub use repeat_order::RepeatOrderBuilder;
pub use resolver::PieceResolver;
pub use store::{InMemoryOrderStore, OrderScope, OrderStore};
