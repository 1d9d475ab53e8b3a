//! Domain models for the tailoring order engine

mod history;
mod item;
mod measurement;
mod order;
mod piece;

pub use history::*;
pub use item::*;
pub use measurement::*;
pub use order::*;
pub use piece::*;
