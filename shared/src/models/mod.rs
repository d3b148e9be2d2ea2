//! Domain models for the StockTrack platform

mod inventory;
mod movement;
mod product;
mod turnover;
mod valuation;

pub use inventory::*;
pub use movement::*;
pub use product::*;
pub use turnover::*;
pub use valuation::*;
