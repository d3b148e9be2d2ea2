//! HTTP handlers for the StockTrack API

pub mod health;
pub mod inventory;
pub mod products;
pub mod reports;

pub use health::*;
pub use inventory::*;
pub use products::*;
pub use reports::*;
