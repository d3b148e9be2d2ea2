//! Shared types and models for the StockTrack platform
//!
//! This crate contains the domain models, the inventory valuation and
//! turnover computations, and validation helpers shared between the backend
//! and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
