//! Database models for the StockTrack backend
//!
//! Re-exports models from the shared crate; query row types live next to the
//! services that own them.

pub use shared::models::*;
pub use shared::types::*;
