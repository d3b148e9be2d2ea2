//! Business logic services for the StockTrack backend

pub mod catalog;
pub mod inventory;
pub mod reporting;
pub mod turnover;
pub mod valuation;

pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use reporting::ReportingService;
pub use turnover::TurnoverService;
pub use valuation::ValuationService;
