//! # GSE Watch Market Data
//!
//! Loads the dashboard market data document (one JSON file holding every listed
//! instrument and its daily history) and hands out per-instrument price histories.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All file and JSON concerns live here. Malformed input is rejected
//!   with a `DataError` before any `PriceHistory` exists, so the analytics crates can
//!   assume well-typed samples.
//! - **Normalization:** Each history is sorted by date and de-duplicated (the last
//!   record for a date wins) as it is loaded.
//!
//! ## Public API
//!
//! - `MarketRepository`: the loaded document, with lookup and symbol search.
//! - `Instrument`: one stock's descriptive fields and its `PriceHistory`.
//! - `market_summary`: the latest session's top gainers, losers and total volume.
//! - `DataError`: the specific error types that can be returned from this crate.

pub mod document;
pub mod error;
pub mod overview;
pub mod repository;

pub use document::{Instrument, MarketDocument};
pub use error::DataError;
pub use overview::{MarketSummary, Mover, market_summary};
pub use repository::MarketRepository;
