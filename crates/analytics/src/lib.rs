//! # GSE Watch Analytics
//!
//! Derived statistics for a single instrument's daily closing-price series.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of files, configuration or the
//!   wall clock. The reference date and the risk-free rate are always passed in.
//! - **Stateless calculation:** `MetricsEngine` takes a price history and produces a
//!   fresh `MetricsResult` on every call. Missing history is expressed as `None`
//!   fields, never as an error and never as zero.
//!
//! ## Public API
//!
//! - `MetricsEngine`: moving averages, volatility, Sharpe ratio and period returns.
//! - `MetricsResult`: the value object produced by the engine.
//! - `summarize` / `QuoteSummary`: last price, daily change, 52-week range and volume averages.
//! - `indicators`: the small numeric helpers shared by the above and by chart overlays.

pub mod engine;
pub mod indicators;
pub mod report;
pub mod summary;

pub use engine::MetricsEngine;
pub use report::MetricsResult;
pub use summary::{QuoteSummary, summarize};
