//! # GSE Watch Windowing
//!
//! Time-range selection over a single instrument's price history, for charts and
//! exports. Pure functions only: the reference date is always passed in.

pub mod chart;
pub mod selector;

pub use chart::{ChartPoint, chart_points};
pub use selector::{RangeSelector, Selection};
