use crate::indicators::{mean, percent_change, trailing_mean};
use chrono::NaiveDate;
use core_types::PriceSample;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closes considered for the 52-week range.
const YEAR_RANGE_WINDOW: usize = 252;

/// The headline quote figures of one instrument, as of its latest valid close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub last_close: Decimal,
    pub last_date: NaiveDate,
    pub previous_close: Option<Decimal>,
    pub daily_change: Option<Decimal>,
    pub daily_change_pct: Option<Decimal>,
    pub year_high: Decimal,
    pub year_low: Decimal,
    pub average_volume_10d: Option<Decimal>,
    pub average_volume_30d: Option<Decimal>,
    pub moving_average_200: Option<Decimal>,
    /// Number of raw samples in the history, valid or not.
    pub data_points: usize,
}

/// Builds the quote summary of a history.
///
/// Returns `None` if the history holds no valid close at all.
pub fn summarize(history: &[PriceSample]) -> Option<QuoteSummary> {
    let valid: Vec<(NaiveDate, Decimal)> = history
        .iter()
        .filter_map(|s| s.valid_close().map(|c| (s.date, c)))
        .collect();
    let prices: Vec<Decimal> = valid.iter().map(|(_, c)| *c).collect();

    let &(last_date, last_close) = valid.last()?;
    let previous_close = prices.len().checked_sub(2).map(|i| prices[i]);

    let year_range = &prices[prices.len().saturating_sub(YEAR_RANGE_WINDOW)..];
    let year_high = year_range.iter().copied().max().unwrap_or(last_close);
    let year_low = year_range.iter().copied().min().unwrap_or(last_close);

    Some(QuoteSummary {
        last_close,
        last_date,
        previous_close,
        daily_change: previous_close.map(|prev| last_close - prev),
        daily_change_pct: previous_close.and_then(|prev| percent_change(prev, last_close)),
        year_high,
        year_low,
        average_volume_10d: average_volume(history, 10),
        average_volume_30d: average_volume(history, 30),
        moving_average_200: trailing_mean(&prices, 200),
        data_points: history.len(),
    })
}

/// Mean reported volume of the last `period` samples.
///
/// Samples without a volume are ignored; `None` when fewer than `period` samples
/// exist or none of them reports a volume.
fn average_volume(history: &[PriceSample], period: usize) -> Option<Decimal> {
    if period == 0 || history.len() < period {
        return None;
    }
    let volumes: Vec<Decimal> = history[history.len() - period..]
        .iter()
        .filter_map(|s| s.volume.map(Decimal::from))
        .collect();
    mean(&volumes)
}
