use crate::document::Instrument;
use chrono::NaiveDate;
use core_types::PriceSample;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// Movers listed on each side of the overview.
pub const TOP_MOVERS: usize = 5;

/// Market-wide figures for the most recent session in the data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    /// Number of distinct symbols in the data set.
    pub total_stocks: usize,
    /// The latest date found in any instrument's history.
    pub latest_date: NaiveDate,
    /// Largest positive `change` on the latest date, biggest first.
    pub gainers: Vec<Mover>,
    /// Largest negative `change` on the latest date, biggest fall first.
    pub losers: Vec<Mover>,
    /// Sum of the volumes reported on the latest date.
    pub total_volume: u64,
}

/// One instrument's session on the latest date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mover {
    pub symbol: String,
    pub close: Option<Decimal>,
    pub change: Decimal,
}

/// Builds the market overview from every instrument's history.
///
/// Only samples dated on the latest date count. Sessions without a `change` are
/// neither gainers nor losers. Equal changes are ordered by symbol. Returns
/// `None` when no instrument has any sample.
pub fn market_summary(instruments: &[Instrument]) -> Option<MarketSummary> {
    let latest_date = instruments
        .iter()
        .filter_map(|i| i.history.iter().map(|s| s.date).max())
        .max()?;

    let sessions: Vec<(&str, &PriceSample)> = instruments
        .iter()
        .filter_map(|i| {
            i.history
                .iter()
                .rev()
                .find(|s| s.date == latest_date)
                .map(|s| (i.symbol.as_str(), s))
        })
        .collect();

    let movers = |wanted: fn(&Decimal) -> bool| -> Vec<Mover> {
        sessions
            .iter()
            .filter_map(|(symbol, s)| {
                s.change.filter(wanted).map(|change| Mover {
                    symbol: symbol.to_string(),
                    close: s.close,
                    change,
                })
            })
            .collect()
    };

    let mut gainers = movers(is_gain);
    gainers.sort_by(|a, b| b.change.cmp(&a.change).then_with(|| a.symbol.cmp(&b.symbol)));
    gainers.truncate(TOP_MOVERS);

    let mut losers = movers(is_loss);
    losers.sort_by(|a, b| a.change.cmp(&b.change).then_with(|| a.symbol.cmp(&b.symbol)));
    losers.truncate(TOP_MOVERS);

    let total_volume = sessions
        .iter()
        .filter_map(|(_, s)| s.volume)
        .fold(0u64, u64::saturating_add);

    let total_stocks = instruments
        .iter()
        .map(|i| i.symbol.to_uppercase())
        .collect::<HashSet<_>>()
        .len();

    tracing::debug!(
        %latest_date,
        sessions = sessions.len(),
        gainers = gainers.len(),
        losers = losers.len(),
        "Built market summary"
    );

    Some(MarketSummary {
        total_stocks,
        latest_date,
        gainers,
        losers,
        total_volume,
    })
}

fn is_gain(change: &Decimal) -> bool {
    *change > Decimal::ZERO
}

fn is_loss(change: &Decimal) -> bool {
    *change < Decimal::ZERO
}
