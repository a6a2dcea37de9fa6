use chrono::NaiveDate;
use core_types::PriceSample;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One point of a price chart, with the session's volume bar.
///
/// The sign of `change` colours the volume bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: Decimal,
    pub volume: Option<u64>,
    pub change: Option<Decimal>,
}

/// Projects selected samples onto chart points, in order.
///
/// Samples without a valid close have nothing to plot and are left out.
pub fn chart_points<'a, I>(samples: I) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a PriceSample>,
{
    samples
        .into_iter()
        .filter_map(|s| {
            s.valid_close().map(|close| ChartPoint {
                date: s.date,
                close,
                volume: s.volume,
                change: s.change,
            })
        })
        .collect()
}
