use core_types::PriceHistory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The dashboard market data document, as produced by the data build step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDocument {
    /// Human-readable date of the latest session (e.g. "14 Mar 2025").
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub stock_count: Option<usize>,
    pub stocks: Vec<Instrument>,
}

/// One listed stock: descriptive fields, the pre-computed quote header, and its
/// daily history. Only `symbol` and `history` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub prev_close: Option<Decimal>,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub change_percent: Option<Decimal>,
    #[serde(default)]
    pub year_high: Option<Decimal>,
    #[serde(default)]
    pub year_low: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub avg_volume_10d: Option<u64>,
    #[serde(default)]
    pub avg_volume_30d: Option<u64>,
    pub history: PriceHistory,
}

impl Instrument {
    /// The company name, or the symbol when the document has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn sector_label(&self) -> &str {
        self.sector.as_deref().unwrap_or("General")
    }
}
