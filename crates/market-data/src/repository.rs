use crate::document::{Instrument, MarketDocument};
use crate::error::DataError;
use crate::overview::{MarketSummary, market_summary};
use core_types::PriceHistory;
use std::fs;
use std::path::Path;

/// The loaded market data, with every instrument's history normalized.
///
/// Instrument histories are immutable once loaded; reloading builds a new
/// repository.
#[derive(Debug, Clone)]
pub struct MarketRepository {
    document: MarketDocument,
}

impl MarketRepository {
    /// Reads and parses the market data document at `path`.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let repo = Self::from_json(&raw)?;

        tracing::info!(
            path = %path.display(),
            instruments = repo.document.stocks.len(),
            last_updated = repo.document.last_updated.as_deref().unwrap_or("unknown"),
            "Loaded market data"
        );
        Ok(repo)
    }

    /// Parses a market data document from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, DataError> {
        let mut document: MarketDocument = serde_json::from_str(raw)?;

        for instrument in &mut document.stocks {
            let samples = std::mem::take(&mut instrument.history).into_samples();
            let (history, dropped) = PriceHistory::normalized(samples);
            if dropped > 0 {
                tracing::warn!(
                    symbol = %instrument.symbol,
                    dropped,
                    "Dropped duplicate-date records from history"
                );
            }
            instrument.history = history;
        }

        Ok(Self { document })
    }

    pub fn document(&self) -> &MarketDocument {
        &self.document
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.document.stocks
    }

    /// Looks up an instrument by symbol, ignoring case.
    pub fn instrument(&self, symbol: &str) -> Result<&Instrument, DataError> {
        let wanted = symbol.trim();
        self.document
            .stocks
            .iter()
            .find(|i| i.symbol.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))
    }

    /// The market-wide overview of the latest session, if any data is loaded.
    pub fn market_summary(&self) -> Option<MarketSummary> {
        market_summary(&self.document.stocks)
    }

    /// Instruments whose symbol contains `query` (case-insensitive), sorted by symbol.
    ///
    /// An empty query matches every instrument.
    pub fn search(&self, query: &str) -> Vec<&Instrument> {
        let needle = query.trim().to_uppercase();
        let mut matches: Vec<&Instrument> = self
            .document
            .stocks
            .iter()
            .filter(|i| i.symbol.to_uppercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        matches
    }
}
