use chrono::{Datelike, NaiveDate};
use core_types::{PriceSample, WindowSpec};

/// The samples that fall inside a display window, borrowed from the full history.
pub type Selection<'a> = Vec<&'a PriceSample>;

/// A stateless selector of display windows over a price history.
#[derive(Debug, Default, Clone, Copy)]
pub struct RangeSelector {}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the samples of `history` that fall inside `window`.
    ///
    /// `YearToDate` keeps every sample dated in `today`'s calendar year, in input
    /// order, whatever that order is. Every other window keeps the trailing
    /// `min(count, len)` samples. The history itself is never modified.
    pub fn select<'a>(
        &self,
        history: &'a [PriceSample],
        window: WindowSpec,
        today: NaiveDate,
    ) -> Selection<'a> {
        let selection: Selection<'a> = match window {
            WindowSpec::YearToDate => {
                let year = today.year();
                history.iter().filter(|s| s.year() == year).collect()
            }
            _ => {
                let count = window.trading_days().unwrap_or(history.len());
                let start = history.len().saturating_sub(count);
                history[start..].iter().collect()
            }
        };

        tracing::debug!(
            window = %window,
            samples = history.len(),
            selected = selection.len(),
            "Selected display window"
        );

        selection
    }

    /// Like [`RangeSelector::select`], but takes a raw window token.
    ///
    /// Unrecognized tokens select the full history.
    pub fn select_token<'a>(
        &self,
        history: &'a [PriceSample],
        token: &str,
        today: NaiveDate,
    ) -> Selection<'a> {
        let window = token.parse().unwrap_or_else(|_| {
            tracing::warn!(token, "Unrecognized window token, selecting the full history");
            WindowSpec::All
        });
        self.select(history, window, today)
    }
}
