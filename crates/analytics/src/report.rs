use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived statistics of one price history.
///
/// Every field is optional: `None` means the history was too short to compute
/// the metric. A `MetricsResult` is always rebuilt from scratch by the
/// `MetricsEngine`, never updated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    // I. Trend
    pub moving_average_20: Option<Decimal>,
    pub moving_average_50: Option<Decimal>,

    // II. Risk
    /// Annualized volatility of the trailing daily returns, in percent.
    pub volatility_annualized_pct: Option<Decimal>,
    pub sharpe_ratio: Option<Decimal>,

    // III. Returns, in percent
    #[serde(rename = "return1W")]
    pub return_1w: Option<Decimal>,
    #[serde(rename = "return1M")]
    pub return_1m: Option<Decimal>,
    #[serde(rename = "return3M")]
    pub return_3m: Option<Decimal>,
    #[serde(rename = "return6M")]
    pub return_6m: Option<Decimal>,
    #[serde(rename = "return1Y")]
    pub return_1y: Option<Decimal>,
    #[serde(rename = "returnYTD")]
    pub return_ytd: Option<Decimal>,
}

impl MetricsResult {
    /// Creates a result with every metric absent, the "insufficient data" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The period returns paired with their display labels, shortest first.
    pub fn period_returns(&self) -> [(&'static str, Option<Decimal>); 6] {
        [
            ("1 Week", self.return_1w),
            ("1 Month", self.return_1m),
            ("3 Months", self.return_3m),
            ("6 Months", self.return_6m),
            ("1 Year", self.return_1y),
            ("YTD", self.return_ytd),
        ]
    }

    /// True when no metric could be computed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_with_display_field_names() {
        let result = MetricsResult {
            return_ytd: Some(dec!(10)),
            ..MetricsResult::new()
        };
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("movingAverage20").unwrap().is_null());
        assert!(json.get("volatilityAnnualizedPct").unwrap().is_null());
        assert!(json.get("return1W").unwrap().is_null());
        assert_eq!(json.get("returnYTD").unwrap(), "10");
    }

    #[test]
    fn new_result_is_empty() {
        assert!(MetricsResult::new().is_empty());
        let partial = MetricsResult {
            return_1w: Some(Decimal::ZERO),
            ..MetricsResult::new()
        };
        assert!(!partial.is_empty());
    }
}
