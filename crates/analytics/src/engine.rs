use crate::indicators::{checked_sum, mean, percent_change, simple_returns, trailing_mean};
use crate::report::MetricsResult;
use chrono::{Datelike, NaiveDate};
use core_types::PriceSample;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Trading sessions assumed per year when annualizing.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Trailing window, in daily returns, used for volatility.
const VOLATILITY_WINDOW: usize = 30;

/// Volatility and Sharpe are withheld below this many daily returns.
const MIN_RETURNS_FOR_VOLATILITY: usize = 20;

/// Look-back lengths, in trading days, of the fixed period returns.
pub const LOOKBACK_1W: usize = 5;
pub const LOOKBACK_1M: usize = 21;
pub const LOOKBACK_3M: usize = 63;
pub const LOOKBACK_6M: usize = 126;
pub const LOOKBACK_1Y: usize = 252;

/// A stateless calculator for deriving statistics from a daily price history.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the statistics of one instrument.
    ///
    /// # Arguments
    ///
    /// * `history` - The instrument's samples, oldest first.
    /// * `risk_free_rate` - Annual risk-free rate as a fraction (0.112 for 11.2%).
    /// * `today` - Reference date; its calendar year defines year-to-date.
    ///
    /// Never fails. Metrics that lack enough history are `None`; a history with
    /// fewer than two valid closes yields an all-`None` result.
    pub fn compute(
        &self,
        history: &[PriceSample],
        risk_free_rate: Decimal,
        today: NaiveDate,
    ) -> MetricsResult {
        let mut report = MetricsResult::new();

        let prices: Vec<Decimal> = history.iter().filter_map(PriceSample::valid_close).collect();
        if prices.len() < 2 {
            tracing::debug!(
                samples = history.len(),
                valid_prices = prices.len(),
                "Insufficient price history, returning empty metrics"
            );
            return report;
        }

        self.calculate_moving_averages(&prices, &mut report);
        self.calculate_risk(&prices, risk_free_rate, &mut report);
        self.calculate_period_returns(&prices, &mut report);
        report.return_ytd = year_to_date_return(history, today.year());

        tracing::debug!(
            samples = history.len(),
            valid_prices = prices.len(),
            "Computed metrics: {:?}",
            report
        );

        report
    }

    fn calculate_moving_averages(&self, prices: &[Decimal], report: &mut MetricsResult) {
        report.moving_average_20 = trailing_mean(prices, 20);
        report.moving_average_50 = trailing_mean(prices, 50);
    }

    /// Calculates annualized volatility and the Sharpe ratio from the trailing daily returns.
    ///
    /// Either metric stays `None` if its arithmetic leaves the `Decimal` range.
    fn calculate_risk(&self, prices: &[Decimal], risk_free_rate: Decimal, report: &mut MetricsResult) {
        let Some(returns) = simple_returns(prices) else {
            tracing::warn!(valid_prices = prices.len(), "Daily returns overflowed, skipping risk metrics");
            return;
        };
        if returns.len() < MIN_RETURNS_FOR_VOLATILITY {
            return;
        }

        let window = &returns[returns.len().saturating_sub(VOLATILITY_WINDOW)..];
        let Some(mean_return) = mean(window) else {
            tracing::warn!("Mean daily return overflowed, skipping risk metrics");
            return;
        };

        let Some(volatility) = annualized_volatility(window, mean_return) else {
            tracing::warn!(%mean_return, "Volatility could not be computed within Decimal range");
            return;
        };
        report.volatility_annualized_pct = Some(volatility);

        if volatility.is_zero() {
            return;
        }

        report.sharpe_ratio = sharpe_ratio(mean_return, risk_free_rate, volatility);
        if report.sharpe_ratio.is_none() {
            tracing::warn!(%volatility, %risk_free_rate, "Sharpe ratio overflowed");
        }
    }

    fn calculate_period_returns(&self, prices: &[Decimal], report: &mut MetricsResult) {
        report.return_1w = period_return(prices, LOOKBACK_1W);
        report.return_1m = period_return(prices, LOOKBACK_1M);
        report.return_3m = period_return(prices, LOOKBACK_3M);
        report.return_6m = period_return(prices, LOOKBACK_6M);
        report.return_1y = period_return(prices, LOOKBACK_1Y);
    }
}

/// Population standard deviation of `returns` around `mean_return`, annualized and
/// expressed in percent.
fn annualized_volatility(returns: &[Decimal], mean_return: Decimal) -> Option<Decimal> {
    let squared_deviations = returns
        .iter()
        .map(|r| {
            let deviation = r.checked_sub(mean_return)?;
            deviation.checked_mul(deviation)
        })
        .collect::<Option<Vec<Decimal>>>()?;

    // Population variance: divided by N, not N - 1.
    let variance = checked_sum(&squared_deviations)?.checked_div(Decimal::from(returns.len()))?;
    let std_dev = variance.sqrt()?;
    let annualizer = Decimal::from(TRADING_DAYS_PER_YEAR).sqrt()?;

    std_dev.checked_mul(annualizer)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Annualized excess return per unit of annualized volatility.
fn sharpe_ratio(mean_return: Decimal, risk_free_rate: Decimal, volatility_pct: Decimal) -> Option<Decimal> {
    let annualized_return = mean_return.checked_mul(Decimal::from(TRADING_DAYS_PER_YEAR))?;
    let volatility = volatility_pct.checked_div(Decimal::ONE_HUNDRED)?;
    annualized_return.checked_sub(risk_free_rate)?.checked_div(volatility)
}

/// Percentage return over the last `lookback` trading days.
///
/// Needs `lookback + 1` prices; returns `None` otherwise.
pub fn period_return(prices: &[Decimal], lookback: usize) -> Option<Decimal> {
    if prices.len() < lookback + 1 {
        return None;
    }
    let latest = *prices.last()?;
    let base = prices[prices.len() - 1 - lookback];
    percent_change(base, latest)
}

/// Percentage return from the first to the last sample dated in `year`.
///
/// Works on the raw samples in their given order, so invalid closes still count
/// towards the two samples required. A missing or non-positive first close, or a
/// missing last close, yields `None`.
pub fn year_to_date_return(history: &[PriceSample], year: i32) -> Option<Decimal> {
    let mut in_year = history.iter().filter(|s| s.year() == year);
    let first = in_year.next()?;
    let last = in_year.last()?;

    percent_change(first.close?, last.close?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    /// Builds consecutive daily samples ending on `today()`.
    fn history_of(closes: &[Decimal]) -> Vec<PriceSample> {
        let start = today() - chrono::Duration::days(closes.len() as i64 - 1);
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceSample::new(start + chrono::Duration::days(i as i64), *close))
            .collect()
    }

    #[test]
    fn empty_history_yields_empty_result() {
        let result = MetricsEngine::new().compute(&[], dec!(0.112), today());
        assert!(result.is_empty());
    }

    #[test]
    fn single_valid_price_yields_empty_result() {
        let mut history = history_of(&[dec!(10), dec!(11), dec!(12)]);
        history[0].close = None;
        history[1].close = Some(dec!(-3));

        let result = MetricsEngine::new().compute(&history, dec!(0.112), today());
        assert!(result.is_empty());
    }

    #[test]
    fn constant_prices_have_zero_volatility_and_no_sharpe() {
        let history = history_of(&[dec!(10); 40]);
        let result = MetricsEngine::new().compute(&history, dec!(0.112), today());

        assert_eq!(result.moving_average_20, Some(dec!(10)));
        assert_eq!(result.moving_average_50, None);
        assert_eq!(result.volatility_annualized_pct, Some(Decimal::ZERO));
        assert_eq!(result.sharpe_ratio, None);
        assert_eq!(result.return_1w, Some(Decimal::ZERO));
        assert_eq!(result.return_1m, Some(Decimal::ZERO));
        assert_eq!(result.return_3m, None);
    }

    #[test]
    fn five_prices_are_not_enough_for_a_weekly_return() {
        let history = history_of(&[dec!(100), dec!(102), dec!(101), dec!(105), dec!(110)]);
        let result = MetricsEngine::new().compute(&history, dec!(0.112), today());

        assert_eq!(result.return_1w, None);
        assert_eq!(result.moving_average_20, None);
        assert_eq!(result.volatility_annualized_pct, None);
    }

    #[test]
    fn weekly_return_uses_price_five_sessions_back() {
        let history = history_of(&[dec!(100), dec!(102), dec!(101), dec!(105), dec!(110), dec!(120)]);
        let result = MetricsEngine::new().compute(&history, dec!(0.112), today());

        assert_eq!(result.return_1w, Some(dec!(20)));
    }

    #[test]
    fn invalid_closes_are_skipped_not_zeroed() {
        let mut closes = vec![dec!(10); 21];
        closes.push(dec!(30));
        let mut history = history_of(&closes);
        // Zero and missing closes are dropped from the valid-price sequence.
        let duplicate_date = history[4].date;
        history.insert(5, PriceSample::new(duplicate_date, Decimal::ZERO));
        history[10].close = None;

        let result = MetricsEngine::new().compute(&history, dec!(0.112), today());

        // Trailing 20 valid prices: 19 tens and the final 30.
        assert_eq!(result.moving_average_20, Some(dec!(11)));
    }

    #[test]
    fn volatility_uses_trailing_thirty_returns_with_population_variance() {
        // One outlier return of +900% followed by thirty returns alternating
        // +25% / -20%. Only the alternating tail is inside the window.
        let mut closes = vec![dec!(10)];
        for i in 0..31 {
            closes.push(if i % 2 == 0 { dec!(100) } else { dec!(125) });
        }
        let rf = dec!(0.05);
        let result = MetricsEngine::new().compute(&history_of(&closes), rf, today());

        // mean = 0.025, population std dev = 0.225
        let annualizer = Decimal::from(TRADING_DAYS_PER_YEAR).sqrt().unwrap();
        let expected_volatility = dec!(0.225) * annualizer * Decimal::ONE_HUNDRED;
        let expected_sharpe = (dec!(0.025) * dec!(252) - rf) / (dec!(0.225) * annualizer);

        let volatility = result.volatility_annualized_pct.unwrap();
        let sharpe = result.sharpe_ratio.unwrap();
        assert!((volatility - expected_volatility).abs() < dec!(0.000001));
        assert!((sharpe - expected_sharpe).abs() < dec!(0.000001));
    }

    #[test]
    fn volatility_needs_twenty_returns() {
        let mut closes = Vec::new();
        for i in 0..20 {
            closes.push(Decimal::from(100 + i));
        }
        // 20 prices -> 19 returns.
        let result = MetricsEngine::new().compute(&history_of(&closes), dec!(0.1), today());
        assert_eq!(result.volatility_annualized_pct, None);
        assert_eq!(result.sharpe_ratio, None);

        closes.push(dec!(120));
        let result = MetricsEngine::new().compute(&history_of(&closes), dec!(0.1), today());
        assert!(result.volatility_annualized_pct.is_some());
        assert!(result.sharpe_ratio.is_some());
    }

    #[test]
    fn year_to_date_uses_first_and_last_sample_of_the_year() {
        let mut history = history_of(&[dec!(40), dec!(45)]);
        history[0].date = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
        history[1].date = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();
        history.push(PriceSample::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(50)));
        history.push(PriceSample::new(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), dec!(55)));

        let result = MetricsEngine::new().compute(&history, dec!(0.112), today());
        assert_eq!(result.return_ytd, Some(dec!(10.0)));
    }

    #[test]
    fn year_to_date_is_none_with_one_sample_or_bad_first_close() {
        let history = vec![
            PriceSample::new(NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(), dec!(40)),
            PriceSample::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(50)),
        ];
        assert_eq!(year_to_date_return(&history, 2024), None);

        let mut history = history_of(&[dec!(50), dec!(55)]);
        history[0].close = Some(Decimal::ZERO);
        assert_eq!(year_to_date_return(&history, 2024), None);
    }

    #[test]
    fn year_to_date_counts_samples_with_missing_closes() {
        let mut history = history_of(&[dec!(50), dec!(1), dec!(60)]);
        history[1].close = None;
        assert_eq!(year_to_date_return(&history, 2024), Some(dec!(20)));

        history.pop();
        assert_eq!(year_to_date_return(&history, 2024), None);
    }

    #[test]
    fn extreme_jump_between_positive_prices_withholds_only_risk_metrics() {
        let mut closes = vec![dec!(1); 25];
        closes.push(dec!(0.0000000001));
        closes.push(dec!(100000));

        let result = MetricsEngine::new().compute(&history_of(&closes), dec!(0.112), today());

        // The final return is about 1e15; its squared deviation exceeds the Decimal range.
        assert_eq!(result.volatility_annualized_pct, None);
        assert_eq!(result.sharpe_ratio, None);
        assert!(result.moving_average_20.is_some());
        assert_eq!(result.return_1w, Some(dec!(9999900)));
    }

    #[test]
    fn moving_average_beyond_decimal_range_is_none() {
        let huge = Decimal::MAX / dec!(10);
        let result = MetricsEngine::new().compute(&history_of(&[huge; 20]), dec!(0.112), today());

        assert_eq!(result.moving_average_20, None);
        assert_eq!(result.return_1w, Some(Decimal::ZERO));
        assert_eq!(result.volatility_annualized_pct, None);
    }

    #[test]
    fn compute_is_idempotent() {
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(50 + (i * 7) % 13)).collect();
        let history = history_of(&closes);
        let engine = MetricsEngine::new();

        let first = engine.compute(&history, dec!(0.112), today());
        let second = engine.compute(&history, dec!(0.112), today());
        assert_eq!(first, second);
    }
}
