use rust_decimal::Decimal;

/// Sum of `values`, or `None` if it leaves the `Decimal` range.
pub fn checked_sum<'a, I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
}

/// Arithmetic mean of `values`.
///
/// `None` for an empty slice or when the sum overflows.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    checked_sum(values)?.checked_div(Decimal::from(values.len()))
}

/// Unweighted mean of the last `period` values.
///
/// Returns `None` when fewer than `period` values exist or `period` is zero.
pub fn trailing_mean(values: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}

/// Simple moving average series aligned with `values`.
///
/// Element `i` is the mean of `values[i + 1 - period..=i]`; the first `period - 1`
/// elements have no value yet.
pub fn rolling_mean(values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).checked_sub(period)?;
            mean(&values[start..=i])
        })
        .collect()
}

/// Simple day-over-day returns of adjacent prices.
///
/// Pairs whose earlier price is not strictly positive are skipped. `None` if any
/// return falls outside the `Decimal` range.
pub fn simple_returns(prices: &[Decimal]) -> Option<Vec<Decimal>> {
    prices
        .windows(2)
        .filter(|w| w[0] > Decimal::ZERO)
        .map(|w| w[1].checked_sub(w[0])?.checked_div(w[0]))
        .collect()
}

/// Percentage change from `base` to `latest`.
///
/// `None` if `base` is not positive or the change overflows.
pub fn percent_change(base: Decimal, latest: Decimal) -> Option<Decimal> {
    if base <= Decimal::ZERO {
        return None;
    }
    latest
        .checked_sub(base)?
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[dec!(1), dec!(2), dec!(6)]), Some(dec!(3)));
    }

    #[test]
    fn trailing_mean_uses_only_the_tail() {
        let values = [dec!(100), dec!(1), dec!(2), dec!(3)];
        assert_eq!(trailing_mean(&values, 3), Some(dec!(2)));
        assert_eq!(trailing_mean(&values, 5), None);
        assert_eq!(trailing_mean(&values, 0), None);
    }

    #[test]
    fn rolling_mean_warms_up_then_slides() {
        let values = [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];
        assert_eq!(
            rolling_mean(&values, 3),
            vec![None, None, Some(dec!(2)), Some(dec!(3)), Some(dec!(4))]
        );
    }

    #[test]
    fn rolling_mean_with_zero_period_is_all_none() {
        assert_eq!(rolling_mean(&[dec!(1), dec!(2)], 0), vec![None, None]);
    }

    #[test]
    fn simple_returns_are_relative_changes() {
        let returns = simple_returns(&[dec!(100), dec!(110), dec!(99)]);
        assert_eq!(returns, Some(vec![dec!(0.1), dec!(-0.1)]));
    }

    #[test]
    fn simple_returns_skip_non_positive_bases() {
        let returns = simple_returns(&[dec!(0), dec!(10), dec!(20)]);
        assert_eq!(returns, Some(vec![dec!(1)]));
    }

    #[test]
    fn percent_change_guards_the_base() {
        assert_eq!(percent_change(dec!(50), dec!(55)), Some(dec!(10)));
        assert_eq!(percent_change(dec!(0), dec!(55)), None);
    }

    #[test]
    fn overflowing_arithmetic_yields_none() {
        let huge = Decimal::MAX / dec!(10);
        assert_eq!(checked_sum(&[huge; 20]), None);
        assert_eq!(mean(&[huge; 20]), None);
        assert_eq!(trailing_mean(&[huge; 20], 20), None);
        assert_eq!(rolling_mean(&[huge; 12], 11), vec![None; 12]);
        assert_eq!(simple_returns(&[dec!(0.0000000001), Decimal::MAX]), None);
        assert_eq!(percent_change(dec!(0.0000000001), Decimal::MAX), None);
    }
}
