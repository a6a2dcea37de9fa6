use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named display window over a price history.
///
/// Every window except `YearToDate` and `All` is a fixed number of trailing
/// trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowSpec {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "ALL")]
    All,
}

impl WindowSpec {
    pub const ALL_WINDOWS: [WindowSpec; 8] = [
        WindowSpec::OneMonth,
        WindowSpec::ThreeMonths,
        WindowSpec::SixMonths,
        WindowSpec::YearToDate,
        WindowSpec::OneYear,
        WindowSpec::TwoYears,
        WindowSpec::FiveYears,
        WindowSpec::All,
    ];

    /// The display token for this window (e.g. "3M").
    pub fn token(&self) -> &'static str {
        match self {
            WindowSpec::OneMonth => "1M",
            WindowSpec::ThreeMonths => "3M",
            WindowSpec::SixMonths => "6M",
            WindowSpec::YearToDate => "YTD",
            WindowSpec::OneYear => "1Y",
            WindowSpec::TwoYears => "2Y",
            WindowSpec::FiveYears => "5Y",
            WindowSpec::All => "ALL",
        }
    }

    /// The number of trailing trading days covered by this window.
    ///
    /// Returns `None` for `YearToDate` (a calendar filter) and `All` (the whole history).
    pub fn trading_days(&self) -> Option<usize> {
        match self {
            WindowSpec::OneMonth => Some(21),
            WindowSpec::ThreeMonths => Some(63),
            WindowSpec::SixMonths => Some(126),
            WindowSpec::OneYear => Some(252),
            WindowSpec::TwoYears => Some(504),
            WindowSpec::FiveYears => Some(1260),
            WindowSpec::YearToDate | WindowSpec::All => None,
        }
    }

    /// Parses a window token, falling back to `All` for anything unrecognized.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(WindowSpec::All)
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for WindowSpec {
    type Err = CoreError;

    /// Strict, case-insensitive parse of a window token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        WindowSpec::ALL_WINDOWS
            .into_iter()
            .find(|w| w.token().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidInput("window".to_string(), s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trading_day_counts_match_tokens() {
        assert_eq!(WindowSpec::OneMonth.trading_days(), Some(21));
        assert_eq!(WindowSpec::ThreeMonths.trading_days(), Some(63));
        assert_eq!(WindowSpec::SixMonths.trading_days(), Some(126));
        assert_eq!(WindowSpec::OneYear.trading_days(), Some(252));
        assert_eq!(WindowSpec::TwoYears.trading_days(), Some(504));
        assert_eq!(WindowSpec::FiveYears.trading_days(), Some(1260));
        assert_eq!(WindowSpec::YearToDate.trading_days(), None);
        assert_eq!(WindowSpec::All.trading_days(), None);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("ytd".parse::<WindowSpec>(), Ok(WindowSpec::YearToDate));
        assert_eq!(" 1y ".parse::<WindowSpec>(), Ok(WindowSpec::OneYear));
        assert_eq!("All".parse::<WindowSpec>(), Ok(WindowSpec::All));
    }

    #[test]
    fn unknown_tokens_are_rejected_strictly_but_fall_back_leniently() {
        assert!("10Y".parse::<WindowSpec>().is_err());
        assert_eq!(WindowSpec::from_token("10Y"), WindowSpec::All);
        assert_eq!(WindowSpec::from_token(""), WindowSpec::All);
    }

    #[test]
    fn tokens_round_trip_through_display() {
        for window in WindowSpec::ALL_WINDOWS {
            assert_eq!(WindowSpec::from_token(&window.to_string()), window);
        }
    }
}
