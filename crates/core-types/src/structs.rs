use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day's record for a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub date: NaiveDate,
    /// The closing price. Missing or non-positive closes are invalid data.
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub change_percent: Option<Decimal>,
}

impl PriceSample {
    /// Creates a sample carrying only a date and a closing price.
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            close: Some(close),
            volume: None,
            change: None,
            change_percent: None,
        }
    }

    /// Returns the closing price if it is present and strictly positive.
    pub fn valid_close(&self) -> Option<Decimal> {
        self.close.filter(|c| *c > Decimal::ZERO)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// The ordered daily price series of one instrument.
///
/// A `PriceHistory` is immutable once built. Selecting a different instrument
/// means building a new history, never mutating an existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistory {
    samples: Vec<PriceSample>,
}

impl PriceHistory {
    /// Wraps the samples exactly as given, without reordering.
    pub fn new(samples: Vec<PriceSample>) -> Self {
        Self { samples }
    }

    /// Sorts the samples ascending by date and collapses duplicate dates,
    /// keeping the last record seen for each date.
    ///
    /// Returns the history together with the number of records dropped.
    pub fn normalized(mut samples: Vec<PriceSample>) -> (Self, usize) {
        // Stable sort, so "last seen" still means last in the input.
        samples.sort_by_key(|s| s.date);

        let mut deduped: Vec<PriceSample> = Vec::with_capacity(samples.len());
        let mut dropped = 0;
        for sample in samples {
            match deduped.last_mut() {
                Some(last) if last.date == sample.date => {
                    *last = sample;
                    dropped += 1;
                }
                _ => deduped.push(sample),
            }
        }

        (Self { samples: deduped }, dropped)
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<PriceSample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceSample> {
        self.samples.iter()
    }

    /// The most recent sample, by position.
    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.last()
    }
}

impl AsRef<[PriceSample]> for PriceHistory {
    fn as_ref(&self) -> &[PriceSample] {
        &self.samples
    }
}

impl FromIterator<PriceSample> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = PriceSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PriceHistory {
    type Item = &'a PriceSample;
    type IntoIter = std::slice::Iter<'a, PriceSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
