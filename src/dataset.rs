use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::stats;

pub const LOWER_QUANTILE: f64 = 0.025;
pub const UPPER_QUANTILE: f64 = 0.975;

/// A single day's page-view count.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily observations ordered by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageViews {
    observations: Vec<Observation>,
}

impl PageViews {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self { observations }
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let start_time = Instant::now();
        info!(action = "start", component = "csv_loader", file_path = ?path, "Loading page views");

        let file =
            File::open(path).with_context(|| format!("Failed to open CSV file {:?}", path))?;
        let page_views =
            Self::from_reader(file).with_context(|| format!("Failed to read {:?}", path))?;

        info!(
            action = "complete",
            component = "csv_loader",
            row_count = page_views.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Page views loaded"
        );
        Ok(page_views)
    }

    /// Reads `date,value` rows with a header line.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut observations = Vec::new();
        for (idx, record) in reader.deserialize::<Observation>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let observation = record.with_context(|| format!("Invalid row at line {}", line))?;
            if !observation.value.is_finite() {
                anyhow::bail!("Non-finite value {} at line {}", observation.value, line);
            }
            observations.push(observation);
        }

        Ok(Self::new(observations))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.observations.first()?.date, self.observations.last()?.date))
    }

    /// Distinct calendar years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.observations.iter().map(|o| o.date.year()).collect();
        years.dedup();
        years
    }

    pub fn quantile(&self, q: f64) -> Option<f64> {
        stats::quantile(&self.values(), q)
    }

    pub fn outlier_bounds(&self, lower_q: f64, upper_q: f64) -> Option<(f64, f64)> {
        let mut sorted = self.values();
        sorted.sort_by(f64::total_cmp);
        Some((
            stats::quantile_sorted(&sorted, lower_q)?,
            stats::quantile_sorted(&sorted, upper_q)?,
        ))
    }

    /// Keeps rows whose value lies within the `[lower_q, upper_q]` quantile band, inclusive.
    pub fn filter_outliers(&self, lower_q: f64, upper_q: f64) -> Self {
        let Some((lower, upper)) = self.outlier_bounds(lower_q, upper_q) else {
            return Self::default();
        };

        let observations: Vec<Observation> = self
            .observations
            .iter()
            .filter(|o| o.value >= lower && o.value <= upper)
            .copied()
            .collect();

        debug!(
            action = "filter",
            component = "outlier_filter",
            lower_bound = lower,
            upper_bound = upper,
            rows_before = self.len(),
            rows_after = observations.len(),
            "Filtered outliers"
        );

        Self { observations }
    }

    /// Drops the top and bottom 2.5% of days.
    pub fn clean(&self) -> Self {
        self.filter_outliers(LOWER_QUANTILE, UPPER_QUANTILE)
    }
}

pub fn load_and_clean(path: &Path) -> Result<PageViews> {
    Ok(PageViews::from_csv_path(path)?.clean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_and_sorts_by_date() {
        let csv = "date,value\n2016-05-10,200\n2016-05-09,100\n2016-05-11, 300\n";
        let data = PageViews::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.observations()[0].date, day(2016, 5, 9));
        assert_eq!(data.values(), vec![100.0, 200.0, 300.0]);
        assert_eq!(data.date_range(), Some((day(2016, 5, 9), day(2016, 5, 11))));
    }

    #[test]
    fn malformed_date_is_an_error() {
        let csv = "date,value\n2016-13-01,5\n";
        let err = PageViews::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn malformed_value_is_an_error() {
        let csv = "date,value\n2016-05-09,lots\n";
        assert!(PageViews::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn non_finite_value_is_an_error() {
        let csv = "date,value\n2016-05-09,10\n2016-05-10,NaN\n";
        let err = PageViews::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));

        let csv = "date,value\n2016-05-09,inf\n";
        assert!(PageViews::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(PageViews::from_csv_path(Path::new("does/not/exist.csv")).is_err());
    }

    #[test]
    fn clean_keeps_inclusive_quantile_band() {
        let observations: Vec<Observation> = (0..100)
            .map(|i| Observation {
                date: day(2017, 1, 1) + chrono::Days::new(i),
                value: i as f64,
            })
            .collect();
        let data = PageViews::new(observations);
        let (lower, upper) = data.outlier_bounds(LOWER_QUANTILE, UPPER_QUANTILE).unwrap();
        assert_relative_eq!(lower, 2.475);
        assert_relative_eq!(upper, 96.525);

        let cleaned = data.clean();
        assert_eq!(cleaned.len(), 94);
        assert!(cleaned.values().iter().all(|v| *v >= lower && *v <= upper));
        assert_eq!(cleaned.observations()[0].value, 3.0);
    }

    #[test]
    fn bound_values_are_retained() {
        let observations = [1.0, 1.0, 1.0, 5.0, 9.0, 9.0, 9.0]
            .iter()
            .enumerate()
            .map(|(i, v)| Observation {
                date: day(2018, 3, 1 + i as u32),
                value: *v,
            })
            .collect();
        let cleaned = PageViews::new(observations).clean();
        assert_eq!(cleaned.len(), 7);
    }

    #[test]
    fn cleaning_empty_and_single() {
        assert!(PageViews::default().clean().is_empty());

        let single = PageViews::new(vec![Observation {
            date: day(2019, 1, 1),
            value: 42.0,
        }]);
        assert_eq!(single.clean().len(), 1);
    }

    #[test]
    fn years_are_distinct_and_ascending() {
        let data = PageViews::new(vec![
            Observation { date: day(2018, 1, 1), value: 1.0 },
            Observation { date: day(2016, 6, 1), value: 1.0 },
            Observation { date: day(2016, 7, 1), value: 1.0 },
        ]);
        assert_eq!(data.years(), vec![2016, 2018]);
    }
}
