use chrono::NaiveDate;
use std::path::PathBuf;

/// Returns the `q` quantile (`0.0..=1.0`) of an ascending slice.
///
/// Uses linear interpolation between the two closest ranks, so the 0.5
/// quantile of `[1, 2, 3, 4]` is `2.5`. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let q = q.clamp(0.0, 1.0);
    let last = sorted.len() - 1;
    if q >= 1.0 {
        return Some(sorted[last]);
    }

    let rank = q * last as f64;
    let lower = rank.floor() as usize;
    let fraction = rank - lower as f64;
    let floor = sorted[lower];
    let ceiling = sorted[(lower + 1).min(last)];

    Some(floor + (ceiling - floor) * fraction)
}

/// Sorts a copy of `values` and returns its `q` quantile.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Box-plot statistics with full-range whiskers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: *sorted.first()?,
            q1: quantile_sorted(&sorted, 0.25)?,
            median: quantile_sorted(&sorted, 0.5)?,
            q3: quantile_sorted(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }
}

#[derive(Debug)]
pub struct CleaningStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl CleaningStats {
    pub fn rows_removed(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

#[derive(Debug)]
pub struct AnalysisResult {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub cleaning: CleaningStats,
    pub outputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_interpolates_between_ranks() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&data, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile_sorted(&data, 0.25).unwrap(), 1.75);
        assert_relative_eq!(quantile_sorted(&data, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile_sorted(&data, 1.0).unwrap(), 4.0);
    }

    #[test]
    fn quantile_sorts_unsorted_input() {
        let data = [10.0, 0.0, 5.0];
        assert_relative_eq!(quantile(&data, 0.5).unwrap(), 5.0);
        assert_relative_eq!(quantile(&data, 0.025).unwrap(), 0.25);
    }

    #[test]
    fn quantile_of_empty_is_none() {
        assert!(quantile(&[], 0.5).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn single_value_is_every_quantile() {
        assert_relative_eq!(quantile(&[7.0], 0.025).unwrap(), 7.0);
        assert_relative_eq!(quantile(&[7.0], 0.975).unwrap(), 7.0);
    }

    #[test]
    fn five_number_summary_uses_full_range_whiskers() {
        let summary = FiveNumberSummary::from_values(&[9.0, 1.0, 5.0, 3.0, 7.0]).unwrap();
        assert_eq!(
            summary,
            FiveNumberSummary {
                min: 1.0,
                q1: 3.0,
                median: 5.0,
                q3: 7.0,
                max: 9.0,
            }
        );
        assert!(FiveNumberSummary::from_values(&[]).is_none());
    }
}
