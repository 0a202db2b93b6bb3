//! Read-only projections of a cleaned [`PageViews`] dataset used by the charts.

use chrono::{Datelike, Month};
use std::collections::BTreeMap;

use crate::dataset::PageViews;
use crate::stats;

pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Three-letter abbreviation, e.g. `Jan`.
pub fn month_abbrev(month: Month) -> &'static str {
    &month.name()[..3]
}

/// Average value per (year, month), pivoted so every year has twelve month columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAverages {
    rows: Vec<(i32, [Option<f64>; 12])>,
}

impl MonthlyAverages {
    pub fn from_page_views(data: &PageViews) -> Self {
        let mut buckets: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
        for observation in data.observations() {
            buckets
                .entry((observation.date.year(), observation.date.month0()))
                .or_default()
                .push(observation.value);
        }

        let mut rows: Vec<(i32, [Option<f64>; 12])> = Vec::new();
        for ((year, month0), values) in buckets {
            if rows.last().map(|(y, _)| *y) != Some(year) {
                rows.push((year, [None; 12]));
            }
            if let Some((_, cells)) = rows.last_mut() {
                cells[month0 as usize] = stats::mean(&values);
            }
        }

        Self { rows }
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|(year, _)| *year).collect()
    }

    /// One column per month: the averages of that month across every year, in year order.
    pub fn month_column(&self, month: Month) -> Vec<Option<f64>> {
        let idx = month.number_from_month() as usize - 1;
        self.rows.iter().map(|(_, cells)| cells[idx]).collect()
    }
}

/// Values grouped by calendar year, years ascending.
pub fn group_by_year(data: &PageViews) -> Vec<(i32, Vec<f64>)> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for observation in data.observations() {
        groups
            .entry(observation.date.year())
            .or_default()
            .push(observation.value);
    }
    groups.into_iter().collect()
}

/// Values grouped by month abbreviation, always twelve groups from `Jan` to `Dec`.
pub fn group_by_month(data: &PageViews) -> Vec<(&'static str, Vec<f64>)> {
    let mut groups: Vec<(&'static str, Vec<f64>)> = MONTHS
        .iter()
        .map(|month| (month_abbrev(*month), Vec::new()))
        .collect();

    for observation in data.observations() {
        groups[observation.date.month0() as usize]
            .1
            .push(observation.value);
    }
    groups
}
