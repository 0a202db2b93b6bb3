use plotters::style::RGBColor;
use std::time::Instant;
use tracing::info;

use crate::dataset::PageViews;
use crate::figure::{BarSeries, BoxGroup, Figure, Panel, PanelKind, TimeSeries};
use crate::stats::FiveNumberSummary;
use crate::views::{self, MonthlyAverages, MONTHS};

pub const LINE_TITLE: &str = "Daily freeCodeCamp Forum Page Views 5/2016-12/2019";
pub const YEAR_BOX_TITLE: &str = "Year-wise Box Plot (Trend)";
pub const MONTH_BOX_TITLE: &str = "Month-wise Box Plot (Seasonality)";

const LINE_RED: RGBColor = RGBColor(255, 0, 0);

// One color per month, cycled the same way as the usual ten-color category palette.
const MONTH_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Page views over time as a single red line.
pub fn draw_line_plot(data: &PageViews) -> Figure {
    let points = data
        .observations()
        .iter()
        .map(|o| (o.date, o.value))
        .collect();

    Figure {
        width: 1500,
        height: 500,
        panels: vec![Panel {
            title: Some(LINE_TITLE.to_string()),
            x_label: "Date".to_string(),
            y_label: "Page Views".to_string(),
            legend_title: None,
            kind: PanelKind::Line {
                series: vec![TimeSeries {
                    points,
                    color: LINE_RED,
                    stroke_width: 1,
                }],
            },
        }],
    }
}

/// Monthly averages grouped by year, one bar series per month.
pub fn draw_bar_plot(data: &PageViews) -> Figure {
    let start_time = Instant::now();
    let averages = MonthlyAverages::from_page_views(data);

    let categories = averages.years().iter().map(i32::to_string).collect();
    let series = MONTHS
        .iter()
        .enumerate()
        .map(|(idx, month)| BarSeries {
            label: month.name().to_string(),
            values: averages.month_column(*month),
            color: MONTH_COLORS[idx % MONTH_COLORS.len()],
        })
        .collect();

    info!(
        action = "build",
        component = "bar_plot",
        year_count = averages.years().len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Built monthly averages"
    );

    Figure {
        width: 1000,
        height: 500,
        panels: vec![Panel {
            title: None,
            x_label: "Years".to_string(),
            y_label: "Average Page Views".to_string(),
            legend_title: Some("Months".to_string()),
            kind: PanelKind::Bar { categories, series },
        }],
    }
}

/// Side-by-side year (trend) and month (seasonality) box plots.
pub fn draw_box_plot(data: &PageViews) -> Figure {
    let year_groups = views::group_by_year(data)
        .into_iter()
        .map(|(year, values)| BoxGroup {
            label: year.to_string(),
            summary: FiveNumberSummary::from_values(&values),
        })
        .collect();

    let month_groups = views::group_by_month(data)
        .into_iter()
        .map(|(abbrev, values)| BoxGroup {
            label: abbrev.to_string(),
            summary: FiveNumberSummary::from_values(&values),
        })
        .collect();

    Figure {
        width: 1500,
        height: 500,
        panels: vec![
            Panel {
                title: Some(YEAR_BOX_TITLE.to_string()),
                x_label: "Year".to_string(),
                y_label: "Page Views".to_string(),
                legend_title: None,
                kind: PanelKind::Box {
                    groups: year_groups,
                },
            },
            Panel {
                title: Some(MONTH_BOX_TITLE.to_string()),
                x_label: "Month".to_string(),
                y_label: "Page Views".to_string(),
                legend_title: None,
                kind: PanelKind::Box {
                    groups: month_groups,
                },
            },
        ],
    }
}
