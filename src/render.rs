//! Rasterises [`Figure`]s with [`plotters`].
//!
//! Files ending in `.svg` are written with the SVG backend; everything else is
//! written as a bitmap (PNG). Panels are laid out left to right.

use chrono::{Days, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

use crate::figure::{BarSeries, BoxGroup, Figure, Panel, PanelKind, TimeSeries};

static DEFAULT_FONT: FontFamily = FontFamily::SansSerif;

const MEDIAN_ORANGE: RGBColor = RGBColor(255, 127, 14);
const BOX_HALF_WIDTH: f64 = 0.25;
const BAR_GROUP_WIDTH: f64 = 0.8;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Renders `figure` to `path`, choosing the backend from the file extension.
pub fn save_figure(figure: &Figure, path: &Path) -> Result<()> {
    if figure.panels.is_empty() {
        return Err(PlotError::InvalidData(
            "Figure has no panels".to_string(),
        ));
    }
    if !figure.panels.iter().any(Panel::has_data) {
        return Err(PlotError::InvalidData(
            "Figure has nothing to plot".to_string(),
        ));
    }

    let start_time = Instant::now();
    let size = (figure.width, figure.height);
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        draw_figure(SVGBackend::new(path, size).into_drawing_area(), figure)?;
    } else {
        draw_figure(BitMapBackend::new(path, size).into_drawing_area(), figure)?;
    }

    info!(
        action = "save",
        component = "renderer",
        file_path = ?path,
        panel_count = figure.panels.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Figure saved"
    );
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let areas = root.split_evenly((1, figure.panels.len()));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        match &panel.kind {
            PanelKind::Line { series } => draw_line_panel(area, panel, series)?,
            PanelKind::Bar { categories, series } => {
                draw_bar_panel(area, panel, categories, series)?
            }
            PanelKind::Box { groups } => draw_box_panel(area, panel, groups)?,
        }
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn chart_builder<'a, 'b, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    panel: &Panel,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65);
    if let Some(title) = &panel.title {
        builder.caption(title, (DEFAULT_FONT, 22));
    }
    builder
}

/// Pads a value range by 5% on both ends; a flat range is widened to a unit span.
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max <= min {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Label for an integer category slot on an `f64` axis, empty between slots.
fn category_label(labels: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

fn draw_line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    series: &[TimeSeries],
) -> Result<()> {
    let dates = series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
    let (first, last) = match (dates.clone().min(), dates.max()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PlotError::InvalidData("Line panel has no points".to_string())),
    };
    let last = if last > first {
        last
    } else {
        first + Days::new(1)
    };

    let values = series.iter().flat_map(|s| s.points.iter().map(|(_, v)| *v));
    let (y_min, y_max) = padded_range(
        values.clone().fold(f64::INFINITY, f64::min),
        values.fold(f64::NEG_INFINITY, f64::max),
    );

    let mut chart = chart_builder(area, panel)
        .build_cartesian_2d(first..last, y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&panel.x_label)
        .y_desc(&panel.y_label)
        .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m").to_string())
        .y_label_formatter(&|v| format!("{:.0}", v))
        .label_style((DEFAULT_FONT, 14))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for line in series {
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                line.color.stroke_width(line.stroke_width),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    categories: &[String],
    series: &[BarSeries],
) -> Result<()> {
    if categories.is_empty() {
        return Err(PlotError::InvalidData("Bar panel has no categories".to_string()));
    }

    let y_top = series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .fold(0.0, f64::max);
    let (_, y_max) = padded_range(0.0, y_top);
    let x_range = -0.5..(categories.len() as f64 - 0.5);

    let mut chart = chart_builder(area, panel)
        .build_cartesian_2d(x_range, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len() + 2)
        .x_label_formatter(&|x| category_label(categories, *x))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(&panel.x_label)
        .y_desc(&panel.y_label)
        .label_style((DEFAULT_FONT, 14))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let bar_width = BAR_GROUP_WIDTH / series.len().max(1) as f64;
    for (series_idx, bars) in series.iter().enumerate() {
        let color = bars.color;
        let offset = -BAR_GROUP_WIDTH / 2.0 + series_idx as f64 * bar_width;
        let rectangles = bars
            .values
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.map(|v| (slot as f64 + offset, v)))
            .map(move |(x0, v)| Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled()));

        chart
            .draw_series(rectangles)
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(bars.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    // Legend title sits just above the legend box.
    if let Some(legend_title) = &panel.legend_title {
        chart
            .plotting_area()
            .strip_coord_spec()
            .draw(&Text::new(
                legend_title.clone(),
                (14, 8),
                (DEFAULT_FONT, 14),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::Coordinate(10, 26))
        .label_font((DEFAULT_FONT, 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_box_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    groups: &[BoxGroup],
) -> Result<()> {
    if groups.is_empty() {
        return Err(PlotError::InvalidData("Box panel has no groups".to_string()));
    }

    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let summaries: Vec<_> = groups.iter().map(|g| g.summary).collect();
    let (y_min, y_max) = padded_range(
        summaries.iter().flatten().map(|s| s.min).fold(f64::INFINITY, f64::min),
        summaries.iter().flatten().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max),
    );
    let x_range = -0.5..(groups.len() as f64 - 0.5);

    let mut chart = chart_builder(area, panel)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len() + 2)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(&panel.x_label)
        .y_desc(&panel.y_label)
        .label_style((DEFAULT_FONT, 14))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let placed = || {
        summaries
            .iter()
            .enumerate()
            .filter_map(|(slot, summary)| summary.map(|s| (slot as f64, s)))
    };

    chart
        .draw_series(placed().map(|(x, s)| {
            Rectangle::new(
                [(x - BOX_HALF_WIDTH, s.q1), (x + BOX_HALF_WIDTH, s.q3)],
                BLACK.stroke_width(1),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Whiskers run to the extremes; caps are half the box width.
    chart
        .draw_series(placed().flat_map(|(x, s)| {
            let cap = BOX_HALF_WIDTH / 2.0;
            [
                vec![(x, s.q1), (x, s.min)],
                vec![(x, s.q3), (x, s.max)],
                vec![(x - cap, s.min), (x + cap, s.min)],
                vec![(x - cap, s.max), (x + cap, s.max)],
            ]
            .into_iter()
            .map(|points| PathElement::new(points, BLACK.stroke_width(1)))
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(placed().map(|(x, s)| {
            PathElement::new(
                vec![(x - BOX_HALF_WIDTH, s.median), (x + BOX_HALF_WIDTH, s.median)],
                MEDIAN_ORANGE.stroke_width(2),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts;
    use crate::dataset::PageViews;

    #[test]
    fn empty_figures_are_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.png");

        let result = save_figure(&charts::draw_line_plot(&PageViews::default()), &path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
        assert!(!path.exists());

        let no_panels = Figure {
            width: 10,
            height: 10,
            panels: Vec::new(),
        };
        assert!(matches!(
            no_panels.save(&path),
            Err(PlotError::InvalidData(_))
        ));
    }

    #[test]
    fn padded_range_handles_flat_and_empty_input() {
        assert_eq!(padded_range(5.0, 5.0), (4.5, 5.5));
        assert_eq!(padded_range(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        let (lo, hi) = padded_range(0.0, 100.0);
        assert!(lo < 0.0 && hi > 100.0);
    }

    #[test]
    fn category_labels_only_on_integer_slots() {
        let labels = vec!["2016".to_string(), "2017".to_string()];
        assert_eq!(category_label(&labels, 0.0), "2016");
        assert_eq!(category_label(&labels, 1.0), "2017");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }
}
