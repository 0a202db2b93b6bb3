//! In-memory chart descriptions returned by the chart builders.
//!
//! A [`Figure`] is plain data: it can be inspected directly or rasterised
//! with [`Figure::save`].

use chrono::NaiveDate;
use plotters::style::RGBColor;
use std::path::Path;

use crate::render::{self, PlotError};
use crate::stats::FiveNumberSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: Option<String>,
    pub kind: PanelKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    Line { series: Vec<TimeSeries> },
    Bar {
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    Box { groups: Vec<BoxGroup> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub points: Vec<(NaiveDate, f64)>,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// One bar per category; `None` leaves the slot empty.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: String,
    pub summary: Option<FiveNumberSummary>,
}

impl Panel {
    /// Number of line or bar series drawn in this panel.
    pub fn series_count(&self) -> usize {
        match &self.kind {
            PanelKind::Line { series } => series.len(),
            PanelKind::Bar { series, .. } => series.len(),
            PanelKind::Box { .. } => 0,
        }
    }

    /// Number of categories along the x axis (bar groups or boxes).
    pub fn group_count(&self) -> usize {
        match &self.kind {
            PanelKind::Line { .. } => 0,
            PanelKind::Bar { categories, .. } => categories.len(),
            PanelKind::Box { groups } => groups.len(),
        }
    }

    pub fn has_data(&self) -> bool {
        match &self.kind {
            PanelKind::Line { series } => series.iter().any(|s| !s.points.is_empty()),
            PanelKind::Bar { series, .. } => series
                .iter()
                .any(|s| s.values.iter().any(Option::is_some)),
            PanelKind::Box { groups } => groups.iter().any(|g| g.summary.is_some()),
        }
    }
}

impl Figure {
    pub fn series_count(&self) -> usize {
        self.panels.iter().map(Panel::series_count).sum()
    }

    pub fn save(&self, path: &Path) -> Result<(), PlotError> {
        render::save_figure(self, path)
    }
}
