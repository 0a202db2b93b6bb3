use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::dataset::{PageViews, LOWER_QUANTILE, UPPER_QUANTILE};
use crate::stats::{AnalysisResult, CleaningStats};
use crate::{charts, Args};

pub fn run(args: &Args) -> Result<AnalysisResult> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "visualizer", "Starting page view analysis");

    let raw = PageViews::from_csv_path(&args.input)?;
    let (lower_bound, upper_bound) = raw
        .outlier_bounds(LOWER_QUANTILE, UPPER_QUANTILE)
        .with_context(|| format!("No rows found in {:?}", args.input))?;

    let cleaned = raw.clean();
    let cleaning = CleaningStats {
        rows_read: raw.len(),
        rows_kept: cleaned.len(),
        lower_bound,
        upper_bound,
    };
    info!(
        action = "clean",
        component = "visualizer",
        rows_read = cleaning.rows_read,
        rows_kept = cleaning.rows_kept,
        lower_bound,
        upper_bound,
        "Removed outliers"
    );

    if !args.output_dir.exists() {
        fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", args.output_dir))?;
    }

    let figures = [
        ("line_plot", charts::draw_line_plot(&cleaned)),
        ("bar_plot", charts::draw_bar_plot(&cleaned)),
        ("box_plot", charts::draw_box_plot(&cleaned)),
    ];

    let mut outputs: Vec<PathBuf> = Vec::with_capacity(figures.len());
    for (name, figure) in &figures {
        let path = args
            .output_dir
            .join(format!("{}.{}", name, args.format.extension()));
        figure
            .save(&path)
            .with_context(|| format!("Failed to render {:?}", path))?;
        outputs.push(path);
    }

    if cleaning.rows_kept == cleaning.rows_read {
        warn!(action = "clean", component = "visualizer", "No rows were filtered as outliers");
    }

    info!(
        action = "complete",
        component = "visualizer",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed"
    );

    Ok(AnalysisResult {
        date_range: cleaned.date_range(),
        cleaning,
        outputs,
    })
}

pub fn print_analysis_results(result: &AnalysisResult) {
    println!("\n--- Page View Analysis ---");

    if let Some((first, last)) = result.date_range {
        let days_between = (last - first).num_days();
        println!(
            "Date range: {} to {} ({} days)",
            first.format("%B %-d, %Y"),
            last.format("%B %-d, %Y"),
            crate::utils::format_number(days_between as u64)
        );
    } else {
        println!("Date range: No data available");
    }

    let cleaning = &result.cleaning;
    println!(
        "Rows read: {}",
        crate::utils::format_number(cleaning.rows_read as u64)
    );
    println!(
        "Rows kept: {} ({} outliers removed)",
        crate::utils::format_number(cleaning.rows_kept as u64),
        crate::utils::format_number(cleaning.rows_removed() as u64)
    );
    println!(
        "Kept values between {:.1} and {:.1}",
        cleaning.lower_bound, cleaning.upper_bound
    );

    println!("\nCharts written:");
    for path in &result.outputs {
        println!("- {}", path.display());
    }
}
