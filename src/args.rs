use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pageview-viz",
    about = "Clean a daily page-view dataset and render trend and seasonality charts",
    version,
    long_about = None
)]
pub struct Args {
    /// CSV file with `date` and `value` columns
    #[arg(short, long, default_value = "fcc-forum-pageviews.csv")]
    pub input: PathBuf,

    /// Directory the rendered charts are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Image format of the rendered charts
    #[arg(short, long, value_enum, default_value_t = ImageFormat::Png)]
    pub format: ImageFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}
