pub mod args;
pub mod charts;
pub mod dataset;
pub mod figure;
pub mod render;
pub mod stats;
pub mod utils;
pub mod views;
pub mod visualizer;

pub use args::Args;
pub use charts::{draw_bar_plot, draw_box_plot, draw_line_plot};
pub use dataset::{load_and_clean, Observation, PageViews};
pub use figure::Figure;
pub use stats::AnalysisResult;
pub use visualizer::run;
