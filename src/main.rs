use anyhow::Result;
use clap::Parser;
use tracing::error;

use pageview_viz::{utils, visualizer, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    match visualizer::run(&args) {
        Ok(result) => {
            visualizer::print_analysis_results(&result);
            Ok(())
        }
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
