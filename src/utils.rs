use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_target(false)
        .init();
}

pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    groups.join(",")
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("--input must not be empty");
    }

    if args.output_dir.is_file() {
        anyhow::bail!("--output-dir {:?} is a file", args.output_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Args, ImageFormat};
    use std::path::PathBuf;

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_304), "1,304");
        assert_eq!(format_number(12_345_678), "12,345,678");
    }

    #[test]
    fn output_dir_must_not_be_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = Args {
            input: PathBuf::from("data.csv"),
            output_dir: file.path().to_path_buf(),
            format: ImageFormat::Png,
            verbose: false,
        };
        assert!(validate_args(&args).is_err());

        let ok = Args {
            output_dir: PathBuf::from("."),
            ..args
        };
        assert!(validate_args(&ok).is_ok());
    }
}
