//! emboss CLI — press a 2D SVG drawing into a 3D-printable solid.
//!
//! Loads an SVG, flattens its curves, optionally rescales, fills and
//! extrudes the outline, and writes a binary STL with the base of the
//! solid resting at z = 0.

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::TypedValueParser;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod pipeline;

use pipeline::RunSettings;

#[derive(Debug, Parser)]
#[command(name = "emboss")]
#[command(about = "Extrude an SVG drawing into an STL solid", long_about = None)]
struct Cli {
    /// Input SVG file.
    #[arg(
        short = 'i',
        long = "ifile",
        value_name = "FILE.svg",
        value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from)
    )]
    ifile: Option<PathBuf>,

    /// Output STL file.
    #[arg(
        short = 'o',
        long = "ofile",
        value_name = "FILE.stl",
        value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from)
    )]
    ofile: Option<PathBuf>,

    /// Extrusion depth in millimeters.
    #[arg(
        short = 'x',
        long = "extrude_height_in_mm",
        value_name = "MM",
        default_value_t = 10.0
    )]
    extrude_height_in_mm: f64,

    /// Rescale so the largest bounding-box dimension equals this, in
    /// millimeters. Omit to keep the drawing's own size.
    #[arg(short = 's', long = "max_size_in_mm", value_name = "MM")]
    max_size_in_mm: Option<f64>,
}

impl Cli {
    fn into_settings(self) -> Option<RunSettings> {
        // Without both paths there is nothing to do; this is not an
        // error, the parser already handled -h and bad options. An
        // explicitly empty path counts as absent.
        let input = self.ifile.filter(|p| !p.as_os_str().is_empty())?;
        let output = self.ofile.filter(|p| !p.as_os_str().is_empty())?;
        Some(RunSettings {
            input,
            output,
            extrude_height_in_mm: self.extrude_height_in_mm,
            max_size_in_mm: self.max_size_in_mm,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EMBOSS_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.into_settings() {
        Some(settings) => pipeline::run(&settings),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_all_flags() {
        let cli =
            Cli::try_parse_from(["emboss", "-i", "a.svg", "-o", "b.stl", "-x", "5", "-s", "50"])
                .unwrap();
        assert_eq!(cli.ifile.as_deref(), Some(Path::new("a.svg")));
        assert_eq!(cli.ofile.as_deref(), Some(Path::new("b.stl")));
        assert_eq!(cli.extrude_height_in_mm, 5.0);
        assert_eq!(cli.max_size_in_mm, Some(50.0));
    }

    #[test]
    fn test_parse_long_flags() {
        let cli = Cli::try_parse_from([
            "emboss",
            "--ifile",
            "in.svg",
            "--ofile",
            "out.stl",
            "--extrude_height_in_mm",
            "2.5",
            "--max_size_in_mm",
            "80",
        ])
        .unwrap();
        assert_eq!(cli.extrude_height_in_mm, 2.5);
        assert_eq!(cli.max_size_in_mm, Some(80.0));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["emboss", "-i", "a.svg", "-o", "b.stl"]).unwrap();
        assert_eq!(cli.extrude_height_in_mm, 10.0);
        assert_eq!(cli.max_size_in_mm, None);
    }

    #[test]
    fn test_missing_paths_mean_no_run() {
        let cli = Cli::try_parse_from(["emboss", "-o", "b.stl"]).unwrap();
        assert!(cli.into_settings().is_none());

        let cli = Cli::try_parse_from(["emboss", "-i", "a.svg"]).unwrap();
        assert!(cli.into_settings().is_none());

        let cli = Cli::try_parse_from(["emboss"]).unwrap();
        assert!(cli.into_settings().is_none());
    }

    #[test]
    fn test_empty_paths_mean_no_run() {
        let cli = Cli::try_parse_from(["emboss", "-i", "", "-o", "b.stl"]).unwrap();
        assert!(cli.into_settings().is_none());

        let cli = Cli::try_parse_from(["emboss", "-i", "a.svg", "-o", ""]).unwrap();
        assert!(cli.into_settings().is_none());
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = Cli::try_parse_from(["emboss", "--bogus"]).unwrap_err();
        // clap reports usage errors with exit status 2.
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_help_exits_cleanly() {
        let err = Cli::try_parse_from(["emboss", "-h"]).unwrap_err();
        assert_eq!(err.exit_code(), 0);
    }
}
