//! zipdiff CLI
//!
//! Compares two zip-family archives, nested archives included, and
//! reports the entries that were added, removed or changed.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use zipdiff_export::{renderer_for, OutputFormat, RenderOptions, TextRenderer};
use zipdiff_parsers::logging::{init_with_config, TracingConfig};
use zipdiff_tools::{compare_files, DiffConfig, DifferenceReport};

/// Exit status when the archives differ and the caller asked to be told
const EXIT_DIFFERENCES: u8 = 1;

/// Exit status for bad input and every other failure
const EXIT_ERROR: u8 = 2;

/// zipdiff - structural differences between two archives
#[derive(Parser, Debug)]
#[command(name = "zipdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First archive
    #[arg(long)]
    file1: PathBuf,

    /// Second archive
    #[arg(long)]
    file2: PathBuf,

    /// Leading directories to drop from names in the first archive
    #[arg(long, default_value_t = 0)]
    skip_prefixes1: usize,

    /// Leading directories to drop from names in the second archive
    #[arg(long, default_value_t = 0)]
    skip_prefixes2: usize,

    /// Leading directories to drop from entries written to a zip report
    #[arg(long, default_value_t = 0)]
    skip_output_prefixes: usize,

    /// Exclude paths matching this regular expression in full (can be repeated)
    #[arg(long)]
    regex: Vec<String>,

    /// Also compare CRC-32 values
    #[arg(long)]
    compare_crc_values: bool,

    /// Also compare modification times
    #[arg(long)]
    compare_timestamps: bool,

    /// Exclude CVS bookkeeping directories
    #[arg(long)]
    ignore_cvs_files: bool,

    /// Exit with status 1 when differences are found
    #[arg(long)]
    exit_with_error_on_difference: bool,

    /// Write the report here; the extension picks the format, `-` is stdout
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Report format, overriding the output file extension
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Html,
    Xml,
    Json,
    Zip,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Xml => OutputFormat::Xml,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Zip => OutputFormat::Zip,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_with_config(TracingConfig::from_verbosity(cli.verbose));

    match run(&cli) {
        Ok(true) if cli.exit_with_error_on_difference => ExitCode::from(EXIT_DIFFERENCES),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Compare, report, and tell whether the archives differ
fn run(cli: &Cli) -> Result<bool> {
    println!("File 1 = {}", cli.file1.display());
    println!("File 2 = {}", cli.file2.display());

    let config = diff_config(cli)?;
    debug!(?config, "comparison policy");

    let report = compare_files(&cli.file1, &cli.file2, &config).context("Failed to compare archives")?;
    info!(differences = report.difference_count(), "comparison finished");

    if let Some(ref output) = cli.output_file {
        let format = cli
            .format
            .map(OutputFormat::from)
            .unwrap_or_else(|| OutputFormat::from_output_path(Some(output.as_path())));
        write_report(&report, output, format, cli.skip_output_prefixes)?;
    }

    if report.has_differences() {
        if cli.verbose > 0 {
            println!("{}", TextRenderer::to_text(&report));
            println!(
                "{} and {} are different.",
                cli.file1.display(),
                cli.file2.display()
            );
        }
    } else {
        println!("No differences found.");
    }

    Ok(report.has_differences())
}

/// Command-line switches are opt-in, unlike the library defaults
fn diff_config(cli: &Cli) -> Result<DiffConfig> {
    DiffConfig::builder()
        .skip_prefixes1(cli.skip_prefixes1)
        .skip_prefixes2(cli.skip_prefixes2)
        .compare_checksums(cli.compare_crc_values)
        .ignore_timestamps(!cli.compare_timestamps)
        .ignore_vcs_metadata(cli.ignore_cvs_files)
        .exclusion_patterns(cli.regex.iter().cloned())
        .build()
        .context("Invalid --regex")
}

fn write_report(
    report: &DifferenceReport,
    output: &Path,
    format: OutputFormat,
    skip_output_prefixes: usize,
) -> Result<()> {
    let renderer = renderer_for(format, &RenderOptions { skip_output_prefixes });

    if output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        renderer
            .render(report, &mut lock)
            .context("Failed to write report to stdout")?;
        return Ok(());
    }

    // Rendered next to the destination and moved into place once complete
    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        renderer
            .render(report, &mut writer)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
    }

    temp.persist(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    info!(path = %output.display(), ?format, "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("zipdiff").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_defaults_are_lenient() {
        let cli = parse(&["--file1", "a.zip", "--file2", "b.zip"]);
        let config = diff_config(&cli).unwrap();

        assert!(!config.compare_checksums);
        assert!(config.ignore_timestamps);
        assert!(!config.ignore_vcs_metadata);
        assert!(config.exclusion().is_none());
        assert!(cli.output_file.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = parse(&[
            "--file1", "a.zip", "--file2", "b.zip",
            "--skip-prefixes1", "1", "--skip-prefixes2", "2",
            "--compare-crc-values", "--compare-timestamps", "--ignore-cvs-files",
            "--regex", ".*\\.class", "--regex", "docs/.*",
            "--format", "json", "-vv",
        ]);
        let config = diff_config(&cli).unwrap();

        assert_eq!((config.skip_prefixes1, config.skip_prefixes2), (1, 2));
        assert!(config.compare_checksums);
        assert!(!config.ignore_timestamps);
        assert!(config.ignore_vcs_metadata);
        assert!(config.exclusion().unwrap().is_match("docs/readme.txt"));
        assert_eq!(cli.format, Some(FormatArg::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_bad_regex_is_reported() {
        let cli = parse(&["--file1", "a.zip", "--file2", "b.zip", "--regex", "[unclosed"]);
        assert!(diff_config(&cli).is_err());
    }

    #[test]
    fn test_report_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.txt");

        write_report(&DifferenceReport::new(), &output, OutputFormat::Text, 0).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("Total differences: 0"));
    }

    #[test]
    fn test_failed_render_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("patch.zip");

        // No second archive to copy from, so the rebuild fails
        let err = write_report(&DifferenceReport::new(), &output, OutputFormat::Zip, 0);
        assert!(err.is_err());
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_render_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("patch.zip");
        std::fs::write(&output, b"previous").unwrap();

        assert!(write_report(&DifferenceReport::new(), &output, OutputFormat::Zip, 0).is_err());
        assert_eq!(std::fs::read(&output).unwrap(), b"previous");
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["zipdiff", "--file1", "a.zip"]).is_err());
    }
}
