/// Charfreq - character frequency analysis for multilingual e-book corpora
///
/// The main entry point for the charfreq application. It parses command-line
/// arguments, runs the analysis and prints or exports the ranked reports.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use charfreq::app::{run_analysis, AnalysisOutcome};
use charfreq::config::{load_config, Config};
use charfreq::utils::output_formatter;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "charfreq",
    version,
    about = "Character frequency analysis for multilingual e-book corpora",
    long_about = "Scans a directory of Project Gutenberg plain-text books, strips the licence
boilerplate, normalizes the text and ranks the most frequent characters for every
language (first two characters of each file name) and for the whole corpus."
)]
struct Args {
    /// Directory containing the books (searched recursively)
    corpus_dir: PathBuf,

    /// Number of characters per report (default: 10)
    #[arg(long = "top")]
    top: Option<usize>,

    /// Analyze only the largest file of each language
    #[arg(long = "largest-only", action = ArgAction::SetTrue)]
    largest_only: bool,

    /// Extension of corpus files (default: txt)
    #[arg(long = "extension")]
    extension: Option<String>,

    /// Write the plain text report to this file
    #[arg(long = "output")]
    output: Option<String>,

    /// Export reports to JSON file
    #[arg(long = "json")]
    json: Option<String>,

    /// Export reports to CSV file
    #[arg(long = "csv")]
    csv: Option<String>,

    /// Export reports to HTML file
    #[arg(long = "html")]
    html: Option<String>,

    /// Directory to store all output files
    #[arg(long = "output-dir")]
    output_dir: Option<String>,

    /// Wrap console tables in markdown triple backticks
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Path to JSON configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Number of parallel workers (0=auto, default: 1)
    #[arg(long = "parallel")]
    parallel: Option<usize>,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: stderr)
    #[arg(long = "log-file")]
    log_file: Option<String>,
}

/// Main entry point function
fn main() -> Result<()> {
    let start_time = Instant::now();

    let args = Args::parse();

    setup_logging(&args);

    let config = resolve_config(&args);
    info!("Using configuration: {:?}", config);

    let progress = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} books ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    let outcome = run_analysis(&args.corpus_dir, &config, progress)?;

    export_all_results(&outcome, &args)?;

    if !args.quiet {
        println!("{}", output_formatter::format_reports(&outcome.reports, args.md));
        println!(
            "{}",
            output_formatter::create_summary(&outcome.stats, outcome.languages, outcome.total_characters)
        );
        println!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Set up logging, to the log file when one is given
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_file) = &args.log_file {
        match File::create(log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("{} {}: {}", "Cannot open log file".red(), log_file, e),
        }
    }

    builder.init();
}

/// Configuration file values, overridden by command line flags
fn resolve_config(args: &Args) -> Config {
    let mut config = match &args.config {
        Some(path) => load_config(Path::new(path)),
        None => Config::default(),
    };

    if let Some(top) = args.top {
        config.top_n = top;
    }
    if args.largest_only {
        config.largest_only = true;
    }
    if let Some(extension) = &args.extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    if let Some(parallel) = args.parallel {
        config.workers = parallel;
    }

    config
}

/// Write every requested export
fn export_all_results(outcome: &AnalysisOutcome, args: &Args) -> Result<()> {
    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)
            .context(format!("Failed to create output directory: {}", output_dir))?;
    }

    if let Some(path) = &args.output {
        let path = output_path(args, path);
        output_formatter::write_text_report(&outcome.reports, &path)?;
        info!("Wrote text report to {}", path.display());
    }

    if let Some(path) = &args.json {
        let path = output_path(args, path);
        output_formatter::export_reports_json(&outcome.reports, &path)?;
        info!("Wrote JSON report to {}", path.display());
    }

    if let Some(path) = &args.csv {
        let path = output_path(args, path);
        output_formatter::create_csv_report(&outcome.reports, &path)?;
        info!("Wrote CSV report to {}", path.display());
    }

    if let Some(path) = &args.html {
        let path = output_path(args, path);
        output_formatter::create_html_report(&outcome.reports, &path)?;
        info!("Wrote HTML report to {}", path.display());
    }

    Ok(())
}

/// Place a relative output path inside the output directory, if one is set
fn output_path(args: &Args, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    match &args.output_dir {
        Some(output_dir) if path.is_relative() => PathBuf::from(output_dir).join(path),
        _ => path,
    }
}
