//! CLI binary for the transcriber
//!
//! Converts logger DAT tables (or legacy text exports) into CSV files holding
//! the selected channels.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use glob::glob;
use std::path::{Path, PathBuf};
use transcriber::{
    convert_files, load_catalog, ConversionEvent, ConversionJob, ExportOptions, FormatChoice,
    InputFormat, PoolConfig,
};

fn build_command() -> Command {
    Command::new("transcriber")
        .version(VERSION)
        .about("Transcribe data-logger DAT files into CSV, keeping only the selected tags.")
        .arg(
            Arg::new("files")
                .help("DAT or legacy text files to convert (supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .short('c')
                .help("Tag catalog: the logger's Tagname DAT table or a text file with one tag per line")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            Arg::new("tags")
                .long("tags")
                .short('t')
                .help("Tags to export, comma separated; columns follow catalog order")
                .value_name("TAG,...")
                .value_delimiter(',')
                .num_args(1..)
                .required(true),
        )
        .arg(
            Arg::new("total-tags")
                .long("total-tags")
                .help("Tags recorded per timestamp cycle (default: catalog size)")
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .help("Files converted in parallel (default: logical CPU count)")
                .value_name("K")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for CSV output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Input format")
                .value_name("FORMAT")
                .value_parser(["auto", "dat", "text"])
                .default_value("auto"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Write a JSON summary of the batch to FILE")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ")"
);

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Expand glob patterns and drop paths that do not exist
fn collect_inputs(patterns: &[&String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for pattern in patterns {
        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            glob(pattern)
                .with_context(|| format!("Invalid glob pattern '{pattern}'"))?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Error expanding glob pattern '{pattern}'"))?
        } else {
            vec![PathBuf::from(pattern)]
        };

        for path in paths {
            if path.is_file() {
                inputs.push(path);
            } else {
                eprintln!("Warning: File does not exist: {}", path.display());
            }
        }
    }
    Ok(inputs)
}

#[cfg(feature = "json")]
fn write_report(path: &Path, summary: &transcriber::BatchSummary) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), summary)
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    Ok(())
}

#[cfg(not(feature = "json"))]
fn write_report(_path: &Path, _summary: &transcriber::BatchSummary) -> Result<()> {
    anyhow::bail!("--report requires the 'json' feature")
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    init_logging(matches.get_flag("debug"));

    let patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    let tags: Vec<&String> = matches
        .get_many::<String>("tags")
        .map(|values| values.collect())
        .unwrap_or_default();
    let catalog_path = matches
        .get_one::<String>("catalog")
        .map(PathBuf::from)
        .context("--catalog is required")?;
    let total_tags = matches.get_one::<usize>("total-tags").copied();
    let pool = matches
        .get_one::<usize>("jobs")
        .map(|&jobs| PoolConfig::new(jobs))
        .unwrap_or_default();
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("dat") => FormatChoice::Force(InputFormat::Table),
        Some("text") => FormatChoice::Force(InputFormat::Text),
        _ => FormatChoice::Auto,
    };
    let export = ExportOptions {
        output_dir: matches.get_one::<String>("output-dir").map(PathBuf::from),
    };

    let catalog = load_catalog(&catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?;
    let job = ConversionJob::new(catalog, &tags, total_tags)?
        .with_export(export)
        .with_format(format);

    let inputs = collect_inputs(&patterns)?;
    if inputs.is_empty() {
        eprintln!("Error: No input files found to process.");
        eprintln!("Input patterns were: {patterns:?}");
        std::process::exit(1);
    }

    let mut done = 0usize;
    let summary = convert_files(&inputs, &job, &pool, |event| match event {
        ConversionEvent::BatchStarted { total_files } => {
            println!(
                "Converting {total_files} file(s) on {} worker(s)",
                pool.concurrency
            );
        }
        ConversionEvent::FileCompleted(outcome) => {
            done += 1;
            println!(
                "[{done}/{}] {} -> {} ({} rows)",
                inputs.len(),
                outcome.input.display(),
                outcome.output.display(),
                outcome.rows_written
            );
        }
        ConversionEvent::FileFailed { input, error } => {
            done += 1;
            eprintln!("[{done}/{}] Error converting {}: {error}", inputs.len(), input.display());
        }
        ConversionEvent::BatchFinished(summary) => {
            println!(
                "Finished: {} converted, {} failed in {:.2}s",
                summary.completed.len(),
                summary.failed.len(),
                summary.elapsed_ms as f64 / 1000.0
            );
        }
    })?;

    if let Some(report) = matches.get_one::<String>("report") {
        write_report(Path::new(report), &summary)?;
    }

    if !summary.failed.is_empty() {
        eprintln!("Failed files:");
        for failed in &summary.failed {
            eprintln!("  {}: {}", failed.input.display(), failed.message);
        }
        std::process::exit(1);
    }

    Ok(())
}
