//! # CLI Module
//!
//! Command-line interface for the batch photo pipeline.
//!
//! ## Usage
//! ```bash
//! # Clean up a screenshot folder: dedup, split sheets, crop to 16:9
//! photo-batch process ~/Screenshots --out ./cleaned --ratio 16:9 --grid auto
//!
//! # Re-encode everything as high-quality JPEG with auto-enhancement
//! photo-batch process ~/Photos --out ./export --enhance --quality 95
//!
//! # Report duplicate groups without processing anything
//! photo-batch dedup ~/Photos --threshold 5 --output json
//! ```

use batch_photo_pipeline::core::batch::{
    export_files, BatchOutcome, BatchRunner, ProcessingParameters, RecordStatus,
    DEFAULT_NAMING_TEMPLATE,
};
use batch_photo_pipeline::core::codec::{ImageCodec, RasterCodec};
use batch_photo_pipeline::core::fingerprint::{
    group_duplicates, DedupMode, Fingerprint, FingerprintedFile,
};
use batch_photo_pipeline::core::grid::GridMode;
use batch_photo_pipeline::core::scanner::{ScanConfig, SourceScanner, WalkDirScanner};
use batch_photo_pipeline::core::transform::{
    AspectRatio, CropSpec, EnhanceSpec, OutputFormat as ImageFormat, VerticalAlignment,
};
use batch_photo_pipeline::error::{BatchPipelineError, Result};
use batch_photo_pipeline::events::{BatchEvent, Event, EventChannel};
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::thread;

/// Batch Photo Pipeline - clean, split, and re-encode image folders
#[derive(Parser, Debug)]
#[command(name = "photo-batch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline and write processed files
    Process {
        /// Directories or files to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output directory for processed files
        #[arg(short, long)]
        out: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "jpg")]
        format: String,

        /// Encoder quality (1-100)
        #[arg(short, long, default_value = "90")]
        quality: u8,

        /// Crop to this aspect ratio (e.g. 16:9); omit to skip cropping
        #[arg(short, long)]
        ratio: Option<String>,

        /// Vertical crop alignment
        #[arg(long, default_value = "center")]
        align: Alignment,

        /// Apply the auto-enhancement stage
        #[arg(short, long)]
        enhance: bool,

        /// Brightness adjustment in percent (with --enhance)
        #[arg(long, default_value = "10")]
        brightness: i32,

        /// Contrast adjustment, -255 to 255 (with --enhance)
        #[arg(long, default_value = "15")]
        contrast: i32,

        /// Grid splitting: off, auto, or ROWSxCOLS (e.g. 2x2)
        #[arg(short, long, default_value = "off")]
        grid: String,

        /// Edge sensitivity for auto grid detection (0-100)
        #[arg(long, default_value = "50")]
        sensitivity: u8,

        /// Duplicate handling: exact, threshold, or off
        #[arg(long, default_value = "threshold")]
        dedup: DedupArg,

        /// Hamming distance for threshold dedup (0-64)
        #[arg(short, long, default_value = "5")]
        threshold: u32,

        /// Keep junk-extension files instead of rejecting them
        #[arg(long)]
        keep_junk: bool,

        /// Minimum source size in KiB (0 = unbounded)
        #[arg(long, default_value = "0")]
        min_size_kb: u64,

        /// Maximum source size in KiB (0 = unbounded)
        #[arg(long, default_value = "0")]
        max_size_kb: u64,

        /// Minimum decoded width in pixels (0 = unbounded)
        #[arg(long, default_value = "0")]
        min_width: u32,

        /// Maximum decoded width in pixels (0 = unbounded)
        #[arg(long, default_value = "0")]
        max_width: u32,

        /// Output filename template ({index}, {original}, {date}, {hash})
        #[arg(long, default_value = DEFAULT_NAMING_TEMPLATE)]
        template: String,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Output format
        #[arg(long, default_value = "pretty")]
        output: ReportFormat,
    },

    /// Report duplicate groups without processing anything
    Dedup {
        /// Directories or files to examine
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Hamming distance threshold (0-64)
        #[arg(short, long, default_value = "5")]
        threshold: u32,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: ReportFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Alignment {
    Top,
    Center,
    Bottom,
}

impl From<Alignment> for VerticalAlignment {
    fn from(a: Alignment) -> Self {
        match a {
            Alignment::Top => VerticalAlignment::Top,
            Alignment::Center => VerticalAlignment::Center,
            Alignment::Bottom => VerticalAlignment::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DedupArg {
    /// Exact fingerprint matches only
    Exact,
    /// Near-duplicate matching within a Hamming distance
    Threshold,
    /// Keep everything
    Off,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    batch_photo_pipeline::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            paths,
            out,
            format,
            quality,
            ratio,
            align,
            enhance,
            brightness,
            contrast,
            grid,
            sensitivity,
            dedup,
            threshold,
            keep_junk,
            min_size_kb,
            max_size_kb,
            min_width,
            max_width,
            template,
            include_hidden,
            output,
        } => {
            let params = ProcessingParameters {
                dedup: match dedup {
                    DedupArg::Exact => Some(DedupMode::ExactSet),
                    DedupArg::Threshold => Some(DedupMode::Threshold {
                        max_distance: threshold,
                    }),
                    DedupArg::Off => None,
                },
                crop: ratio
                    .map(|r| {
                        Ok::<_, BatchPipelineError>(CropSpec {
                            ratio: r.parse::<AspectRatio>()?,
                            alignment: align.into(),
                        })
                    })
                    .transpose()?,
                enhance: enhance.then_some(EnhanceSpec {
                    brightness,
                    contrast,
                }),
                grid: parse_grid(&grid, sensitivity)?,
                delete_junk: !keep_junk,
                min_size_kb,
                max_size_kb,
                min_resolution: min_width,
                max_resolution: max_width,
                output_format: format.parse::<ImageFormat>()?,
                quality,
                naming_template: template,
                ..Default::default()
            };

            run_process(paths, out, params, include_hidden, output)
        }
        Commands::Dedup {
            paths,
            threshold,
            include_hidden,
            output,
        } => run_dedup(paths, threshold, include_hidden, output),
    }
}

/// Parse the --grid argument: `off`, `auto`, or `ROWSxCOLS`.
fn parse_grid(value: &str, sensitivity: u8) -> Result<GridMode> {
    match value.to_lowercase().as_str() {
        "off" => Ok(GridMode::Off),
        "auto" => Ok(GridMode::Auto { sensitivity }),
        other => {
            let bad = || {
                BatchPipelineError::Config(format!(
                    "invalid grid '{other}' (expected off, auto, or ROWSxCOLS)"
                ))
            };
            let (rows, cols) = other.split_once('x').ok_or_else(bad)?;
            let rows: u32 = rows.trim().parse().map_err(|_| bad())?;
            let cols: u32 = cols.trim().parse().map_err(|_| bad())?;
            if rows == 0 || cols == 0 {
                return Err(bad());
            }
            Ok(GridMode::Fixed { rows, cols })
        }
    }
}

fn run_process(
    paths: Vec<PathBuf>,
    out: PathBuf,
    params: ProcessingParameters,
    include_hidden: bool,
    output: ReportFormat,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, ReportFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Batch Photo Pipeline").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    // Enumerate sources
    let scanner = WalkDirScanner::new(ScanConfig {
        include_hidden,
        allowed_formats: params.allowed_formats.clone(),
        junk_formats: params.junk_formats.clone(),
        ..Default::default()
    });
    let scan = scanner.scan(&paths)?;

    for error in &scan.errors {
        term.write_line(&format!("{} {}", style("warning:").yellow(), error))
            .ok();
    }

    // Build the runner before spawning the consumer thread so a bad
    // configuration fails fast
    let runner = BatchRunner::new(params.clone())?;
    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, ReportFormat::Pretty) {
        let pb = ProgressBar::new(scan.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            if let Event::Batch(batch_event) = event {
                match batch_event {
                    BatchEvent::Unit(p) => {
                        if let Some(ref pb) = progress_clone {
                            pb.set_position(p.processed as u64);
                            pb.set_message(p.name);
                        }
                    }
                    BatchEvent::Completed { .. } | BatchEvent::Cancelled { .. } => {
                        if let Some(ref pb) = progress_clone {
                            pb.finish_and_clear();
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    let outcome = runner.run_with_events(&scan.files, &sender);

    // Drop sender to signal the event thread to finish
    drop(sender);
    event_thread.join().ok();

    // Write the exports
    let exports = export_files(&outcome.records, &params, chrono::Local::now().date_naive());
    std::fs::create_dir_all(&out).map_err(|e| BatchPipelineError::WriteOutput {
        path: out.clone(),
        source: e,
    })?;
    for export in &exports {
        let path = out.join(&export.filename);
        std::fs::write(&path, &export.bytes)
            .map_err(|e| BatchPipelineError::WriteOutput { path, source: e })?;
    }

    match output {
        ReportFormat::Pretty => print_pretty_outcome(&term, &outcome, &out, exports.len()),
        ReportFormat::Json => print_json_outcome(&outcome, &out, exports.len()),
        ReportFormat::Minimal => {
            for export in &exports {
                println!("{}", out.join(&export.filename).display());
            }
        }
    }

    Ok(())
}

fn print_pretty_outcome(term: &Term, outcome: &BatchOutcome, out: &PathBuf, written: usize) {
    term.write_line("").ok();
    if outcome.cancelled {
        term.write_line(&format!("{} Run cancelled", style("✗").red().bold()))
            .ok();
    } else {
        term.write_line(&format!("{} Batch Complete", style("✓").green().bold()))
            .ok();
    }
    term.write_line("").ok();

    let stats = &outcome.stats;
    term.write_line(&format!(
        "  {} files in {:.1}s",
        style(stats.total).cyan(),
        outcome.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!("  {} processed", style(stats.processed).green()))
        .ok();
    term.write_line(&format!(
        "  {} removed ({} duplicates)",
        style(stats.deleted).yellow(),
        stats.duplicates
    ))
    .ok();
    if stats.errors > 0 {
        term.write_line(&format!("  {} errors", style(stats.errors).red()))
            .ok();
        for record in outcome
            .records
            .iter()
            .filter(|r| r.status == RecordStatus::Error)
        {
            term.write_line(&format!(
                "    {} {}: {}",
                style("✗").red(),
                record.name,
                record.reason.as_deref().unwrap_or("unknown")
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} files written to {}",
        style(written).cyan(),
        out.display()
    ))
    .ok();
}

fn print_json_outcome(outcome: &BatchOutcome, out: &PathBuf, written: usize) {
    let output = serde_json::json!({
        "run_id": outcome.id.to_string(),
        "stats": outcome.stats,
        "duration_ms": outcome.duration_ms,
        "cancelled": outcome.cancelled,
        "output_dir": out,
        "files_written": written,
        "records": outcome.records,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn run_dedup(
    paths: Vec<PathBuf>,
    threshold: u32,
    include_hidden: bool,
    output: ReportFormat,
) -> Result<()> {
    let term = Term::stderr();

    let scanner = WalkDirScanner::new(ScanConfig {
        include_hidden,
        ..Default::default()
    });
    let scan = scanner.scan(&paths)?;

    let progress = if matches!(output, ReportFormat::Pretty) {
        let pb = ProgressBar::new(scan.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} fingerprinting")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    // Fingerprint in parallel; unreadable or undecodable files are
    // skipped with a warning
    let codec = ImageCodec;
    let fingerprinted: Vec<FingerprintedFile> = scan
        .files
        .par_iter()
        .filter_map(|file| {
            let result = std::fs::read(&file.path)
                .ok()
                .and_then(|bytes| codec.decode(&bytes, &file.name).ok())
                .map(|image| FingerprintedFile {
                    path: file.path.clone(),
                    size: file.size,
                    fingerprint: Fingerprint::from_image(&image),
                });
            if result.is_none() {
                tracing::warn!(path = %file.path.display(), "skipped: unreadable or not an image");
            }
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            result
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let groups = group_duplicates(&fingerprinted, threshold);

    match output {
        ReportFormat::Pretty => {
            term.write_line("").ok();
            term.write_line(&format!(
                "  {} files examined, {} duplicate groups",
                style(fingerprinted.len()).cyan(),
                style(groups.len()).cyan()
            ))
            .ok();

            let reclaimable: u64 = groups.iter().map(|g| g.reclaimable_bytes()).sum();
            term.write_line(&format!(
                "  {} reclaimable",
                style(format_bytes(reclaimable)).yellow()
            ))
            .ok();
            term.write_line("").ok();

            for (i, group) in groups.iter().enumerate() {
                term.write_line(&format!(
                    "  {} ({} files, {})",
                    style(format!("Group {}:", i + 1)).bold(),
                    group.members.len(),
                    format_bytes(group.reclaimable_bytes())
                ))
                .ok();

                for member in &group.members {
                    let marker = if member.path == group.canonical {
                        style("★").green().to_string()
                    } else {
                        style("○").dim().to_string()
                    };
                    term.write_line(&format!("    {} {}", marker, member.path.display()))
                        .ok();
                }
                term.write_line("").ok();
            }

            term.write_line(&format!(
                "{}",
                style("No files were deleted. The starred (★) member of each group is the keeper.")
                    .dim()
            ))
            .ok();
        }
        ReportFormat::Json => {
            let output = serde_json::json!({
                "files_examined": fingerprinted.len(),
                "duplicate_groups": groups.len(),
                "reclaimable_bytes": groups.iter().map(|g| g.reclaimable_bytes()).sum::<u64>(),
                "groups": groups,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        ReportFormat::Minimal => {
            for group in &groups {
                for member in &group.members {
                    if member.path != group.canonical {
                        println!("{}", member.path.display());
                    }
                }
            }
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_argument_parsing() {
        assert_eq!(parse_grid("off", 50).unwrap(), GridMode::Off);
        assert_eq!(
            parse_grid("auto", 60).unwrap(),
            GridMode::Auto { sensitivity: 60 }
        );
        assert_eq!(
            parse_grid("3x2", 50).unwrap(),
            GridMode::Fixed { rows: 3, cols: 2 }
        );
        assert!(parse_grid("0x2", 50).is_err());
        assert!(parse_grid("grid", 50).is_err());
    }

    #[test]
    fn cli_parses_process_command() {
        let cli = Cli::try_parse_from([
            "photo-batch",
            "process",
            "/photos",
            "--out",
            "/tmp/out",
            "--ratio",
            "16:9",
            "--grid",
            "2x2",
        ])
        .unwrap();

        match cli.command {
            Commands::Process { paths, out, .. } => {
                assert_eq!(paths, vec![PathBuf::from("/photos")]);
                assert_eq!(out, PathBuf::from("/tmp/out"));
            }
            _ => panic!("Wrong command"),
        }
    }

    #[test]
    fn cli_parses_dedup_command() {
        let cli =
            Cli::try_parse_from(["photo-batch", "dedup", "/photos", "--threshold", "3"]).unwrap();

        match cli.command {
            Commands::Dedup { threshold, .. } => assert_eq!(threshold, 3),
            _ => panic!("Wrong command"),
        }
    }
}
