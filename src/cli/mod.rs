//! # CLI Module
//!
//! Command-line interface for the duplicate sweeper.
//!
//! ## Usage
//! ```bash
//! # Analyze a directory and write the CSV audit log
//! dupsweep scan ~/Photos
//!
//! # Stricter similarity, machine-readable output
//! dupsweep scan ~/Photos --threshold 2 --output json
//!
//! # Actually sweep duplicates into <dir>/backup_files
//! dupsweep scan ~/Photos --move-duplicates
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use dupsweep::core::engine::{Engine, EngineReport};
use dupsweep::core::mover::{BackupMover, MoveReport};
use dupsweep::core::report::{write_log_file, DEFAULT_LOG_NAME};
use dupsweep::core::DuplicateMap;
use dupsweep::error::Result;
use dupsweep::events::{channel, null_sender, EngineEvent, Event, IndexEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// dupsweep - find duplicate images, keep one copy of each
#[derive(Parser, Debug)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory for duplicate images
    Scan {
        /// Directory to scan
        path: PathBuf,

        /// Visual similarity threshold (Hamming distance, lower = stricter)
        #[arg(short, long, default_value = "5")]
        threshold: u32,

        /// Move planned duplicates into <path>/backup_files
        #[arg(long)]
        move_duplicates: bool,

        /// Treat files sharing a basename as removable duplicates
        #[arg(long)]
        include_names: bool,

        /// Where to write the CSV audit log
        #[arg(long, default_value = DEFAULT_LOG_NAME)]
        log: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (planned paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            threshold,
            move_duplicates,
            include_names,
            log,
            output,
            follow_symlinks,
            include_hidden,
        } => run_scan(ScanArgs {
            path,
            threshold,
            move_duplicates,
            include_names,
            log,
            output,
            follow_symlinks,
            include_hidden,
        }),
    }
}

struct ScanArgs {
    path: PathBuf,
    threshold: u32,
    move_duplicates: bool,
    include_names: bool,
    log: PathBuf,
    output: OutputFormat,
    follow_symlinks: bool,
    include_hidden: bool,
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let term = Term::stderr();

    if matches!(args.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("dupsweep").bold().cyan(),
            style(env!("CARGO_PKG_VERSION")).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let engine = Engine::builder(&args.path)
        .threshold(args.threshold)
        .include_name_matches(args.include_names)
        .follow_symlinks(args.follow_symlinks)
        .include_hidden(args.include_hidden)
        .build();

    let (sender, receiver) = channel();

    let progress = if matches!(args.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
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
            let Some(ref pb) = progress_clone else { continue };
            match event {
                Event::Engine(EngineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Index(IndexEvent::FileIndexed { completed, .. }) => {
                    pb.set_position(completed as u64);
                }
                Event::Engine(EngineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let report = engine.run_with_events(&sender)?;

    drop(sender);
    event_thread.join().ok();

    // The audit log is always written; moving is opt-in
    write_log_file(&report.maps(), &args.log)?;

    // Sizes have to be read before anything is moved
    let planned_bytes: u64 = report
        .plan
        .paths()
        .filter_map(|p| std::fs::metadata(p).ok().map(|m| m.len()))
        .sum();

    let move_report = if args.move_duplicates {
        let mover = BackupMover::new(&args.path);
        Some(mover.execute(&report.plan, &null_sender())?)
    } else {
        None
    };

    match args.output {
        OutputFormat::Pretty => {
            print_pretty(&term, &args, &report, planned_bytes, move_report.as_ref())
        }
        OutputFormat::Json => print_json(&report, move_report.as_ref()),
        OutputFormat::Minimal => print_minimal(&report),
    }

    Ok(())
}

fn print_pretty(
    term: &Term,
    args: &ScanArgs,
    report: &EngineReport,
    planned_bytes: u64,
    move_report: Option<&MoveReport>,
) {
    term.write_line("").ok();
    term.write_line(&format!("{} Analysis complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images scanned in {:.1}s",
        style(report.total_files).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    for map in report.maps() {
        let groups = map.actionable_groups().count();
        if groups > 0 {
            term.write_line(&format!(
                "  {} {} group{} ({} duplicate{})",
                style(groups).cyan(),
                map.kind,
                if groups == 1 { "" } else { "s" },
                map.duplicate_count(),
                if map.duplicate_count() == 1 { "" } else { "s" },
            ))
            .ok();
        }
    }

    term.write_line(&format!(
        "  {} files planned for removal ({})",
        style(report.plan.len()).cyan(),
        style(format_bytes(planned_bytes)).yellow()
    ))
    .ok();

    if !report.warnings.is_empty() {
        term.write_line(&format!(
            "  {} warning{}",
            style(report.warnings.len()).yellow(),
            if report.warnings.len() == 1 { "" } else { "s" },
        ))
        .ok();
    }

    term.write_line("").ok();

    if report.plan.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("🎉").green()))
            .ok();
    } else {
        for map in report.maps() {
            print_map(term, map);
        }
    }

    term.write_line(&format!(
        "  {} {}",
        style("Audit log:").dim(),
        style(args.log.display()).dim()
    ))
    .ok();

    match move_report {
        Some(moved) => {
            term.write_line(&format!(
                "  {} {} file{} moved to backup, {} already missing",
                style("✓").green(),
                moved.moved.len(),
                if moved.moved.len() == 1 { "" } else { "s" },
                moved.missing.len(),
            ))
            .ok();
            for error in &moved.errors {
                term.write_line(&format!("  {} {}", style("!").red(), error)).ok();
            }
        }
        None => {
            term.write_line(&format!(
                "{}",
                style("No files were moved. Re-run with --move-duplicates to sweep them.").dim()
            ))
            .ok();
        }
    }
}

fn print_map(term: &Term, map: &DuplicateMap) {
    let mut printed_header = false;

    for group in map.actionable_groups() {
        if !printed_header {
            term.write_line(&format!(
                "{}",
                style(format!("{} matches:", map.kind)).bold().underlined()
            ))
            .ok();
            printed_header = true;
        }

        term.write_line(&format!(
            "  {} ({} files)",
            style(shorten_key(&group.key)).bold(),
            group.paths.len()
        ))
        .ok();

        for (i, path) in group.paths.iter().enumerate() {
            let marker = if i == 0 {
                style("★").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!("    {} {}", marker, display_path(path)))
                .ok();
        }
    }

    if printed_header {
        term.write_line("").ok();
    }
}

/// Long hex keys are abbreviated for display; basenames pass through
fn shorten_key(key: &str) -> String {
    if key.len() > 16 && key.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("{}…", &key[..16])
    } else {
        key.to_string()
    }
}

fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

fn print_json(report: &EngineReport, move_report: Option<&MoveReport>) {
    let map_json = |map: &DuplicateMap| {
        serde_json::json!({
            "kind": map.kind.to_string(),
            "groups": map
                .actionable_groups()
                .map(|g| {
                    serde_json::json!({
                        "key": g.key,
                        "paths": g.paths,
                        "canonical": g.canonical(),
                    })
                })
                .collect::<Vec<_>>(),
        })
    };

    let output = serde_json::json!({
        "total_files": report.total_files,
        "duration_ms": report.duration_ms,
        "maps": report.maps().iter().map(|m| map_json(m)).collect::<Vec<_>>(),
        "plan": report.plan.removals.iter().map(|r| {
            serde_json::json!({ "path": r.path, "kept": r.kept })
        }).collect::<Vec<_>>(),
        "warnings": report.warnings,
        "moved": move_report.map(|m| m.moved.len()),
        "missing_at_move": move_report.map(|m| m.missing.len()),
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_minimal(report: &EngineReport) {
    for path in report.plan.paths() {
        println!("{}", path.display());
    }
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
