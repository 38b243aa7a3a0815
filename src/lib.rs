//! dupsweep - duplicate file remover
//!
//! Walks a directory tree, fingerprints every regular file by size, MD5 and
//! SHA-256, groups files whose fingerprints match, and deletes all but one
//! member of each group.
//!
//! The pipeline is split into a read-only plan and a commit step:
//!
//! ```no_run
//! use dupsweep::dedupe::Deduplicator;
//! use dupsweep::duplicates::FinderConfig;
//! use std::path::Path;
//!
//! let dedupe = Deduplicator::new(FinderConfig::default()).with_dry_run(true);
//! let report = dedupe.deduplicate(Path::new("./photos")).unwrap();
//! println!("{}", report.summary());
//! ```

pub mod actions;
pub mod cli;
pub mod dedupe;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, Commands, CommonArgs, DedupeArgs, OutputFormat};
use crate::dedupe::Deduplicator;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{write_json, JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;
use crate::signal::ShutdownHandler;

/// Run the CLI application and return the process exit code.
///
/// # Errors
///
/// Returns an error for fatal problems: an invalid root, an interrupted
/// scan, or a failure writing results to stdout. Per-file problems are not
/// errors; they are reported and reflected in the exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let shutdown = signal::install_handler();
    let color = !cli.no_color && io::stdout().is_terminal();
    let common = cli.command.common();

    let progress = if common.output == OutputFormat::Text && !cli.quiet {
        Some(Arc::new(Progress::new(false)))
    } else {
        None
    };

    let finder_config = finder_config(common, &shutdown, progress.as_ref());

    match &cli.command {
        Commands::Scan(args) => run_scan(&args.common, finder_config, color),
        Commands::Dedupe(args) => run_dedupe(args, finder_config, &shutdown, progress, color),
    }
}

fn finder_config(
    common: &CommonArgs,
    shutdown: &ShutdownHandler,
    progress: Option<&Arc<Progress>>,
) -> FinderConfig {
    let walker_config = WalkerConfig::new(
        common.follow_symlinks,
        common.skip_hidden,
        common.ignore_patterns.clone(),
    );

    let mut config = FinderConfig::default()
        .with_io_threads(usize::from(common.io_threads))
        .with_walker_config(walker_config)
        .with_shutdown_flag(shutdown.get_flag());

    if let Some(progress) = progress {
        let callback: Arc<Progress> = Arc::clone(progress);
        config = config.with_progress_callback(callback);
    }
    config
}

fn run_scan(common: &CommonArgs, config: FinderConfig, color: bool) -> anyhow::Result<ExitCode> {
    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder
        .find_duplicates(&common.path)
        .with_context(|| format!("Failed to scan {}", common.path.display()))?;

    let exit_code = ExitCode::for_scan(&summary);
    let mut stdout = io::stdout().lock();

    match common.output {
        OutputFormat::Text => TextOutput::new(color)
            .write_scan(&mut stdout, &groups, &summary)
            .context("Failed to write scan results")?,
        OutputFormat::Json => JsonOutput::new(&groups, &summary, exit_code)
            .write_to(&mut stdout, true)
            .context("Failed to write JSON output")?,
    }
    stdout.flush().context("Failed to flush stdout")?;

    Ok(exit_code)
}

fn run_dedupe(
    args: &DedupeArgs,
    config: FinderConfig,
    shutdown: &ShutdownHandler,
    progress: Option<Arc<Progress>>,
    color: bool,
) -> anyhow::Result<ExitCode> {
    let common = &args.common;

    let mut deduplicator = Deduplicator::new(config)
        .with_policy(args.keep)
        .with_dry_run(args.dry_run)
        .with_verify(args.verify)
        .with_shutdown_flag(shutdown.get_flag());
    if let Some(progress) = progress {
        deduplicator = deduplicator.with_delete_callback(progress);
    }

    let outcome = deduplicator
        .run(&common.path)
        .with_context(|| format!("Failed to deduplicate {}", common.path.display()))?;

    let exit_code = ExitCode::for_report(&outcome.report);
    let mut stdout = io::stdout().lock();

    match common.output {
        OutputFormat::Text => TextOutput::new(color)
            .write_dedupe(&mut stdout, &outcome)
            .context("Failed to write dedupe results")?,
        OutputFormat::Json => write_json(&mut stdout, &outcome.report, true)
            .context("Failed to write JSON output")?,
    }
    stdout.flush().context("Failed to flush stdout")?;

    Ok(exit_code)
}
