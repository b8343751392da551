//! One fetch run: configuration, logging, clients, pipeline, summary.

use std::io::{self, Write};

use anyhow::{Context, Result};
use release_artifacts::collect::compile_patterns;
use release_artifacts::{
    CollectOptions, FetchPlan, HttpClient, NoProgress, ProgressReporter, ReleaseClient,
    RunSummary, fetch_artifacts,
};
use tracing::{debug, info, warn};

use super::config::{self, Settings};
use super::exit_handler::determine_exit_outcome;
use super::progress::TerminalProgress;
use super::terminal::{TerminalMode, init_tracing};
use crate::ProcessExit;
use crate::cli::Args;

pub(crate) async fn run(args: Args) -> Result<ProcessExit> {
    let loaded = config::load_config(args.config.as_deref())?;
    let settings = config::resolve_settings(&args, loaded.as_ref().map(|l| &l.config));

    let terminal = TerminalMode::detect(args.no_color, settings.quiet);
    init_tracing(settings.log_level, settings.force_log_level, terminal);

    debug!(?args, "CLI arguments parsed");
    if let Some(loaded) = &loaded {
        debug!(path = %loaded.path.display(), "loaded config file");
    }
    info!(
        owner = %settings.owner,
        repo = %settings.repo,
        tag = %settings.tag,
        "fetching release artifacts"
    );

    let plan = build_plan(&settings)?;
    let releases = ReleaseClient::new(&settings.api_url, settings.timeouts)
        .context("failed to create release API client")?;
    let http = HttpClient::new(settings.timeouts).context("failed to create download client")?;

    let terminal_progress;
    let progress: &dyn ProgressReporter = if terminal.progress_bar {
        terminal_progress = TerminalProgress::new();
        &terminal_progress
    } else {
        &NoProgress
    };

    let summary = fetch_artifacts(&plan, &releases, &http, progress).await?;
    report_summary(&summary, &settings)?;
    Ok(determine_exit_outcome(&summary))
}

fn build_plan(settings: &Settings) -> Result<FetchPlan> {
    let patterns = compile_patterns(&settings.libraries).context("invalid library pattern")?;
    Ok(FetchPlan {
        owner: settings.owner.clone(),
        repo: settings.repo.clone(),
        tag: settings.tag.clone(),
        downloads_dir: settings.downloads_dir.clone(),
        artifacts_dir: settings.artifacts_dir.clone(),
        patterns,
        asset_filters: settings.asset_filters.clone(),
        collect: CollectOptions {
            strict: settings.strict,
            ..CollectOptions::default()
        },
    })
}

/// Logs the run summary and prints each copied artifact path on stdout.
fn report_summary(summary: &RunSummary, settings: &Settings) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for artifact in &summary.report.copied {
        writeln!(stdout, "{}", artifact.dest.display())?;
    }
    stdout.flush()?;

    for pattern in &summary.report.missing {
        warn!(pattern = %pattern, "library not found in any archive");
    }
    info!(
        tag = %summary.tag,
        archives = summary.archives.len(),
        copied = summary.report.copied.len(),
        missing = summary.report.missing.len(),
        artifacts_dir = %settings.artifacts_dir.display(),
        "fetch complete"
    );
    Ok(())
}
