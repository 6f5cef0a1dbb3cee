//! Watch the repository and upload changes as they settle

use crate::app::Context;
use anyhow::{Context as _, Result};
use knife::BatchSummary;
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use watcher::RepoWatcher;

/// How often the loop checks for shutdown while idle
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub async fn run(ctx: Context) -> Result<()> {
    let engine = ctx.engine()?;
    let options = ctx.settings.watch_options();
    let repo_watcher = RepoWatcher::start(&ctx.root, options)
        .with_context(|| format!("Failed to watch {}", ctx.root.display()))?;

    println!(
        "{} {}{}",
        "Watching".green().bold(),
        ctx.root.display(),
        if ctx.dry_run { " (dry run)".dimmed().to_string() } else { String::new() }
    );
    println!("{}", "Press Ctrl-C to stop".dimmed());

    let stop = Arc::new(AtomicBool::new(false));
    let loop_stop = Arc::clone(&stop);

    let mut worker = tokio::task::spawn_blocking(move || -> Result<BatchSummary> {
        let mut total = BatchSummary::default();
        while !loop_stop.load(Ordering::Relaxed) {
            let Some(batch) = repo_watcher.next_batch(POLL_INTERVAL)? else {
                continue;
            };
            debug!("Handling batch of {} paths", batch.len());
            total += engine.handle(&batch.events());
        }
        Ok(total)
    });

    let total = tokio::select! {
        joined = &mut worker => joined.context("Watch loop panicked")??,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted; finishing current batch");
            stop.store(true, Ordering::Relaxed);
            worker.await.context("Watch loop panicked")??
        }
    };

    println!(
        "\n{} {} uploaded, {} failed",
        "Stopped.".bold(),
        total.uploaded,
        total.failed
    );
    Ok(())
}
