//! Upload every resource in the repository

use crate::app::Context;
use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use knife::BatchSummary;
use kw_core::normalize::normalize_batch;
use owo_colors::OwoColorize;
use watcher::IgnoreRules;

pub async fn run(ctx: Context) -> Result<()> {
    let engine = ctx.engine()?;
    let root = ctx.root.clone();
    let ignore = ctx.settings.ignore_config();

    let files = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let rules = IgnoreRules::load(&root, ignore)?;
        Ok(watcher::scan(&root, &rules)?)
    })
    .await
    .context("Scan task panicked")??;

    let batch = normalize_batch(&files);

    let pb = ProgressBar::new(batch.paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );

    let bar = pb.clone();
    let summary = tokio::task::spawn_blocking(move || {
        let mut summary = BatchSummary {
            skipped_transient: batch.transient,
            ..BatchSummary::default()
        };
        for path in &batch.paths {
            bar.set_message(path.clone());
            let result = bar.suspend(|| engine.process_path(path));
            summary.record(result);
            bar.inc(1);
        }
        summary
    })
    .await
    .context("Upload task panicked")?;
    pb.finish_and_clear();

    println!(
        "{} {} uploaded, {} failed, {} not Chef resources",
        "Sync complete:".bold(),
        summary.uploaded.to_string().green(),
        summary.failed.to_string().red(),
        summary.unmatched
    );

    if !summary.is_clean() {
        anyhow::bail!("{} upload(s) failed", summary.failed);
    }
    Ok(())
}
