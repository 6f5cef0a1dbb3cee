//! Upload the given paths once

use crate::app::Context;
use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;

pub async fn run(ctx: Context, paths: &[String]) -> Result<()> {
    let engine = ctx.engine()?;
    let paths: Vec<String> = paths.iter().map(|p| ctx.repo_path(p)).collect();

    // knife runs block until exit
    let summary = tokio::task::spawn_blocking(move || engine.on_changed(&paths))
        .await
        .context("Upload task panicked")?;

    if summary.attempted() == 0 {
        println!("{}", "Nothing to upload".dimmed());
    }
    if summary.unmatched > 0 {
        println!(
            "{}",
            format!("{} path(s) are not Chef resources", summary.unmatched).dimmed()
        );
    }

    if !summary.is_clean() {
        anyhow::bail!(
            "{} of {} upload(s) failed",
            summary.failed,
            summary.attempted()
        );
    }
    Ok(())
}
