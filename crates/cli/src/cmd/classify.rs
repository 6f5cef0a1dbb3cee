//! Show how paths would be classified, without running anything

use crate::app::Context;
use anyhow::Result;
use kw_core::normalize::normalize_batch;
use kw_core::{classify, ResourceReference};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Entry {
    path: String,
    resource: Option<ResourceReference>,
    command: Option<Vec<String>>,
}

pub async fn run(ctx: Context, paths: &[String], json: bool) -> Result<()> {
    let config = ctx.settings.configuration()?;
    let dispatcher = kw_core::ActionDispatcher::new(config).with_program(&ctx.settings.upload.program);

    let raw: Vec<String> = paths.iter().map(|p| ctx.repo_path(p)).collect();
    let batch = normalize_batch(&raw);

    let entries: Vec<Entry> = batch
        .paths
        .into_iter()
        .map(|path| {
            let resource = classify(&path).into_reference();
            let command = resource.as_ref().map(|r| {
                let spec = dispatcher.command_for(r);
                std::iter::once(spec.program).chain(spec.args).collect::<Vec<String>>()
            });
            Entry { path, resource, command }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        match entry.resource {
            Some(ref reference) => {
                let preview = dispatcher.command_for(reference);
                println!("{} → {}", entry.path.cyan(), reference.to_string().green());
                println!("  {}", preview.to_string().dimmed());
            }
            None => println!("{} → {}", entry.path.cyan(), "unmatched".dimmed()),
        }
    }

    if batch.transient > 0 {
        println!(
            "{}",
            format!("{} transient editor file(s) skipped", batch.transient).dimmed()
        );
    }
    Ok(())
}
