//! Show the effective settings

use crate::app::Context;
use crate::settings::{self, example_settings};
use anyhow::Result;
use owo_colors::OwoColorize;

pub async fn run(ctx: Context, example: bool) -> Result<()> {
    if example {
        print!("{}", example_settings());
        return Ok(());
    }

    let s = &ctx.settings;
    let config = s.configuration()?;

    println!("{}", "Knifewatch Settings".bold());
    match ctx.settings_path {
        Some(ref path) => println!("{}: {}", "Location".dimmed(), path.display().dimmed()),
        None => println!("{}: {}", "Location".dimmed(), "(defaults)".dimmed()),
    }
    println!("{}: {}\n", "Root".dimmed(), ctx.root.display());

    println!("{}", "[knife]".yellow());
    if config.is_empty() {
        println!("  {}", "(no options)".dimmed());
    }
    for (key, value) in config.iter() {
        println!("  {} = {}", key.cyan(), value);
    }

    println!("\n{}", "[watch]".yellow());
    println!(
        "  {} = {} {}",
        "debounce_ms".cyan(),
        s.watch.debounce_ms,
        format!("({:?})", s.watch_options().debounce).dimmed()
    );
    println!("  {} = {}", "use_gitignore".cyan(), s.watch.use_gitignore);
    println!("  {} = {:?}", "ignore".cyan(), s.watch.ignore);

    println!("\n{}", "[upload]".yellow());
    println!("  {} = {}", "program".cyan(), s.upload.program);
    println!(
        "  {} = {}",
        "timeout_secs".cyan(),
        match s.upload.timeout_secs {
            Some(secs) => secs.to_string(),
            None => "(no limit)".dimmed().to_string(),
        }
    );

    println!("\n{}", "[notify]".yellow());
    println!("  {} = {}", "desktop".cyan(), s.notify.desktop);

    let flags = config.knife_flags();
    println!(
        "\n{}: {}",
        "Knife flags".bold(),
        if flags.is_empty() { "(none)".to_string() } else { flags.join(" ") }
    );

    println!("\n{}", "Searched:".bold());
    for path in settings::discovery_paths(&ctx.root) {
        println!("  {}", path.display());
    }

    println!("\n{}", "Valid Ranges:".bold());
    println!("  debounce_ms: 10-10000");
    println!("  timeout_secs: 1-86400");

    Ok(())
}
