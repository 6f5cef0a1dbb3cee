//! Knifewatch CLI - knifewatch command

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cli_lib::app::Context;
use cli_lib::settings::Overrides;
use cli_lib::{cmd, logging};
use std::path::PathBuf;

/// Knifewatch - Upload Chef repository changes with knife as you save
#[derive(Parser)]
#[command(name = "knifewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Chef repository root (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Settings file (default: .knifewatch.toml, then the user config dir)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// knife.rb passed to every knife command as -c
    #[arg(short = 'c', long = "knife-config", global = true)]
    knife_config: Option<String>,

    /// Knife executable
    #[arg(long = "knife-bin", global = true)]
    knife_bin: Option<String>,

    /// Kill knife after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Also show desktop notifications
    #[arg(long, global = true)]
    desktop: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the repository and upload changes
    Watch,
    /// Upload specific paths once
    Upload {
        /// Paths to upload (repository-relative or absolute)
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show how paths are classified and which command they map to
    Classify {
        /// Paths to classify
        #[arg(required = true)]
        paths: Vec<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload every resource in the repository
    Sync,
    /// Show effective settings
    Config {
        /// Print an example settings file
        #[arg(long)]
        example: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = cli.global;

    let _log_guard = logging::init(global.verbose, global.log_file.as_deref())?;

    let overrides = Overrides {
        knife_config: global.knife_config,
        knife_bin: global.knife_bin,
        timeout_secs: global.timeout,
        desktop: global.desktop,
    };
    let ctx = Context::load(
        &global.root,
        global.settings.as_deref(),
        &overrides,
        global.dry_run,
    )?;

    match cli.command {
        Commands::Watch => cmd::watch::run(ctx).await,
        Commands::Upload { paths } => cmd::upload::run(ctx, &paths).await,
        Commands::Classify { paths, json } => cmd::classify::run(ctx, &paths, json).await,
        Commands::Sync => cmd::sync::run(ctx).await,
        Commands::Config { example } => cmd::config::run(ctx, example).await,
    }
}
