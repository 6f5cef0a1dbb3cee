//! Shared command context: repository root, settings and the engine

use crate::notifier::{DesktopNotifier, Fanout, TerminalNotifier};
use crate::settings::{Overrides, Settings};
use anyhow::{Context as _, Result};
use kw_core::ActionDispatcher;
use knife::{DryRunExecutor, Engine, Notifier, ProcessExecutor, UploadExecutor};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Engine type used by every command
pub type CliEngine = Engine<Box<dyn UploadExecutor + Send>, Box<dyn Notifier + Send>>;

/// Everything a command needs after argument parsing
#[derive(Debug, Clone)]
pub struct Context {
    /// Canonical repository root
    pub root: PathBuf,
    pub settings: Settings,
    /// File the settings were read from, if any
    pub settings_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl Context {
    pub fn load(
        root: &Path,
        settings_file: Option<&Path>,
        overrides: &Overrides,
        dry_run: bool,
    ) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Repository root not found: {}", root.display()))?;
        if !root.is_dir() {
            anyhow::bail!("Repository root is not a directory: {}", root.display());
        }

        let (mut settings, settings_path) = Settings::load(settings_file, &root)?;
        settings.apply(overrides)?;

        debug!(
            "Loaded settings from {}",
            settings_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string())
        );

        Ok(Self {
            root,
            settings,
            settings_path,
            dry_run,
        })
    }

    /// Build the engine for this context
    pub fn engine(&self) -> Result<CliEngine> {
        self.engine_with(self.notifier())
    }

    /// Build the engine with a specific notifier
    pub fn engine_with(&self, notifier: Box<dyn Notifier + Send>) -> Result<CliEngine> {
        let config = self.settings.configuration()?;
        let dispatcher = ActionDispatcher::new(config).with_program(&self.settings.upload.program);

        let executor: Box<dyn UploadExecutor + Send> = if self.dry_run {
            Box::new(DryRunExecutor)
        } else {
            Box::new(
                ProcessExecutor::new()
                    .with_working_dir(&self.root)
                    .with_timeout(self.settings.timeout()),
            )
        };

        Ok(Engine::with_dispatcher(dispatcher, executor, notifier))
    }

    fn notifier(&self) -> Box<dyn Notifier + Send> {
        let mut fanout = Fanout::new().with(TerminalNotifier);
        if self.settings.notify.desktop {
            fanout = fanout.with(DesktopNotifier::new());
        }
        Box::new(fanout)
    }

    /// Turn a command-line path into a repository-relative one
    ///
    /// Absolute paths (and relative paths that exist from the current
    /// directory) are made relative to the root; anything else is taken as
    /// already repository-relative.
    pub fn repo_path(&self, arg: &str) -> String {
        let path = Path::new(arg);

        let absolute = if path.is_absolute() {
            Some(path.to_path_buf())
        } else if path.exists() {
            std::env::current_dir().ok().map(|cwd| cwd.join(path))
        } else {
            None
        };

        if let Some(abs) = absolute {
            let abs = abs.canonicalize().unwrap_or(abs);
            if let Some(rel) = watcher::relative_path(&self.root, &abs) {
                return rel;
            }
        }

        arg.to_string()
    }
}
