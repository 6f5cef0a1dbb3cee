//! CLI command execution helpers with automatic timing
//!
//! Wraps the `knifewatch` binary with an isolated HOME and config dir so
//! no user settings or `~/.chef/knife.rb` leak into a test.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// CLI command builder with timing
pub struct KwCommand {
    working_dir: PathBuf,
    home: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl KwCommand {
    /// Create a command in `working_dir`, with HOME pointing at `home`
    pub fn new(working_dir: impl AsRef<Path>, home: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            home: home.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let output = self
            .command()
            .output()
            .context("Failed to execute knifewatch")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute with stdout connected to a pipe nobody reads
    ///
    /// The read end is closed right after spawning, so every write to
    /// stdout fails with a broken pipe. Only stderr is captured.
    pub fn execute_with_closed_stdout(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn knifewatch")?;
        drop(child.stdout.take());

        let output = child
            .wait_with_output()
            .context("Failed to wait for knifewatch")?;

        Ok(CommandResult {
            stdout: String::new(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Start the command without waiting, with stdout piped back
    ///
    /// For long-running subcommands; the caller kills the child.
    pub fn spawn(&self) -> Result<Child> {
        self.command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn knifewatch")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_knifewatch"));
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env_remove("RUST_LOG")
            .envs(&self.env);
        command
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }
}

/// Build a command against a test repository
///
/// Usage:
/// ```ignore
/// kw!(repo, "classify", "roles/web.json").assert_success()?;
/// ```
#[macro_export]
macro_rules! kw {
    ($repo:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::KwCommand::new($repo.root(), $repo.home());
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
