//! Upload execution
//!
//! Runs knife as a child process with an argument list (no shell), blocking
//! until it exits. Any failure, including a missing executable, becomes a
//! failed [`UploadOutcome`] rather than an error.

use kw_core::{CommandSpec, ResourceReference, UploadOutcome};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often a child with a deadline is polled
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long readers of a killed child may take to drain
const READER_GRACE: Duration = Duration::from_millis(500);

/// Runs one upload command to completion
pub trait UploadExecutor {
    fn execute(&self, reference: ResourceReference, command: &CommandSpec) -> UploadOutcome;
}

impl<T: UploadExecutor + ?Sized> UploadExecutor for Box<T> {
    fn execute(&self, reference: ResourceReference, command: &CommandSpec) -> UploadOutcome {
        (**self).execute(reference, command)
    }
}

impl<T: UploadExecutor + ?Sized> UploadExecutor for &T {
    fn execute(&self, reference: ResourceReference, command: &CommandSpec) -> UploadOutcome {
        (**self).execute(reference, command)
    }
}

/// Executes commands as child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    /// Directory the child runs in (source paths are repo-relative)
    working_dir: Option<PathBuf>,
    /// Kill the child after this long (default: wait forever)
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the command; `Ok` carries the exit message of a zero exit
    fn run(&self, command: &CommandSpec) -> Result<String, String> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| format!("failed to launch {}: {}", command.program, e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => wait_with_deadline(&mut child, timeout),
            None => child.wait().map(Some),
        }
        .map_err(|e| format!("failed waiting for {}: {}", command.program, e))?;

        let Some(status) = status else {
            let timeout = self.timeout.unwrap_or_default();
            release_readers(command, [stdout, stderr]);
            return Err(format!("timed out after {:?}", timeout));
        };

        let stdout = join_output(stdout);
        let stderr = join_output(stderr);
        if !stdout.trim().is_empty() {
            debug!("{} output:\n{}", command.program, stdout.trim_end());
        }

        exit_message(status, &stderr)
    }
}

impl UploadExecutor for ProcessExecutor {
    fn execute(&self, reference: ResourceReference, command: &CommandSpec) -> UploadOutcome {
        debug!("Running {}", command);
        let started = Instant::now();

        match self.run(command) {
            Ok(message) => {
                info!("Uploaded {} in {:?}", reference, started.elapsed());
                UploadOutcome::success(reference, message)
            }
            Err(message) => {
                warn!("Upload of {} failed: {}", reference, message);
                UploadOutcome::failure(reference, message)
            }
        }
    }
}

/// Logs the command and reports success without starting a process
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl UploadExecutor for DryRunExecutor {
    fn execute(&self, reference: ResourceReference, command: &CommandSpec) -> UploadOutcome {
        info!("[dry-run] {}", command);
        UploadOutcome::success(reference, format!("dry run: {}", command))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Give reader threads of a killed child a short time to see EOF
///
/// A grandchild that inherited the pipes keeps them open after the child is
/// killed. Its readers are detached; each one exits once that grandchild
/// closes its end.
fn release_readers<const N: usize>(command: &CommandSpec, readers: [Option<JoinHandle<String>>; N]) {
    let deadline = Instant::now() + READER_GRACE;
    let mut pending: Vec<JoinHandle<String>> = readers.into_iter().flatten().collect();

    while !pending.is_empty() && Instant::now() < deadline {
        pending.retain(|handle| !handle.is_finished());
        thread::sleep(POLL_INTERVAL);
    }
    pending.retain(|handle| !handle.is_finished());

    if !pending.is_empty() {
        warn!(
            "{} left {} output pipe(s) open after being killed; detaching readers",
            command.program,
            pending.len()
        );
    }
}

/// Wait for the child, killing it once `timeout` elapses
///
/// Returns `Ok(None)` when the deadline was hit.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        let now = Instant::now();
        if now >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn exit_message(status: ExitStatus, stderr: &str) -> Result<String, String> {
    let tail = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty());

    match status.code() {
        Some(0) => Ok("exit status 0".to_string()),
        Some(code) => Err(match tail {
            Some(line) => format!("exit status {}: {}", code, line),
            None => format!("exit status {}", code),
        }),
        None => Err("terminated by signal".to_string()),
    }
}
