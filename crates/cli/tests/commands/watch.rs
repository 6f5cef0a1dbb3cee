use crate::common::ChefRepo;
use crate::kw;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::process::Child;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// Forward each stdout line of `child` over a channel
fn stdout_lines(child: &mut Child) -> Result<Receiver<String>> {
    let stdout = child.stdout.take().context("stdout not piped")?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    Ok(rx)
}

/// Read lines until one contains `needle`; returns everything read
fn wait_for_line(lines: &Receiver<String>, needle: &str, timeout: Duration) -> Result<Vec<String>> {
    let deadline = Instant::now() + timeout;
    let mut seen = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let line = lines
            .recv_timeout(remaining)
            .with_context(|| format!("no line containing {:?}; saw {:?}", needle, seen))?;
        let found = line.contains(needle);
        seen.push(line);
        if found {
            return Ok(seen);
        }
    }
}

/// Kills the child even when an assertion fails first
struct Running(Child);

impl Drop for Running {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[cfg(unix)]
#[test]
fn test_watch_uploads_saved_resources() -> Result<()> {
    let repo = ChefRepo::standard()?;
    let (knife, log) = repo.fake_knife()?;
    let knife = knife.display().to_string();

    let mut child = kw!(repo, "watch", "--knife-bin", knife.as_str()).spawn()?;
    let lines = stdout_lines(&mut child)?;
    let _running = Running(child);

    wait_for_line(&lines, "Watching", Duration::from_secs(10))?;

    repo.write("cookbooks/README.md", "Updated notes\n")?;
    repo.write("roles/.web.json.swp", "swap")?;
    repo.write("roles/web.json", "{\"name\": \"web\", \"run_list\": []}\n")?;

    let seen = wait_for_line(&lines, "Uploaded role roles/web.json", Duration::from_secs(10))?;
    assert!(!seen.iter().any(|line| line.contains("README")));
    assert!(!seen.iter().any(|line| line.contains(".swp")));

    assert_eq!(
        ChefRepo::knife_calls(&log)?,
        vec!["role|from|file|roles/web.json"]
    );
    Ok(())
}

#[test]
fn test_watch_missing_root_fails() -> Result<()> {
    let repo = ChefRepo::empty()?;

    let result = kw!(repo, "watch", "--root", "does-not-exist").assert_failure()?;

    assert!(result.contains_stderr("does-not-exist"));
    Ok(())
}
