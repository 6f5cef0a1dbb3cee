//! Throwaway Chef repositories for integration tests

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small Chef repository plus an isolated home directory
pub struct ChefRepo {
    _temp: TempDir,
    root: PathBuf,
    home: PathBuf,
}

impl ChefRepo {
    /// Empty repository
    pub fn empty() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().join("chef-repo");
        let home = temp.path().join("home");
        fs::create_dir_all(&root)?;
        fs::create_dir_all(home.join(".config"))?;

        Ok(Self {
            root: root.canonicalize()?,
            home,
            _temp: temp,
        })
    }

    /// Repository with one resource of every kind plus some noise
    pub fn standard() -> Result<Self> {
        let repo = Self::empty()?;
        repo.write("cookbooks/nginx/metadata.rb", "name 'nginx'\n")?;
        repo.write("cookbooks/nginx/recipes/default.rb", "package 'nginx'\n")?;
        repo.write("data_bags/users/alice.json", "{\"id\": \"alice\"}\n")?;
        repo.write("environments/production.rb", "name 'production'\n")?;
        repo.write("roles/web.json", "{\"name\": \"web\"}\n")?;
        repo.write("nodes/db1.json", "{\"name\": \"db1\"}\n")?;
        repo.write("cookbooks/README.md", "Cookbooks live here\n")?;
        repo.write("cookbooks/chefignore", "*.swp\n")?;
        repo.write("README.md", "# chef repo\n")?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Write a file relative to the repository root
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Install a fake knife that records each invocation as one `|`-joined line
    ///
    /// Exits 1 with a message on stderr when any argument contains `fail`.
    #[cfg(unix)]
    pub fn fake_knife(&self) -> Result<(PathBuf, PathBuf)> {
        self.write_fake_knife("")
    }

    /// Same as [`fake_knife`](Self::fake_knife), but each call takes `secs` seconds
    #[cfg(unix)]
    pub fn slow_fake_knife(&self, secs: &str) -> Result<(PathBuf, PathBuf)> {
        self.write_fake_knife(&format!("sleep {}\n", secs))
    }

    #[cfg(unix)]
    fn write_fake_knife(&self, delay: &str) -> Result<(PathBuf, PathBuf)> {
        use std::os::unix::fs::PermissionsExt;

        let log = self.home.join("knife.log");
        let script = self.home.join("fake-knife");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 {}\
                 (IFS='|'; printf '%s\\n' \"$*\") >> '{}'\n\
                 case \"$*\" in\n\
                 *fail*) echo 'ERROR: upload rejected' >&2; exit 1 ;;\n\
                 esac\n\
                 exit 0\n",
                delay,
                log.display()
            ),
        )?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        Ok((script, log))
    }

    /// Recorded fake knife invocations
    pub fn knife_calls(log: &Path) -> Result<Vec<String>> {
        if !log.exists() {
            return Ok(vec![]);
        }
        Ok(fs::read_to_string(log)?.lines().map(str::to_string).collect())
    }
}
