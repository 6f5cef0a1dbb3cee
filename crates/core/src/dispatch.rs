//! Knife command construction
//!
//! Pure: builds the program and argument list for a reference, never runs
//! anything. Arguments stay a list all the way to process creation, so
//! resource names are never re-parsed by a shell.

use crate::config::Configuration;
use crate::reference::ResourceReference;
use std::fmt;

/// Default knife executable
pub const KNIFE_PROGRAM: &str = "knife";

/// A program plus its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

impl fmt::Display for CommandSpec {
    /// Shell-quoted preview for logs and dry runs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,~".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Maps references to knife commands
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    program: String,
    config: Configuration,
}

impl ActionDispatcher {
    pub fn new(config: Configuration) -> Self {
        Self {
            program: KNIFE_PROGRAM.to_string(),
            config,
        }
    }

    /// Use a different knife executable (e.g. a bundler binstub)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the knife command for one reference
    pub fn command_for(&self, reference: &ResourceReference) -> CommandSpec {
        let mut args: Vec<String> = match reference {
            ResourceReference::Cookbook { name } => words(&["cookbook", "upload", name.as_str()]),
            ResourceReference::DataBagItem { bag, source_path, .. } => {
                words(&["data", "bag", "from", "file", bag.as_str(), source_path.as_str()])
            }
            ResourceReference::Environment { source_path } => {
                words(&["environment", "from", "file", source_path.as_str()])
            }
            ResourceReference::Role { source_path } => words(&["role", "from", "file", source_path.as_str()]),
            ResourceReference::Node { source_path } => words(&["node", "from", "file", source_path.as_str()]),
        };

        args.extend(self.config.knife_flags());
        CommandSpec::new(self.program.clone(), args)
    }
}

fn words(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
