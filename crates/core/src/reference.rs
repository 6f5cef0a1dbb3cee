//! Change events, resource references and upload outcomes

use serde::Serialize;
use std::fmt;

/// Type of change delivered by the watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// File created or modified
    Modified,
    /// File deleted
    Deleted,
}

/// A single changed path, relative to the repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path that changed (`/`-separated)
    pub path: String,
    /// Type of change
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn modified(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: ChangeKind::Modified }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: ChangeKind::Deleted }
    }
}

/// A Chef resource that a changed path maps to
///
/// Every variant carries what knife needs, so the command can be built
/// without looking at the original path again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceReference {
    /// A whole cookbook, uploaded by name
    Cookbook { name: String },
    /// One item of a data bag
    DataBagItem {
        bag: String,
        item: String,
        source_path: String,
    },
    /// An environment definition file
    Environment { source_path: String },
    /// A role definition file
    Role { source_path: String },
    /// A node definition file
    Node { source_path: String },
}

impl ResourceReference {
    /// Human-readable resource type
    pub fn kind_label(&self) -> &'static str {
        match self {
            ResourceReference::Cookbook { .. } => "cookbook",
            ResourceReference::DataBagItem { .. } => "data bag item",
            ResourceReference::Environment { .. } => "environment",
            ResourceReference::Role { .. } => "role",
            ResourceReference::Node { .. } => "node",
        }
    }

    /// Identifier shown to users: cookbook name, `bag/item`, or the source path
    pub fn identifier(&self) -> String {
        match self {
            ResourceReference::Cookbook { name } => name.clone(),
            ResourceReference::DataBagItem { bag, item, .. } => format!("{}/{}", bag, item),
            ResourceReference::Environment { source_path }
            | ResourceReference::Role { source_path }
            | ResourceReference::Node { source_path } => source_path.clone(),
        }
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_label(), self.identifier())
    }
}

/// Result of one knife invocation
///
/// Lives for a single dispatch cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub reference: ResourceReference,
    pub succeeded: bool,
    pub exit_message: String,
}

impl UploadOutcome {
    pub fn success(reference: ResourceReference, exit_message: impl Into<String>) -> Self {
        Self {
            reference,
            succeeded: true,
            exit_message: exit_message.into(),
        }
    }

    pub fn failure(reference: ResourceReference, exit_message: impl Into<String>) -> Self {
        Self {
            reference,
            succeeded: false,
            exit_message: exit_message.into(),
        }
    }
}
