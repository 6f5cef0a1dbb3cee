//! Path classification
//!
//! Rules live in one ordered table and the first match wins, so a path that
//! could satisfy several rules always resolves the same way.

use crate::reference::ResourceReference;

/// Outcome of classifying a normalized path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Matched(ResourceReference),
    /// Not a Chef resource; ignored without side effects
    Unmatched,
}

impl Classification {
    pub fn reference(&self) -> Option<&ResourceReference> {
        match self {
            Classification::Matched(reference) => Some(reference),
            Classification::Unmatched => None,
        }
    }

    pub fn into_reference(self) -> Option<ResourceReference> {
        match self {
            Classification::Matched(reference) => Some(reference),
            Classification::Unmatched => None,
        }
    }
}

type Matcher = fn(&str) -> Option<ResourceReference>;

/// Classification rules in priority order
const RULES: &[(&str, Matcher)] = &[
    ("cookbook", match_cookbook),
    ("data_bag_item", match_data_bag_item),
    ("environment", match_environment),
    ("role", match_role),
    ("node", match_node),
];

/// Classify a normalized path
///
/// Total and deterministic: every input yields exactly one outcome.
pub fn classify(path: &str) -> Classification {
    RULES
        .iter()
        .find_map(|(_, matcher)| matcher(path))
        .map(Classification::Matched)
        .unwrap_or(Classification::Unmatched)
}

/// Rule names in evaluation order
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|(name, _)| *name)
}

/// `cookbooks/<name>` or `cookbooks/<name>/...`
fn match_cookbook(path: &str) -> Option<ResourceReference> {
    let rest = path.strip_prefix("cookbooks/")?;
    let name = rest.split('/').next().unwrap_or(rest);
    if name.is_empty() {
        return None;
    }
    Some(ResourceReference::Cookbook { name: name.to_string() })
}

/// `data_bags/<bag>/<item>.json`
fn match_data_bag_item(path: &str) -> Option<ResourceReference> {
    let rest = path.strip_prefix("data_bags/")?;
    let (bag, file) = rest.split_once('/')?;
    if bag.is_empty() || file.contains('/') {
        return None;
    }
    let item = file.strip_suffix(".json")?;
    if item.is_empty() {
        return None;
    }
    Some(ResourceReference::DataBagItem {
        bag: bag.to_string(),
        item: item.to_string(),
        source_path: path.to_string(),
    })
}

/// `environments/**.(rb|json)`
fn match_environment(path: &str) -> Option<ResourceReference> {
    has_definition_file(path, "environments/", &[".rb", ".json"])
        .then(|| ResourceReference::Environment { source_path: path.to_string() })
}

/// `roles/**.(rb|json)`
fn match_role(path: &str) -> Option<ResourceReference> {
    has_definition_file(path, "roles/", &[".rb", ".json"])
        .then(|| ResourceReference::Role { source_path: path.to_string() })
}

/// `nodes/**.json`
fn match_node(path: &str) -> Option<ResourceReference> {
    has_definition_file(path, "nodes/", &[".json"])
        .then(|| ResourceReference::Node { source_path: path.to_string() })
}

/// Path sits under `prefix` and ends in one of `extensions` with a non-empty stem
fn has_definition_file(path: &str, prefix: &str, extensions: &[&str]) -> bool {
    let Some(rest) = path.strip_prefix(prefix) else {
        return false;
    };
    extensions.iter().any(|ext| {
        rest.strip_suffix(ext)
            .is_some_and(|stem| !stem.is_empty() && !stem.ends_with('/'))
    })
}
