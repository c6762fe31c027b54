/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! YAML tree documents.
//!
//! Lets a schedule tree be authored without Rust host code.  Each item is a
//! single-key map naming one combinator; effects are opaque strings:
//!
//! ```yaml
//! schedule:
//!   - named:
//!       name: Foo
//!       body:
//!         - at_period:
//!             value: 20
//!             body:
//!               - effect: e1
//!         - named:
//!             name: Bar
//!             body:
//!               - at_phase: { value: 1, body: [ { effect: e2 } ] }
//!   - group: [ { effect: e3 }, { effect: e4 } ]
//!   - disable: [ { effect: e5 } ]
//!   - condition: { predicate: "mode == RUN", body: [ { effect: e6 } ] }
//! ```
//!
//! The document is turned into a tree exclusively through the
//! [`builder`](crate::builder) combinators, so it obeys the same shape rules
//! as hand-written specs.  An unrecognised action key is a hard error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::builder::{at_period, at_phase, condition, disable, effect, group, named, Spec};
use crate::node::Node;

// ── Error type ────────────────────────────────────────────────────────────────

/// Failure to turn a YAML document into a schedule tree.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read tree document {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML, a missing field, or an unrecognised action key.
    #[error("invalid tree document")]
    Parse(#[from] serde_yaml::Error),
}

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeDocument {
    // Items are single-key maps (`- effect: e1`) at every depth, not `!tags`.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    schedule: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Item {
    Effect(String),
    Named(NamedItem),
    AtPhase(ValueItem),
    AtPeriod(ValueItem),
    Group(Vec<Item>),
    Disable(Vec<Item>),
    Condition(ConditionItem),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedItem {
    name: String,
    #[serde(default)]
    body: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValueItem {
    value: u32,
    #[serde(default)]
    body: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionItem {
    predicate: String,
    #[serde(default)]
    body: Vec<Item>,
}

impl Item {
    fn into_spec(self) -> Spec<String> {
        match self {
            Item::Effect(handle) => effect(handle),
            Item::Named(NamedItem { name, body }) => named(name, sequence(body)),
            Item::AtPhase(ValueItem { value, body }) => at_phase(value, sequence(body)),
            Item::AtPeriod(ValueItem { value, body }) => at_period(value, sequence(body)),
            Item::Group(body) => group(sequence(body)),
            Item::Disable(body) => disable(sequence(body)),
            Item::Condition(ConditionItem { predicate, body }) => {
                condition(predicate, sequence(body))
            }
        }
    }
}

fn sequence(items: Vec<Item>) -> Spec<String> {
    items.into_iter().map(Item::into_spec).collect()
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a tree document into the sibling list of its `schedule` items.
pub fn parse_spec(content: &str) -> Result<Spec<String>, DocumentError> {
    let doc: TreeDocument = if content.trim().is_empty() {
        TreeDocument {
            schedule: Vec::new(),
        }
    } else {
        serde_yaml::from_str(content)?
    };
    Ok(sequence(doc.schedule))
}

/// Parse a tree document into a single root node.
pub fn parse_tree(content: &str) -> Result<Node<String>, DocumentError> {
    parse_spec(content).map(Spec::into_root)
}

/// Read and parse the tree document at `path`.
pub fn load_tree(path: &Path) -> Result<Node<String>, DocumentError> {
    info!("Loading schedule tree from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse_tree(&content)?;

    info!(
        nodes = root.node_count(),
        effects = root.effect_count(),
        "Loaded schedule tree"
    );
    Ok(root)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
