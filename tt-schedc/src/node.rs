/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Node model: the action vocabulary and the schedule tree itself.
//!
//! ```text
//! builder ──(combinators)──►  Node<E>  ──(flatten)──►  ScheduleTable<E>
//!                             ↑ immutable tree
//!                             strictly owned, no sharing
//! ```
//!
//! # Ownership model
//! Every child is owned by exactly one parent through `Vec<Node<E>>`, so a
//! tree can neither contain cycles nor reference a node that does not exist.
//! The fields are private and the only constructors are `pub(crate)`: the
//! combinators in [`crate::builder`] are the sanctioned construction path,
//! which keeps an `Effect` node with children unrepresentable from outside
//! the crate.
//!
//! The effect handle `E` is opaque.  Nothing in this crate calls into it;
//! only `Clone` (to copy it into a table row) and `Debug` (for dumps) are
//! ever required.

use std::fmt;

// ── Phase qualifiers ──────────────────────────────────────────────────────────

/// What a phase value is measured against.
///
/// Only `Relative` is produced by the combinators today.  `Absolute` exists
/// so the data model is complete; the flatten engine treats both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseContext {
    /// Phase is an absolute tick offset within the period.
    Absolute,
    /// Phase is an offset from the enclosing scope.
    #[default]
    Relative,
}

/// How strictly a phase value is to be honoured.
///
/// Only `Min` is produced by the combinators today.  See [`PhaseContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseKind {
    /// Dispatch no earlier than the given phase.
    #[default]
    Min,
    /// Dispatch exactly at the given phase.
    Exact,
}

// ── Action ────────────────────────────────────────────────────────────────────

/// The action attached to a single tree node.
///
/// Leaf nodes carry `Effect`; every other variant governs the subtree below
/// the node that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<E> {
    /// Opaque host-supplied fragment.  Always a leaf.
    Effect(E),

    /// Overrides the phase for everything below this node.
    SetPhase {
        context: PhaseContext,
        kind: PhaseKind,
        value: u32,
    },

    /// Overrides the period for everything below this node.  Must be ≥ 1.
    SetPeriod(u32),

    /// Overrides the name and extends the qualified path.  Must be non-empty.
    SetName(String),

    /// Structural grouping with no effect on the inherited context.
    NoAction,
}

impl<E> Action<E> {
    /// Returns `true` for `Effect`.
    pub fn is_effect(&self) -> bool {
        matches!(self, Action::Effect(_))
    }

    /// Short tag used in log fields and error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Effect(_) => "Effect",
            Action::SetPhase { .. } => "SetPhase",
            Action::SetPeriod(_) => "SetPeriod",
            Action::SetName(_) => "SetName",
            Action::NoAction => "NoAction",
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Effect(handle) => write!(f, "Effect {:?}", handle),
            Action::SetPhase {
                context,
                kind,
                value,
            } => write!(f, "SetPhase {:?} {:?} {}", context, kind, value),
            Action::SetPeriod(value) => write!(f, "SetPeriod {}", value),
            Action::SetName(name) => write!(f, "SetName {:?}", name),
            Action::NoAction => write!(f, "NoAction"),
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// One node of a schedule tree: an action plus its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<E> {
    action: Action<E>,
    children: Vec<Node<E>>,
}

impl<E> Node<E> {
    /// Leaf node wrapping a single effect handle.
    pub(crate) fn leaf(handle: E) -> Self {
        Self {
            action: Action::Effect(handle),
            children: Vec::new(),
        }
    }

    /// Parent node governing `children`.
    ///
    /// Callers inside the crate never pass `Action::Effect` here.
    pub(crate) fn parent(action: Action<E>, children: Vec<Node<E>>) -> Self {
        debug_assert!(
            !action.is_effect(),
            "effect nodes are leaves and cannot own children"
        );
        Self { action, children }
    }

    pub fn action(&self) -> &Action<E> {
        &self.action
    }

    pub fn children(&self) -> &[Node<E>] {
        &self.children
    }

    /// Returns the effect handle if this node is a leaf effect.
    pub fn effect(&self) -> Option<&E> {
        match &self.action {
            Action::Effect(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Number of effect leaves anywhere in this subtree.
    pub fn effect_count(&self) -> usize {
        let own = usize::from(self.action.is_effect());
        own + self.children.iter().map(Node::effect_count).sum::<usize>()
    }
}

impl<E: fmt::Debug> Node<E> {
    /// Human-readable indented dump of the subtree, one action per line.
    ///
    /// Diagnostic only; the format is not a stable contract.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        use std::fmt::Write;
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:indent$}{}", "", self.action, indent = depth * 2);
        for child in &self.children {
            child.dump_into(out, depth + 1);
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Node<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
