/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Builder combinators: the authoring surface for schedule trees.
//!
//! A [`Spec`] pairs a list of sibling top-level nodes with a user-facing
//! result value.  Sequencing two specs concatenates their node lists (order
//! preserved) and threads the second one's value forward; wrapping a spec
//! under a governing action turns its whole node list into the children of
//! exactly one new node.
//!
//! ```rust
//! use tt_schedc::builder::{at_period, at_phase, effect, named};
//!
//! let spec = named(
//!     "Foo",
//!     at_period(20, effect("e1")).then(named("Bar", at_phase(1, effect("e2")))),
//! );
//! let root = spec.into_root();
//! assert_eq!(root.effect_count(), 2);
//! ```
//!
//! Every combinator call adds exactly one node, so the tree shape is fully
//! determined by how the calls nest in source order.

use tracing::warn;

use crate::node::{Action, Node, PhaseContext, PhaseKind};

// ── Spec ──────────────────────────────────────────────────────────────────────

/// Authoring-time builder value: accumulated sibling nodes plus a result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a Spec does nothing until it is composed or turned into a tree"]
pub struct Spec<E, T = ()> {
    nodes: Vec<Node<E>>,
    value: T,
}

impl<E, T> Spec<E, T> {
    /// A spec with no nodes that just carries `value`.
    pub fn pure(value: T) -> Self {
        Self {
            nodes: Vec::new(),
            value,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn nodes(&self) -> &[Node<E>] {
        &self.nodes
    }

    pub fn into_parts(self) -> (Vec<Node<E>>, T) {
        (self.nodes, self.value)
    }

    /// Transform the result value, leaving the nodes untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spec<E, U> {
        Spec {
            nodes: self.nodes,
            value: f(self.value),
        }
    }

    /// Sequential composition with a continuation that sees this spec's value.
    ///
    /// Nodes produced by `f` are appended after `self`'s nodes.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Spec<E, U>) -> Spec<E, U> {
        let Spec { mut nodes, value } = self;
        let next = f(value);
        nodes.extend(next.nodes);
        Spec {
            nodes,
            value: next.value,
        }
    }

    /// Sequential composition: `self` then `next`, keeping `next`'s value.
    pub fn then<U>(self, next: Spec<E, U>) -> Spec<E, U> {
        self.and_then(|_| next)
    }

    /// Wrap the accumulated node list under one governing action.
    fn wrap(self, action: Action<E>) -> Self {
        Self {
            nodes: vec![Node::parent(action, self.nodes)],
            value: self.value,
        }
    }

    /// Close the spec into a single tree rooted at a `NoAction` node.
    ///
    /// The result value is dropped; use [`into_parts`](Self::into_parts)
    /// first if it is still needed.
    pub fn into_root(self) -> Node<E> {
        Node::parent(Action::NoAction, self.nodes)
    }
}

impl<E> Spec<E, ()> {
    /// A spec with no nodes.
    pub fn empty() -> Self {
        Self::pure(())
    }

    /// Sequence any number of sibling specs in iteration order.
    pub fn concat(specs: impl IntoIterator<Item = Spec<E, ()>>) -> Self {
        specs.into_iter().fold(Self::empty(), Spec::then)
    }
}

impl<E> Default for Spec<E, ()> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> FromIterator<Spec<E, ()>> for Spec<E, ()> {
    fn from_iter<I: IntoIterator<Item = Spec<E, ()>>>(iter: I) -> Self {
        Self::concat(iter)
    }
}

// ── Combinators ───────────────────────────────────────────────────────────────

/// One leaf carrying an opaque effect handle.
pub fn effect<E>(handle: E) -> Spec<E, ()> {
    Spec {
        nodes: vec![Node::leaf(handle)],
        value: (),
    }
}

/// Wrap `sub` under `SetName(name)`.
///
/// An empty name is accepted here and rejected by the flatten engine, which
/// can report where in the tree it occurs.
pub fn named<E, T>(name: impl Into<String>, sub: Spec<E, T>) -> Spec<E, T> {
    sub.wrap(Action::SetName(name.into()))
}

/// Wrap `sub` under `SetPhase(Relative, Min, value)`.
pub fn at_phase<E, T>(value: u32, sub: Spec<E, T>) -> Spec<E, T> {
    sub.wrap(Action::SetPhase {
        context: PhaseContext::Relative,
        kind: PhaseKind::Min,
        value,
    })
}

/// Wrap `sub` under `SetPeriod(value)`.
///
/// A period of zero is rejected by the flatten engine.
pub fn at_period<E, T>(value: u32, sub: Spec<E, T>) -> Spec<E, T> {
    sub.wrap(Action::SetPeriod(value))
}

/// Wrap `sub` under a plain `NoAction` grouping node.
pub fn group<E, T>(sub: Spec<E, T>) -> Spec<E, T> {
    sub.wrap(Action::NoAction)
}

/// Mark `sub` as disabled.
///
/// # Warning
/// Disabling is **not enforced**: the subtree is kept under a `NoAction`
/// node and its effects are still emitted into the schedule table.  Gating
/// semantics are undefined and deliberately not guessed at.
pub fn disable<E, T>(sub: Spec<E, T>) -> Spec<E, T> {
    warn!("disable() is not enforced; the subtree stays in the schedule");
    sub.wrap(Action::NoAction)
}

/// Guard `sub` with a host-language predicate.
///
/// # Warning
/// Conditions are **not enforced**: the predicate is discarded and the
/// subtree is kept under a `NoAction` node, exactly like [`disable`].
pub fn condition<E, T, P>(predicate: P, sub: Spec<E, T>) -> Spec<E, T> {
    drop(predicate);
    warn!("condition() is not enforced; the predicate is discarded");
    sub.wrap(Action::NoAction)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Spec composition ──────────────────────────────────────────────────────

    #[test]
    fn pure_has_no_nodes() {
        let spec: Spec<i32, &str> = Spec::pure("v");
        assert!(spec.nodes().is_empty());
        assert_eq!(*spec.value(), "v");
    }

    #[test]
    fn then_concatenates_in_order() {
        let spec = effect(1).then(effect(2)).then(effect(3));
        let handles: Vec<_> = spec.nodes().iter().filter_map(Node::effect).collect();
        assert_eq!(handles, vec![&1, &2, &3]);
    }

    #[test]
    fn and_then_threads_the_value_forward() {
        let spec = effect("a")
            .map(|()| 10)
            .and_then(|n| effect("b").map(move |()| n + 1));
        assert_eq!(*spec.value(), 11);
        assert_eq!(spec.nodes().len(), 2);
    }

    #[test]
    fn concat_matches_chained_then() {
        let chained = effect(1).then(effect(2)).then(effect(3));
        let collected: Spec<i32> = (1..=3).map(effect).collect();
        assert_eq!(chained, collected);
    }

    #[test]
    fn into_root_wraps_siblings_under_no_action() {
        let root = effect(1).then(effect(2)).into_root();
        assert_eq!(root.action(), &Action::NoAction);
        assert_eq!(root.children().len(), 2);
    }

    // ── Combinators ───────────────────────────────────────────────────────────

    #[test]
    fn effect_is_a_single_leaf() {
        let spec = effect("e");
        assert_eq!(spec.nodes().len(), 1);
        assert!(spec.nodes()[0].is_leaf());
        assert_eq!(spec.nodes()[0].effect(), Some(&"e"));
    }

    #[test]
    fn each_wrapper_adds_exactly_one_parent() {
        let body = || effect(1).then(effect(2));
        let wrapped = [
            named("n", body()),
            at_phase(3, body()),
            at_period(4, body()),
            group(body()),
            disable(body()),
            condition("x > 0", body()),
        ];
        for spec in wrapped {
            assert_eq!(spec.nodes().len(), 1);
            assert_eq!(spec.nodes()[0].children().len(), 2);
        }
    }

    #[test]
    fn wrappers_attach_expected_actions() {
        assert_eq!(
            named("Foo", effect(0)).nodes()[0].action(),
            &Action::SetName("Foo".into())
        );
        assert_eq!(
            at_phase(5, effect(0)).nodes()[0].action(),
            &Action::SetPhase {
                context: PhaseContext::Relative,
                kind: PhaseKind::Min,
                value: 5,
            }
        );
        assert_eq!(
            at_period(20, effect(0)).nodes()[0].action(),
            &Action::SetPeriod(20)
        );
    }

    #[test]
    fn disable_and_condition_keep_the_subtree() {
        let disabled = disable(effect(7));
        assert_eq!(disabled.nodes()[0].action(), &Action::NoAction);
        assert_eq!(disabled.nodes()[0].children()[0].effect(), Some(&7));

        let guarded = condition(false, effect(8));
        assert_eq!(guarded.nodes()[0].children()[0].effect(), Some(&8));
    }

    #[test]
    fn wrapping_preserves_result_value() {
        let spec = named("n", effect(1).map(|()| "kept"));
        assert_eq!(*spec.value(), "kept");
    }

    #[test]
    fn wrapping_an_empty_spec_still_adds_one_node() {
        let spec: Spec<i32> = named("empty", Spec::empty());
        assert_eq!(spec.nodes().len(), 1);
        assert!(spec.nodes()[0].children().is_empty());
    }
}
