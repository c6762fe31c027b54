/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Flat schedule table produced by the flatten engine.
//!
//! The table is the contract handed to the downstream code generator: an
//! ordered list of `{ name, path, phase, period, effects }` rows.  Order is
//! tree pre-order and is reproducible run to run; nothing here iterates a
//! hash-based collection.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ── ScheduleEntry ─────────────────────────────────────────────────────────────

/// One dispatchable unit: every effect in `effects` fires together at
/// `phase` within each `period`.
///
/// `effects` is never empty for entries produced by the flatten engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry<E> {
    /// Disambiguated name, `"{scope}_{phase}_{period}"`.
    pub name: String,

    /// Names of every enclosing `named` scope, outermost first.
    pub path: Vec<String>,

    /// Tick offset within the period.
    pub phase: u32,

    /// Ticks between successive dispatches.
    pub period: u32,

    /// Effect handles in tree order.
    pub effects: Vec<E>,
}

impl<E> ScheduleEntry<E> {
    /// Returns `true` if this entry is dispatched at `tick`.
    ///
    /// A phase larger than the period wraps around.  A zero period never
    /// fires (the flatten engine does not produce one).
    pub fn fires_at(&self, tick: u64) -> bool {
        let period = u64::from(self.period);
        period != 0 && tick % period == u64::from(self.phase) % period
    }

    /// Qualified path joined with `/`, or `""` at the root scope.
    pub fn qualified_path(&self) -> String {
        self.path.join("/")
    }
}

impl<E: fmt::Debug> fmt::Display for ScheduleEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  phase={} period={} path=/{} effects={:?}",
            self.name,
            self.phase,
            self.period,
            self.qualified_path(),
            self.effects
        )
    }
}

// ── NameCollision ─────────────────────────────────────────────────────────────

/// Two or more entries share the same disambiguated name.
///
/// Only produced by the optional [`ScheduleTable::check_unique_names`] pass;
/// flattening itself never rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schedule entry name '{name}' is used by {count} entries")]
pub struct NameCollision {
    pub name: String,
    pub count: usize,
}

// ── ScheduleTable ─────────────────────────────────────────────────────────────

/// Ordered sequence of [`ScheduleEntry`] rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScheduleTable<E> {
    entries: Vec<ScheduleEntry<E>>,
}

impl<E> ScheduleTable<E> {
    pub(crate) fn new(entries: Vec<ScheduleEntry<E>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry<E>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScheduleEntry<E>> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry<E>> {
        self.entries.iter()
    }

    /// Total number of effect handles across all entries.
    pub fn effect_count(&self) -> usize {
        self.entries.iter().map(|e| e.effects.len()).sum()
    }

    /// Entries dispatched at `tick`, in table order.
    pub fn entries_at(&self, tick: u64) -> impl Iterator<Item = &ScheduleEntry<E>> {
        self.entries.iter().filter(move |e| e.fires_at(tick))
    }

    /// Names used by more than one entry, with their counts, in order of
    /// first occurrence.
    pub fn duplicate_names(&self) -> Vec<(&str, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.name.as_str()).or_default() += 1;
        }

        let mut seen: Vec<(&str, usize)> = Vec::new();
        for entry in &self.entries {
            let name = entry.name.as_str();
            let count = counts[name];
            if count > 1 && !seen.iter().any(|(n, _)| *n == name) {
                seen.push((name, count));
            }
        }
        seen
    }

    /// Optional uniqueness pass over entry names.
    ///
    /// # Errors
    /// Returns the first [`NameCollision`] found, in table order.
    pub fn check_unique_names(&self) -> Result<(), NameCollision> {
        match self.duplicate_names().first() {
            Some(&(name, count)) => Err(NameCollision {
                name: name.to_string(),
                count,
            }),
            None => Ok(()),
        }
    }
}

impl<E> IntoIterator for ScheduleTable<E> {
    type Item = ScheduleEntry<E>;
    type IntoIter = std::vec::IntoIter<ScheduleEntry<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a ScheduleTable<E> {
    type Item = &'a ScheduleEntry<E>;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<E: fmt::Debug> fmt::Display for ScheduleTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
