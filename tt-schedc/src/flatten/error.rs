/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for the flatten engine.
//!
//! Every variant names the offending node twice over:
//!
//! * `scope` — the qualified name path in force where the node sits
//!   (`/Foo/Bar`), which is what the author reads in their own source.
//! * `position` — the child-index trail from the root (`root.0.2`), which is
//!   unambiguous even when names collide.
//!
//! A flatten failure is local to one call and deterministic: the same tree
//! always fails the same way, so there is nothing to retry.

use thiserror::Error;

/// Top-level error returned by [`flatten`](super::flatten).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// `SetPeriod(0)`: a period must be at least one tick.
    #[error("SetPeriod(0) at {position} (scope '{scope}'): period must be at least 1 tick")]
    InvalidPeriod { scope: String, position: String },

    /// `SetName("")`: names feed the entry name and path and cannot be empty.
    #[error("SetName with an empty name at {position} (scope '{scope}')")]
    EmptyName { scope: String, position: String },
}

impl FlattenError {
    /// Child-index trail of the offending node.
    pub fn position(&self) -> &str {
        match self {
            FlattenError::InvalidPeriod { position, .. }
            | FlattenError::EmptyName { position, .. } => position,
        }
    }
}
