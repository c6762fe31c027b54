/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! tt-schedc – time-triggered schedule tree compiler
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── node          – Action / Node tree model
//! ├── builder       – Spec builder value + combinators (named, at_phase, …)
//! ├── flatten/      – Context inheritance and the tree → table walk
//! ├── table         – ScheduleEntry / ScheduleTable output + name check
//! ├── timing/       – hyperperiod (checked LCM) and phase analysis
//! ├── document/     – YAML tree documents for the CLI
//! └── config/       – YAML compiler configuration
//! ```

pub mod builder;
pub mod config;
pub mod document;
pub mod flatten;
pub mod node;
pub mod table;
pub mod timing;

pub use builder::{at_period, at_phase, condition, disable, effect, group, named, Spec};
pub use flatten::{flatten, flatten_root, Context, FlattenError};
pub use node::{Action, Node, PhaseContext, PhaseKind};
pub use table::{NameCollision, ScheduleEntry, ScheduleTable};
