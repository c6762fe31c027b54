//! Flatten engine: schedule tree → [`ScheduleTable`].
//!
//! The walk carries an inherited [`Context`] down the tree.  At every node:
//!
//! 1. The node's action is resolved against the inherited context
//!    (`SetPhase` / `SetPeriod` / `SetName` override, everything else keeps
//!    it).  The innermost declaration always wins for its own subtree.
//! 2. Children see only the *resolved* values.  The action itself is never
//!    re-applied below the node that declares it.
//! 3. If any immediate children are effect leaves, one entry is emitted for
//!    this node holding all of them in child order.
//! 4. Children are walked in order; their entries follow this node's entry.
//!
//! The result is the tree's pre-order restricted to nodes that directly own
//! at least one effect.
//!
//! # Known behaviour kept as-is
//!
//! | Topic | Behaviour |
//! |---|---|
//! | Phase qualifiers | `Absolute`/`Relative` and `Min`/`Exact` are ignored; every `SetPhase` overwrites |
//! | Name collisions | Not detected here; see [`ScheduleTable::check_unique_names`] |
//! | `disable` / `condition` | Plain `NoAction` nodes, effects are still emitted |
//! | Data flow between effects | Not analysed |
//!
//! # Example
//! ```rust
//! use tt_schedc::builder::{at_period, effect, named};
//! use tt_schedc::flatten::{flatten, Context};
//!
//! let root = named("Foo", at_period(20, effect("e1"))).into_root();
//! let table = flatten(&Context::default(), &root).unwrap();
//! assert_eq!(table.entries()[0].name, "Foo_0_20");
//! ```

pub mod error;

pub use error::FlattenError;

use tracing::{debug, info};

use crate::node::{Action, Node};
use crate::table::{ScheduleEntry, ScheduleTable};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Scope name in force before any `named` combinator.
pub const ROOT_NAME: &str = "root";

/// Period in force before any `at_period` combinator.
pub const DEFAULT_PERIOD: u32 = 1;

// ── Context ───────────────────────────────────────────────────────────────────

/// Inherited scheduling state.
///
/// Threaded by value: a child receives its own copy, so sibling subtrees never
/// observe each other's overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Innermost scope name.
    pub name: String,
    /// Every scope name from the outermost inwards.  The root name is not
    /// part of the path.
    pub path: Vec<String>,
    pub phase: u32,
    pub period: u32,
}

impl Context {
    /// Root context with a custom name, phase and period.
    pub fn new(name: impl Into<String>, phase: u32, period: u32) -> Self {
        Self {
            name: name.into(),
            path: Vec::new(),
            phase,
            period,
        }
    }

    /// Resolve `action` on top of this context.
    pub fn apply<E>(mut self, action: &Action<E>) -> Self {
        match action {
            Action::SetPhase { value, .. } => self.phase = *value,
            Action::SetPeriod(value) => self.period = *value,
            Action::SetName(name) => {
                self.name = name.clone();
                self.path.push(name.clone());
            }
            Action::Effect(_) | Action::NoAction => {}
        }
        self
    }

    /// Disambiguated entry name: `"{name}_{phase}_{period}"`.
    pub fn entry_name(&self) -> String {
        format!("{}_{}_{}", self.name, self.phase, self.period)
    }

    fn scope(&self) -> String {
        format!("/{}", self.path.join("/"))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(ROOT_NAME, 0, DEFAULT_PERIOD)
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Flatten `node` under the inherited `context`.
///
/// # Errors
/// Returns a [`FlattenError`] naming the first ill-formed node in pre-order.
/// No partial table is ever returned.
pub fn flatten<E: Clone>(
    context: &Context,
    node: &Node<E>,
) -> Result<ScheduleTable<E>, FlattenError> {
    let mut entries = Vec::new();
    let mut trail = Vec::new();

    walk(context.clone(), node, &mut trail, &mut entries)?;

    let table = ScheduleTable::new(entries);
    info!(
        nodes = node.node_count(),
        entries = table.len(),
        effects = table.effect_count(),
        "Flattened schedule tree"
    );
    Ok(table)
}

/// Flatten `node` from the default root context
/// (`name = "root"`, `phase = 0`, `period = 1`).
pub fn flatten_root<E: Clone>(node: &Node<E>) -> Result<ScheduleTable<E>, FlattenError> {
    flatten(&Context::default(), node)
}

// ── Tree walk ─────────────────────────────────────────────────────────────────

fn walk<E: Clone>(
    inherited: Context,
    node: &Node<E>,
    trail: &mut Vec<usize>,
    out: &mut Vec<ScheduleEntry<E>>,
) -> Result<(), FlattenError> {
    check_action(node.action(), &inherited, trail)?;
    let resolved = inherited.apply(node.action());

    let effects: Vec<E> = node
        .children()
        .iter()
        .filter_map(Node::effect)
        .cloned()
        .collect();

    if !effects.is_empty() {
        let entry = ScheduleEntry {
            name: resolved.entry_name(),
            path: resolved.path.clone(),
            phase: resolved.phase,
            period: resolved.period,
            effects,
        };
        debug!(
            name = %entry.name,
            phase = entry.phase,
            period = entry.period,
            effects = entry.effects.len(),
            "emit entry"
        );
        out.push(entry);
    }

    for (index, child) in node.children().iter().enumerate() {
        trail.push(index);
        walk(resolved.clone(), child, trail, out)?;
        trail.pop();
    }

    Ok(())
}

/// Reject actions the builder accepts but the table cannot represent.
fn check_action<E>(
    action: &Action<E>,
    inherited: &Context,
    trail: &[usize],
) -> Result<(), FlattenError> {
    match action {
        Action::SetPeriod(0) => Err(FlattenError::InvalidPeriod {
            scope: inherited.scope(),
            position: format_position(trail),
        }),
        Action::SetName(name) if name.is_empty() => Err(FlattenError::EmptyName {
            scope: inherited.scope(),
            position: format_position(trail),
        }),
        _ => Ok(()),
    }
}

fn format_position(trail: &[usize]) -> String {
    let mut position = String::from(ROOT_NAME);
    for index in trail {
        position.push('.');
        position.push_str(&index.to_string());
    }
    position
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{at_period, at_phase, condition, disable, effect, group, named, Spec};
    use crate::node::{PhaseContext, PhaseKind};

    fn run(spec: Spec<&'static str>) -> ScheduleTable<&'static str> {
        flatten_root(&spec.into_root()).unwrap()
    }

    fn paths(table: &ScheduleTable<&'static str>) -> Vec<Vec<String>> {
        table.iter().map(|e| e.path.clone()).collect()
    }

    // ── Context ───────────────────────────────────────────────────────────────

    #[test]
    fn default_context_values() {
        let ctx = Context::default();
        assert_eq!(ctx.name, "root");
        assert!(ctx.path.is_empty());
        assert_eq!(ctx.phase, 0);
        assert_eq!(ctx.period, 1);
        assert_eq!(ctx.entry_name(), "root_0_1");
    }

    #[test]
    fn apply_set_name_extends_path() {
        let ctx = Context::default()
            .apply(&Action::<()>::SetName("Foo".into()))
            .apply(&Action::<()>::SetName("Bar".into()));
        assert_eq!(ctx.name, "Bar");
        assert_eq!(ctx.path, vec!["Foo", "Bar"]);
    }

    #[test]
    fn apply_ignores_phase_qualifiers() {
        let absolute = Context::default().apply(&Action::<()>::SetPhase {
            context: PhaseContext::Absolute,
            kind: PhaseKind::Exact,
            value: 9,
        });
        let relative = Context::default().apply(&Action::<()>::SetPhase {
            context: PhaseContext::Relative,
            kind: PhaseKind::Min,
            value: 9,
        });
        assert_eq!(absolute, relative);
        assert_eq!(absolute.phase, 9);
    }

    #[test]
    fn apply_effect_and_no_action_keep_context() {
        let ctx = Context::new("sys", 3, 7);
        assert_eq!(ctx.clone().apply(&Action::Effect("e")), ctx);
        assert_eq!(ctx.clone().apply(&Action::<&str>::NoAction), ctx);
    }

    // ── Reference scenario ────────────────────────────────────────────────────

    #[test]
    fn foo_bar_scenario() {
        let table = run(named(
            "Foo",
            at_period(20, effect("e1")).then(named("Bar", at_phase(1, effect("e2")))),
        ));

        assert_eq!(table.len(), 2);

        let first = &table.entries()[0];
        assert_eq!(first.name, "Foo_0_20");
        assert_eq!(first.path, vec!["Foo"]);
        assert_eq!(first.phase, 0);
        assert_eq!(first.period, 20);
        assert_eq!(first.effects, vec!["e1"]);

        let second = &table.entries()[1];
        assert_eq!(second.name, "Bar_1_1");
        assert_eq!(second.path, vec!["Foo", "Bar"]);
        assert_eq!(second.phase, 1);
        assert_eq!(second.period, 1);
        assert_eq!(second.effects, vec!["e2"]);
    }

    // ── Properties ────────────────────────────────────────────────────────────

    #[test]
    fn flatten_is_deterministic() {
        let root = named(
            "A",
            at_phase(2, effect("x").then(effect("y")))
                .then(named("B", at_period(4, effect("z"))))
                .then(named("B", effect("w"))),
        )
        .into_root();
        let first = flatten_root(&root).unwrap();
        for _ in 0..10 {
            assert_eq!(flatten_root(&root).unwrap(), first);
        }
    }

    #[test]
    fn entries_follow_tree_pre_order() {
        let table = run(named(
            "A",
            named("B", effect("b").then(named("C", effect("c"))))
                .then(named("D", effect("d")))
                .then(effect("a")),
        ));
        assert_eq!(
            paths(&table),
            vec![
                vec!["A".to_string()],
                vec!["A".to_string(), "B".to_string()],
                vec!["A".to_string(), "B".to_string(), "C".to_string()],
                vec!["A".to_string(), "D".to_string()],
            ]
        );
        // A's own effect is emitted before its nested scopes.
        assert_eq!(table.entries()[0].effects, vec!["a"]);
    }

    #[test]
    fn inner_period_overrides_outer_only_in_its_subtree() {
        let table = run(named(
            "S",
            at_period(
                20,
                effect("A")
                    .then(at_period(30, effect("B")))
                    .then(effect("C")),
            ),
        ));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].effects, vec!["A", "C"]);
        assert_eq!(table.entries()[0].period, 20);
        assert_eq!(table.entries()[1].effects, vec!["B"]);
        assert_eq!(table.entries()[1].period, 30);
    }

    #[test]
    fn sibling_phases_do_not_interfere() {
        let table = run(named(
            "P",
            at_phase(10, named("X", effect("x")))
                .then(at_phase(20, named("Y", effect("y"))))
                .then(named("Z", effect("z"))),
        ));
        let phases: Vec<(&str, u32)> = table
            .iter()
            .map(|e| (e.effects[0], e.phase))
            .collect();
        assert_eq!(phases, vec![("x", 10), ("y", 20), ("z", 0)]);
    }

    #[test]
    fn consecutive_effects_batch_into_one_entry() {
        let table = run(group(effect("1").then(effect("2")).then(effect("3"))));
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].effects, vec!["1", "2", "3"]);
    }

    #[test]
    fn top_level_effects_use_root_scope() {
        let table = run(effect("1").then(effect("2")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].name, "root_0_1");
        assert!(table.entries()[0].path.is_empty());
    }

    #[test]
    fn structural_nodes_without_effects_emit_nothing() {
        let table = run(named("A", named("B", Spec::empty()))
            .then(at_period(5, group(Spec::empty())))
            .then(at_phase(3, Spec::empty())));
        assert!(table.is_empty());
    }

    #[test]
    fn nested_names_accumulate_path() {
        let table = run(named("Foo", named("Bar", effect("h"))));
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].path, vec!["Foo", "Bar"]);
        assert_eq!(table.entries()[0].name, "Bar_0_1");
    }

    #[test]
    fn effects_split_around_nested_scopes_stay_in_one_entry() {
        let table = run(group(
            effect("1")
                .then(at_phase(3, effect("2")))
                .then(effect("3")),
        ));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].effects, vec!["1", "3"]);
        assert_eq!(table.entries()[0].phase, 0);
        assert_eq!(table.entries()[1].effects, vec!["2"]);
        assert_eq!(table.entries()[1].phase, 3);
    }

    #[test]
    fn phase_persists_into_later_named_scopes() {
        // A phase set on an enclosing scope is inherited by every named scope
        // below it, however deep.
        let table = run(at_phase(
            4,
            named("A", effect("a")).then(named("B", named("C", effect("c")))),
        ));
        assert!(table.iter().all(|e| e.phase == 4));
    }

    #[test]
    fn disable_and_condition_do_not_gate_effects() {
        let table = run(disable(named("Off", effect("a")))
            .then(condition("never", named("Guarded", effect("b")))));
        assert_eq!(table.len(), 2);
        assert_eq!(table.effect_count(), 2);
    }

    #[test]
    fn duplicate_names_are_not_rejected() {
        let table = run(named("X", effect("a")).then(named("X", effect("b"))));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].name, table.entries()[1].name);
        assert!(table.check_unique_names().is_err());
    }

    #[test]
    fn custom_root_context_is_inherited() {
        let root = effect("a").then(named("N", effect("b"))).into_root();
        let table = flatten(&Context::new("sys", 5, 10), &root).unwrap();
        assert_eq!(table.entries()[0].name, "sys_5_10");
        assert_eq!(table.entries()[1].name, "N_5_10");
        assert_eq!(table.entries()[1].path, vec!["N"]);
    }

    #[test]
    fn exact_and_absolute_phase_nodes_behave_like_relative_min() {
        let absolute = Node::parent(
            Action::SetPhase {
                context: PhaseContext::Absolute,
                kind: PhaseKind::Exact,
                value: 6,
            },
            vec![Node::leaf("e")],
        );
        let table = flatten_root(&absolute).unwrap();
        assert_eq!(table.entries()[0].phase, 6);
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn zero_period_aborts_with_position() {
        let root = named("A", effect("ok").then(at_period(0, effect("bad")))).into_root();
        let err = flatten_root(&root).unwrap_err();
        assert_eq!(
            err,
            FlattenError::InvalidPeriod {
                scope: "/A".into(),
                position: "root.0.1".into(),
            }
        );
        assert!(err.to_string().contains("root.0.1"));
    }

    #[test]
    fn empty_name_aborts() {
        let root = at_period(5, named("", effect("e"))).into_root();
        let err = flatten_root(&root).unwrap_err();
        assert!(matches!(err, FlattenError::EmptyName { .. }));
        assert_eq!(err.position(), "root.0.0");
    }

    #[test]
    fn error_anywhere_yields_no_table() {
        // Valid entries precede the bad node in pre-order; none leak out.
        let root = named("A", effect("a"))
            .then(named("B", at_period(0, Spec::empty())))
            .into_root();
        assert!(flatten_root(&root).is_err());
    }
}
