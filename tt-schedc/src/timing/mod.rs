//! Hyperperiod and phase analysis of a flattened [`ScheduleTable`].
//!
//! The hyperperiod is the LCM of every entry period: the smallest number of
//! ticks after which the whole table repeats.  A generator that unrolls the
//! table into a static dispatch array needs exactly one hyperperiod of it.
//!
//! Analysis is advisory.  Entries whose phase is not below their period are
//! reported (and logged with `warn!`) but still accepted, since
//! [`ScheduleEntry::fires_at`](crate::table::ScheduleEntry::fires_at) wraps
//! such phases.
//!
//! | Failure | Variant |
//! |---|---|
//! | Empty table | [`TimingError::NoEntries`] |
//! | LCM does not fit in `u64` | [`TimingError::Overflow`] |
//! | Hyperperiod above the configured limit | [`TimingError::TooLarge`] |

pub mod math;

use tracing::{debug, info, warn};

use crate::table::ScheduleTable;
use math::lcm_all;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default upper limit on the hyperperiod, in ticks.
pub const DEFAULT_HYPERPERIOD_LIMIT: u64 = 1_000_000;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during timing analysis.
#[derive(Debug, PartialEq, Eq)]
pub enum TimingError {
    /// The table has no entries, so there is no period to analyse.
    NoEntries,

    /// LCM calculation overflowed `u64`.
    Overflow { a: u64, b: u64 },

    /// The hyperperiod exceeded the configured limit.
    TooLarge { value: u64, limit: u64 },
}

impl std::fmt::Display for TimingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingError::NoEntries => write!(f, "schedule table has no entries"),
            TimingError::Overflow { a, b } => {
                write!(f, "LCM overflow computing lcm({a}, {b})")
            }
            TimingError::TooLarge { value, limit } => write!(
                f,
                "hyperperiod of {value} ticks exceeds limit of {limit} ticks"
            ),
        }
    }
}

impl std::error::Error for TimingError {}

// ── TableTiming ───────────────────────────────────────────────────────────────

/// Result of analysing one schedule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTiming {
    /// LCM of all entry periods, in ticks.
    pub hyperperiod: u64,

    /// Distinct entry periods, sorted ascending.
    pub unique_periods: Vec<u32>,

    /// Total number of entry dispatches within one hyperperiod.
    pub dispatches_per_hyperperiod: u64,

    /// Names of entries whose phase is not below their period, in table order.
    pub phase_overruns: Vec<String>,
}

// ── TimingAnalyzer ────────────────────────────────────────────────────────────

/// Computes [`TableTiming`] under a hyperperiod limit.
///
/// # Example
/// ```rust
/// use tt_schedc::builder::{at_period, effect};
/// use tt_schedc::flatten::flatten_root;
/// use tt_schedc::timing::TimingAnalyzer;
///
/// let root = at_period(4, effect("a")).then(at_period(6, effect("b"))).into_root();
/// let table = flatten_root(&root).unwrap();
/// let timing = TimingAnalyzer::new().analyze(&table).unwrap();
/// assert_eq!(timing.hyperperiod, 12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimingAnalyzer {
    limit: u64,
}

impl TimingAnalyzer {
    /// Analyzer with [`DEFAULT_HYPERPERIOD_LIMIT`].
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }

    /// Analyzer with a custom hyperperiod limit, in ticks.
    pub fn with_limit(limit: u64) -> Self {
        Self { limit }
    }

    /// Hyperperiod limit in ticks; larger hyperperiods are rejected.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Analyse `table`.
    ///
    /// # Errors
    /// * [`TimingError::NoEntries`] – the table is empty.
    /// * [`TimingError::Overflow`] – the LCM exceeded `u64`.
    /// * [`TimingError::TooLarge`] – the hyperperiod exceeds the limit.
    pub fn analyze<E>(&self, table: &ScheduleTable<E>) -> Result<TableTiming, TimingError> {
        if table.is_empty() {
            return Err(TimingError::NoEntries);
        }

        let unique_periods: Vec<u32> = {
            let mut v: Vec<u32> = table.iter().map(|e| e.period).collect();
            v.sort_unstable();
            v.dedup();
            v
        };

        let hyperperiod = lcm_all(unique_periods.iter().copied())?;

        if hyperperiod > self.limit {
            warn!(
                hyperperiod,
                limit = self.limit,
                "Hyperperiod exceeds configured limit"
            );
            return Err(TimingError::TooLarge {
                value: hyperperiod,
                limit: self.limit,
            });
        }

        // Flatten never emits period 0.
        let dispatches_per_hyperperiod: u64 = table
            .iter()
            .filter(|e| e.period != 0)
            .map(|e| hyperperiod / u64::from(e.period))
            .sum();

        let phase_overruns: Vec<String> = table
            .iter()
            .filter(|e| e.phase >= e.period)
            .map(|e| e.name.clone())
            .collect();

        for name in &phase_overruns {
            warn!(entry = %name, "Phase is not below period; it wraps at dispatch");
        }

        info!(
            entries = table.len(),
            unique_count = unique_periods.len(),
            hyperperiod,
            dispatches_per_hyperperiod,
            "Calculated hyperperiod"
        );
        for p in &unique_periods {
            debug!(period = p, "  unique period");
        }

        Ok(TableTiming {
            hyperperiod,
            unique_periods,
            dispatches_per_hyperperiod,
            phase_overruns,
        })
    }
}

impl Default for TimingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
