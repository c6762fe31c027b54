/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Tick arithmetic: GCD and overflow-checked LCM.
//!
//! Entry periods are `u32` ticks; the hyperperiod is accumulated in `u64` so
//! realistic tables never come near overflow, but the multiplication is still
//! checked.

use super::TimingError;

/// Iterative Euclidean GCD.  `gcd(0, n) == n`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Checked LCM of two tick counts.
///
/// Divides before multiplying (`a / gcd(a, b) * b`).  Either operand being
/// `0` yields `Ok(0)`.
pub fn lcm(a: u64, b: u64) -> Result<u64, TimingError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(TimingError::Overflow { a, b })
}

/// LCM of every period yielded by `periods`.
///
/// Returns `Ok(1)` for an empty iterator (the identity for LCM) and stops at
/// the first overflow.
pub fn lcm_all(periods: impl IntoIterator<Item = u32>) -> Result<u64, TimingError> {
    periods
        .into_iter()
        .try_fold(1_u64, |acc, p| lcm(acc, u64::from(p)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
