// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Power-of-two rounding helpers.
//!
//! Every multiple `m` passed to these functions must be a non-zero power of
//! two. The unchecked variants assert this in debug builds only; the
//! `checked_` variant reports it as `None`.


/// Round `x` down to a multiple of `m`.
///
/// `round_down(x, m) <= x < round_down(x, m) + m`.
#[inline]
#[must_use]
pub const fn round_down(x: usize, m: usize) -> usize {
    debug_assert!(m.is_power_of_two(), "rounding multiple must be a power of two");
    x & !(m.wrapping_sub(1))
}

/// Round `x` up to a multiple of `m`.
///
/// Defined as `round_down(x + m - 1, m)`. Wraps on overflow; use
/// [`checked_round_up`] when `x` comes from a caller.
#[inline]
#[must_use]
pub const fn round_up(x: usize, m: usize) -> usize {
    round_down(x.wrapping_add(m.wrapping_sub(1)), m)
}

/// Round `x` up to a multiple of `m`.
///
/// Returns `None` if `m` is not a power of two or the result overflows.
#[inline]
#[must_use]
pub const fn checked_round_up(x: usize, m: usize) -> Option<usize> {
    if !m.is_power_of_two() {
        return None;
    }
    match x.checked_add(m - 1) {
        Some(sum) => Some(round_down(sum, m)),
        None => None,
    }
}

/// Check whether `x` is a multiple of `m`.
#[inline]
#[must_use]
pub const fn is_aligned(x: usize, m: usize) -> bool {
    debug_assert!(m.is_power_of_two(), "alignment must be a power of two");
    x & (m.wrapping_sub(1)) == 0
}
