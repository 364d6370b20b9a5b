// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Randomized placement hints for anonymous mappings.
//!
//! Passing a random, granularity-aligned hint to the mapping call spreads
//! runtime regions over the address space instead of packing them where
//! the kernel would put them by default. The kernel is free to ignore the
//! hint; it is never combined with `MAP_FIXED`.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use lona_base::{Vaddr, align};


/// Bits of a hint on 64-bit targets (below the 47-bit user half, leaving
/// room for the kernel to place large requests).
#[cfg(target_pointer_width = "64")]
const HINT_MASK: usize = 0x3FFF_FFFF_F000;

/// Bits of a hint on 32-bit targets.
#[cfg(target_pointer_width = "32")]
const HINT_MASK: usize = 0x3FFF_F000;

/// Offset added to 32-bit hints, keeping them above the program image.
#[cfg(target_pointer_width = "32")]
const HINT_BIAS: usize = 0x2000_0000;

#[cfg(target_pointer_width = "64")]
const HINT_BIAS: usize = 0;

/// Fallback state; xorshift must never run from zero.
const NONZERO_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Lock-free xorshift64* generator for placement hints.
#[derive(Debug)]
pub struct HintGenerator {
    state: AtomicU64,
}

impl HintGenerator {
    /// Create a generator with a fixed seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        let seed = if seed == 0 { NONZERO_SEED } else { seed };
        Self {
            state: AtomicU64::new(seed),
        }
    }

    /// Create a generator seeded from the clock, the process id and the
    /// stack location.
    #[must_use]
    pub fn from_entropy() -> Self {
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64);
        let marker = 0u8;
        let stack = Vaddr::from_ptr(&raw const marker).as_usize() as u64;
        let pid = u64::from(std::process::id());
        Self::with_seed(clock ^ stack.rotate_left(17) ^ (pid << 32))
    }

    /// Next 64 random bits.
    pub fn next_u64(&self) -> u64 {
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| Some(step(x)));
        // The closure never returns None, so both arms carry the old state.
        let old = match previous {
            Ok(x) | Err(x) => x,
        };
        step(old).wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Next placement hint, aligned to `granularity`.
    ///
    /// `granularity` must be a power of two.
    pub fn next_hint(&self, granularity: usize) -> Vaddr {
        let raw = (self.next_u64() as usize) & HINT_MASK;
        Vaddr::new(align::round_down(raw, granularity) + HINT_BIAS)
    }
}

const fn step(mut x: u64) -> u64 {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    x
}

/// Process-wide hint generator.
pub fn global() -> &'static HintGenerator {
    static GLOBAL: OnceLock<HintGenerator> = OnceLock::new();
    GLOBAL.get_or_init(HintGenerator::from_entropy)
}

/// Random placement hint from the process-wide generator.
pub fn random_hint(granularity: usize) -> Vaddr {
    global().next_hint(granularity)
}
