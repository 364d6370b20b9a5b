// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Virtual address type.
//!
//! The newtype keeps host addresses from being mixed up with sizes and
//! offsets, which are plain `usize` values throughout the platform layer.

use core::fmt;
use core::ops::{Add, Sub};

use crate::align;

/// A virtual memory address in the current process.
///
/// Used as the opaque base token of a region. Only the region manager turns
/// it back into a pointer; everyone else compares, prints and offsets it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Vaddr(usize);

impl Vaddr {
    /// Create a new virtual address.
    #[inline]
    #[must_use]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// Create a null (zero) virtual address.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Create an address from a raw pointer.
    #[inline]
    #[must_use]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    /// Check if this is a null address.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Get the raw address value.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Convert to a raw pointer (for use in unsafe code).
    #[inline]
    #[must_use]
    pub const fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    /// Convert to a raw mutable pointer (for use in unsafe code).
    #[inline]
    #[must_use]
    pub const fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }

    /// Add an offset to this address.
    #[inline]
    #[must_use]
    pub const fn add(self, offset: usize) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    /// Add an offset, returning `None` if the address space would wrap.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, offset: usize) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }

    /// Subtract an offset from this address.
    #[inline]
    #[must_use]
    pub const fn sub(self, offset: usize) -> Self {
        Self(self.0.wrapping_sub(offset))
    }

    /// Calculate the difference between two addresses.
    #[inline]
    #[must_use]
    pub const fn diff(self, other: Self) -> usize {
        self.0.wrapping_sub(other.0)
    }

    /// Align this address up to the given alignment.
    ///
    /// Returns `None` if alignment is zero or not a power of two, or if the
    /// result would not fit in the address space.
    #[inline]
    #[must_use]
    pub const fn align_up(self, alignment: usize) -> Option<Self> {
        match align::checked_round_up(self.0, alignment) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }

    /// Align this address down to the given alignment.
    ///
    /// Returns `None` if alignment is zero or not a power of two.
    #[inline]
    #[must_use]
    pub const fn align_down(self, alignment: usize) -> Option<Self> {
        if !alignment.is_power_of_two() {
            return None;
        }
        Some(Self(align::round_down(self.0, alignment)))
    }

    /// Check if this address is aligned to the given alignment.
    ///
    /// Returns `None` if alignment is zero or not a power of two.
    #[inline]
    #[must_use]
    pub const fn is_aligned(self, alignment: usize) -> Option<bool> {
        if !alignment.is_power_of_two() {
            return None;
        }
        Some(align::is_aligned(self.0, alignment))
    }
}

impl fmt::Debug for Vaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vaddr({:#x})", self.0)
    }
}

impl fmt::Display for Vaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<usize> for Vaddr {
    fn from(addr: usize) -> Self {
        Self(addr)
    }
}

impl Add<usize> for Vaddr {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        self.add(rhs)
    }
}

impl Sub<usize> for Vaddr {
    type Output = Self;

    fn sub(self, rhs: usize) -> Self::Output {
        self.sub(rhs)
    }
}
