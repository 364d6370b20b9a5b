// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Access protection for mapped spans.

use core::fmt;


/// Access rights requested for a span of pages.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    /// Allow reads.
    pub read: bool,
    /// Allow writes.
    pub write: bool,
    /// Allow execution.
    pub execute: bool,
}

impl Protection {
    /// No access at all (guard pages, uncommitted memory).
    pub const NONE: Self = Self {
        read: false,
        write: false,
        execute: false,
    };

    /// Read-write permissions.
    pub const RW: Self = Self {
        read: true,
        write: true,
        execute: false,
    };

    /// Read-write-execute permissions (JIT code spaces).
    pub const RWX: Self = Self {
        read: true,
        write: true,
        execute: true,
    };

    /// Read-write, plus execute when `executable` is set.
    #[inline]
    #[must_use]
    pub const fn read_write(executable: bool) -> Self {
        if executable { Self::RWX } else { Self::RW }
    }

    /// Returns true if any access is allowed.
    #[inline]
    #[must_use]
    pub const fn is_accessible(self) -> bool {
        self.read || self.write || self.execute
    }
}

impl fmt::Debug for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = if self.read { 'r' } else { '-' };
        let w = if self.write { 'w' } else { '-' };
        let x = if self.execute { 'x' } else { '-' };
        write!(f, "Protection({r}{w}{x})")
    }
}
