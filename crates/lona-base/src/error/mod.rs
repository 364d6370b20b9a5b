// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Closed error taxonomy for kernel-facing operations.
//!
//! Raw OS codes differ between hosts and between calls on the same host.
//! The platform layer maps each one onto an [`ErrorKind`] and keeps the
//! raw [`Errno`] alongside for diagnostics.

use core::fmt;


/// Normalized failure category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller lacks the rights for the operation.
    PermissionDenied,
    /// An argument or handle was rejected. Also the category for codes the
    /// normalization tables do not know.
    InvalidArgument,
    /// A kernel limit was reached (memory, semaphore sets, counter range).
    ResourceExhausted,
    /// The host cannot perform the operation at all.
    NotSupported,
    /// A blocking call was interrupted by a signal. Consumed by the retry
    /// wrapper, never returned to callers.
    Interrupted,
    /// A bounded wait expired.
    TimedOut,
}

impl ErrorKind {
    /// Returns true if the operation should simply be issued again.
    #[inline]
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::ResourceExhausted => write!(f, "resource exhausted"),
            Self::NotSupported => write!(f, "operation not supported"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// A raw OS error code (`errno`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Errno(i32);

impl Errno {
    /// Wrap a raw error code.
    #[inline]
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Get the raw error code.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Errno({})", self.0)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os error {}", self.0)
    }
}

impl From<i32> for Errno {
    fn from(code: i32) -> Self {
        Self(code)
    }
}
