// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Virtual memory regions.
//!
//! A [`RegionManager`] turns page-granular anonymous mappings into
//! [`Region`]s that satisfy a caller-chosen power-of-two alignment. Aligned
//! reservations over-reserve by the alignment and give the misaligned head
//! and the unused tail back to the host.
//!
//! # Region lifecycle
//!
//! ```text
//!   reserve / reserve_aligned            release (exactly once)
//! ────────────────────────────▶ Reserved ─────────────────────▶ Released
//!                                │    ▲
//!                        commit  │    │  uncommit
//!                                ▼    │
//!                           (committed flag)
//! ```
//!
//! # Trimming policy
//!
//! When giving back the head or tail of an aligned reservation fails, the
//! reservation is not failed. The region still covers exactly the aligned
//! range the caller asked for; the untrimmed slack stays attached to it and
//! is returned to the host together with the region. The price is a
//! slightly larger footprint in the address space until release.

use core::fmt;

use lona_base::{Errno, ErrorKind, Vaddr};

#[cfg(test)]
mod protection_test;
#[cfg(test)]
mod raw_test;

mod handle;
mod manager;
mod protection;
mod raw;
mod registry;

pub use handle::{Region, RegionState};
pub use manager::RegionManager;
pub use protection::ProtectionMode;
pub use registry::RootRegionRegistry;

/// Errors from region operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionError {
    /// Requested size is zero or overflows once rounded.
    InvalidSize { size: usize },
    /// The host refused to map the span.
    AllocationFailed { size: usize, errno: Errno },
    /// Alignment is not a power of two, or an address is not page aligned.
    AlignmentViolation { alignment: usize },
    /// Subrange lies outside the region.
    OutOfRange { addr: Vaddr, len: usize },
    /// The host refused a protection change or discard.
    ProtectionFailed { addr: Vaddr, len: usize, errno: Errno },
    /// The host refused to unmap the span.
    ReleaseFailed { addr: Vaddr, len: usize, errno: Errno },
    /// Protection changes are unavailable and no fallback is configured.
    NotSupported,
    /// The region was already released.
    DoubleRelease,
    /// The region was used after release.
    UseAfterRelease,
}

impl RegionError {
    /// Normalized category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AllocationFailed { errno, .. }
            | Self::ProtectionFailed { errno, .. }
            | Self::ReleaseFailed { errno, .. } => memory_errno_kind(*errno),
            Self::NotSupported => ErrorKind::NotSupported,
            Self::InvalidSize { .. }
            | Self::AlignmentViolation { .. }
            | Self::OutOfRange { .. }
            | Self::DoubleRelease
            | Self::UseAfterRelease => ErrorKind::InvalidArgument,
        }
    }
}

/// Map an error from the mapping calls onto the taxonomy.
const fn memory_errno_kind(errno: Errno) -> ErrorKind {
    match errno.raw() {
        libc::ENOMEM | libc::EAGAIN | libc::ENFILE => ErrorKind::ResourceExhausted,
        libc::EACCES | libc::EPERM => ErrorKind::PermissionDenied,
        libc::ENOTSUP | libc::ENODEV => ErrorKind::NotSupported,
        libc::EINTR => ErrorKind::Interrupted,
        _ => ErrorKind::InvalidArgument,
    }
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { size } => write!(f, "invalid region size {size}"),
            Self::AllocationFailed { size, errno } => {
                write!(f, "failed to reserve {size} bytes: {errno}")
            }
            Self::AlignmentViolation { alignment } => {
                write!(f, "alignment {alignment:#x} violated")
            }
            Self::OutOfRange { addr, len } => {
                write!(f, "range {addr}+{len:#x} is outside the region")
            }
            Self::ProtectionFailed { addr, len, errno } => {
                write!(f, "failed to change protection of {addr}+{len:#x}: {errno}")
            }
            Self::ReleaseFailed { addr, len, errno } => {
                write!(f, "failed to release {addr}+{len:#x}: {errno}")
            }
            Self::NotSupported => write!(f, "protection changes not supported by host"),
            Self::DoubleRelease => write!(f, "region released twice"),
            Self::UseAfterRelease => write!(f, "region used after release"),
        }
    }
}

impl core::error::Error for RegionError {}
