// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Owned regions.

use core::fmt;

use lona_base::{Protection, Vaddr, align};
use tracing::{trace, warn};

use super::RegionError;
use super::manager::RegionManager;
use super::raw::RawSpan;
use crate::host::MemoryHost;

/// Formal state of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionState {
    /// Mapped and owned by the caller.
    Reserved,
    /// Given back to the host. Terminal.
    Released,
}

/// A contiguous span of address space owned by one runtime component.
///
/// The region covers exactly `[address, address + size)`, where `size` is a
/// non-zero multiple of the allocation granularity. It may own a slightly
/// larger span behind the scenes when trimming an aligned reservation
/// failed; that slack is never exposed and is released with the region.
///
/// Releasing twice, or using the region after release, is a caller bug:
/// debug builds panic, release builds return `DoubleRelease` or
/// `UseAfterRelease` without calling into the host. Dropping a region that
/// is still reserved releases it.
pub struct Region<H: MemoryHost> {
    base: Vaddr,
    size: usize,
    reservation: Option<RawSpan>,
    committed: bool,
    owner: RegionManager<H>,
}

impl<H: MemoryHost> Region<H> {
    pub(super) fn new(
        base: Vaddr,
        size: usize,
        reservation: RawSpan,
        owner: RegionManager<H>,
    ) -> Self {
        Self {
            base,
            size,
            reservation: Some(reservation),
            committed: false,
            owner,
        }
    }

    /// Base address of the region.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> Vaddr {
        self.base
    }

    /// Size of the region in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// End address (exclusive).
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Vaddr {
        self.base.add(self.size)
    }

    /// Check if `addr` lies inside the region.
    #[inline]
    #[must_use]
    pub fn contains(&self, addr: Vaddr) -> bool {
        addr >= self.base && addr < self.end()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RegionState {
        if self.reservation.is_some() {
            RegionState::Reserved
        } else {
            RegionState::Released
        }
    }

    /// True iff the region has a non-null base and has not been released.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        !self.base.is_null() && self.reservation.is_some()
    }

    /// Whether the last commit/uncommit call on the region was a commit.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Bytes of address space the region holds on the host, including any
    /// untrimmed slack. Zero once released.
    #[must_use]
    pub fn reservation_size(&self) -> usize {
        self.reservation.as_ref().map_or(0, RawSpan::size)
    }

    /// Make `[addr, addr + len)` accessible (read-write, plus execute when
    /// `executable` is set).
    ///
    /// `addr` must be page aligned; `len` is rounded up to whole pages. On
    /// hosts that cannot change protection this is a no-op reporting
    /// success (the region was mapped with that access already), unless
    /// the manager was configured without that fallback.
    ///
    /// # Errors
    ///
    /// `OutOfRange`, `AlignmentViolation`, `NotSupported`,
    /// `ProtectionFailed`, or `UseAfterRelease`.
    pub fn commit(&mut self, addr: Vaddr, len: usize, executable: bool) -> Result<(), RegionError> {
        let len = self.check_subrange(addr, len)?;
        let protection = Protection::read_write(executable);
        trace!(%addr, len, ?protection, "commit");
        // SAFETY: the subrange is inside this live region.
        unsafe {
            self.owner
                .protection_mode()
                .protect(self.owner.host(), addr, len, protection)
        }?;
        self.committed = true;
        Ok(())
    }

    /// Make `[addr, addr + len)` inaccessible and let the host reclaim it.
    ///
    /// Callers must not rely on resident memory shrinking: on hosts
    /// without protection changes this does nothing.
    ///
    /// # Errors
    ///
    /// Same as [`commit`](Self::commit).
    pub fn uncommit(&mut self, addr: Vaddr, len: usize) -> Result<(), RegionError> {
        let len = self.check_subrange(addr, len)?;
        trace!(%addr, len, "uncommit");
        // SAFETY: the subrange is inside this live region, and the caller
        // gives up its contents by uncommitting.
        unsafe {
            self.owner
                .protection_mode()
                .decommit(self.owner.host(), addr, len)
        }?;
        self.committed = false;
        Ok(())
    }

    /// Turn the page at `addr` into a guard page with no access.
    ///
    /// # Errors
    ///
    /// Same as [`commit`](Self::commit).
    pub fn guard(&mut self, addr: Vaddr) -> Result<(), RegionError> {
        let page = self.owner.page_size();
        let len = self.check_subrange(addr, page)?;
        trace!(%addr, "guard page");
        // SAFETY: the page is inside this live region.
        unsafe {
            self.owner
                .protection_mode()
                .protect(self.owner.host(), addr, len, Protection::NONE)
        }
    }

    /// Give the region back to the host.
    ///
    /// The region is `Released` afterwards even if the host reports an
    /// error; the mapping is never unmapped twice.
    ///
    /// # Errors
    ///
    /// `ReleaseFailed` if the host refuses, `DoubleRelease` in release
    /// builds when called on a released region.
    ///
    /// # Panics
    ///
    /// In debug builds, when called on a released region.
    pub fn release(&mut self) -> Result<(), RegionError> {
        debug_assert!(
            self.reservation.is_some(),
            "region {} released twice",
            self.base
        );
        let Some(span) = self.reservation.take() else {
            return Err(RegionError::DoubleRelease);
        };
        self.committed = false;
        self.owner.unregister(self.base, self.size);
        span.release(self.owner.host())
    }

    /// Validate a subrange and return its page-rounded length.
    fn check_subrange(&self, addr: Vaddr, len: usize) -> Result<usize, RegionError> {
        debug_assert!(
            self.reservation.is_some(),
            "region {} used after release",
            self.base
        );
        if self.reservation.is_none() {
            return Err(RegionError::UseAfterRelease);
        }
        let page = self.owner.page_size();
        if addr.is_aligned(page) != Some(true) {
            return Err(RegionError::AlignmentViolation { alignment: page });
        }
        let rounded = align::checked_round_up(len, page)
            .ok_or(RegionError::OutOfRange { addr, len })?;
        let in_bounds = addr >= self.base
            && addr
                .checked_add(rounded)
                .is_some_and(|end| end <= self.end());
        if in_bounds {
            Ok(rounded)
        } else {
            Err(RegionError::OutOfRange { addr, len })
        }
    }
}

impl<H: MemoryHost> Drop for Region<H> {
    fn drop(&mut self) {
        if self.reservation.is_some() {
            if let Err(err) = self.release() {
                warn!(%err, base = %self.base, "failed to release dropped region");
            }
        }
    }
}

impl<H: MemoryHost> fmt::Debug for Region<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("base", &self.base)
            .field("size", &self.size)
            .field("state", &self.state())
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}
