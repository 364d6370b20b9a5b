// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Raw page-granular reservations.
//!
//! A `RawSpan` owns one live anonymous mapping. It cannot be copied, and
//! giving the whole span back consumes it, so a span is unmapped at most
//! once. Only the region manager creates and trims spans.

use lona_base::{Protection, Vaddr};
use tracing::debug;

use super::RegionError;
use crate::host::MemoryHost;

/// An owned, mapped span of address space.
#[must_use = "dropping a RawSpan leaks the mapping"]
#[derive(Debug, PartialEq, Eq)]
pub(super) struct RawSpan {
    base: Vaddr,
    size: usize,
}

impl RawSpan {
    /// Map `size` bytes (already a granularity multiple) near `hint`.
    ///
    /// Does not retry on failure.
    pub(super) fn reserve<H: MemoryHost>(
        host: &H,
        hint: Vaddr,
        size: usize,
        protection: Protection,
    ) -> Result<Self, RegionError> {
        let base = host
            .map(hint, size, protection)
            .map_err(|errno| RegionError::AllocationFailed { size, errno })?;
        debug!(%base, size, ?protection, "reserved raw span");
        Ok(Self { base, size })
    }

    pub(super) const fn base(&self) -> Vaddr {
        self.base
    }

    pub(super) const fn size(&self) -> usize {
        self.size
    }

    pub(super) const fn end(&self) -> Vaddr {
        self.base.add(self.size)
    }

    /// Give the first `len` bytes back to the host.
    ///
    /// On failure the span is left unchanged and still owns those bytes.
    pub(super) fn release_prefix<H: MemoryHost>(
        &mut self,
        host: &H,
        len: usize,
    ) -> Result<(), RegionError> {
        debug_assert!(len < self.size, "prefix must leave part of the span");
        // SAFETY: the prefix is part of this span and nothing points into it.
        unsafe { host.unmap(self.base, len) }.map_err(|errno| RegionError::ReleaseFailed {
            addr: self.base,
            len,
            errno,
        })?;
        self.base = self.base.add(len);
        self.size -= len;
        Ok(())
    }

    /// Give the last `len` bytes back to the host.
    ///
    /// On failure the span is left unchanged and still owns those bytes.
    pub(super) fn release_suffix<H: MemoryHost>(
        &mut self,
        host: &H,
        len: usize,
    ) -> Result<(), RegionError> {
        debug_assert!(len < self.size, "suffix must leave part of the span");
        let addr = self.end().sub(len);
        // SAFETY: the suffix is part of this span and nothing points into it.
        unsafe { host.unmap(addr, len) }
            .map_err(|errno| RegionError::ReleaseFailed { addr, len, errno })?;
        self.size -= len;
        Ok(())
    }

    /// Give the whole span back to the host.
    pub(super) fn release<H: MemoryHost>(self, host: &H) -> Result<(), RegionError> {
        let Self { base, size } = self;
        // SAFETY: the span is owned and consumed here, so it is unmapped once.
        unsafe { host.unmap(base, size) }.map_err(|errno| RegionError::ReleaseFailed {
            addr: base,
            len: size,
            errno,
        })?;
        debug!(%base, size, "released raw span");
        Ok(())
    }
}
