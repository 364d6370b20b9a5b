// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Commit strategy selected per host.
//!
//! Some hosts grant protection once, when a span is mapped, and cannot
//! change it afterwards. On those hosts commit, uncommit and guard either
//! succeed without doing anything (the span already has the access it
//! needs) or fail with `NotSupported`, depending on configuration.

use lona_base::{Protection, Vaddr};

use super::RegionError;
use crate::config::HostCapabilities;
use crate::host::MemoryHost;

/// How protection requests are carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtectionMode {
    /// Apply protection changes through the host.
    Change,
    /// Report success without touching the host.
    AssumeGranted,
    /// Fail every protection request with `NotSupported`.
    Unsupported,
}

impl ProtectionMode {
    /// Pick the mode for a host.
    #[must_use]
    pub const fn resolve(capabilities: HostCapabilities, no_op_fallback: bool) -> Self {
        if capabilities.supports_protection_change {
            Self::Change
        } else if no_op_fallback {
            Self::AssumeGranted
        } else {
            Self::Unsupported
        }
    }

    /// Set the protection of `[base, base + len)`.
    ///
    /// # Safety
    ///
    /// The range must lie inside a live region owned by the caller.
    pub(super) unsafe fn protect<H: MemoryHost>(
        self,
        host: &H,
        base: Vaddr,
        len: usize,
        protection: Protection,
    ) -> Result<(), RegionError> {
        match self {
            // SAFETY: forwarded from the caller.
            Self::Change => unsafe { host.protect(base, len, protection) }.map_err(|errno| {
                RegionError::ProtectionFailed {
                    addr: base,
                    len,
                    errno,
                }
            }),
            Self::AssumeGranted => Ok(()),
            Self::Unsupported => Err(RegionError::NotSupported),
        }
    }

    /// Remove access to `[base, base + len)` and drop its contents.
    ///
    /// # Safety
    ///
    /// The range must lie inside a live region owned by the caller, and
    /// nothing may reference its contents.
    pub(super) unsafe fn decommit<H: MemoryHost>(
        self,
        host: &H,
        base: Vaddr,
        len: usize,
    ) -> Result<(), RegionError> {
        // SAFETY: forwarded from the caller.
        unsafe { self.protect(host, base, len, Protection::NONE) }?;
        if self == Self::Change {
            // SAFETY: forwarded from the caller.
            unsafe { host.discard(base, len) }.map_err(|errno| RegionError::ProtectionFailed {
                addr: base,
                len,
                errno,
            })?;
        }
        Ok(())
    }
}
