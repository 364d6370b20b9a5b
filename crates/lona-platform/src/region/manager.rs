// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Region manager: reservation and alignment.

use core::fmt;
use std::sync::Arc;

use lona_base::{Protection, Vaddr, align};
use tracing::{debug, warn};

use super::handle::Region;
use super::protection::ProtectionMode;
use super::raw::RawSpan;
use super::registry::RootRegionRegistry;
use super::RegionError;
use crate::config::{HostCapabilities, PlatformConfig};
use crate::hint;
use crate::host::MemoryHost;
#[cfg(unix)]
use crate::host::UnixHost;

/// Hands out page-granular, optionally aligned regions of address space.
///
/// The manager is a cheap handle: cloning it shares the host and the
/// registry. It keeps no record of the regions it created and performs no
/// locking; each [`Region`] is owned by exactly one caller.
#[derive(Clone)]
pub struct RegionManager<H: MemoryHost> {
    host: H,
    mode: ProtectionMode,
    capabilities: HostCapabilities,
    randomize_placement: bool,
    registry: Option<Arc<dyn RootRegionRegistry>>,
}

#[cfg(unix)]
impl RegionManager<UnixHost> {
    /// Manager for the real host with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(UnixHost::new(), PlatformConfig::default())
    }
}

#[cfg(unix)]
impl Default for RegionManager<UnixHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MemoryHost> RegionManager<H> {
    /// Manager for `host` configured by `config`.
    #[must_use]
    pub fn with_config(host: H, config: PlatformConfig) -> Self {
        let capabilities = config.capabilities();
        let mode = ProtectionMode::resolve(capabilities, config.no_op_fallback);
        debug!(?mode, ?capabilities, "region manager configured");
        Self {
            host,
            mode,
            capabilities,
            randomize_placement: config.randomize_placement,
            registry: None,
        }
    }

    /// Report every reservation and release to `registry`.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn RootRegionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The host this manager maps memory from.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Strategy used by commit, uncommit and guard.
    #[must_use]
    pub const fn protection_mode(&self) -> ProtectionMode {
        self.mode
    }

    /// Size of one commit page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.host.page_size()
    }

    /// Minimum size and alignment of a reservation.
    #[must_use]
    pub fn granularity(&self) -> usize {
        self.host.allocation_granularity()
    }

    /// Whether committed memory only becomes resident when touched.
    #[must_use]
    pub const fn has_lazy_commits(&self) -> bool {
        self.capabilities.has_lazy_commits
    }

    /// Reserve at least `size` bytes, rounded up to the granularity.
    ///
    /// The region is mapped read-write, and executable when `executable`
    /// is set.
    ///
    /// # Errors
    ///
    /// `InvalidSize` for a zero or overflowing size, `AllocationFailed` if
    /// the host refuses the mapping.
    pub fn reserve(&self, size: usize, executable: bool) -> Result<Region<H>, RegionError> {
        let rounded = self.rounded_size(size)?;
        let span = RawSpan::reserve(
            &self.host,
            self.next_hint(),
            rounded,
            Protection::read_write(executable),
        )?;
        Ok(self.adopt(span.base(), rounded, span))
    }

    /// Reserve at least `size` bytes at an address that is a multiple of
    /// `alignment`.
    ///
    /// Maps `round_up(size + alignment, granularity)` bytes, then unmaps the
    /// part before the first aligned address and the part after the
    /// rounded size. If either unmap fails the region is still returned;
    /// see the module documentation for the trimming policy.
    ///
    /// # Errors
    ///
    /// `AlignmentViolation` if `alignment` is not a power of two,
    /// `InvalidSize` for a zero or overflowing size, `AllocationFailed` if
    /// the host refuses the mapping.
    pub fn reserve_aligned(
        &self,
        size: usize,
        alignment: usize,
        executable: bool,
    ) -> Result<Region<H>, RegionError> {
        if !alignment.is_power_of_two() {
            return Err(RegionError::AlignmentViolation { alignment });
        }
        let granularity = self.granularity();
        let aligned_size = self.rounded_size(size)?;
        let request = size
            .checked_add(alignment)
            .and_then(|padded| align::checked_round_up(padded, granularity))
            .ok_or(RegionError::InvalidSize { size })?;

        let mut span = RawSpan::reserve(
            &self.host,
            self.next_hint(),
            request,
            Protection::read_write(executable),
        )?;

        let Some(aligned_base) = span.base().align_up(alignment) else {
            // Only possible at the very top of the address space.
            span.release(&self.host)?;
            return Err(RegionError::AlignmentViolation { alignment });
        };

        let prefix = aligned_base.diff(span.base());
        if prefix != 0 {
            if let Err(err) = span.release_prefix(&self.host, prefix) {
                warn!(%err, "keeping unaligned head of reservation");
            }
        }

        let suffix = span.end().diff(aligned_base.add(aligned_size));
        if suffix != 0 {
            if let Err(err) = span.release_suffix(&self.host, suffix) {
                warn!(%err, "keeping unused tail of reservation");
            }
        }

        debug_assert!(span.base() <= aligned_base);
        debug_assert!(aligned_base.add(aligned_size) <= span.end());
        debug!(
            %aligned_base,
            aligned_size,
            alignment,
            request,
            slack = span.size() - aligned_size,
            "reserved aligned region"
        );
        Ok(self.adopt(aligned_base, aligned_size, span))
    }

    fn rounded_size(&self, size: usize) -> Result<usize, RegionError> {
        if size == 0 {
            return Err(RegionError::InvalidSize { size });
        }
        align::checked_round_up(size, self.granularity()).ok_or(RegionError::InvalidSize { size })
    }

    fn next_hint(&self) -> Vaddr {
        if self.randomize_placement {
            hint::random_hint(self.granularity())
        } else {
            Vaddr::null()
        }
    }

    fn adopt(&self, base: Vaddr, size: usize, span: RawSpan) -> Region<H> {
        if let Some(registry) = &self.registry {
            registry.register(base, size);
        }
        Region::new(base, size, span, self.clone())
    }

    pub(super) fn unregister(&self, base: Vaddr, size: usize) {
        if let Some(registry) = &self.registry {
            registry.unregister(base, size);
        }
    }
}

impl<H: MemoryHost + fmt::Debug> fmt::Debug for RegionManager<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionManager")
            .field("host", &self.host)
            .field("mode", &self.mode)
            .field("capabilities", &self.capabilities)
            .field("randomize_placement", &self.randomize_placement)
            .field("registry", &self.registry.is_some())
            .finish()
    }
}
