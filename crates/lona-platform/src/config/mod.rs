// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Platform layer configuration.
//!
//! Host capabilities are fixed per target and resolved at compile time.
//! `PlatformConfig` lets the embedding runtime override them, mostly so
//! that both protection behaviours can be exercised on one machine.


/// What the target host can do with memory it has already mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host can change page protection after a span was mapped.
    pub supports_protection_change: bool,
    /// Committed pages only become resident when first touched.
    pub has_lazy_commits: bool,
}

impl HostCapabilities {
    /// Capabilities of the compilation target.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            supports_protection_change: cfg!(unix),
            has_lazy_commits: true,
        }
    }

    /// A host that grants protection once, at mapping time.
    #[must_use]
    pub const fn fixed_protection() -> Self {
        Self {
            supports_protection_change: false,
            has_lazy_commits: true,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Source of the protection-change capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProtectionSupport {
    /// Use [`HostCapabilities::detect`].
    #[default]
    Detect,
    /// Treat the host as able to change protection.
    Supported,
    /// Treat the host as unable to change protection.
    Unsupported,
}

/// Configuration for a [`RegionManager`](crate::RegionManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Whether commit/uncommit/guard may change page protection.
    pub protection: ProtectionSupport,
    /// On hosts without protection changes, report commit/uncommit/guard
    /// as successful no-ops instead of failing with `NotSupported`.
    pub no_op_fallback: bool,
    /// Pass randomized placement hints to the mapping call.
    pub randomize_placement: bool,
}

impl PlatformConfig {
    /// Default configuration: detected capabilities, no-op fallback enabled,
    /// randomized placement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            protection: ProtectionSupport::Detect,
            no_op_fallback: true,
            randomize_placement: true,
        }
    }

    /// Override the protection-change capability.
    #[must_use]
    pub const fn with_protection(mut self, protection: ProtectionSupport) -> Self {
        self.protection = protection;
        self
    }

    /// Enable or disable the no-op fallback.
    #[must_use]
    pub const fn with_no_op_fallback(mut self, enabled: bool) -> Self {
        self.no_op_fallback = enabled;
        self
    }

    /// Enable or disable randomized placement hints.
    #[must_use]
    pub const fn with_randomized_placement(mut self, enabled: bool) -> Self {
        self.randomize_placement = enabled;
        self
    }

    /// Effective host capabilities after applying overrides.
    #[must_use]
    pub const fn capabilities(&self) -> HostCapabilities {
        let detected = HostCapabilities::detect();
        match self.protection {
            ProtectionSupport::Detect => detected,
            ProtectionSupport::Supported => HostCapabilities {
                supports_protection_change: true,
                ..detected
            },
            ProtectionSupport::Unsupported => HostCapabilities {
                supports_protection_change: false,
                ..detected
            },
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::new()
    }
}
