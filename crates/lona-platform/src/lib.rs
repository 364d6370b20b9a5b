// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Lona Platform Layer
//!
//! Memory and synchronization primitives the Lona runtime obtains from the
//! host operating system.
//!
//! This crate provides:
//! - Page-granular reservation of anonymous address space
//! - Aligned regions with commit, uncommit, guard pages and release
//! - A counting semaphore emulated on System V semaphore sets
//! - Normalization of kernel error codes into [`lona_base::ErrorKind`]
//!
//! Heap and arena allocators, GC space managers and worker pools sit on
//! top of this crate; it hands out whole pages and kernel handles only.
//!
//! # Example
//!
//! ```no_run
//! use lona_platform::{RegionManager, Semaphore};
//!
//! let manager = RegionManager::new();
//! let mut region = manager.reserve_aligned(3 * 4096, 8192, false)?;
//! region.commit(region.address(), region.size(), false)?;
//! region.release()?;
//!
//! let semaphore = Semaphore::create(1)?;
//! semaphore.wait()?;
//! semaphore.post()?;
//! semaphore.destroy()?;
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```

pub mod config;
pub mod hint;
pub mod host;
pub mod region;
#[cfg(unix)]
pub mod semaphore;

// Re-export commonly used types at crate root
pub use config::{HostCapabilities, PlatformConfig, ProtectionSupport};
#[cfg(any(test, feature = "mock"))]
pub use host::MockHost;
pub use host::MemoryHost;
#[cfg(unix)]
pub use host::UnixHost;
pub use lona_base::{Errno, ErrorKind, Protection, Vaddr};
pub use region::{
    ProtectionMode, Region, RegionError, RegionManager, RegionState, RootRegionRegistry,
};
#[cfg(unix)]
pub use semaphore::{SemCall, Semaphore, SemaphoreError, WaitOutcome};

