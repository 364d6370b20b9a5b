// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Host operating system abstraction.
//!
//! The region code talks to the kernel only through [`MemoryHost`]. The
//! real implementation maps memory with `libc`; the mock keeps an in-memory
//! page table so region logic can be tested deterministically, including
//! kernel failures that are hard to provoke on a live system.



#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(unix)]
mod unix;

#[cfg(any(test, feature = "mock"))]
pub use mock::{HostCall, MockHost};
#[cfg(unix)]
pub use unix::UnixHost;

use lona_base::{Errno, Protection, Vaddr};

/// Anonymous memory mapping primitives of the host.
///
/// Implementations must be cheap to clone: every region keeps a handle to
/// the host that granted it.
pub trait MemoryHost: Clone {
    /// Size of one commit page in bytes (a power of two).
    fn page_size(&self) -> usize;

    /// Minimum size and alignment of a single mapping request.
    fn allocation_granularity(&self) -> usize {
        self.page_size()
    }

    /// Map `len` bytes of anonymous private memory.
    ///
    /// `hint` is a placement suggestion; a null hint lets the kernel choose.
    /// `len` must be a multiple of [`allocation_granularity`](Self::allocation_granularity).
    ///
    /// # Errors
    ///
    /// Returns the raw OS error if the kernel refuses the mapping.
    fn map(&self, hint: Vaddr, len: usize, protection: Protection) -> Result<Vaddr, Errno>;

    /// Unmap `[base, base + len)`.
    ///
    /// # Safety
    ///
    /// The range must have been mapped through this host and must not be
    /// referenced afterwards.
    ///
    /// # Errors
    ///
    /// Returns the raw OS error if the kernel refuses.
    unsafe fn unmap(&self, base: Vaddr, len: usize) -> Result<(), Errno>;

    /// Change the protection of `[base, base + len)`.
    ///
    /// # Safety
    ///
    /// The range must be mapped through this host, and removing access must
    /// not invalidate live references into it.
    ///
    /// # Errors
    ///
    /// Returns the raw OS error if the kernel refuses.
    unsafe fn protect(&self, base: Vaddr, len: usize, protection: Protection)
    -> Result<(), Errno>;

    /// Give the physical pages behind `[base, base + len)` back to the host.
    /// The range stays mapped and reads back as zeroes.
    ///
    /// # Safety
    ///
    /// Same as [`protect`](Self::protect); the contents are lost.
    ///
    /// # Errors
    ///
    /// Returns the raw OS error if the kernel refuses.
    unsafe fn discard(&self, base: Vaddr, len: usize) -> Result<(), Errno>;
}

/// The calling thread's last OS error.
#[cfg(unix)]
pub(crate) fn last_errno() -> Errno {
    Errno::new(
        std::io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or(libc::EINVAL),
    )
}
