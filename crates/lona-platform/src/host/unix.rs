// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! `mmap`-backed host for Unix targets.

use core::ffi::c_int;
use std::sync::atomic::{AtomicUsize, Ordering};

use lona_base::{Errno, Protection, Vaddr};

use super::{MemoryHost, last_errno};

/// Page size assumed when `sysconf` cannot tell.
const FALLBACK_PAGE_SIZE: usize = 4096;

static PAGE_SIZE: AtomicUsize = AtomicUsize::new(0);

/// The real host: anonymous `mmap`, `munmap`, `mprotect` and `madvise`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnixHost;

impl UnixHost {
    /// Create the host handle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Query the page size once and cache it.
fn cached_page_size() -> usize {
    match PAGE_SIZE.load(Ordering::Relaxed) {
        0 => {
            // SAFETY: sysconf has no preconditions.
            let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
            let size = usize::try_from(raw)
                .ok()
                .filter(|size| size.is_power_of_two())
                .unwrap_or(FALLBACK_PAGE_SIZE);
            PAGE_SIZE.store(size, Ordering::Relaxed);
            size
        }
        size => size,
    }
}

const fn prot_bits(protection: Protection) -> c_int {
    let mut bits = libc::PROT_NONE;
    if protection.read {
        bits |= libc::PROT_READ;
    }
    if protection.write {
        bits |= libc::PROT_WRITE;
    }
    if protection.execute {
        bits |= libc::PROT_EXEC;
    }
    bits
}

fn check(ret: c_int) -> Result<(), Errno> {
    if ret == 0 { Ok(()) } else { Err(last_errno()) }
}

impl MemoryHost for UnixHost {
    fn page_size(&self) -> usize {
        cached_page_size()
    }

    fn map(&self, hint: Vaddr, len: usize, protection: Protection) -> Result<Vaddr, Errno> {
        // SAFETY: without MAP_FIXED the kernel never replaces existing
        // mappings; the hint is advisory only.
        let ptr = unsafe {
            libc::mmap(
                hint.as_mut_ptr(),
                len,
                prot_bits(protection),
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(last_errno());
        }
        Ok(Vaddr::from_ptr(ptr))
    }

    unsafe fn unmap(&self, base: Vaddr, len: usize) -> Result<(), Errno> {
        // SAFETY: caller guarantees the range was mapped by us.
        let ret = unsafe { libc::munmap(base.as_mut_ptr(), len) };
        check(ret)
    }

    unsafe fn protect(
        &self,
        base: Vaddr,
        len: usize,
        protection: Protection,
    ) -> Result<(), Errno> {
        // SAFETY: caller guarantees the range was mapped by us.
        let ret = unsafe { libc::mprotect(base.as_mut_ptr(), len, prot_bits(protection)) };
        check(ret)
    }

    unsafe fn discard(&self, base: Vaddr, len: usize) -> Result<(), Errno> {
        // SAFETY: caller guarantees the range was mapped by us.
        let ret = unsafe { libc::madvise(base.as_mut_ptr(), len, libc::MADV_DONTNEED) };
        check(ret)
    }
}
