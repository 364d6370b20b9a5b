// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Mock host implementation for testing.
//!
//! `MockHost` never touches real memory. It hands out addresses from a
//! counter, tracks which pages are mapped and with what protection, records
//! every call, and can be told to fail upcoming calls.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lona_base::{Errno, Protection, Vaddr, align};

use super::MemoryHost;

/// First address handed out. Page aligned but deliberately not aligned to
/// anything larger, so aligned reservations always have a prefix to trim.
const DEFAULT_BASE: usize = 0x1000_1000;

/// A call received by the mock host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCall {
    /// `map(hint, len, protection)`.
    Map {
        hint: Vaddr,
        len: usize,
        protection: Protection,
    },
    /// `unmap(base, len)`, successful or not.
    Unmap { base: Vaddr, len: usize },
    /// `protect(base, len, protection)`.
    Protect {
        base: Vaddr,
        len: usize,
        protection: Protection,
    },
    /// `discard(base, len)`.
    Discard { base: Vaddr, len: usize },
}

#[derive(Debug)]
struct MockState {
    next_base: usize,
    pages: BTreeMap<usize, Protection>,
    calls: Vec<HostCall>,
    fail_map: Option<Errno>,
    failing_unmaps: usize,
    fail_protect: Option<Errno>,
}

/// An in-memory host with a simulated page table.
#[derive(Clone, Debug)]
pub struct MockHost {
    page_size: usize,
    granularity: usize,
    state: Arc<Mutex<MockState>>,
}

impl MockHost {
    /// Create a mock host with the given page size (also the granularity).
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        Self {
            page_size,
            granularity: page_size,
            state: Arc::new(Mutex::new(MockState {
                next_base: DEFAULT_BASE,
                pages: BTreeMap::new(),
                calls: Vec::new(),
                fail_map: None,
                failing_unmaps: 0,
                fail_protect: None,
            })),
        }
    }

    /// Use a coarser allocation granularity than the page size.
    #[must_use]
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        assert!(
            granularity.is_power_of_two() && granularity >= self.page_size,
            "granularity must be a power-of-two multiple of the page size"
        );
        self.granularity = granularity;
        self.lock().next_base = align::round_up(DEFAULT_BASE, granularity) + granularity;
        self
    }

    /// Hand out addresses starting at `base`.
    #[must_use]
    pub fn with_base(self, base: usize) -> Self {
        assert!(
            align::is_aligned(base, self.granularity),
            "base must be granularity aligned"
        );
        self.lock().next_base = base;
        self
    }

    /// Fail the next `map` call with `errno`.
    pub fn fail_next_map(&self, errno: Errno) {
        self.lock().fail_map = Some(errno);
    }

    /// Fail the next `count` `unmap` calls with `EINVAL`.
    pub fn fail_next_unmaps(&self, count: usize) {
        self.lock().failing_unmaps = count;
    }

    /// Fail the next `protect` call with `errno`.
    pub fn fail_next_protect(&self, errno: Errno) {
        self.lock().fail_protect = Some(errno);
    }

    /// All calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of pages currently mapped.
    #[must_use]
    pub fn mapped_pages(&self) -> usize {
        self.lock().pages.len()
    }

    /// Protection of the page containing `addr`, if it is mapped.
    #[must_use]
    pub fn protection_at(&self, addr: Vaddr) -> Option<Protection> {
        let page = align::round_down(addr.as_usize(), self.page_size);
        self.lock().pages.get(&page).copied()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn page_range(&self, base: Vaddr, len: usize) -> impl Iterator<Item = usize> {
        (base.as_usize()..base.as_usize() + len).step_by(self.page_size)
    }

    fn check_range(&self, base: Vaddr, len: usize, state: &MockState) -> Result<(), Errno> {
        if !align::is_aligned(base.as_usize(), self.page_size) {
            return Err(Errno::new(libc::EINVAL));
        }
        let all_mapped = self
            .page_range(base, len)
            .all(|page| state.pages.contains_key(&page));
        if all_mapped {
            Ok(())
        } else {
            Err(Errno::new(libc::ENOMEM))
        }
    }
}

impl MemoryHost for MockHost {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn allocation_granularity(&self) -> usize {
        self.granularity
    }

    fn map(&self, hint: Vaddr, len: usize, protection: Protection) -> Result<Vaddr, Errno> {
        let mut state = self.lock();
        state.calls.push(HostCall::Map {
            hint,
            len,
            protection,
        });
        if let Some(errno) = state.fail_map.take() {
            return Err(errno);
        }
        if len == 0 || !align::is_aligned(len, self.granularity) {
            return Err(Errno::new(libc::EINVAL));
        }

        let base = state.next_base;
        // Leave a one-granule hole so neighbouring mappings never merge.
        state.next_base = base + len + self.granularity;
        for page in self.page_range(Vaddr::new(base), len) {
            state.pages.insert(page, protection);
        }
        Ok(Vaddr::new(base))
    }

    unsafe fn unmap(&self, base: Vaddr, len: usize) -> Result<(), Errno> {
        let mut state = self.lock();
        state.calls.push(HostCall::Unmap { base, len });
        if state.failing_unmaps > 0 {
            state.failing_unmaps -= 1;
            return Err(Errno::new(libc::EINVAL));
        }
        if len == 0 || !align::is_aligned(base.as_usize(), self.page_size) {
            return Err(Errno::new(libc::EINVAL));
        }
        // Like munmap, unmapping pages that are not mapped is not an error.
        for page in self.page_range(base, len) {
            state.pages.remove(&page);
        }
        Ok(())
    }

    unsafe fn protect(
        &self,
        base: Vaddr,
        len: usize,
        protection: Protection,
    ) -> Result<(), Errno> {
        let mut state = self.lock();
        state.calls.push(HostCall::Protect {
            base,
            len,
            protection,
        });
        if let Some(errno) = state.fail_protect.take() {
            return Err(errno);
        }
        self.check_range(base, len, &state)?;
        for page in self.page_range(base, len) {
            state.pages.insert(page, protection);
        }
        Ok(())
    }

    unsafe fn discard(&self, base: Vaddr, len: usize) -> Result<(), Errno> {
        let mut state = self.lock();
        state.calls.push(HostCall::Discard { base, len });
        self.check_range(base, len, &state)
    }
}
