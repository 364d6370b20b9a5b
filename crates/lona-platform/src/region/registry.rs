// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Hook for leak-tracking tools.

use lona_base::Vaddr;

/// Receives every region the manager hands out and takes back.
///
/// Leak checkers treat registered ranges as roots, so pointers stored in
/// runtime regions are not reported as leaks. Calls are side effects only;
/// they never influence the outcome of the region operation.
pub trait RootRegionRegistry: Send + Sync {
    /// A region `[base, base + size)` was reserved.
    fn register(&self, base: Vaddr, size: usize);

    /// A region `[base, base + size)` is about to be released.
    fn unregister(&self, base: Vaddr, size: usize);
}
