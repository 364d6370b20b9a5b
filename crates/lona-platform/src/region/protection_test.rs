// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the commit strategies, each exercised on its own.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{ProtectionMode, RegionError};
use crate::config::HostCapabilities;
use crate::host::{HostCall, MemoryHost, MockHost};
use lona_base::{Protection, Vaddr};

const PAGE: usize = 4096;

fn mapped(host: &MockHost) -> Vaddr {
    host.map(Vaddr::null(), 2 * PAGE, Protection::RW).unwrap()
}

#[test]
fn resolve_prefers_real_changes() {
    let capable = HostCapabilities {
        supports_protection_change: true,
        has_lazy_commits: true,
    };
    assert_eq!(ProtectionMode::resolve(capable, true), ProtectionMode::Change);
    assert_eq!(ProtectionMode::resolve(capable, false), ProtectionMode::Change);

    let fixed = HostCapabilities::fixed_protection();
    assert_eq!(
        ProtectionMode::resolve(fixed, true),
        ProtectionMode::AssumeGranted
    );
    assert_eq!(
        ProtectionMode::resolve(fixed, false),
        ProtectionMode::Unsupported
    );
}

#[test]
fn change_mode_protects_through_host() {
    let host = MockHost::new(PAGE);
    let base = mapped(&host);
    host.clear_calls();

    // SAFETY: the mock never touches real memory.
    unsafe {
        ProtectionMode::Change
            .protect(&host, base, PAGE, Protection::NONE)
            .unwrap();
    }
    assert_eq!(host.protection_at(base), Some(Protection::NONE));
    assert_eq!(host.protection_at(base.add(PAGE)), Some(Protection::RW));
    assert_eq!(host.calls().len(), 1);
}

#[test]
fn change_mode_decommit_discards() {
    let host = MockHost::new(PAGE);
    let base = mapped(&host);
    host.clear_calls();

    // SAFETY: the mock never touches real memory.
    unsafe { ProtectionMode::Change.decommit(&host, base, 2 * PAGE).unwrap() };
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Protect {
                base,
                len: 2 * PAGE,
                protection: Protection::NONE,
            },
            HostCall::Discard {
                base,
                len: 2 * PAGE,
            },
        ]
    );
}

#[test]
fn change_mode_reports_host_failure() {
    let host = MockHost::new(PAGE);
    let base = mapped(&host);
    host.fail_next_protect(lona_base::Errno::new(libc::EACCES));

    // SAFETY: the mock never touches real memory.
    let err = unsafe { ProtectionMode::Change.protect(&host, base, PAGE, Protection::RWX) }
        .unwrap_err();
    assert_eq!(err.kind(), lona_base::ErrorKind::PermissionDenied);
}

#[test]
fn assume_granted_is_silent_success() {
    let host = MockHost::new(PAGE);
    let base = mapped(&host);
    host.clear_calls();

    // SAFETY: the mock never touches real memory.
    unsafe {
        ProtectionMode::AssumeGranted
            .protect(&host, base, PAGE, Protection::NONE)
            .unwrap();
        ProtectionMode::AssumeGranted
            .decommit(&host, base, PAGE)
            .unwrap();
    }
    assert!(host.calls().is_empty());
    assert_eq!(host.protection_at(base), Some(Protection::RW));
}

#[test]
fn unsupported_mode_fails() {
    let host = MockHost::new(PAGE);
    let base = mapped(&host);
    host.clear_calls();

    // SAFETY: the mock never touches real memory.
    let err = unsafe { ProtectionMode::Unsupported.decommit(&host, base, PAGE) }.unwrap_err();
    assert_eq!(err, RegionError::NotSupported);
    assert!(host.calls().is_empty());
}
