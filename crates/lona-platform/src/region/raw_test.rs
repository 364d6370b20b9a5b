// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for raw spans.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::RegionError;
use super::raw::RawSpan;
use crate::host::{HostCall, MockHost};
use lona_base::{Errno, Protection, Vaddr};

const PAGE: usize = 4096;

#[test]
fn reserve_maps_requested_size() {
    let host = MockHost::new(PAGE);
    let span = RawSpan::reserve(&host, Vaddr::null(), 2 * PAGE, Protection::RWX).unwrap();

    assert_eq!(span.size(), 2 * PAGE);
    assert_eq!(span.end(), span.base().add(2 * PAGE));
    assert_eq!(host.protection_at(span.base()), Some(Protection::RWX));
    span.release(&host).unwrap();
    assert_eq!(host.mapped_pages(), 0);
}

#[test]
fn reserve_failure_is_typed() {
    let host = MockHost::new(PAGE);
    host.fail_next_map(Errno::new(libc::ENOMEM));

    let err = RawSpan::reserve(&host, Vaddr::null(), PAGE, Protection::RW).unwrap_err();
    assert_eq!(
        err,
        RegionError::AllocationFailed {
            size: PAGE,
            errno: Errno::new(libc::ENOMEM),
        }
    );
    assert_eq!(host.calls().len(), 1);
}

#[test]
fn prefix_and_suffix_trimming() {
    let host = MockHost::new(PAGE);
    let mut span = RawSpan::reserve(&host, Vaddr::null(), 5 * PAGE, Protection::RW).unwrap();
    let start = span.base();

    span.release_prefix(&host, PAGE).unwrap();
    span.release_suffix(&host, 2 * PAGE).unwrap();

    assert_eq!(span.base(), start.add(PAGE));
    assert_eq!(span.size(), 2 * PAGE);
    assert_eq!(host.mapped_pages(), 2);
    assert!(host.calls().contains(&HostCall::Unmap {
        base: start.add(3 * PAGE),
        len: 2 * PAGE,
    }));
    span.release(&host).unwrap();
    assert_eq!(host.mapped_pages(), 0);
}

#[test]
fn failed_trim_leaves_span_unchanged() {
    let host = MockHost::new(PAGE);
    let mut span = RawSpan::reserve(&host, Vaddr::null(), 3 * PAGE, Protection::RW).unwrap();
    let start = span.base();

    host.fail_next_unmaps(2);
    assert!(span.release_prefix(&host, PAGE).is_err());
    assert!(span.release_suffix(&host, PAGE).is_err());

    assert_eq!(span.base(), start);
    assert_eq!(span.size(), 3 * PAGE);
    assert_eq!(host.mapped_pages(), 3);
    span.release(&host).unwrap();
}

#[test]
fn release_failure_reports_range() {
    let host = MockHost::new(PAGE);
    let span = RawSpan::reserve(&host, Vaddr::null(), PAGE, Protection::RW).unwrap();
    let base = span.base();

    host.fail_next_unmaps(1);
    let err = span.release(&host).unwrap_err();
    assert_eq!(
        err,
        RegionError::ReleaseFailed {
            addr: base,
            len: PAGE,
            errno: Errno::new(libc::EINVAL),
        }
    );
}
