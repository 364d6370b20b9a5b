// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Unit tests for the semaphore handle.
//!
//! Cross-thread scenarios live in `tests/semaphore_test.rs`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::{Duration, Instant};

use super::sysv::fault;
use super::*;

#[test]
fn count_above_kernel_limit_is_rejected() {
    let err = Semaphore::create(Semaphore::MAX_COUNT + 1).unwrap_err();
    assert_eq!(err.call(), SemCall::Initialize);
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.errno(), Errno::new(libc::ERANGE));
}

#[test]
fn error_display_names_call_and_kind() {
    let err = SemaphoreError::from_errno(SemCall::Operate, Errno::new(libc::EIDRM));
    assert_eq!(
        err.to_string(),
        format!("semaphore operate failed: invalid argument (os error {})", libc::EIDRM)
    );
}

#[test]
fn create_and_destroy() {
    let semaphore = Semaphore::create(2).unwrap();
    assert_eq!(semaphore.initial_count(), 2);
    assert!(semaphore.id() >= 0);
    assert_eq!(fault::last_created(), Some(semaphore.id()));
    semaphore.destroy().unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn failed_initialization_removes_the_set() {
    fault::fail_next_adjust(Errno::new(libc::EACCES));
    let err = Semaphore::create(1).unwrap_err();
    assert_eq!(err.call(), SemCall::Initialize);
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(err.errno(), Errno::new(libc::EACCES));

    let id = fault::last_created().expect("semget ran before the failure");
    // SAFETY: GETVAL takes no fourth argument.
    let rc = unsafe { libc::semctl(id, 0, libc::GETVAL) };
    let errno = std::io::Error::last_os_error().raw_os_error();
    assert_eq!(rc, -1, "set {id} still exists");
    assert!(
        matches!(errno, Some(libc::EINVAL | libc::EIDRM)),
        "unexpected errno {errno:?}"
    );
}

#[test]
fn initial_count_allows_that_many_waits() {
    let semaphore = Semaphore::create(3).unwrap();
    for _ in 0..3 {
        assert_eq!(
            semaphore.timed_wait(Duration::ZERO).unwrap(),
            WaitOutcome::Acquired
        );
    }
    assert_eq!(
        semaphore.timed_wait(Duration::from_millis(10)).unwrap(),
        WaitOutcome::TimedOut
    );
}

#[test]
fn elapsed_deadline_does_not_block() {
    let semaphore = Semaphore::create(0).unwrap();
    let past = Instant::now();
    std::thread::sleep(Duration::from_millis(1));

    let start = Instant::now();
    assert_eq!(semaphore.wait_until(past).unwrap(), WaitOutcome::TimedOut);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn timeout_leaves_post_pending() {
    let semaphore = Semaphore::create(0).unwrap();
    assert_eq!(
        semaphore.timed_wait(Duration::from_millis(5)).unwrap(),
        WaitOutcome::TimedOut
    );
    semaphore.post().unwrap();
    assert_eq!(
        semaphore.timed_wait(Duration::ZERO).unwrap(),
        WaitOutcome::Acquired
    );
}

#[test]
fn post_then_wait() {
    let semaphore = Semaphore::create(0).unwrap();
    semaphore.post().unwrap();
    semaphore.post().unwrap();
    semaphore.wait().unwrap();
    semaphore.wait().unwrap();
    assert_eq!(
        semaphore.timed_wait(Duration::ZERO).unwrap(),
        WaitOutcome::TimedOut
    );
}

#[test]
fn huge_timeout_behaves_like_wait() {
    let semaphore = Semaphore::create(1).unwrap();
    assert_eq!(
        semaphore.timed_wait(Duration::MAX).unwrap(),
        WaitOutcome::Acquired
    );
}

#[test]
fn post_beyond_limit_is_exhaustion() {
    let semaphore = Semaphore::create(Semaphore::MAX_COUNT).unwrap();
    let err = semaphore.post().unwrap_err();
    assert_eq!(err.call(), SemCall::Operate);
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}
