// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for semaphore error normalization.

use super::{SemCall, classify, normalize};
use lona_base::{Errno, ErrorKind};

const ALL_CALLS: [SemCall; 4] = [
    SemCall::Create,
    SemCall::Initialize,
    SemCall::Destroy,
    SemCall::Operate,
];

fn kind(call: SemCall, code: i32) -> Option<ErrorKind> {
    classify(call, Errno::new(code))
}

#[test]
fn eacces_depends_on_call() {
    assert_eq!(kind(SemCall::Create, libc::EACCES), Some(ErrorKind::PermissionDenied));
    assert_eq!(kind(SemCall::Initialize, libc::EACCES), Some(ErrorKind::PermissionDenied));
    assert_eq!(kind(SemCall::Destroy, libc::EACCES), Some(ErrorKind::InvalidArgument));
    assert_eq!(kind(SemCall::Operate, libc::EACCES), Some(ErrorKind::InvalidArgument));
}

#[test]
fn eperm_rows() {
    assert_eq!(kind(SemCall::Create, libc::EPERM), None);
    assert_eq!(kind(SemCall::Initialize, libc::EPERM), Some(ErrorKind::PermissionDenied));
    assert_eq!(kind(SemCall::Destroy, libc::EPERM), Some(ErrorKind::InvalidArgument));
    assert_eq!(kind(SemCall::Operate, libc::EPERM), None);
}

#[test]
fn erange_rows() {
    assert_eq!(kind(SemCall::Create, libc::ERANGE), None);
    assert_eq!(kind(SemCall::Initialize, libc::ERANGE), Some(ErrorKind::InvalidArgument));
    assert_eq!(kind(SemCall::Destroy, libc::ERANGE), Some(ErrorKind::ResourceExhausted));
    assert_eq!(kind(SemCall::Operate, libc::ERANGE), Some(ErrorKind::ResourceExhausted));
}

#[test]
fn create_specific_rows() {
    assert_eq!(kind(SemCall::Create, libc::ENOENT), Some(ErrorKind::InvalidArgument));
    assert_eq!(kind(SemCall::Create, libc::ENOSPC), Some(ErrorKind::ResourceExhausted));
    assert_eq!(kind(SemCall::Destroy, libc::ENOENT), None);
}

#[test]
fn operate_specific_rows() {
    for code in [libc::EFAULT, libc::EFBIG, libc::EIDRM] {
        assert_eq!(kind(SemCall::Operate, code), Some(ErrorKind::InvalidArgument));
        assert_eq!(kind(SemCall::Create, code), None);
    }
    assert_eq!(kind(SemCall::Operate, libc::EAGAIN), Some(ErrorKind::TimedOut));
    assert_eq!(kind(SemCall::Operate, libc::ENOSPC), Some(ErrorKind::ResourceExhausted));
}

#[test]
fn shared_rows_apply_to_every_call() {
    for call in ALL_CALLS {
        assert_eq!(kind(call, libc::EINVAL), Some(ErrorKind::InvalidArgument));
        assert_eq!(kind(call, libc::EINTR), Some(ErrorKind::Interrupted));
        assert_eq!(kind(call, libc::ENOSYS), Some(ErrorKind::NotSupported));
    }
}

#[test]
fn unknown_codes_fail_closed() {
    for call in ALL_CALLS {
        assert_eq!(kind(call, libc::EBADF), None);
        assert_eq!(normalize(call, Errno::new(libc::EBADF)), ErrorKind::InvalidArgument);
        assert_eq!(normalize(call, Errno::new(0)), ErrorKind::InvalidArgument);
    }
    assert_eq!(
        normalize(SemCall::Create, Errno::new(libc::EAGAIN)),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn call_names() {
    assert_eq!(SemCall::Create.to_string(), "create");
    assert_eq!(SemCall::Operate.to_string(), "operate");
}
