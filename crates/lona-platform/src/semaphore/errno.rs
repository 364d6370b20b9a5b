// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Normalization of System V semaphore error codes.
//!
//! The same code means different things depending on the call that
//! produced it (`EACCES` from `semget` is a permission problem, from
//! `semop` it means the set is gone). Each row names the call it applies
//! to, or `None` for rows shared by every call.

use core::fmt;

use lona_base::{Errno, ErrorKind};

/// Kernel call behind a semaphore operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SemCall {
    /// `semget`: allocating the set.
    Create,
    /// The first `semop`, setting the initial count.
    Initialize,
    /// `semctl(IPC_RMID)`: removing the set.
    Destroy,
    /// `semop`/`semtimedop` from wait and post.
    Operate,
}

impl fmt::Display for SemCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Initialize => "initialize",
            Self::Destroy => "destroy",
            Self::Operate => "operate",
        };
        f.write_str(name)
    }
}

const ROWS: &[(Option<SemCall>, i32, ErrorKind)] = &[
    (Some(SemCall::Create), libc::EACCES, ErrorKind::PermissionDenied),
    (Some(SemCall::Initialize), libc::EACCES, ErrorKind::PermissionDenied),
    (Some(SemCall::Destroy), libc::EACCES, ErrorKind::InvalidArgument),
    (Some(SemCall::Operate), libc::EACCES, ErrorKind::InvalidArgument),
    (Some(SemCall::Initialize), libc::EPERM, ErrorKind::PermissionDenied),
    (Some(SemCall::Destroy), libc::EPERM, ErrorKind::InvalidArgument),
    (None, libc::EINVAL, ErrorKind::InvalidArgument),
    (Some(SemCall::Create), libc::ENOENT, ErrorKind::InvalidArgument),
    (Some(SemCall::Create), libc::ENOSPC, ErrorKind::ResourceExhausted),
    (Some(SemCall::Operate), libc::ENOSPC, ErrorKind::ResourceExhausted),
    (Some(SemCall::Initialize), libc::ERANGE, ErrorKind::InvalidArgument),
    (Some(SemCall::Destroy), libc::ERANGE, ErrorKind::ResourceExhausted),
    (Some(SemCall::Operate), libc::ERANGE, ErrorKind::ResourceExhausted),
    (Some(SemCall::Operate), libc::EFAULT, ErrorKind::InvalidArgument),
    (Some(SemCall::Operate), libc::EFBIG, ErrorKind::InvalidArgument),
    (Some(SemCall::Operate), libc::EIDRM, ErrorKind::InvalidArgument),
    (None, libc::EINTR, ErrorKind::Interrupted),
    (Some(SemCall::Operate), libc::EAGAIN, ErrorKind::TimedOut),
    (None, libc::ENOSYS, ErrorKind::NotSupported),
];

/// Look up the category of `errno` returned by `call`.
///
/// Returns `None` for codes the table does not list for that call.
#[must_use]
pub fn classify(call: SemCall, errno: Errno) -> Option<ErrorKind> {
    ROWS.iter()
        .find(|(row_call, code, _)| *code == errno.raw() && row_call.is_none_or(|c| c == call))
        .map(|&(_, _, kind)| kind)
}

/// Category of `errno` returned by `call`; unknown codes are
/// `InvalidArgument`.
#[must_use]
pub fn normalize(call: SemCall, errno: Errno) -> ErrorKind {
    classify(call, errno).unwrap_or(ErrorKind::InvalidArgument)
}
