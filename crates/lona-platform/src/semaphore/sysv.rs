// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Thin wrappers over the System V semaphore calls.
//!
//! Every set holds a single semaphore (member 0). Results carry the raw
//! `errno`; normalization happens in the caller.

use core::ffi::{c_int, c_short};
use std::time::Duration;

use lona_base::Errno;

use crate::host::last_errno;

/// Owner read/write only.
const SET_MODE: c_int = 0o600;

/// Allocate a private set with one semaphore, count zero.
pub(super) fn create_set() -> Result<c_int, Errno> {
    // SAFETY: semget has no memory-safety preconditions.
    let id = unsafe { libc::semget(libc::IPC_PRIVATE, 1, libc::IPC_CREAT | SET_MODE) };
    if id == -1 {
        return Err(last_errno());
    }
    #[cfg(test)]
    fault::record_created(id);
    Ok(id)
}

/// Remove the set. Threads blocked on it wake up with `EIDRM`.
pub(super) fn remove_set(id: c_int) -> Result<(), Errno> {
    // SAFETY: IPC_RMID takes no fourth argument.
    let rc = unsafe { libc::semctl(id, 0, libc::IPC_RMID) };
    if rc == -1 {
        Err(last_errno())
    } else {
        Ok(())
    }
}

/// Add `delta` to the count, blocking on a negative delta unless
/// `IPC_NOWAIT` is in `flags`.
pub(super) fn adjust(id: c_int, delta: c_short, flags: c_short) -> Result<(), Errno> {
    #[cfg(test)]
    if let Some(errno) = fault::take_adjust_failure() {
        return Err(errno);
    }
    let mut op = operation(delta, flags);
    // SAFETY: op is a valid sembuf and nsops matches.
    let rc = unsafe { libc::semop(id, &raw mut op, 1) };
    if rc == -1 {
        Err(last_errno())
    } else {
        Ok(())
    }
}

/// Decrement the count by one, waiting at most `timeout`.
///
/// Fails with `EAGAIN` when the time runs out. A zero timeout is a single
/// non-blocking attempt.
pub(super) fn decrement_within(id: c_int, timeout: Duration) -> Result<(), Errno> {
    if timeout.is_zero() {
        return adjust(id, -1, nowait());
    }
    timed_decrement(id, timeout)
}

#[cfg(all(target_os = "linux", any(target_arch = "x86_64", target_arch = "aarch64")))]
fn timed_decrement(id: c_int, timeout: Duration) -> Result<(), Errno> {
    let mut op = operation(-1, 0);
    // SAFETY: timespec is plain data; all-zero is a valid value.
    let mut ts: libc::timespec = unsafe { core::mem::zeroed() };
    ts.tv_sec = libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX);
    ts.tv_nsec = libc::c_long::from(timeout.subsec_nanos());
    // SAFETY: op and ts outlive the call and nsops matches.
    let rc = unsafe {
        libc::syscall(
            libc::SYS_semtimedop,
            libc::c_long::from(id),
            &raw mut op,
            1 as libc::c_long,
            &raw const ts,
        )
    };
    if rc == -1 {
        Err(last_errno())
    } else {
        Ok(())
    }
}

/// Poll with `IPC_NOWAIT` where the kernel has no timed operation.
#[cfg(not(all(target_os = "linux", any(target_arch = "x86_64", target_arch = "aarch64"))))]
fn timed_decrement(id: c_int, timeout: Duration) -> Result<(), Errno> {
    use std::time::Instant;

    const POLL_INTERVAL: Duration = Duration::from_millis(1);

    let start = Instant::now();
    loop {
        match adjust(id, -1, nowait()) {
            Err(errno) if errno.raw() == libc::EAGAIN => {
                let left = timeout.saturating_sub(start.elapsed());
                if left.is_zero() {
                    return Err(errno);
                }
                std::thread::sleep(left.min(POLL_INTERVAL));
            }
            result => return result,
        }
    }
}

const fn operation(delta: c_short, flags: c_short) -> libc::sembuf {
    libc::sembuf {
        sem_num: 0,
        sem_op: delta,
        sem_flg: flags,
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn nowait() -> c_short {
    libc::IPC_NOWAIT as c_short
}
