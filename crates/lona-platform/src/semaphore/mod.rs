// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Counting semaphores on System V semaphore sets.
//!
//! Hosts without a usable native counting semaphore still offer the System
//! V IPC facility. A [`Semaphore`] owns a private set with one member and
//! maps wait and post onto single `semop` decrements and increments. The
//! kernel serializes every change to the count, so no user-space lock is
//! involved and a timed-out wait can never consume a post.
//!
//! Interrupted calls are retried; callers never see `EINTR`.

use core::ffi::{c_int, c_short};
use core::fmt;
use core::mem::ManuallyDrop;
use std::time::{Duration, Instant};

use lona_base::{Errno, ErrorKind};
use tracing::{debug, trace, warn};

#[cfg(test)]
mod errno_test;
#[cfg(test)]
mod semaphore_test;

mod errno;
mod retry;
mod sysv;

pub use errno::{SemCall, classify, normalize};
use retry::retry_on_interrupt;

/// Result of a bounded wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The count was decremented.
    Acquired,
    /// The deadline passed first; the count is untouched.
    TimedOut,
}

/// A failed semaphore call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SemaphoreError {
    call: SemCall,
    kind: ErrorKind,
    errno: Errno,
}

impl SemaphoreError {
    /// Build an error from the raw code a call returned.
    #[must_use]
    pub fn from_errno(call: SemCall, errno: Errno) -> Self {
        Self {
            call,
            kind: normalize(call, errno),
            errno,
        }
    }

    /// The call that failed.
    #[must_use]
    pub const fn call(&self) -> SemCall {
        self.call
    }

    /// Normalized category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Raw code as reported by the kernel.
    #[must_use]
    pub const fn errno(&self) -> Errno {
        self.errno
    }
}

impl fmt::Display for SemaphoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "semaphore {} failed: {} ({})",
            self.call, self.kind, self.errno
        )
    }
}

impl core::error::Error for SemaphoreError {}

/// A counting semaphore backed by a private System V semaphore set.
///
/// The handle is move-only. [`destroy`](Self::destroy) consumes it and
/// reports failure; dropping it removes the set and only logs failure.
/// Waiting and posting take `&self`, so the semaphore can be shared
/// between threads by reference or `Arc`.
pub struct Semaphore {
    id: c_int,
    initial_count: u32,
}

impl Semaphore {
    /// Largest count the kernel accepts (`SEMVMX`).
    pub const MAX_COUNT: u32 = 32_767;

    /// Create a semaphore whose count starts at `initial_count`.
    ///
    /// # Errors
    ///
    /// Fails with an `Initialize` error of kind `InvalidArgument` when
    /// `initial_count` exceeds [`MAX_COUNT`](Self::MAX_COUNT), before any
    /// kernel call. Otherwise fails with whatever `semget` or the first
    /// `semop` reported; the set is removed again in the latter case.
    pub fn create(initial_count: u32) -> Result<Self, SemaphoreError> {
        let Ok(delta) = c_short::try_from(initial_count) else {
            return Err(SemaphoreError::from_errno(
                SemCall::Initialize,
                Errno::new(libc::ERANGE),
            ));
        };

        let id = retry_on_interrupt(sysv::create_set)
            .map_err(|errno| SemaphoreError::from_errno(SemCall::Create, errno))?;

        if let Err(errno) = retry_on_interrupt(|| sysv::adjust(id, delta, 0)) {
            if let Err(cleanup) = sysv::remove_set(id) {
                warn!(id, %cleanup, "failed to remove semaphore set after init failure");
            }
            return Err(SemaphoreError::from_errno(SemCall::Initialize, errno));
        }

        debug!(id, initial_count, "semaphore created");
        Ok(Self { id, initial_count })
    }

    /// Remove the kernel object.
    ///
    /// # Errors
    ///
    /// Returns the normalized `semctl` failure. The handle is gone either
    /// way.
    pub fn destroy(self) -> Result<(), SemaphoreError> {
        ManuallyDrop::new(self).remove()
    }

    /// Block until the count is positive, then decrement it.
    ///
    /// # Errors
    ///
    /// Returns the normalized `semop` failure, for instance when the set
    /// was removed behind the handle's back.
    pub fn wait(&self) -> Result<(), SemaphoreError> {
        trace!(id = self.id, "semaphore wait");
        retry_on_interrupt(|| sysv::adjust(self.id, -1, 0)).map_err(Self::operate_error)
    }

    /// Like [`wait`](Self::wait), but give up after `timeout`.
    ///
    /// A timeout too large to represent waits without bound.
    ///
    /// # Errors
    ///
    /// Same as [`wait`](Self::wait). Expiry is not an error.
    pub fn timed_wait(&self, timeout: Duration) -> Result<WaitOutcome, SemaphoreError> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_until(deadline),
            None => self.wait().map(|()| WaitOutcome::Acquired),
        }
    }

    /// Like [`wait`](Self::wait), but give up at `deadline`.
    ///
    /// A deadline in the past makes exactly one non-blocking attempt.
    ///
    /// # Errors
    ///
    /// Same as [`wait`](Self::wait). Expiry is not an error.
    pub fn wait_until(&self, deadline: Instant) -> Result<WaitOutcome, SemaphoreError> {
        trace!(id = self.id, "semaphore timed wait");
        // Remaining time is recomputed after every interruption.
        let acquired = retry_on_interrupt(|| {
            let remaining = deadline.saturating_duration_since(Instant::now());
            sysv::decrement_within(self.id, remaining)
        });
        match acquired {
            Ok(()) => Ok(WaitOutcome::Acquired),
            Err(errno) if errno.raw() == libc::EAGAIN => Ok(WaitOutcome::TimedOut),
            Err(errno) => Err(Self::operate_error(errno)),
        }
    }

    /// Increment the count, waking one waiter if any.
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` when the count is already at
    /// [`MAX_COUNT`](Self::MAX_COUNT), or the normalized `semop` failure.
    pub fn post(&self) -> Result<(), SemaphoreError> {
        trace!(id = self.id, "semaphore post");
        retry_on_interrupt(|| sysv::adjust(self.id, 1, 0)).map_err(Self::operate_error)
    }

    /// Count the semaphore was created with.
    #[must_use]
    pub const fn initial_count(&self) -> u32 {
        self.initial_count
    }

    /// Kernel identifier of the set, for diagnostics.
    #[must_use]
    pub const fn id(&self) -> c_int {
        self.id
    }

    fn remove(&self) -> Result<(), SemaphoreError> {
        retry_on_interrupt(|| sysv::remove_set(self.id))
            .map_err(|errno| SemaphoreError::from_errno(SemCall::Destroy, errno))?;
        debug!(id = self.id, "semaphore destroyed");
        Ok(())
    }

    fn operate_error(errno: Errno) -> SemaphoreError {
        SemaphoreError::from_errno(SemCall::Operate, errno)
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        if let Err(err) = self.remove() {
            warn!(id = self.id, %err, "failed to remove dropped semaphore");
        }
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("id", &self.id)
            .field("initial_count", &self.initial_count)
            .finish()
    }
}
