// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

use lona_base::Errno;
use tracing::trace;

/// Issue `call` until it completes with anything other than `EINTR`.
///
/// The retry count is unbounded; signals only ever delay the result.
pub(super) fn retry_on_interrupt<T, F>(mut call: F) -> Result<T, Errno>
where
    F: FnMut() -> Result<T, Errno>,
{
    loop {
        match call() {
            Err(errno) if errno.raw() == libc::EINTR => trace!("kernel call interrupted, retrying"),
            result => return result,
        }
    }
}
