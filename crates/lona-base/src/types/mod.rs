// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Core type definitions for the platform layer.
//!
//! Region bases are handed around as `Vaddr` tokens instead of raw pointers,
//! so address arithmetic stays inside the region manager.

#[cfg(test)]
mod addr_test;

mod addr;

pub use addr::Vaddr;
