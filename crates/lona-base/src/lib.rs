// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Primitives shared by the Lona platform layer and its callers.
//!
//! This crate defines the vocabulary the rest of the runtime uses when it
//! talks about raw memory and kernel failures:
//! - Address newtype for region base tokens
//! - Power-of-two rounding helpers
//! - Access protection flags
//! - The closed error taxonomy and raw OS error codes
//!
//! # Design Principles
//!
//! - **No dependencies**: Pure data types, 100% host-testable
//! - **`const` everywhere**: Rounding and flag helpers work in const contexts
//!
//! # Modules
//!
//! - [`types`]: Address type (`Vaddr`)
//! - [`align`]: `round_up`, `round_down` and friends
//! - [`protection`]: Access rights requested for a span
//! - [`error`]: `ErrorKind` taxonomy and `Errno`

#![cfg_attr(not(test), no_std)]

pub mod align;
pub mod error;
pub mod protection;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Errno, ErrorKind};
pub use protection::Protection;
pub use types::Vaddr;
