// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the address type.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::Vaddr;

#[test]
fn test_vaddr_basic() {
    let addr = Vaddr::new(0x4000_0000);
    assert_eq!(addr.as_usize(), 0x4000_0000);
    assert!(!addr.is_null());
    assert!(Vaddr::null().is_null());
    assert_eq!(Vaddr::default(), Vaddr::null());
}

#[test]
fn test_vaddr_from_ptr() {
    let value = 7u64;
    let addr = Vaddr::from_ptr(&raw const value);
    assert_eq!(addr.as_ptr::<u64>(), &raw const value);
}

#[test]
fn test_vaddr_arithmetic() {
    let addr = Vaddr::new(0x4000_0000);
    assert_eq!(addr.add(0x1000).as_usize(), 0x4000_1000);
    assert_eq!(addr.sub(0x1000).as_usize(), 0x3FFF_F000);
    assert_eq!((addr + 0x100).as_usize(), 0x4000_0100);
    assert_eq!((addr - 0x100).as_usize(), 0x3FFF_FF00);
}

#[test]
fn test_vaddr_checked_add() {
    assert_eq!(
        Vaddr::new(0x1000).checked_add(0x1000),
        Some(Vaddr::new(0x2000))
    );
    assert_eq!(Vaddr::new(usize::MAX).checked_add(1), None);
}

#[test]
fn test_vaddr_alignment() {
    let addr = Vaddr::new(0x4000_1234);
    assert_eq!(addr.align_up(0x1000).map(Vaddr::as_usize), Some(0x4000_2000));
    assert_eq!(
        addr.align_down(0x1000).map(Vaddr::as_usize),
        Some(0x4000_1000)
    );
    assert_eq!(addr.is_aligned(0x1000), Some(false));
    assert_eq!(Vaddr::new(0x2000).is_aligned(0x1000), Some(true));
    assert_eq!(addr.align_up(0), None);
    assert_eq!(addr.align_up(3), None);
    assert_eq!(addr.align_down(6), None);
}

#[test]
fn test_vaddr_align_up_overflow() {
    assert_eq!(Vaddr::new(usize::MAX - 1).align_up(0x1000), None);
}

#[test]
fn test_vaddr_diff() {
    let a = Vaddr::new(0x5000);
    let b = Vaddr::new(0x3000);
    assert_eq!(a.diff(b), 0x2000);
}

#[test]
fn test_vaddr_format() {
    let vaddr = Vaddr::new(0x5678);
    assert_eq!(format!("{vaddr:?}"), "Vaddr(0x5678)");
    assert_eq!(format!("{vaddr}"), "0x5678");
}
