//! Backend arithmetic.
//!
//! This module provides the concrete implementations of the base field
//! GF(2^127-1), its quadratic extension, the scalar ring (integers modulo
//! the 252-bit prime subgroup order), and a few fixed-width plain integer
//! types used by the GLS scalar splitting. Only a 64-bit implementation is
//! provided; all types are portable Rust with no inline assembly.

pub mod gfp254;
pub use gfp254::{GFp127, GFp254};

pub mod zz;
pub use zz::{Zu128, Zu256, Zu384};

pub mod scalar252;
pub use scalar252::Scalar252;

// 64-bit carry/borrow/multiply helpers shared by the backend types. On
// x86-64 the dedicated carry intrinsics are used; elsewhere, portable
// formulations that known compilers turn into the same adc/sbc/mul
// sequences.

// (x, y, c_in) -> x + y + c_in mod 2^64, with the carry out (0 or 1).

#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn addcarry_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    use core::arch::x86_64::_addcarry_u64;
    let mut d = 0u64;
    let cc = unsafe { _addcarry_u64(c, x, y, &mut d) };
    (d, cc)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) const fn addcarry_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let (s, o1) = x.overflowing_add(y);
    let (s, o2) = s.overflowing_add(c as u64);
    (s, (o1 as u8) | (o2 as u8))
}

// (x, y, c_in) -> x - y - c_in mod 2^64, with the borrow out (0 or 1).

#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn subborrow_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    use core::arch::x86_64::_subborrow_u64;
    let mut d = 0u64;
    let cc = unsafe { _subborrow_u64(c, x, y, &mut d) };
    (d, cc)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) const fn subborrow_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    // The two steps cannot both wrap: after a wrapping x - y, the
    // intermediate is non-zero whenever a borrow was taken.
    let (d, b1) = x.overflowing_sub(y);
    let (d, b2) = d.overflowing_sub(c as u64);
    (d, (b1 as u8) | (b2 as u8))
}

// Full 64x64 product, as (low, high) words.
#[inline(always)]
pub(crate) const fn umull(x: u64, y: u64) -> (u64, u64) {
    let z = (x as u128) * (y as u128);
    (z as u64, (z >> 64) as u64)
}

// x*y + z, as (low, high) words. The sum fits: the product is at most
// 2^128 - 2^65 + 1, leaving room for a full 64-bit addend.
#[inline(always)]
pub(crate) const fn umull_add(x: u64, y: u64, z: u64) -> (u64, u64) {
    let t = (x as u128) * (y as u128) + (z as u128);
    (t as u64, (t >> 64) as u64)
}

// x*y + z1 + z2, as (low, high) words. Also exact: the maximum total
// is 2^128 - 1.
#[inline(always)]
pub(crate) const fn umull_add2(x: u64, y: u64, z1: u64, z2: u64) -> (u64, u64) {
    let t = (x as u128) * (y as u128) + (z1 as u128) + (z2 as u128);
    (t as u64, (t >> 64) as u64)
}

// Expand the top bit of x into a full 64-bit mask (all-ones if the bit
// is set, all-zeros otherwise).
#[inline(always)]
pub(crate) const fn sgnw(x: u64) -> u64 {
    0u64.wrapping_sub(x >> 63)
}
