use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::convert::TryFrom;

use super::{addcarry_u64, subborrow_u64, umull_add, umull_add2, sgnw};

/// Integers modulo the prime
/// q = 0x0FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA6261414C0DC87D3CE9B68E3B09E01A5
/// (the order of the prime subgroup of the Ted252 curve).
///
/// Values are held in four 64-bit limbs (little-endian order) and are
/// always canonical (fully reduced). The plain representation is used
/// (not Montgomery): the scalar ring sees no performance-critical
/// multiplication in this crate.
#[derive(Clone, Copy, Debug)]
pub struct Scalar252([u64; 4]);

impl Scalar252 {

    pub const ZERO: Self = Self([ 0, 0, 0, 0 ]);
    pub const ONE: Self = Self([ 1, 0, 0, 0 ]);

    // The modulus q, in base 2^64 (low-to-high).
    pub(crate) const MODULUS: [u64; 4] = [
        0xCE9B68E3B09E01A5,
        0xA6261414C0DC87D3,
        0xFFFFFFFFFFFFFFFF,
        0x0FFFFFFFFFFFFFFF,
    ];

    // c = 2^252 - q (127 bits).
    const CQ: [u64; 2] = [ 0x3164971C4F61FE5B, 0x59D9EBEB3F23782C ];

    // 16*c = 2^256 mod q (131 bits).
    const CQ16: [u64; 3] = [
        0x164971C4F61FE5B0, 0x9D9EBEB3F23782C3, 0x0000000000000005,
    ];

    // Element encoding length (in bytes); always 32 bytes.
    pub const ENC_LEN: usize = 32;

    /// Build a constant from four 64-bit limbs (low-to-high order).
    /// The value MUST be lower than q.
    pub const fn w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        Self([ x0, x1, x2, x3 ])
    }

    /// Build a constant from four 64-bit limbs (high-to-low order).
    /// The value MUST be lower than q.
    pub const fn w64be(x3: u64, x2: u64, x1: u64, x0: u64) -> Self {
        Self([ x0, x1, x2, x3 ])
    }

    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self([ x as u64, 0, 0, 0 ])
    }

    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self([ x, 0, 0, 0 ])
    }

    #[inline(always)]
    pub fn from_u128(x: u128) -> Self {
        Self([ x as u64, (x >> 64) as u64, 0, 0 ])
    }

    // Subtract q if the current (non-canonical) value is not lower
    // than q; the result is canonical provided that the input is
    // lower than 2*q.
    #[inline(always)]
    fn reduce_once(&mut self) {
        let mut d = [0u64; 4];
        let mut cc = 0;
        for i in 0..4 {
            (d[i], cc) = subborrow_u64(self.0[i], Self::MODULUS[i], cc);
        }
        let m = (cc as u64).wrapping_neg();
        for i in 0..4 {
            self.0[i] = d[i] ^ (m & (d[i] ^ self.0[i]));
        }
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        // Both operands are canonical (< q < 2^252), so the sum does
        // not overflow 256 bits.
        let mut cc = 0;
        for i in 0..4 {
            (self.0[i], cc) = addcarry_u64(self.0[i], rhs.0[i], cc);
        }
        self.reduce_once();
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        let mut d = [0u64; 4];
        let mut cc = 0;
        for i in 0..4 {
            (d[i], cc) = subborrow_u64(self.0[i], rhs.0[i], cc);
        }
        // On borrow, add q back.
        let m = (cc as u64).wrapping_neg();
        let mut cc = 0;
        for i in 0..4 {
            (self.0[i], cc) = addcarry_u64(d[i], m & Self::MODULUS[i], cc);
        }
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        let r = Self::ZERO - *self;
        *self = r;
    }

    // Reduce a 512-bit intermediate value (eight limbs, little-endian).
    // Three folds at 2^256 (2^256 = 16*c mod q), then a fold at bit 252
    // (2^252 = c mod q) and one conditional subtraction.
    fn reduce512(z: &[u64; 8]) -> Self {
        let mut z = *z;
        for _ in 0..3 {
            let mut d = [0u64; 8];
            for i in 0..3 {
                let mut hi = 0;
                for j in 0..4 {
                    let (lo2, hi2) = umull_add2(
                        z[4 + j], Self::CQ16[i], d[i + j], hi);
                    d[i + j] = lo2;
                    hi = hi2;
                }
                d[i + 4] = hi;
            }
            let mut cc = 0;
            for i in 0..4 {
                (d[i], cc) = addcarry_u64(d[i], z[i], cc);
            }
            for i in 4..8 {
                (d[i], cc) = addcarry_u64(d[i], 0, cc);
            }
            z = d;
        }

        // At this point the value is below 2^257 (limbs 5..7 are zero).
        let b = (z[3] >> 60) | (z[4] << 4);
        let mut r = Self([ z[0], z[1], z[2], z[3] & 0x0FFFFFFFFFFFFFFF ]);
        let (d0, hi) = umull_add(b, Self::CQ[0], 0);
        let (d1, d2) = umull_add(b, Self::CQ[1], hi);
        let mut cc;
        (r.0[0], cc) = addcarry_u64(r.0[0], d0, 0);
        (r.0[1], cc) = addcarry_u64(r.0[1], d1, cc);
        (r.0[2], cc) = addcarry_u64(r.0[2], d2, cc);
        (r.0[3], _)  = addcarry_u64(r.0[3], 0, cc);
        r.reduce_once();
        r
    }

    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        let a = &self.0;
        let b = &rhs.0;
        let mut z = [0u64; 8];
        for i in 0..4 {
            let mut hi = 0;
            for j in 0..4 {
                let (lo2, hi2) = umull_add2(a[j], b[i], z[i + j], hi);
                z[i + j] = lo2;
                hi = hi2;
            }
            z[i + 4] = hi;
        }
        *self = Self::reduce512(&z);
    }

    /// Return 0xFFFFFFFF if this value is zero, 0x00000000 otherwise.
    #[inline(always)]
    pub fn iszero(self) -> u32 {
        let d = self.0[0] | self.0[1] | self.0[2] | self.0[3];
        (sgnw(!(d | d.wrapping_neg())) as u32) & 0xFFFFFFFF
    }

    /// Return 0xFFFFFFFF if this value equals rhs, 0x00000000 otherwise.
    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        // Both representations are canonical.
        let d = (self.0[0] ^ rhs.0[0]) | (self.0[1] ^ rhs.0[1])
              | (self.0[2] ^ rhs.0[2]) | (self.0[3] ^ rhs.0[3]);
        (sgnw(!(d | d.wrapping_neg())) as u32) & 0xFFFFFFFF
    }

    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        for i in 0..4 {
            self.0[i] ^= cw & (self.0[i] ^ a.0[i]);
        }
    }

    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    /// Encode this scalar into exactly 32 bytes (little-endian).
    pub fn encode(self) -> [u8; 32] {
        let mut d = [0u8; 32];
        for i in 0..4 {
            d[(8 * i)..(8 * i + 8)].copy_from_slice(&self.0[i].to_le_bytes());
        }
        d
    }

    /// Decode a scalar from exactly 32 bytes (little-endian, canonical:
    /// the value must be lower than q). The decoded value and a status
    /// word are returned; the status is 0xFFFFFFFF on success,
    /// 0x00000000 otherwise (in which case the value is zero).
    pub fn decode32(buf: &[u8]) -> (Self, u32) {
        if buf.len() != 32 {
            return (Self::ZERO, 0);
        }
        let mut x = Self::ZERO;
        for i in 0..4 {
            x.0[i] = u64::from_le_bytes(*<&[u8; 8]>::try_from(
                &buf[(8 * i)..(8 * i + 8)]).unwrap());
        }
        let mut cc = 0;
        for i in 0..4 {
            let (_, cc2) = subborrow_u64(x.0[i], Self::MODULUS[i], cc);
            cc = cc2;
        }
        let m = (cc as u64).wrapping_neg();
        for i in 0..4 {
            x.0[i] &= m;
        }
        (x, m as u32)
    }

    /// Decode a scalar from 32 bytes. Returns `None` on a non-canonical
    /// encoding or a wrong source length. Side channels may leak whether
    /// the decoding succeeded, but not the decoded value.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (x, m) = Self::decode32(buf);
        if m != 0 {
            Some(x)
        } else {
            None
        }
    }

    /// Decode a scalar from arbitrary bytes, interpreted as an unsigned
    /// little-endian integer which is reduced modulo q.
    pub fn decode_reduce(buf: &[u8]) -> Self {
        // Process 32-byte chunks starting with the most significant one
        // (Horner on the radix 2^256).
        let n = buf.len();
        if n == 0 {
            return Self::ZERO;
        }
        let mut r = Self::ZERO;
        let nc = (n + 31) >> 5;
        for i in (0..nc).rev() {
            let mut z = [0u64; 8];
            z[4] = r.0[0];
            z[5] = r.0[1];
            z[6] = r.0[2];
            z[7] = r.0[3];
            let lo = 32 * i;
            let hi = core::cmp::min(lo + 32, n);
            let mut cb = [0u8; 32];
            cb[..(hi - lo)].copy_from_slice(&buf[lo..hi]);
            for j in 0..4 {
                z[j] = u64::from_le_bytes(*<&[u8; 8]>::try_from(
                    &cb[(8 * j)..(8 * j + 8)]).unwrap());
            }
            r = Self::reduce512(&z);
        }
        r
    }
}

// The folding constants are derived from the modulus; a mismatch would
// silently corrupt every reduction, so the relations q + CQ = 2^252 and
// CQ16 = 16*CQ are checked when compiling.
const _: () = {
    let ql = (Scalar252::MODULUS[0] as u128)
        | ((Scalar252::MODULUS[1] as u128) << 64);
    let c = (Scalar252::CQ[0] as u128) | ((Scalar252::CQ[1] as u128) << 64);
    // low halves: q mod 2^128 plus CQ wraps to exactly 2^128
    assert!(ql.wrapping_add(c) == 0);
    assert!(Scalar252::MODULUS[2] == !0u64);
    assert!(Scalar252::MODULUS[3] == (1u64 << 60) - 1);
    assert!(Scalar252::CQ16[0] == Scalar252::CQ[0] << 4);
    assert!(Scalar252::CQ16[1]
        == (Scalar252::CQ[1] << 4) | (Scalar252::CQ[0] >> 60));
    assert!(Scalar252::CQ16[2] == Scalar252::CQ[1] >> 60);
};

impl Add<Scalar252> for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn add(self, other: Scalar252) -> Scalar252 {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&Scalar252> for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn add(self, other: &Scalar252) -> Scalar252 {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<Scalar252> for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn add(self, other: Scalar252) -> Scalar252 {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&Scalar252> for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn add(self, other: &Scalar252) -> Scalar252 {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<Scalar252> for Scalar252 {
    #[inline(always)]
    fn add_assign(&mut self, other: Scalar252) {
        self.set_add(&other);
    }
}

impl AddAssign<&Scalar252> for Scalar252 {
    #[inline(always)]
    fn add_assign(&mut self, other: &Scalar252) {
        self.set_add(other);
    }
}

impl Mul<Scalar252> for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn mul(self, other: Scalar252) -> Scalar252 {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar252> for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn mul(self, other: &Scalar252) -> Scalar252 {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<Scalar252> for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn mul(self, other: Scalar252) -> Scalar252 {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar252> for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn mul(self, other: &Scalar252) -> Scalar252 {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<Scalar252> for Scalar252 {
    #[inline(always)]
    fn mul_assign(&mut self, other: Scalar252) {
        self.set_mul(&other);
    }
}

impl MulAssign<&Scalar252> for Scalar252 {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Scalar252) {
        self.set_mul(other);
    }
}

impl Neg for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn neg(self) -> Scalar252 {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn neg(self) -> Scalar252 {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<Scalar252> for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn sub(self, other: Scalar252) -> Scalar252 {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Scalar252> for Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn sub(self, other: &Scalar252) -> Scalar252 {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<Scalar252> for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn sub(self, other: Scalar252) -> Scalar252 {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Scalar252> for &Scalar252 {
    type Output = Scalar252;

    #[inline(always)]
    fn sub(self, other: &Scalar252) -> Scalar252 {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<Scalar252> for Scalar252 {
    #[inline(always)]
    fn sub_assign(&mut self, other: Scalar252) {
        self.set_sub(&other);
    }
}

impl SubAssign<&Scalar252> for Scalar252 {
    #[inline(always)]
    fn sub_assign(&mut self, other: &Scalar252) {
        self.set_sub(other);
    }
}

// ========================================================================
