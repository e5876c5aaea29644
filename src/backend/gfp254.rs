use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::convert::TryFrom;

use super::{addcarry_u64, subborrow_u64, umull, umull_add, sgnw};

/// Element of GF(p), with p = 2^127 - 1 (a Mersenne prime).
#[derive(Clone, Copy, Debug)]
pub struct GFp127([u64; 2]);

impl GFp127 {

    // IMPLEMENTATION NOTES
    // --------------------
    //
    // Internal values are held on 127 bits (the top bit of the second
    // limb is always zero). The representation is redundant: the value
    // p itself may appear and denotes zero. All reductions use the
    // Mersenne identity 2^127 = 1 mod p, i.e. the high part of any
    // intermediate result is folded back onto the low 127 bits with a
    // simple add. encode() and the comparison functions normalize.

    pub const ZERO: Self = Self([ 0, 0 ]);
    pub const ONE: Self = Self([ 1, 0 ]);
    pub const MINUS_ONE: Self = Self([ 0xFFFFFFFFFFFFFFFE, 0x7FFFFFFFFFFFFFFF ]);

    // Modulus, as a 128-bit value.
    const P: u128 = (1u128 << 127) - 1;

    // Element encoding length (in bytes); always 16 bytes.
    pub const ENC_LEN: usize = 16;

    pub const fn w64le(x0: u64, x1: u64) -> Self {
        Self([ x0, x1 ])
    }

    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self([ x, 0 ])
    }

    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self([ x as u64, 0 ])
    }

    #[inline(always)]
    fn to_u128(self) -> u128 {
        (self.0[0] as u128) | ((self.0[1] as u128) << 64)
    }

    #[inline(always)]
    fn from_u128(x: u128) -> Self {
        Self([ x as u64, (x >> 64) as u64 ])
    }

    // Fold a 128-bit intermediate value back below 2^127. Two folding
    // steps are needed: the first one may produce exactly 2^127 (which
    // the second one maps to 1, the congruent value).
    #[inline(always)]
    const fn fold(x: u128) -> u128 {
        let r = (x & Self::P) + (x >> 127);
        (r & Self::P) + (r >> 127)
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        // Both operands are below 2^127; the sum fits on 128 bits.
        *self = Self::from_u128(Self::fold(self.to_u128() + rhs.to_u128()));
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        // Compute a - b with an explicit borrow; the borrow weighs
        // -2^128 = -2 mod p.
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);
        let t = (d0 as u128) | ((d1 as u128) << 64);
        let r = (t & Self::P) + (t >> 127) - (((cc as u128) & 1) << 1);
        *self = Self::from_u128((r & Self::P) + (r >> 127));
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        // 2*p - a fits on 128 bits since a < 2^127.
        *self = Self::from_u128(Self::fold(2 * Self::P - self.to_u128()));
    }

    // Halve this value.
    #[inline(always)]
    pub fn set_half(&mut self) {
        // If a is odd, add p (which is odd) to make it even, then shift.
        let a = self.to_u128();
        let m = (a & 1).wrapping_neg();
        *self = Self::from_u128((a + (m & Self::P)) >> 1);
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    // Double this value.
    #[inline(always)]
    pub fn set_mul2(&mut self) {
        *self = Self::from_u128(Self::fold(self.to_u128() << 1));
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        let (a0, a1) = (self.0[0], self.0[1]);
        let (b0, b1) = (rhs.0[0], rhs.0[1]);

        // 254-bit product z3:z2:z1:z0.
        let (z0, h0) = umull(a0, b0);
        let (l1, h1) = umull(a0, b1);
        let (l2, h2) = umull(a1, b0);
        let (l3, h3) = umull(a1, b1);
        let (z1, cc) = addcarry_u64(h0, l1, 0);
        let (z2, cc) = addcarry_u64(h1, l3, cc);
        let (z3, _)  = addcarry_u64(h3, 0, cc);
        let (z1, cc) = addcarry_u64(z1, l2, 0);
        let (z2, cc) = addcarry_u64(z2, h2, cc);
        let (z3, _)  = addcarry_u64(z3, 0, cc);

        // Fold the high 127 bits onto the low 127 bits.
        let zl = (z0 as u128) | ((z1 as u128) << 64);
        let zh = (z2 as u128) | ((z3 as u128) << 64);
        let r = (zl & Self::P) + ((zh << 1) | (zl >> 127));
        *self = Self::from_u128(Self::fold(r));
    }

    #[inline(always)]
    pub fn set_square(&mut self) {
        let (a0, a1) = (self.0[0], self.0[1]);

        // a0^2 + 2*a0*a1*2^64 + a1^2*2^128
        let (e0, e1) = umull(a0, a0);
        let (c0, c1) = umull(a0, a1);
        let cc0 = c0 << 1;
        let cc1 = (c1 << 1) | (c0 >> 63);
        let cc2 = c1 >> 63;
        let (f0, f1) = umull(a1, a1);
        let z0 = e0;
        let (z1, cc) = addcarry_u64(e1, cc0, 0);
        let (z2, cc) = addcarry_u64(f0, cc1, cc);
        let (z3, _)  = addcarry_u64(f1, cc2, cc);

        let zl = (z0 as u128) | ((z1 as u128) << 64);
        let zh = (z2 as u128) | ((z3 as u128) << 64);
        let r = (zl & Self::P) + ((zh << 1) | (zl >> 127));
        *self = Self::from_u128(Self::fold(r));
    }

    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    // Square this value n times (in place).
    #[inline(always)]
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Multiply this value by a small integer.
    #[inline(always)]
    pub fn set_mul_small(&mut self, c: u32) {
        let (a0, a1) = (self.0[0], self.0[1]);
        let (d0, h) = umull(a0, c as u64);
        let (d1, h2) = umull_add(a1, c as u64, h);
        let z = (d0 as u128) | ((d1 as u128) << 64);
        let r = (z & Self::P) + ((z >> 127) | ((h2 as u128) << 1));
        *self = Self::from_u128(Self::fold(r));
    }

    #[inline(always)]
    pub fn mul_small(self, c: u32) -> Self {
        let mut r = self;
        r.set_mul_small(c);
        r
    }

    /// Invert this value; the inverse of zero is (formally) zero.
    pub fn set_invert(&mut self) {
        // Fermat: 1/a = a^(p-2), with p - 2 = 4*(2^125 - 1) + 1.
        // The 2^125 - 1 exponent is reached with an addition chain on
        // exponents of the form 2^k - 1.
        let a = *self;
        let t2 = a.xsquare(1) * a;           // 2^2 - 1
        let t4 = t2.xsquare(2) * t2;         // 2^4 - 1
        let t8 = t4.xsquare(4) * t4;         // 2^8 - 1
        let t16 = t8.xsquare(8) * t8;        // 2^16 - 1
        let t32 = t16.xsquare(16) * t16;     // 2^32 - 1
        let t64 = t32.xsquare(32) * t32;     // 2^64 - 1
        let mut u = t64.xsquare(32) * t32;   // 2^96 - 1
        u = u.xsquare(16) * t16;             // 2^112 - 1
        u = u.xsquare(8) * t8;               // 2^120 - 1
        u = u.xsquare(4) * t4;               // 2^124 - 1
        u = u.xsquare(1) * a;                // 2^125 - 1
        *self = u.xsquare(2) * a;            // 4*(2^125 - 1) + 1
    }

    #[inline(always)]
    pub fn invert(self) -> Self {
        let mut r = self;
        r.set_invert();
        r
    }

    #[inline(always)]
    fn set_div(&mut self, rhs: &Self) {
        self.set_mul(&rhs.invert());
    }

    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        self.0[0] ^= cw & (self.0[0] ^ a.0[0]);
        self.0[1] ^= cw & (self.0[1] ^ a.0[1]);
    }

    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    #[inline(always)]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        let t = cw & (a.0[0] ^ b.0[0]); a.0[0] ^= t; b.0[0] ^= t;
        let t = cw & (a.0[1] ^ b.0[1]); a.0[1] ^= t; b.0[1] ^= t;
    }

    // OR into this element the masked representation of `a`. The mask
    // `ctl` MUST be 0xFFFFFFFF or 0x00000000. This is meant for masked
    // table scans: the accumulator starts as all-zero limbs and exactly
    // one scanned entry has an all-ones mask.
    #[inline(always)]
    pub(crate) fn set_cond_or(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        self.0[0] |= cw & a.0[0];
        self.0[1] |= cw & a.0[1];
    }

    // Normalize to the canonical range [0, p): the redundant value p
    // becomes zero. All other representable values are already canonical.
    #[inline(always)]
    fn set_normalized(&mut self) {
        let d = (self.0[0] ^ 0xFFFFFFFFFFFFFFFF) | (self.0[1] ^ 0x7FFFFFFFFFFFFFFF);
        // mz = all-ones iff the value is exactly p
        let mz = sgnw(!(d | d.wrapping_neg()));
        self.0[0] &= !mz;
        self.0[1] &= !mz;
    }

    /// Return 0xFFFFFFFF if this value is zero, 0x00000000 otherwise.
    #[inline(always)]
    pub fn iszero(self) -> u32 {
        let mut x = self;
        x.set_normalized();
        let d = x.0[0] | x.0[1];
        (sgnw(!(d | d.wrapping_neg())) as u32) & 0xFFFFFFFF
    }

    /// Return 0xFFFFFFFF if this value equals rhs, 0x00000000 otherwise.
    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        (self - rhs).iszero()
    }

    /// Encode this value into exactly 16 bytes (unsigned little-endian,
    /// canonical).
    pub fn encode(self) -> [u8; 16] {
        let mut x = self;
        x.set_normalized();
        let mut d = [0u8; 16];
        d[..8].copy_from_slice(&x.0[0].to_le_bytes());
        d[8..].copy_from_slice(&x.0[1].to_le_bytes());
        d
    }

    /// Decode a value from exactly 16 bytes. The decoded value and a
    /// status word are returned; the status is 0xFFFFFFFF on success
    /// (canonical encoding of a field element), 0x00000000 otherwise
    /// (in which case the value is zero). If the source slice does not
    /// have length exactly 16 bytes, then the decoding fails.
    pub fn decode_ct(buf: &[u8]) -> (Self, u32) {
        if buf.len() != 16 {
            return (Self::ZERO, 0);
        }
        let x0 = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[..8]).unwrap());
        let x1 = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[8..]).unwrap());
        // Valid iff the value is strictly lower than p = 2^127 - 1.
        let (_, cc) = subborrow_u64(x0, 0xFFFFFFFFFFFFFFFF, 0);
        let (_, cc) = subborrow_u64(x1, 0x7FFFFFFFFFFFFFFF, cc);
        let m = (cc as u64).wrapping_neg();
        (Self([ x0 & m, x1 & m ]), m as u32)
    }

    /// Decode a value from 16 bytes. Returns `None` if the source has
    /// the wrong length or is not a canonical encoding. Side channels
    /// may leak whether the decoding succeeded, but not the value itself.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (x, m) = Self::decode_ct(buf);
        if m != 0 {
            Some(x)
        } else {
            None
        }
    }
}

impl Add<GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn add(self, other: GFp127) -> GFp127 {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn add(self, other: &GFp127) -> GFp127 {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn add(self, other: GFp127) -> GFp127 {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn add(self, other: &GFp127) -> GFp127 {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<GFp127> for GFp127 {
    #[inline(always)]
    fn add_assign(&mut self, other: GFp127) {
        self.set_add(&other);
    }
}

impl AddAssign<&GFp127> for GFp127 {
    #[inline(always)]
    fn add_assign(&mut self, other: &GFp127) {
        self.set_add(other);
    }
}

impl Div<GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn div(self, other: GFp127) -> GFp127 {
        let mut r = self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn div(self, other: &GFp127) -> GFp127 {
        let mut r = self;
        r.set_div(other);
        r
    }
}

impl Div<GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn div(self, other: GFp127) -> GFp127 {
        let mut r = *self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn div(self, other: &GFp127) -> GFp127 {
        let mut r = *self;
        r.set_div(other);
        r
    }
}

impl DivAssign<GFp127> for GFp127 {
    #[inline(always)]
    fn div_assign(&mut self, other: GFp127) {
        self.set_div(&other);
    }
}

impl DivAssign<&GFp127> for GFp127 {
    #[inline(always)]
    fn div_assign(&mut self, other: &GFp127) {
        self.set_div(other);
    }
}

impl Mul<GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn mul(self, other: GFp127) -> GFp127 {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn mul(self, other: &GFp127) -> GFp127 {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn mul(self, other: GFp127) -> GFp127 {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn mul(self, other: &GFp127) -> GFp127 {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<GFp127> for GFp127 {
    #[inline(always)]
    fn mul_assign(&mut self, other: GFp127) {
        self.set_mul(&other);
    }
}

impl MulAssign<&GFp127> for GFp127 {
    #[inline(always)]
    fn mul_assign(&mut self, other: &GFp127) {
        self.set_mul(other);
    }
}

impl Neg for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn neg(self) -> GFp127 {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn neg(self) -> GFp127 {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn sub(self, other: GFp127) -> GFp127 {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp127> for GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn sub(self, other: &GFp127) -> GFp127 {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn sub(self, other: GFp127) -> GFp127 {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp127> for &GFp127 {
    type Output = GFp127;

    #[inline(always)]
    fn sub(self, other: &GFp127) -> GFp127 {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<GFp127> for GFp127 {
    #[inline(always)]
    fn sub_assign(&mut self, other: GFp127) {
        self.set_sub(&other);
    }
}

impl SubAssign<&GFp127> for GFp127 {
    #[inline(always)]
    fn sub_assign(&mut self, other: &GFp127) {
        self.set_sub(other);
    }
}

// ========================================================================

/// Element of GF(p^2) = GF(p)[i]/(i^2 + 1) (p = 2^127 - 1).
///
/// -1 is not a square modulo p (p = 3 mod 4), so the extension is a
/// field. An element is x0 + i*x1 for two GF(p) components x0 and x1.
#[derive(Clone, Copy, Debug)]
pub struct GFp254([GFp127; 2]);

impl GFp254 {

    pub const ZERO: Self = Self([ GFp127::ZERO, GFp127::ZERO ]);
    pub const ONE: Self = Self([ GFp127::ONE, GFp127::ZERO ]);

    // Element encoding length (in bytes); always 32 bytes.
    pub const ENC_LEN: usize = 32;

    pub const fn w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        Self([ GFp127::w64le(x0, x1), GFp127::w64le(x2, x3) ])
    }

    pub const fn p127(x0: GFp127, x1: GFp127) -> Self {
        Self([ x0, x1 ])
    }

    #[inline(always)]
    pub fn from_p127(x0: GFp127, x1: GFp127) -> Self {
        Self([ x0, x1 ])
    }

    #[inline(always)]
    pub fn to_components(self) -> (GFp127, GFp127) {
        (self.0[0], self.0[1])
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        self.0[0] += &rhs.0[0];
        self.0[1] += &rhs.0[1];
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        self.0[0] -= &rhs.0[0];
        self.0[1] -= &rhs.0[1];
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.0[0].set_neg();
        self.0[1].set_neg();
    }

    /// Apply the conjugation x0 + i*x1 -> x0 - i*x1 (this is the
    /// Frobenius automorphism z -> z^p of GF(p^2)).
    #[inline(always)]
    pub fn set_conj(&mut self) {
        self.0[1].set_neg();
    }

    #[inline(always)]
    pub fn conj(self) -> Self {
        let mut r = self;
        r.set_conj();
        r
    }

    #[inline(always)]
    pub fn set_mul2(&mut self) {
        self.0[0].set_mul2();
        self.0[1].set_mul2();
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        // Karatsuba: three multiplications in GF(p).
        let (a0, a1) = (self.0[0], self.0[1]);
        let (b0, b1) = (rhs.0[0], rhs.0[1]);
        let m0 = a0 * b0;
        let m1 = a1 * b1;
        let s = (a0 + a1) * (b0 + b1);
        self.0[0] = m0 - m1;
        self.0[1] = s - m0 - m1;
    }

    #[inline(always)]
    pub fn set_square(&mut self) {
        // (x0 + i*x1)^2 = (x0 + x1)*(x0 - x1) + i*(2*x0*x1)
        let (a0, a1) = (self.0[0], self.0[1]);
        let t = a0 * a1;
        self.0[0] = (a0 + a1) * (a0 - a1);
        self.0[1] = t.mul2();
    }

    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    #[inline(always)]
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Multiply this value by an element of the base field.
    #[inline(always)]
    pub fn set_mul_p127(&mut self, rhs: &GFp127) {
        self.0[0] *= rhs;
        self.0[1] *= rhs;
    }

    #[inline(always)]
    pub fn mul_p127(self, rhs: &GFp127) -> Self {
        let mut r = self;
        r.set_mul_p127(rhs);
        r
    }

    // Multiply this value by a small integer.
    #[inline(always)]
    pub fn set_mul_small(&mut self, c: u32) {
        self.0[0].set_mul_small(c);
        self.0[1].set_mul_small(c);
    }

    #[inline(always)]
    pub fn mul_small(self, c: u32) -> Self {
        let mut r = self;
        r.set_mul_small(c);
        r
    }

    /// Invert this value; the inverse of zero is (formally) zero.
    pub fn set_invert(&mut self) {
        // 1/(x0 + i*x1) = (x0 - i*x1)/(x0^2 + x1^2); the norm lies in
        // the base field, where inversion is a single addition chain.
        let (a0, a1) = (self.0[0], self.0[1]);
        let n = a0.square() + a1.square();
        let ni = n.invert();
        self.0[0] = a0 * ni;
        self.0[1] = -(a1 * ni);
    }

    #[inline(always)]
    pub fn invert(self) -> Self {
        let mut r = self;
        r.set_invert();
        r
    }

    #[inline(always)]
    fn set_div(&mut self, rhs: &Self) {
        self.set_mul(&rhs.invert());
    }

    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        self.0[0].set_cond(&a.0[0], ctl);
        self.0[1].set_cond(&a.0[1], ctl);
    }

    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    #[inline(always)]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        GFp127::cswap(&mut a.0[0], &mut b.0[0], ctl);
        GFp127::cswap(&mut a.0[1], &mut b.0[1], ctl);
    }

    // OR into this element the masked representation of `a` (see
    // `GFp127::set_cond_or`); `ctl` MUST be 0xFFFFFFFF or 0x00000000.
    #[inline(always)]
    pub(crate) fn set_cond_or(&mut self, a: &Self, ctl: u32) {
        self.0[0].set_cond_or(&a.0[0], ctl);
        self.0[1].set_cond_or(&a.0[1], ctl);
    }

    /// Return 0xFFFFFFFF if this value is zero, 0x00000000 otherwise.
    #[inline(always)]
    pub fn iszero(self) -> u32 {
        self.0[0].iszero() & self.0[1].iszero()
    }

    /// Return 0xFFFFFFFF if this value equals rhs, 0x00000000 otherwise.
    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        self.0[0].equals(rhs.0[0]) & self.0[1].equals(rhs.0[1])
    }

    /// Encode this value into exactly 32 bytes (the two components in
    /// ascending order, each over 16 bytes, little-endian, canonical).
    pub fn encode(self) -> [u8; 32] {
        let mut d = [0u8; 32];
        d[..16].copy_from_slice(&self.0[0].encode());
        d[16..].copy_from_slice(&self.0[1].encode());
        d
    }

    /// Decode a value from exactly 32 bytes. The decoded value and a
    /// status word are returned; the status is 0xFFFFFFFF on success,
    /// 0x00000000 otherwise (in which case the value is zero).
    pub fn decode_ct(buf: &[u8]) -> (Self, u32) {
        if buf.len() != 32 {
            return (Self::ZERO, 0);
        }
        let (mut x0, m0) = GFp127::decode_ct(&buf[..16]);
        let (mut x1, m1) = GFp127::decode_ct(&buf[16..]);
        let m = m0 & m1;
        x0.set_cond(&GFp127::ZERO, !m);
        x1.set_cond(&GFp127::ZERO, !m);
        (Self([ x0, x1 ]), m)
    }

    /// Decode a value from 32 bytes. Returns `None` if the source has
    /// the wrong length or is not a canonical encoding. Side channels
    /// may leak whether the decoding succeeded, but not the value itself.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (x, m) = Self::decode_ct(buf);
        if m != 0 {
            Some(x)
        } else {
            None
        }
    }
}

impl Add<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn add(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn add_assign(&mut self, other: GFp254) {
        self.set_add(&other);
    }
}

impl AddAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn add_assign(&mut self, other: &GFp254) {
        self.set_add(other);
    }
}

impl Div<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_div(other);
        r
    }
}

impl Div<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_div(&other);
        r
    }
}

impl Div<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn div(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_div(other);
        r
    }
}

impl DivAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn div_assign(&mut self, other: GFp254) {
        self.set_div(&other);
    }
}

impl DivAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn div_assign(&mut self, other: &GFp254) {
        self.set_div(other);
    }
}

impl Mul<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn mul(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn mul_assign(&mut self, other: GFp254) {
        self.set_mul(&other);
    }
}

impl MulAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn mul_assign(&mut self, other: &GFp254) {
        self.set_mul(other);
    }
}

impl Neg for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn neg(self) -> GFp254 {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn neg(self) -> GFp254 {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: GFp254) -> GFp254 {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp254> for GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: &GFp254) -> GFp254 {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: GFp254) -> GFp254 {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp254> for &GFp254 {
    type Output = GFp254;

    #[inline(always)]
    fn sub(self, other: &GFp254) -> GFp254 {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<GFp254> for GFp254 {
    #[inline(always)]
    fn sub_assign(&mut self, other: GFp254) {
        self.set_sub(&other);
    }
}

impl SubAssign<&GFp254> for GFp254 {
    #[inline(always)]
    fn sub_assign(&mut self, other: &GFp254) {
        self.set_sub(other);
    }
}

// ========================================================================
