//! Ted252 implementation.
//!
//! This module implements the Ted252 curve, a twisted Edwards curve
//! defined over the field GF(p^2) for the Mersenne prime p = 2^127 - 1,
//! with GF(p^2) = GF(p)[i]/(i^2 + 1). The curve equation is:
//! `a*x^2 + y^2 = 1 + d*x^2*y^2`, with `a = -(2+i)` and `d = 109*(2+i)`.
//!
//! The curve is the quadratic twist by the non-square `2+i` of the
//! Fp-rational curve `-x^2 + y^2 = 1 + 109*x^2*y^2`, whose Frobenius
//! trace is `t = 0xC5A59E01450F4A4C`. The curve order is `4*q` for the
//! 252-bit prime:
//! `q = 0x0FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA6261414C0DC87D3CE9B68E3B09E01A5`
//! (integers modulo q are represented by the `Scalar` type). The twist
//! construction provides an efficiently computable endomorphism `psi`
//! (built from the field Frobenius) which acts on the q-torsion as
//! multiplication by a square root of -1 modulo q; scalar multiplication
//! leverages it by splitting scalars into two half-width subscalars.
//!
//! Points use extended homogeneous coordinates (X:Y:Z:T) with x = X/Z,
//! y = Y/Z and T = X*Y/Z; additions and doublings use the unified
//! Hisil-Wong-Carter-Dawson formulas.
//!
//! MULTIPLICATION CONVENTION: all scalar multiplication functions (and
//! the `*` operators) multiply by the cofactor as well: the result of
//! multiplying P by scalar k is `4*k*P`. The extra factor forces results
//! into the prime-order subgroup and thwarts small-subgroup attacks.
//! Callers who need an unscaled k*P can use the scalar `k/4 mod q`
//! instead of k. Valid input scalars are in the 1 to q-1 range; the
//! functions are total (any scalar yields some point) but only results
//! derived from in-range scalars are meaningful.
//!
//! A point is encoded over 64 bytes: the affine x and y coordinates, in
//! that order, each over 32 bytes. Decoding verifies that the
//! coordinates are canonical field elements and that the point is on
//! the curve; it does not check membership in the prime-order subgroup
//! (the cofactor multiplication built into the scalar multiplications
//! makes that check unnecessary).

#![allow(non_snake_case)]

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use super::field::GFp254;
use super::backend::{sgnw, Scalar252, Zu128, Zu256, Zu384};
use super::{CryptoRng, RngCore};

/// A Ted252 curve point.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    // Extended coordinates; Z != 0 for all points produced by this
    // module. x = X/Z, y = Y/Z, T = X*Y/Z.
    X: GFp254,
    Y: GFp254,
    Z: GFp254,
    T: GFp254,
}

/// Integers modulo the prime q (the order of the prime subgroup).
pub type Scalar = Scalar252;

impl Scalar {

    /// The eigenvalue of the psi() endomorphism on the prime-order
    /// subgroup: psi(P) = MU*P for all P of order q, and MU^2 = -1 mod q.
    pub const MU: Self = Self::w64le(
        0x02A20BCBF3110C16, 0xFDFE4F77E2479207,
        0x4F56B7F3344BD41C, 0x013DEF7FF97DF1E5);

    /// Decode a 256-bit value (32 bytes, little-endian) into a scalar
    /// by clearing its top five bits. The result is at most 251 bits,
    /// hence strictly lower than q; sampling the source bytes uniformly
    /// yields a nearly uniform scalar with no rejection loop.
    pub fn decode_trim(buf: &[u8; 32]) -> Self {
        let mut k = [0u64; 4];
        for i in 0..4 {
            let mut w = [0u8; 8];
            w.copy_from_slice(&buf[(8 * i)..(8 * i + 8)]);
            k[i] = u64::from_le_bytes(w);
        }
        mask_scalar(&mut k);
        Self::w64le(k[0], k[1], k[2], k[3])
    }

    /// Generate a non-zero scalar from a cryptographically secure RNG,
    /// with negligible bias.
    pub fn generate<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        loop {
            let mut tmp = [0u8; 32];
            rng.fill_bytes(&mut tmp);
            let k = Self::decode_trim(&tmp);
            if k.iszero() == 0 {
                return k;
            }
        }
    }
}

/// Mask a 256-bit value (four 64-bit limbs, little-endian order) into a
/// scalar compatible with the curve order: the top five bits are
/// cleared, which clips the value to at most 251 bits, strictly below
/// q. One bit more than strictly necessary is cleared so that uniform
/// sampling needs no rejection.
#[inline]
pub fn mask_scalar(k: &mut [u64; 4]) {
    k[3] &= 0x07FFFFFFFFFFFFFFu64;
}

impl Point {

    /// The group neutral (0, 1).
    pub const NEUTRAL: Self = Self {
        X: GFp254::ZERO,
        Y: GFp254::ONE,
        Z: GFp254::ONE,
        T: GFp254::ZERO,
    };

    /// The conventional generator of the prime-order subgroup.
    ///
    /// This is the point 4*P0, for P0 the curve point with x = (2, 0)
    /// and the y coordinate whose first component is even; it has order
    /// exactly q.
    pub const BASE: Self = Self {
        X: GFp254::w64le(0x257DF51CB10D46B9, 0x12C8124FEB812EDA,
                         0x34E5D78F601B4825, 0x35AF79D0729C3237),
        Y: GFp254::w64le(0x1407A368945FF792, 0x51F898119F270C3C,
                         0x5D39E8D40D624E20, 0x0B8A275703B201B9),
        Z: GFp254::ONE,
        T: GFp254::w64le(0x202E59EAC31DC686, 0x7D6AF8B95D1B69AC,
                         0x77720A7248B485C6, 0x7D276AC5B42B613A),
    };

    // psi() constant: w = (2+i)^((p-1)/2). The endomorphism is
    // psi(x, y) = (w*conj(x), conj(y)).
    const PSI_W: GFp254 = GFp254::w64le(
        0x96A54B277C21F476, 0x260CF396B12CCDE7,
        0x2D4A964EF843E8EC, 0x4C19E72D62599BCF);

    // Multiply a field element by the curve constant a = -(2+i).
    #[inline(always)]
    fn mul_curve_a(x: &GFp254) -> GFp254 {
        // (2+i)*(x0 + i*x1) = (2*x0 - x1) + i*(x0 + 2*x1)
        let (x0, x1) = x.to_components();
        GFp254::from_p127(x1 - x0.mul2(), -(x0 + x1.mul2()))
    }

    // Multiply a field element by the curve constant d = 109*(2+i).
    #[inline(always)]
    fn mul_curve_d(x: &GFp254) -> GFp254 {
        let (x0, x1) = x.to_components();
        GFp254::from_p127((x0.mul2() - x1).mul_small(109),
                          (x0 + x1.mul2()).mul_small(109))
    }

    /// Decode a point from exactly 64 bytes (affine x then y, each over
    /// 32 bytes). On success, 0xFFFFFFFF is returned; on failure (wrong
    /// length, non-canonical coordinate, or point not on the curve),
    /// 0x00000000 is returned and this point is set to the neutral.
    ///
    /// For a 64-byte input, the decoding outcome does not leak anything
    /// beyond success or failure through timing-based side channels.
    pub fn set_decode(&mut self, buf: &[u8]) -> u32 {
        if buf.len() != 64 {
            *self = Self::NEUTRAL;
            return 0;
        }
        let (x, mx) = GFp254::decode_ct(&buf[..32]);
        let (y, my) = GFp254::decode_ct(&buf[32..]);
        let mut r = mx & my;

        // Curve equation: a*x^2 + y^2 = 1 + d*x^2*y^2.
        let xx = x.square();
        let yy = y.square();
        let lhs = Self::mul_curve_a(&xx) + yy;
        let rhs = GFp254::ONE + Self::mul_curve_d(&(xx * yy));
        r &= lhs.equals(rhs);

        self.X = x;
        self.Y = y;
        self.Z = GFp254::ONE;
        self.T = x * y;
        self.set_cond(&Self::NEUTRAL, !r);
        r
    }

    /// Decode a point from 64 bytes (see `set_decode`). Returns `None`
    /// on failure; this inherently leaks the success/failure outcome
    /// through timing, but not the point itself.
    pub fn decode(buf: &[u8]) -> Option<Point> {
        let mut P = Point::NEUTRAL;
        if P.set_decode(buf) != 0 {
            Some(P)
        } else {
            None
        }
    }

    /// Encode this point into exactly 64 bytes (affine x then y, each
    /// over 32 bytes, canonical).
    pub fn encode(self) -> [u8; 64] {
        let zi = self.Z.invert();
        let x = self.X * zi;
        let y = self.Y * zi;
        let mut d = [0u8; 64];
        d[..32].copy_from_slice(&x.encode());
        d[32..].copy_from_slice(&y.encode());
        d
    }

    // Add rhs to this point.
    fn set_add(&mut self, rhs: &Self) {
        let (X1, Y1, Z1, T1) = (self.X, self.Y, self.Z, self.T);
        let (X2, Y2, Z2, T2) = (rhs.X, rhs.Y, rhs.Z, rhs.T);

        // Unified formulas; on this curve the exceptional pairs involve
        // points outside the subgroup relations produced by this module.
        let A = X1 * X2;
        let B = Y1 * Y2;
        let C = Self::mul_curve_d(&(T1 * T2));
        let D = Z1 * Z2;
        let E = (X1 + Y1) * (X2 + Y2) - A - B;
        let F = D - C;
        let G = D + C;
        let H = B - Self::mul_curve_a(&A);
        self.X = E * F;
        self.Y = G * H;
        self.Z = F * G;
        self.T = E * H;
    }

    /// Double this point (in place).
    pub fn set_double(&mut self) {
        let (X1, Y1, Z1) = (self.X, self.Y, self.Z);

        let A = X1.square();
        let B = Y1.square();
        let C = Z1.square().mul2();
        let D = Self::mul_curve_a(&A);
        let E = (X1 + Y1).square() - A - B;
        let G = D + B;
        let F = G - C;
        let H = D - B;
        self.X = E * F;
        self.Y = G * H;
        self.Z = F * G;
        self.T = E * H;
    }

    /// Return the double of this point.
    #[inline(always)]
    pub fn double(self) -> Self {
        let mut r = self;
        r.set_double();
        r
    }

    /// Double this point n times (in place).
    pub fn set_xdouble(&mut self, n: u32) {
        for _ in 0..n {
            self.set_double();
        }
    }

    /// Return 2^n times this point.
    #[inline(always)]
    pub fn xdouble(self, n: u32) -> Self {
        let mut r = self;
        r.set_xdouble(n);
        r
    }

    /// Negate this point (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.X.set_neg();
        self.T.set_neg();
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        self.set_add(&-rhs);
    }

    /// Replace this point with `P` if `ctl` is 0xFFFFFFFF; leave it
    /// unchanged if `ctl` is 0x00000000. `ctl` MUST be one of those two
    /// values.
    #[inline(always)]
    pub fn set_cond(&mut self, P: &Self, ctl: u32) {
        self.X.set_cond(&P.X, ctl);
        self.Y.set_cond(&P.Y, ctl);
        self.Z.set_cond(&P.Z, ctl);
        self.T.set_cond(&P.T, ctl);
    }

    /// Return P0 if `ctl` is 0x00000000, P1 if it is 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(P0: &Self, P1: &Self, ctl: u32) -> Self {
        let mut r = *P0;
        r.set_cond(P1, ctl);
        r
    }

    /// Negate this point if `ctl` is 0xFFFFFFFF; leave it unchanged if
    /// `ctl` is 0x00000000. `ctl` MUST be one of those two values.
    #[inline(always)]
    pub fn set_condneg(&mut self, ctl: u32) {
        self.X.set_cond(&-self.X, ctl);
        self.T.set_cond(&-self.T, ctl);
    }

    /// Compare this point with rhs; returned value is 0xFFFFFFFF if the
    /// points are equal (as group elements), 0x00000000 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        // x1/z1 == x2/z2 and y1/z1 == y2/z2, by cross-multiplication.
        (self.X * rhs.Z).equals(rhs.X * self.Z)
            & (self.Y * rhs.Z).equals(rhs.Y * self.Z)
    }

    /// Return 0xFFFFFFFF if this point is the neutral, 0x00000000
    /// otherwise.
    #[inline]
    pub fn isneutral(self) -> u32 {
        // The neutral is (0, 1); the point (0, -1) has order 2.
        self.X.iszero() & self.Y.equals(self.Z)
    }

    /// Apply the GLS endomorphism psi() on this point (in place). On
    /// the prime-order subgroup, this computes the multiplication by
    /// the scalar `Scalar::MU` (a square root of -1 modulo q).
    /// Parameter `neg` must be 0x00000000 or 0xFFFFFFFF; if non-zero,
    /// the point is also negated.
    #[inline]
    pub fn set_psi(&mut self, neg: u32) {
        // On affine coordinates: psi(x, y) = (w*conj(x), conj(y)), with
        // conj() the Frobenius of GF(p^2) (i.e. conj(x0 + i*x1) =
        // x0 - i*x1) and w = (2+i)^((p-1)/2). The map comes from
        // conjugating the twisting isomorphism: the curve is the twist
        // by 2+i of an Fp-rational curve, and for s = sqrt(2+i) the
        // composition (untwist, Frobenius, twist) sends x to
        // s^(p-1)*conj(x) = w*conj(x) and y to conj(y).
        //
        // In extended coordinates, all of X, Y, Z, T are conjugated,
        // then X and T are multiplied by w (conjugation is a field
        // automorphism, so the representation invariants are kept).
        self.X = Self::PSI_W * self.X.conj();
        self.Y.set_conj();
        self.Z.set_conj();
        self.T = Self::PSI_W * self.T.conj();
        self.set_condneg(neg);
    }

    /// Apply the GLS endomorphism psi() on this point (see `set_psi`).
    #[inline(always)]
    pub fn psi(self, neg: u32) -> Self {
        let mut P = self;
        P.set_psi(neg);
        P
    }

    // Round(k*e/q) for e < 2^127, given as floor((k*e + (q-1)/2)/q),
    // in constant time. The quotient is approximated from the top bits
    // (2^252 = q + CQ) and corrected; two correction levels suffice
    // since CQ < 2^127.
    fn divq_round(k: &Zu256, e: &Zu128) -> Zu128 {
        // (q-1)/2, padded to 384 bits.
        const HQ: Zu384 = Zu384::w64le(
            0xE74DB471D84F00D2, 0xD3130A0A606E43E9,
            0xFFFFFFFFFFFFFFFF, 0x07FFFFFFFFFFFFFF,
            0x0000000000000000, 0x0000000000000000);

        // CQ = 2^252 - q
        const CQ: Zu128 = Zu128::w64le(0x3164971C4F61FE5B, 0x59D9EBEB3F23782C);

        // q (padded to 256 bits)
        const QZ: Zu256 = Zu256::w64le(
            0xCE9B68E3B09E01A5, 0xA6261414C0DC87D3,
            0xFFFFFFFFFFFFFFFF, 0x0FFFFFFFFFFFFFFF);

        // z <- k*e + (q-1)/2  (z < 2^378)
        let mut z = k.mul256x128(e);
        z.set_add(&HQ);

        // Split z = v + u*2^252; first quotient estimate is u.
        let (v, u) = z.trunc_and_rsh252();

        // w1 <- u*CQ + v (< 2^254); second estimate u2 = w1 >> 252.
        let mut w1 = u.mul128x128(&CQ);
        w1.set_add(&v);
        let (v2, u2) = w1.trunc_and_rsh252();

        // w2 <- u2*CQ + v2 (< 2^252 + 2^129); the exact quotient is
        // u + u2, plus one if w2 >= q.
        let mut w2 = CQ.mul128x64(u2);
        w2.set_add(&v2);
        let ge = 1 - w2.borrow(&QZ);

        let mut c = u;
        c.set_add_u64(u2);
        c.set_add_u64(ge);
        c
    }

    /// Split a scalar k into k0 and k1 (signed) such that
    /// k = k0 + k1*MU mod q (for MU the square root of -1 modulo q that
    /// matches the psi() endomorphism).
    ///
    /// This function returns |k0|, sgn(k0), |k1| and sgn(k1), with
    /// sgn(x) = 0xFFFFFFFF if x < 0, 0x00000000 for x >= 0. It is
    /// guaranteed that |k0| and |k1| are lower than 2^125 + 2^62 (in
    /// particular both fit in 126 bits).
    pub fn split_psi(k: &Scalar) -> (u128, u32, u128, u32) {
        // The lattice of the (u, v) with u + v*MU = 0 mod q admits the
        // orthogonal basis ((p-1)/2, t/2), (t/2, -(p-1)/2), whose
        // determinant is ((p-1)^2 + t^2)/4 = q exactly. Rounded
        // projection on that basis bounds both output magnitudes by
        // ((p-1)/2 + t/2)/2 < 2^125 + 2^62.
        const E1: Zu128 = Zu128::w64le(0xFFFFFFFFFFFFFFFF, 0x3FFFFFFFFFFFFFFF);
        const E2: Zu128 = Zu128::w64le(0x62D2CF00A287A526, 0x0000000000000000);

        let ki = match Zu256::decode(&k.encode()) {
            Some(x) => x,
            None => Zu256::ZERO,
        };

        // c1 = round(k*E1/q), c2 = round(k*E2/q)
        let c1 = Self::divq_round(&ki, &E1);
        let c2 = Self::divq_round(&ki, &E2);

        // k0 = k - c1*E1 - c2*E2
        // k1 = c2*E1 - c1*E2
        // (two's complement on 128 bits; both fit with room to spare)
        let mut k0 = ki.trunc128();
        k0.set_sub(&c1.mul128x128trunc(&E1));
        k0.set_sub(&c2.mul128x128trunc(&E2));
        let mut k1 = c2.mul128x128trunc(&E1);
        k1.set_sub(&c1.mul128x128trunc(&E2));

        let (n0, s0) = k0.abs();
        let (n1, s1) = k1.abs();
        (n0, s0, n1, s1)
    }

    // Regular (GLV-SAC) recoding of two subscalars, digit length 128.
    // On output, bit i of `a` holds the sign of the window digit at
    // position i (1 means positive) and bit i of `b` holds the
    // corresponding magnitude digit; the top bit of `a` is always 1.
    // The represented value of the pair is (a + lsb, b) where lsb is
    // the returned word (0 or 1): when the original `a` was even, one
    // correction subtraction of the base point is owed by the caller.
    // Adding (rather than subtracting) the alignment bit keeps the
    // subscalar 0 in range, which the scalar split can produce (e.g.
    // for k = MU).
    fn recode_2(a: &mut u128, b: &mut u128, len: u32) -> u32 {
        let lsb = ((*a as u32) & 1) ^ 1;
        *a = a.wrapping_add(lsb as u128) >> 1;
        *a |= 1u128 << (len - 1);

        let an = !*a;
        let mut mask = 1u128;
        for _ in 1..len {
            let anmask = an & mask;
            *b = b.wrapping_add((*b & anmask) << 1);
            mask <<= 1;
        }

        lsb
    }

    // Regular (GLV-SAC) recoding of four subscalars, digit length 127
    // (same structure as recode_2; `a` is the sign-aligner, the three
    // other subscalars carry magnitude digits).
    fn recode_4(a: &mut u128, b: &mut u128, c: &mut u128, d: &mut u128,
                len: u32) -> u32
    {
        let lsb = ((*a as u32) & 1) ^ 1;
        *a = a.wrapping_add(lsb as u128) >> 1;
        *a |= 1u128 << (len - 1);

        let an = !*a;
        let mut mask = 1u128;
        for _ in 1..len {
            let anmask = an & mask;
            *b = b.wrapping_add((*b & anmask) << 1);
            *c = c.wrapping_add((*c & anmask) << 1);
            *d = d.wrapping_add((*d & anmask) << 1);
            mask <<= 1;
        }

        lsb
    }

    // Precomputed table for the two-subscalar ladder (window of 2 bits):
    //   T[0] = 3P        T[4] = P
    //   T[1] = 3P + Q    T[5] = P - Q
    //   T[2] = 3P + 2Q   T[6] = P + 2Q
    //   T[3] = 3P + 3Q   T[7] = P + Q
    // The asymmetric entries 5 and 6 match the sign-index coding of
    // select_2(): two index bits plus a parity XOR cover all 16 signed
    // window combinations through conditional negation.
    fn gen_table_2(P: &Self, Q: &Self) -> [Self; 8] {
        let mut T = [Self::NEUTRAL; 8];
        T[4] = *P;
        T[0] = P.double() + P;
        T[7] = *P + Q;
        T[1] = T[0] + Q;
        T[2] = T[1] + Q;
        T[3] = T[2] + Q;
        T[5] = *P - Q;
        T[6] = T[7] + Q;
        T
    }

    // Precomputed table for the simultaneous ladder (window of 1 bit):
    // T[j] = A + (j0 ? B : 0) + (j1 ? C : 0) + (j2 ? D : 0), reusing
    // already-built entries to save curve additions.
    fn gen_table_4(A: &Self, B: &Self, C: &Self, D: &Self) -> [Self; 8] {
        let mut T = [Self::NEUTRAL; 8];
        T[0] = *A;
        T[1] = *A + B;
        T[2] = *A + C;
        T[3] = T[1] + C;
        T[4] = *A + D;
        T[5] = T[1] + D;
        T[6] = T[2] + D;
        T[7] = T[3] + D;
        T
    }

    // Constant-time table lookup: all eight entries are scanned, and
    // the selected one (index k, which MUST be in the 0..7 range) is
    // accumulated through full-width masks. No memory access pattern or
    // branch depends on k.
    fn lookup8(tab: &[Self; 8], k: u32) -> Self {
        let mut r = Self {
            X: GFp254::ZERO,
            Y: GFp254::ZERO,
            Z: GFp254::ZERO,
            T: GFp254::ZERO,
        };
        for j in 0..8u32 {
            // m = all-ones iff j == k (both are in the 0..7 range, so
            // only j == k makes the subtraction wrap).
            let m = sgnw(((j ^ k) as u64).wrapping_sub(1)) as u32;
            r.X.set_cond_or(&tab[j as usize].X, m);
            r.Y.set_cond_or(&tab[j as usize].Y, m);
            r.Z.set_cond_or(&tab[j as usize].Z, m);
            r.T.set_cond_or(&tab[j as usize].T, m);
        }
        r
    }

    // Table selection for the two-subscalar ladder: reads the digit at
    // bit positions i and i+1 of the recoded pair (a, b); the sign is
    // carried by bit i+1 of a.
    fn select_2(tab: &[Self; 8], a: u128, b: u128, i: u32) -> Self {
        let bits = (a >> i) as u32;
        let k = (((bits ^ (bits >> 1)) & 1) << 2) | (((b >> i) as u32) & 3);
        let mut r = Self::lookup8(tab, k);
        r.set_condneg((((bits >> 1) & 1) ^ 1).wrapping_neg());
        r
    }

    // Table selection for the simultaneous ladder: one magnitude bit
    // from each of b, c, d; the sign is bit i of a.
    fn select_4(tab: &[Self; 8], a: u128, b: u128, c: u128, d: u128, i: u32)
        -> Self
    {
        let k = (((b >> i) as u32) & 1)
            | ((((c >> i) as u32) & 1) << 1)
            | ((((d >> i) as u32) & 1) << 2);
        let mut r = Self::lookup8(tab, k);
        r.set_condneg(((((a >> i) as u32) & 1) ^ 1).wrapping_neg());
        r
    }

    /// Multiply this point by the provided scalar and by the cofactor:
    /// this point is replaced by `4*n*self` (constant-time).
    pub fn set_mul(&mut self, n: &Scalar) {
        // Split the scalar with the endomorphism.
        let (n0, s0, n1, s1) = Self::split_psi(n);

        // Q = psi(P), sign-corrected; P sign-corrected.
        let Q = self.psi(s1);
        let mut P = *self;
        P.set_condneg(s0);

        // Precompute the 8-entry window table.
        let tab = Self::gen_table_2(&P, &Q);

        // Recode the two subscalars (128 digit positions).
        let (mut a, mut b) = (n0, n1);
        let lsb = Self::recode_2(&mut a, &mut b, 128);

        // Regular 2-bit-window ladder over bit positions 126 down to 0.
        let mut X = Self::select_2(&tab, a, b, 126);
        let mut i = 124i32;
        while i >= 0 {
            let T = Self::select_2(&tab, a, b, i as u32);
            X.set_double();
            X.set_double();
            X.set_add(&T);
            i -= 2;
        }

        // The recoding represented n0 + lsb; subtract P once if the
        // alignment bit was set.
        let C = X - P;
        X.set_cond(&C, lsb.wrapping_neg());

        // Multiply by the cofactor.
        X.set_double();
        X.set_double();

        *self = X;
    }

    /// Multiply the conventional generator by the provided scalar and
    /// by the cofactor: the returned point is `4*n*B` (constant-time),
    /// for B the generator of the prime-order subgroup.
    pub fn mulgen(n: &Scalar) -> Self {
        let mut P = Self::BASE;
        P.set_mul(n);
        P
    }

    /// Simultaneous double multiplication, with cofactor: the returned
    /// point is `4*(u*P + v*Q)` (constant-time).
    pub fn simul(u: &Scalar, P: &Self, v: &Scalar, Q: &Self) -> Self {
        // Split both scalars.
        let (u0, su0, u1, su1) = Self::split_psi(u);
        let (v0, sv0, v1, sv1) = Self::split_psi(v);

        // Base points and their endomorphism images, sign-corrected.
        let P1 = P.psi(su1);
        let Q1 = Q.psi(sv1);
        let mut P0 = *P;
        P0.set_condneg(su0);
        let mut Q0 = *Q;
        Q0.set_condneg(sv0);

        // Precompute the subset-sum table over (P0, P1, Q0, Q1).
        let tab = Self::gen_table_4(&P0, &P1, &Q0, &Q1);

        // Recode the four subscalars (127 digit positions).
        let (mut a, mut b, mut c, mut d) = (u0, u1, v0, v1);
        let lsb = Self::recode_4(&mut a, &mut b, &mut c, &mut d, 127);

        // Regular 1-bit-window ladder over bit positions 126 down to 0.
        let mut X = Self::select_4(&tab, a, b, c, d, 126);
        for i in (0..126).rev() {
            let T = Self::select_4(&tab, a, b, c, d, i as u32);
            X.set_double();
            X.set_add(&T);
        }

        // Alignment correction (on the aligner's base point), then
        // cofactor.
        let C = X - P0;
        X.set_cond(&C, lsb.wrapping_neg());
        X.set_double();
        X.set_double();

        X
    }
}

impl Add<Point> for Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: Point) -> Point {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&Point> for Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: &Point) -> Point {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<Point> for &Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: Point) -> Point {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: &Point) -> Point {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<Point> for Point {
    #[inline(always)]
    fn add_assign(&mut self, other: Point) {
        self.set_add(&other);
    }
}

impl AddAssign<&Point> for Point {
    #[inline(always)]
    fn add_assign(&mut self, other: &Point) {
        self.set_add(other);
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: Scalar) -> Point {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar> for Point {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: &Scalar) -> Point {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<Scalar> for &Point {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: Scalar) -> Point {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar> for &Point {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: &Scalar) -> Point {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<Scalar> for Point {
    #[inline(always)]
    fn mul_assign(&mut self, other: Scalar) {
        self.set_mul(&other);
    }
}

impl MulAssign<&Scalar> for Point {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Scalar) {
        self.set_mul(other);
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: Point) -> Point {
        let mut r = other;
        r.set_mul(&self);
        r
    }
}

impl Mul<&Point> for Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: &Point) -> Point {
        let mut r = *other;
        r.set_mul(&self);
        r
    }
}

impl Mul<Point> for &Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: Point) -> Point {
        let mut r = other;
        r.set_mul(self);
        r
    }
}

impl Mul<&Point> for &Scalar {
    type Output = Point;

    #[inline(always)]
    fn mul(self, other: &Point) -> Point {
        let mut r = *other;
        r.set_mul(self);
        r
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline(always)]
    fn neg(self) -> Point {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &Point {
    type Output = Point;

    #[inline(always)]
    fn neg(self) -> Point {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: Point) -> Point {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Point> for Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: &Point) -> Point {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<Point> for &Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: Point) -> Point {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: &Point) -> Point {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<Point> for Point {
    #[inline(always)]
    fn sub_assign(&mut self, other: Point) {
        self.set_sub(&other);
    }
}

impl SubAssign<&Point> for Point {
    #[inline(always)]
    fn sub_assign(&mut self, other: &Point) {
        self.set_sub(other);
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::{Point, Scalar, mask_scalar};
    use sha2::{Sha256, Digest};
    use crate::{CryptoRng, RngCore};

    static KAT_ADD: [[&str; 6]; 8] = [
        [
"de4e9d50a18592e68d80ca242cb49146c161089de7d3b611f7160daff230111f4eb61108d1e09764e7fa36d0f0d121297a207bd4d96f30a34266d5efde34cb68",
"836b6b495d8e8d6e145c28656272dd21f508d0e845486795d7fc52f1d3525073f9f13918a37ee5596ae3033cb41e3f2a32deae21fe1abf6edc4ad6eb50c1d908",
"4573f4afad895c981915fb546d07390895a9e31977e04d1a5d673c68b54d8377ee01bb0d33b247a06245e5035c50ac26c840304fca58caec424618b71d7b8e7d",
"afd2101bcf69c5202566acc5425fce23e3d20db906d0bc0d5a48a4116cdb756b61ff49768917781906cecc4e13bbb61532b0bb2c2418966614b2dca8deb9fd3d",
"994199766ca69802b1c3b0a3e0e31d1fe50f1ba3689d6c1aad965440a64e4b1691d5bddb57ffc2e0de91a4ab401dc94d8bca166d34c866b8f6493221eab74659",
"afec529f3241136d1832462be7087a79bd4b6c3cd6c9e5dc5df7993a327cbd08cc6433595345d9f500f775f2ef355a241f07e9f95acb5b76f92ea8c3beb37138",
        ],
        [
"a9957b361ebcd17b54d4e24df786706041b5d0e95f5d596acb3b290fda5a9d2b33ef7ad5dbf5e50625db6c6867b7ec502cbab4ca712500bfeaff72d5eb6f7929",
"6df8c957ae8b85d2f589448283a6b1119bb662a64f40eb14841e4f1197aa7540d3ba5f28772d866bffc270df0000806c517aa4fbaf1ef4adab2e38aa6a9e5d75",
"f6566bb3e3a49510dcfb618de2061309eafb0b3ab2a63d1aa679e0dee03c1e6750e3f102fbacbc073ae81d663b9c6b08ca938eb4b5770eefe22e377d1453f37c",
"ee4afd246d74d4511a949703f673bf369d824ba56fb6ae41cc4463ce66e16d6cae408b6386bd97ccb9911c32c6a580153d5fa9e3008e916318c05a27e619637c",
"2568cc66a10893a60736fe1bc1eebd57bd6a7fa6d13446987dbc9c4357b8f2004f403e68566051d9c125bb023f5d300ef6f1f8f53b332505128ee45ef07eb951",
"054b1e0681b25ab9fbbf992e4ebf5c754f4293dd49daf15a32618900718c427deedeccceee1d8af2c681497d2152574745c2841a582520e1505200d6acf06201",
        ],
        [
"640b048cebd696e2ad87e53c364f407b1e67f6b4bd161758b8ece8f71386ec7df4191a0f4456f0e94a053457b69f9d3b83f2b84e43c233f005403cb73976c532",
"331a312b12ebd182eb95409971edbb4e24a0c182870dc660ccdeeae2c091db7a06878b89195e45a74c5a5d5459f7ad708a913531fe03cfa63e796b3b697eb01d",
"3d357319433a444fbafc759a46095208e09fef4ea577bedb72af0975ff5cd41eceafe3f97981a534ebac89aa1eec311d5916653551e71352550e11b2f2f00a2e",
"94625f85ddee819a85497061e254ab275228f44f7ea18cee0a43c1a0e41ffa1666654eaf32c3d20c68e76d9a0c2b4b4319876108141b9e4c90224fa5eda08917",
"91983415b6e964afe9afb27d12d7245536b9025967888786f0e9e674ef740a4b96f452131775f473bf9675d37d81d40f57d4758083e24dcb983272b0805dc956",
"32dc88ae8c1492e76ae04a9e1075d43ad660f08adfd9a8d31f4e60de9d1dbb746d4249f0e1e712a88d411c7b73947c3dc14eb822b6749e99f86c35317c959741",
        ],
        [
"ad5450c0d22915cea90e9544e9196125cb01144f11c80155c372c5ded232691164cfd82dc28857985bda6dda29bba515dd70fc861a4a5cc216d61e4a2cfa9177",
"8271606fccac2388c2d837ca1ff98e0b315ab0268f12c265909b0936354c6e07e080979fac9a4741ae9378190c10246399e4ae99dd622efb718b350fd972b653",
"88d9894ec576ecb92ed816ec8caf1a1480f5f236d04e5045afac87c09f59a8313faf7685888ae46744e6374725bf8f5f47c070cf437a7a0cbcb6a252a01e4526",
"96f03207e6a74a7a04f11bfa3c7ed832a3e335aae0569efc7e1f6625a0174429b58a2c99fb475c010aa42ee01004a97c22e02da0a7a3bcdc16862a0e8f530165",
"ab4aa7a99e2523a0714a9651057cc926443cd1676fc4b77779ed9fd75d6add7df55f9bc776d5a7bad3744b8bc468b4626ff4b38a514425ff549fc76a0e3f2649",
"2a01a944f21e2e806d9a96082299eb2b32d24f43274dd59e05724d4cbad48a268b99610161dbaa5616f44aac32248f53b9c56b92529573ac84fb868f8540a17f",
        ],
        [
"86c175fb70d0a4c729d3fffc78ed01367227c094607475220d7bcfdab1f4423e9dd76404eab3b8efebc14c1ea6812b4f69564f8973c6c214b140c2900bcf8e08",
"2a09727e7ff82f612cafbd98c4d03c003f0a7b7ac70deccf3cfd8cd9fcbc84516c999ecd32471dcef2e3113c77bb8c2f0cb3680e9e2367d651af44d494c68e04",
"a164f6083dfa4ba7153d1f818704985a3c57b9f0328817848ce7293dd28ae13ba0d4e86d618b072e71725efce0cc5c3e75f1847bdb3e7f777c8cf22ed8f7012d",
"d9021c2fc9e1d5981996544448dd7800a56610c05d2ada21c840795797ad2a3caba640f77233db2ef0d71d8f7f403c6b884b95674c4328d582aee86613fa246f",
"397a016e3f08deb49bd9fce5ae45d92fa8a0b31eab5b2c40ccc1e6ac450106020c7e3e1fe5a10d9409e304984597d94b3dbf273255d525f5fb6480ff1d6fc062",
"b7313f4c2148e0ac10c6bfa324089d331facf3fe9b86527aae579536daf7a95eeb9097f72f412a77c5c83422e76ac864d09f37ad67b27550592e3ac006dd8014",
        ],
        [
"430ff67bdb3b9d723de70c55a6b768358c12a2a6b099a6adb64e5814cfe0bb68d0aa900b90ad572e8f83cc8dac0cd204121318474fc41387bfcb711b09e7d675",
"9437dcdd6c257eeeae7209f7f6a27f6d0c4c6e5a2ea01b373acd1556b9aebc52da2294a5dc50e433a2ea5b6712825411810205eaa187d660db484caa2cedd849",
"f0b9c38f11f2e72aa7025ce109b83346371dbce9dc55ef8d046340bde203bf706c4ba5793c085e532992c466b4d2d174e30a5e1db010e329c71df6f64837795e",
"69e441a568bb0bcf0dd9dcec54055624e8efd9bb8e8d89066ea859d2200995234dd48917bdd0d741df0defb76bbe0265fb09142d2531a77dca872641f92fc92c",
"9cd762ff883dc0ead087673c41ef6b1e2654db6a8aab1f2e53f1ccf1e5db1f7678356ad929597bdf1db8b34d9cc28f61ea1d8d83a42132409da9db82c3b1cb1d",
"9a4dc02132c314c5cb63e5014d365f699002b67510f66e0dd552452ce39993127607636a78ad24e4762d0791b688a45e5df83559c1fc8c53e030b196bd340f24",
        ],
        [
"5c8fcf522b218beb756fd9451ee6813fd7514ec037c0cb1b3e1c65edc1122b5e12f5a49dbe852f0a2664828a264a77569325bd96151708923184bd7ee86be719",
"c86f32a926a1197667b0b603e250d161193c2126e08c38c409a78dfef894ea5c25d6da8ca8e1cbfdc4ca372aa37ebc72e51b1d1105c4572f0a7a14011069890d",
"06d1f781aa9ef40ae2a8c097111b875582346af545d11a8939bb87cc90061269f7007f6d02cc905f8d695560f04f293b32b6a2382fbb67182a7378bde4d89b29",
"db8c9452ce6ad8824eb8849d53eb51211b60d6853f6a22034e295eb51f049868fd2fea07461ccef71436ff04c2770d296fbe85097cc2a0e076eaa457c348dd68",
"809a93696ce2fae0b8ff7d908cce4e67808629332ce57b66cfd0392435c5765456a439d7fb7e4495142e6e4f113da97ec09847765b12be10a9b3bc0b221eb968",
"a7a75b84fa294fe69b202e61ed137856852cde829fd3765377084390193215394dd1baea21b5cbecb29a4fcab644596512ccecee94963acc65a8b0d21a5ac755",
        ],
        [
"bbfbb5ce3e1cc35a672ca471a66d675c67f80b3f10ae3d525d21603f4c53b017b9b43e704651de5e8ec3653cc7a57e04cb4196589a3b67990fa068a092087101",
"9fe2ec2630355d35aed33e6a9e77a75fd6a5489fb2efa8e3b45fdee65fbe9e7b1849d61f3b55f85e7b3f62292da362373ec2f4bffc173cd0ee47a34c6fe8203e",
"b0545a2c5b047dcc54d9e30ea020bd502353700b248145d373cbd06f5864751ae7053f1f93a0c7c50579929f5537500bfab8bbd95de21121294ed26671e2f858",
"99079da5890ade0f9618e92a51c69c16d3a852f5d3c3b7d4159963385c46ae55c1f249d17ebd72f4f959b678d564441e3ba3b53137cedf67f2d09e8099f11609",
"1bcb7d856c7966b5a40f9fd150333e66f6c35d4d5c3bca6881b7edf27193720b3326cfd05423fc940ccc08508ad0ac6adeb294632e45cab192b58b4723476f5a",
"6da8b0afa2c7fda7ef0c716ea0313715bbb891a4b0a88cf204f3a59c0d060e4a98a952ca5a1885e6b1406253aa80b66fcfedc8d23cb1c121b92658e5d399862a",
        ],
    ];

    static KAT_DECODE_BAD: [&str; 8] = [
"7d6555350cb5695487d3ab824949e509e11bbd47e9cba0f026252af652788b74beea3ef5c5bea707e52a4c727c94da4adfab8dc50770808c9bb5fe354f4e7e12",
"0b6cc156d8e885cdf12d4f4187a6922cb6cb8d0620d363a10695b180036c03284a22ebf0fa5d58d954edb4b5ab5d7b5cc3cf5a83ff3b11ffa2f98966cab0a666",
"4df62952b7be91718046603ab286bc127fc49f81903ef76c6616a6357527805409868595bc9ef959cb9a0dde81ce5416964025c188c3d488b5bc16b2d334b61e",
"2acfcc6749b63adc61c801f8ad93134e3b7fe9dd22319e268bc865d19b1ec909c836be97f444fd85990e11ebcafb646cd31eefc0b46e88eab25743bb30c6a533",
"30cbe4d50fb06cefedd544bf5294a20a792a23b2d35d6adbdef330b2c602190a6e956677e68021a6101af8940b26df5bf0f198ba1ad2b8284c021dc395a9da6c",
"d9299db1d695a5442de0ae7c0f238b041cfb561a4992b58721028414da19651fbf0832312e1aafbaa05c431facaa67442c2b508e752d26beceafde697c1a7853",
"3acf985e02270c7b0da0ab3b1894b145d20d30c169ab73798aec6d5c4104a02b2a78878e749b6352369cc8795fa8491b52de685c314c3ccf133e0f2f25e14821",
"c016d19ad4e5cd160f5d63d86d831e6f5ca70723138f79a238868416bfbd8c1faee41a8ed0ee04504f22f56851c4c2347036a76d52f1d036e0f0e455417d881b",
    ];

    static KAT_PSI: [[&str; 2]; 4] = [
        [
"444550b79978acc624ed6fd4af10325de1229f4b1fbe948521dada9ca898d40a5bd2d9679189c284557df32a617fa92e72153d799fe88398f80c8477027aa818",
"aa8b3438178948eaaf5b7db99c2b612ce0fc0d2d88a6426f2fd92d6d6901e1625bd2d9679189c284557df32a617fa92e8deac28660177c6707f37b88fd855767",
        ],
        [
"a841ba80b92c2f4a2fd409ce3c6990705d258bbbf022653d75fa9367cbf5cf6475da328bfb34f6219e78c4e5913ec15d6ef69b22a3aa08754480e1782d46a50a",
"c795d57506f14303b4df88fdfc2f5a0fe4f0f24f13edcf5f629bf5734879c40075da328bfb34f6219e78c4e5913ec15d910964dd5c55f78abb7f1e87d2b95a75",
        ],
        [
"f527fca3e8e032e5e86e115fdd6f8d2092514d43872b58cb476cdac0e016f73561c7c30d639b4f10818427a7d0996c5e752fc378e4e477887ebafcaddc67d541",
"21fe2253b15c91270c3780e263eccd140f440f0805ea3bf24cecdca34d64042561c7c30d639b4f10818427a7d0996c5e8ad03c871b1b88778145035223982a3e",
        ],
        [
"08b0c6faac2b1b40337db8df3c0ee00957a5979206a913a65cd1d7a76877591ca6574551d1abcabb925a09602fc1a75ac0f787cd121c8bdcf419b4b85cb6f130",
"56f41c2dbe69f676fc3cbad4a953cb58f55d5efc772745aedb1a24e56142c746a6574551d1abcabb925a09602fc1a75a3f087832ede374230be64b47a3490e4f",
        ],
    ];

    static KAT_MUL: [[&str; 3]; 8] = [
        [
"0000000000000000000000000000000000000000000000000000000000000001",
"b9460db11cf57d25da2e81eb4f12c81225481b608fd7e53437329c72d079af3592f75f9468a307143c0c279f1198f851204e620dd4e8395db901b20357278a0b",
"a1d36be8e8bd3653f8b492b9edf5da51342824cf5385dcaa41ec178764e62b136670e3c26dcec6d3536a4701d50a032342997aee7bc0d2fea68156d37109b27c",
        ],
        [
"0fffffffffffffffffffffffffffffffa6261414c0dc87d3ce9b68e3b09e01a4",
"b9460db11cf57d25da2e81eb4f12c81225481b608fd7e53437329c72d079af3592f75f9468a307143c0c279f1198f851204e620dd4e8395db901b20357278a0b",
"5e2c94171742c9ac074b6d46120a252ecbd7db30ac7a2355be13e8789b19d46c6670e3c26dcec6d3536a4701d50a032342997aee7bc0d2fea68156d37109b27c",
        ],
        [
"0400000000000000000000000000000000000000000000000000000000000000",
"b9460db11cf57d25da2e81eb4f12c81225481b608fd7e53437329c72d079af3592f75f9468a307143c0c279f1198f851204e620dd4e8395db901b20357278a0b",
"6bc0fb4937c7c9f4b30bdc41e638397dca9355071461b629d830f30cc7a79d0ff6564a59a50d39eb9cf970c18a478162758848e44b5e58da040f99b8b4483322",
        ],
        [
"013def7ff97df1e54f56b7f3344bd41cfdfe4f77e247920702a20bcbf3110c16",
"b9460db11cf57d25da2e81eb4f12c81225481b608fd7e53437329c72d079af3592f75f9468a307143c0c279f1198f851204e620dd4e8395db901b20357278a0b",
"eeb67b6d3410aeef9feb9131646bf16e6aebca3137f428ba8eb575ea3a61fb146670e3c26dcec6d3536a4701d50a0323bd668511843f2d01597ea92c8ef64d03",
        ],
        [
"00ee3d0a657b674749769daf8160d8eed8b7053acb7b0adb66e2ac8a2fbb216a",
"f1810e22c66a895f3709af54552a0b07b682f7d4392ac514b05e3ffc40b9e54c6e3dc6b5fb9eb76dd2ca5d5b24825c404fe232c70043e6bf7d1baafa65c6ba4a",
"295744456a6edadc436c0c778f3aae679ab8ae46e443ee156765b09aec360f19b0e9e34e4422c88a05b808334f908363e9abebe63103402ab6f9e1a86be3693f",
        ],
        [
"083c00025aac6813c7cdfc4af448e26aaf42604b74979708fc4fe74b0f514b66",
"f2808c4df12dd1d3d9b9c42f46b7d80bfa6d30cc9844d2105bbc974a81dbf60e9ff199ea20b9ef7dbdee1fa2840b1d3ce9e4c8ac9d58c8e74947c62bb58bbc2f",
"2a909e17910d88ab0ac2579964bdd43b0b5fa0493b0a64bfdb36bc5d3a960919154697183b5f8695b4fefb5980aadb34c9304e2dc19901600882af36be07a00c",
        ],
        [
"03af351eca5c41197452f193f8e7cb50ae3dedb1feb4f5b69235659efea1ee4e",
"a836b30c7973a7da2ac87ae68b9b4e6062ac7d91c888eb9a4fc12c43866c2c6f1bf65b33228a3eb928b48d4569cc365b23547dbcf492e08e4a9b2ae025d25f1a",
"a64f873bfd3fc63a27b1b096f840de3076074e6fc312647a051a589e9b29975bb74712870104119b43767dee34b5f859d7235e533b6388b1a8fd37b8f96ca40d",
        ],
        [
"041ec782911cc2b898a9e4963a3dfaee8c752f39f7a8b7e44d59ab5538a74831",
"e4edae8a4e3d2341d07bf6b7b7a2d40115d25e504aa3780c51d4799d45e123383b81034a52ee4838e8d3716ec2d9375ae7d936cc4429b35c69789bc5d4169e7b",
"675ee9b8c50e08ccbbe4d5ef2186b667cd1787ebc41818db214cfcccaadd431b6247cfc3623e187b1f3e48800fe89c4322ca56b77793a0a816b8dcb6d6a81e22",
        ],
    ];

    static KAT_MULGEN: [[&str; 2]; 3] = [
        [
"0c88168d023f4cfbad9d751391266d972d4817785ef3f7476e17316f1acb5056",
"c00603701e2a09312158365ff0b82616717dfd51efeb1d6724fa4c57d58bc22dbed23b48864187d24c97d5a8ad03082e101f0817b0f318445a84237f81002a12",
        ],
        [
"061d99526fffd73eaa9e5094c036c4abcc510d80d1f9c927130bed1d1edaf640",
"fe75f96376a8588e7833a3e74abbcc57207892e81bad10138c971b1eb3e9d371843883c77b89b4fa17cf31bd6589b627afbbe5976db28503c7a586395ebd080a",
        ],
        [
"0cbd3097bd126385b7856b33d62fc71131b66c8e6c35266b42e4e4c2e8cd7099",
"68ccf333f18a8a7bfe3c1c8aa881e61b5b8355f82c9d57be50a630212766560aaf74efe4f4c5154af680bca6c277614f932b39fbb203e36727b206d72771b31e",
        ],
    ];

    static KAT_SIMUL: [[&str; 5]; 4] = [
        [
"0c7527bf93576fa697f0fe0d2356ee03749f01576c226f0427918448cd67ac36",
"834021d2ebd554ee09dbf0c2a4080f39dc89c7b569f799e3ae457f02741fb9778d951fbfd46c7fa057a8954fce242340ef1249a6565d1f5f8289617256d6b56d",
"0ad4df6f2cd31a0c19fd477b28597adf37bf830730c7f7b89b9c2b86fcbf5d0f",
"5ce39266b1d7de3966f85f9df3cf9c7bff34444e86669f355775a8a3522fc72f748d5d532c03ef6a1cd54fea9e5e632946bce9918f5117a6f1c3a58cedbe974c",
"5a49bd6936282f2dd5f01d0675b1b616d216bc9c442891a4fd7321eea9ceee04cf171601d94b97652646ac366435701fa44b00273c1ee58f197d3e762f2ddd56",
        ],
        [
"0462400f0dcbd9ce28d43338671d26bdbaab99aa1aaadf7d945e22471f2da811",
"4be54d2f7a7ccfdc92e035d0ebba016cc8201230a53f86b2b8196bcbf3d8d71561142722a837f2f1632610d6c5510842f23775c32c65a3bbd47599ce45749b08",
"01d09161bcb5bd897794232135b0b09e1e3be2d3c1b7fc1e53bae748f2d2f25b",
"368c37fb267d062a0037588cdcd21618394b1efc6e152f3e02e8ed7d01050d4608dc519277bdd7872e7c46cd62a689781e40e81ae660ffaf0699b94589b19223",
"56aa97f2aa498f8ba2ba40ab6c93940e7a76f6daa0d6d5c7dbc65e3135375f1b3077308e39574f876b99573e32f1b327901440e7526bcb3c2f10151c90db1670",
        ],
        [
"0dba9e4fc778db4c71df1e433815e24d71a7484521827c7f5abce662d3439472",
"634c4b65bf7bf84fdfebf7ef57b7ad4236e7f536aa092a39003c9ae23eaa327c433563d0012223c817b201a12ad9ef7e82aa6869f40b509bf6aef28ecaead812",
"0c40a9fef20841b6c43b9e4e25b969b5f2f1ce48c8e2c5bd62b74db400e7bc1e",
"477468694e723f2eaa1667de5df34e17e41a8798063e698b8ba54d3f3015c46ff604765346b4de8c9ab40c31684bdd767af6854f8b37446d1f5d4fde808c6530",
"89875e2efdb2b007d28d4c4cf9d594045e95a9fa2eb29e58bc7e660dfaf33076f6983df5a6f0f2c956e24d5f5695502605da6bf69a07d7e105ff1afb1f373268",
        ],
        [
"07db6005959a6a3d3eb73e519ec7f8e93bd2ada76f3c464a9a5f3747565fe300",
"d1a4c922164c4b20f20a719c3c4cf81d13497351be2803dc504dae84f7589e6d8b6a0b04384964338b4666a81711aa5c55a302ac6e425587ed5378fdd5e6c74d",
"02f349cbc2e1752c6547e0b739136f1f21685cc4ecd2ce17c46d3922b3fc56a9",
"ec635324d082bff46f2893ecfd843679a27f0ed534feee756fdd6b218076f97eb65decd75e653a1a7e416b24157e552f08dad723ec186102cd2f1357cf5e035f",
"ae0e60f64ff35bbd3095ab7a6886e2778a2df3a26707fe28b1662a082f7fd430c50b60cf0eb94c131d7017a0764b5861c42d4414c98610349bed560e70592118",
        ],
    ];

    fn scdec(vh: &str) -> Scalar {
        let mut buf = hex::decode(vh).unwrap();
        buf.reverse();
        Scalar::decode(&buf).unwrap()
    }

    fn ptdec(vh: &str) -> Point {
        Point::decode(&hex::decode(vh).unwrap()).unwrap()
    }

    // Variable-time reference: plain double-and-add computing 4*n*P,
    // used as an independent check of the constant-time ladder.
    fn mul_vartime_x4(P: &Point, n: &Scalar) -> Point {
        let nb = n.encode();
        let mut R = Point::NEUTRAL;
        for i in (0..256).rev() {
            R.set_double();
            if ((nb[i >> 3] >> (i & 7)) & 1) != 0 {
                R += P;
            }
        }
        R.xdouble(2)
    }

    // Deterministic RNG for tests (SHA-256 in counter mode).
    struct TestRng {
        seed: [u8; 32],
        ctr: u64,
    }

    impl TestRng {
        fn new(tag: u64) -> Self {
            let mut sh = Sha256::new();
            sh.update(tag.to_le_bytes());
            Self { seed: sh.finalize().into(), ctr: 0 }
        }
    }

    impl RngCore for TestRng {
        fn next_u32(&mut self) -> u32 {
            let mut b = [0u8; 4];
            self.fill_bytes(&mut b);
            u32::from_le_bytes(b)
        }
        fn next_u64(&mut self) -> u64 {
            let mut b = [0u8; 8];
            self.fill_bytes(&mut b);
            u64::from_le_bytes(b)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let mut off = 0;
            while off < dest.len() {
                let mut sh = Sha256::new();
                sh.update(self.seed);
                sh.update(self.ctr.to_le_bytes());
                self.ctr += 1;
                let v = sh.finalize();
                let n = core::cmp::min(32, dest.len() - off);
                dest[off..(off + n)].copy_from_slice(&v[..n]);
                off += n;
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8])
            -> Result<(), crate::RngError>
        {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for TestRng { }

    #[test]
    fn encode_decode() {
        // The conventional generator has a canonical encoding.
        let gb = Point::BASE.encode();
        let G = Point::decode(&gb).unwrap();
        assert!(G.equals(Point::BASE) == 0xFFFFFFFF);

        // The neutral encodes to (0, 1).
        let nb = Point::NEUTRAL.encode();
        assert!(nb[..32] == [0u8; 32]);
        assert!(nb[32] == 1);
        assert!(nb[33..] == [0u8; 31]);
        let N = Point::decode(&nb).unwrap();
        assert!(N.isneutral() == 0xFFFFFFFF);
        assert!(Point::BASE.isneutral() == 0);

        // Valid field elements that do not satisfy the curve equation
        // are rejected.
        for i in 0..KAT_DECODE_BAD.len() {
            let buf = hex::decode(KAT_DECODE_BAD[i]).unwrap();
            assert!(Point::decode(&buf).is_none());
        }

        // Non-canonical coordinates are rejected: p itself (in the
        // first 16-byte half) is not a valid field element encoding.
        let mut bad = gb;
        bad[..16].copy_from_slice(&[
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F ]);
        assert!(Point::decode(&bad).is_none());

        // Wrong length.
        assert!(Point::decode(&gb[..63]).is_none());

        // set_decode failure yields the neutral and a zero status.
        let mut P = Point::BASE;
        let buf = hex::decode(KAT_DECODE_BAD[0]).unwrap();
        assert!(P.set_decode(&buf) == 0);
        assert!(P.isneutral() == 0xFFFFFFFF);
    }

    #[test]
    fn base_arith() {
        for i in 0..KAT_ADD.len() {
            let P1 = ptdec(KAT_ADD[i][0]);
            let P2 = ptdec(KAT_ADD[i][1]);
            let P3 = ptdec(KAT_ADD[i][2]);
            let P4 = ptdec(KAT_ADD[i][3]);
            let P5 = ptdec(KAT_ADD[i][4]);
            let P6 = ptdec(KAT_ADD[i][5]);
            assert!(P1.equals(P1) == 0xFFFFFFFF);
            assert!(P1.equals(P2) == 0x00000000);
            let Q3 = P1 + P2;
            assert!(Q3.equals(P3) == 0xFFFFFFFF);
            assert!(Q3.encode()[..] == hex::decode(KAT_ADD[i][2]).unwrap()[..]);
            let Q4 = P1.double();
            assert!(Q4.equals(P4) == 0xFFFFFFFF);
            let R4 = P1 + P1;
            assert!(R4.equals(Q4) == 0xFFFFFFFF);
            let Q5 = Q4 + P2;
            assert!(Q5.equals(P5) == 0xFFFFFFFF);
            let S5 = P1 + Q3;
            assert!(S5.equals(P5) == 0xFFFFFFFF);
            let Q6 = Q3.double();
            assert!(Q6.equals(P6) == 0xFFFFFFFF);
            let R6 = Q4 + P2.double();
            assert!(R6.equals(P6) == 0xFFFFFFFF);
            let T2 = Q6 - Q5;
            assert!(T2.equals(P2) == 0xFFFFFFFF);

            assert!((P6 + Point::NEUTRAL).equals(P6) == 0xFFFFFFFF);
            assert!((P1 - P1).isneutral() == 0xFFFFFFFF);
            assert!((-P1 + P1).isneutral() == 0xFFFFFFFF);
            assert!(P6.xdouble(3).equals(
                P6.double().double().double()) == 0xFFFFFFFF);
        }
    }

    #[test]
    fn psi() {
        for i in 0..KAT_PSI.len() {
            let P = ptdec(KAT_PSI[i][0]);
            let Q = P.psi(0);
            assert!(Q.encode()[..] == hex::decode(KAT_PSI[i][1]).unwrap()[..]);
            // psi(psi(P)) = -P
            assert!(Q.psi(0).equals(-P) == 0xFFFFFFFF);
            // negated variant
            assert!(P.psi(0xFFFFFFFF).equals(-Q) == 0xFFFFFFFF);
        }

        // On the subgroup, psi acts as multiplication by MU: for any
        // point, 4*psi(P) must match the (cofactor-scaled) product
        // MU*P.
        let mut sh = Sha256::new();
        for i in 0..10u64 {
            sh.update(i.to_le_bytes());
            let v = sh.finalize_reset();
            let P = Point::mulgen(&Scalar::decode_reduce(&v));
            assert!(P.psi(0).xdouble(2).equals(P * Scalar::MU) == 0xFFFFFFFF);
        }

        // MU^2 = -1 mod q.
        assert!((Scalar::MU * Scalar::MU + Scalar::ONE).iszero() == 0xFFFFFFFF);
    }

    #[test]
    fn split_psi() {
        let mut sh = Sha256::new();
        for i in 0..100u64 {
            sh.update(i.to_le_bytes());
            let v = sh.finalize_reset();
            let k = Scalar::decode_reduce(&v);

            let (n0, s0, n1, s1) = Point::split_psi(&k);
            assert!(n0 < (1u128 << 126));
            assert!(n1 < (1u128 << 126));
            let mut k0 = Scalar::from_u128(n0);
            k0.set_cond(&-k0, s0);
            let mut k1 = Scalar::from_u128(n1);
            k1.set_cond(&-k1, s1);
            assert!(k.equals(k0 + Scalar::MU * k1) == 0xFFFFFFFF);
        }

        // MU itself splits to (0, 1).
        let (n0, s0, n1, _) = Point::split_psi(&Scalar::MU);
        assert!(n0 == 0 && s0 == 0 && n1 == 1);
    }

    #[test]
    fn mul() {
        for i in 0..KAT_MUL.len() {
            let k = scdec(KAT_MUL[i][0]);
            let P = ptdec(KAT_MUL[i][1]);
            let R = ptdec(KAT_MUL[i][2]);
            let Q = P * k;
            assert!(Q.equals(R) == 0xFFFFFFFF);
            assert!(Q.encode()[..] == hex::decode(KAT_MUL[i][2]).unwrap()[..]);
            assert!((k * P).equals(R) == 0xFFFFFFFF);
        }

        // Against the variable-time reference, on pseudorandom points
        // and scalars.
        let mut sh = Sha256::new();
        for i in 0..10u64 {
            sh.update((2 * i).to_le_bytes());
            let v1 = sh.finalize_reset();
            sh.update((2 * i + 1).to_le_bytes());
            let v2 = sh.finalize_reset();
            let P = Point::mulgen(&Scalar::decode_reduce(&v1));
            let k = Scalar::decode_reduce(&v2);
            assert!((P * k).equals(mul_vartime_x4(&P, &k)) == 0xFFFFFFFF);
        }

        // Edge scalars, including the ones whose split has a zero
        // subscalar (MU and -MU).
        let P = Point::mulgen(&Scalar::from_u32(0xC0FFEE));
        for k in [ Scalar::ONE, Scalar::from_u32(2), -Scalar::ONE,
                   Scalar::MU, -Scalar::MU, Scalar::MU + Scalar::ONE ] {
            assert!((P * k).equals(mul_vartime_x4(&P, &k)) == 0xFFFFFFFF);
        }

        // mul(1, P) = 4*P; mul(q-1, P) = -4*P.
        assert!((P * Scalar::ONE).equals(P.xdouble(2)) == 0xFFFFFFFF);
        assert!((P * -Scalar::ONE).equals(-P.xdouble(2)) == 0xFFFFFFFF);
    }

    #[test]
    fn mulgen() {
        for i in 0..KAT_MULGEN.len() {
            let k = scdec(KAT_MULGEN[i][0]);
            let R = Point::mulgen(&k);
            assert!(R.encode()[..]
                == hex::decode(KAT_MULGEN[i][1]).unwrap()[..]);
            assert!((Point::BASE * k).equals(R) == 0xFFFFFFFF);
        }
    }

    #[test]
    fn simul() {
        for i in 0..KAT_SIMUL.len() {
            let u = scdec(KAT_SIMUL[i][0]);
            let P = ptdec(KAT_SIMUL[i][1]);
            let v = scdec(KAT_SIMUL[i][2]);
            let Q = ptdec(KAT_SIMUL[i][3]);
            let R = Point::simul(&u, &P, &v, &Q);
            assert!(R.encode()[..]
                == hex::decode(KAT_SIMUL[i][4]).unwrap()[..]);
        }

        // simul(u, P, v, Q) = mul(u, P) + mul(v, Q) (both sides carry
        // the cofactor).
        let mut sh = Sha256::new();
        for i in 0..8u64 {
            sh.update((4 * i).to_le_bytes());
            let v1 = sh.finalize_reset();
            sh.update((4 * i + 1).to_le_bytes());
            let v2 = sh.finalize_reset();
            sh.update((4 * i + 2).to_le_bytes());
            let v3 = sh.finalize_reset();
            sh.update((4 * i + 3).to_le_bytes());
            let v4 = sh.finalize_reset();
            let P = Point::mulgen(&Scalar::decode_reduce(&v1));
            let Q = Point::mulgen(&Scalar::decode_reduce(&v2));
            let u = Scalar::decode_reduce(&v3);
            let v = Scalar::decode_reduce(&v4);
            let R1 = Point::simul(&u, &P, &v, &Q);
            let R2 = P * u + Q * v;
            assert!(R1.equals(R2) == 0xFFFFFFFF);

            // simul(u, B, v, B) = mulgen(u + v).
            let R3 = Point::simul(&u, &Point::BASE, &v, &Point::BASE);
            assert!(R3.equals(Point::mulgen(&(u + v))) == 0xFFFFFFFF);
        }

        // Zero-subscalar path (both scalars split through MU).
        let P = Point::mulgen(&Scalar::from_u32(0xDECAF));
        let Q = Point::mulgen(&Scalar::from_u32(0xF00D));
        let R1 = Point::simul(&Scalar::MU, &P, &(-Scalar::MU), &Q);
        let R2 = P * Scalar::MU + Q * -Scalar::MU;
        assert!(R1.equals(R2) == 0xFFFFFFFF);
    }

    #[test]
    fn scalar_masking() {
        // The masked value keeps only 251 bits.
        let mut k = [0xFFFFFFFFFFFFFFFFu64; 4];
        mask_scalar(&mut k);
        assert!(k[3] == 0x07FFFFFFFFFFFFFF);
        assert!(k[0] == 0xFFFFFFFFFFFFFFFF);

        // decode_trim always yields a canonical scalar, and a round
        // trip through encode() keeps the masked value.
        let kt = Scalar::decode_trim(&[0xFFu8; 32]);
        let kb = kt.encode();
        assert!(kb[31] == 0x07);
        for i in 0..31 {
            assert!(kb[i] == 0xFF);
        }

        // Trimmed scalars match the plain reduction (values below q
        // are unchanged by decode_reduce).
        let mut sh = Sha256::new();
        for i in 0..20u64 {
            sh.update(i.to_le_bytes());
            let v: [u8; 32] = sh.finalize_reset().into();
            let k1 = Scalar::decode_trim(&v);
            let mut w = v;
            w[31] &= 0x07;
            assert!(k1.equals(Scalar::decode_reduce(&w)) == 0xFFFFFFFF);
        }

        // RNG-backed generation returns a non-zero scalar.
        let mut rng = TestRng::new(0x7ED252);
        let k = Scalar::generate(&mut rng);
        assert!(k.iszero() == 0);
        let kb = k.encode();
        assert!(kb[31] <= 0x07);
    }
}
