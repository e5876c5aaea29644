//! TedGLS implements constant-time computations on "Ted252", a twisted
//! Edwards curve defined over the field GF((2^127-1)^2) and equipped with
//! a degree-2 GLS endomorphism.
//!
//! The base field is GF(p) for the Mersenne prime `p = 2^127 - 1`; the
//! curve lives over the quadratic extension `GF(p^2) = GF(p)[i]/(i^2+1)`.
//! The curve equation is `a*x^2 + y^2 = 1 + d*x^2*y^2` with `a = -(2+i)`
//! and `d = 109*(2+i)`; it is the quadratic twist of an Fp-rational curve,
//! which provides an efficient endomorphism `psi` built from the field
//! Frobenius. The curve order is `4*q` for a 252-bit prime `q`; scalar
//! multiplication uses the endomorphism to split scalars into half-width
//! subscalars, and all multiplication outputs include a multiplication by
//! the cofactor 4, which keeps results in the prime-order subgroup and
//! blocks small-subgroup attacks (callers who need an unscaled result can
//! pre-multiply their scalar by `1/4 mod q`).
//!
//! The curve and scalar types are implemented in the `ted252` module; the
//! underlying field types are in `field`.
//!
//! # Usage
//!
//! The library is "mostly `no_std`". By default, it compiles against the
//! standard library; it can be compiled in `no_std` mode with no loss of
//! functionality (`default-features = false`).
//!
//! # Conventions
//!
//! All implemented functions are strictly constant-time unless explicitly
//! documented otherwise. In order to avoid unwanted side-channel leaks,
//! Booleans are avoided (compilers tend to "optimize" things a bit too
//! eagerly when handling `bool` values). All functions that return or use
//! a potentially secret Boolean value use the `u32` type; the convention
//! is that 0xFFFFFFFF means "true", and 0x00000000 means "false". No other
//! value shall be used, for they would lead to unpredictable results.
//! Similarly, the `Eq` or `PartialEq` traits are not implemented.
//!
//! Algebraic operations on field elements, scalars and curve points are
//! available through the usual operators (e.g. `+`). Throughout the code,
//! functions that modify the object on which they are called have a name
//! in `set_*()` (e.g. for a curve point `P`, `P.set_double()` modifies the
//! point in place, while `P.double()` leaves `P` unmodified and returns
//! the double as a new instance).

#![no_std]

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

pub mod backend;
pub mod field;
pub mod ted252;
