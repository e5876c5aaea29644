//! Finite fields.
//!
//! This module exposes the two fields used by the Ted252 curve: the base
//! field GF(2^127-1) (`GFp127`) and its quadratic extension
//! GF((2^127-1)^2) (`GFp254`). Both are thin re-exports of the
//! backend-provided types.

pub use crate::backend::{GFp127, GFp254};
