//! Binary-string and 64-bit limb decomposition of non-negative integers, for use in [limbgen].
//!
//! The two routines here, [`bin_str`] and [`limbs`], produce the expected values that tests of a
//! big-integer implementation compare against. Both are written against the [`Natural`] trait
//! and so accept unsigned primitives as well as [`num_bigint::BigUint`]. Both map zero to an empty
//! result: `bin_str(&0) == ""` and `limbs(&0) == []`.
//!
//! [limbgen]: https://github.com/mrdomino/limbgen

pub mod bin;
pub mod fmt;
pub mod limbs;
pub mod natural;
pub mod uint;

pub use bin::{BinStr, ParseBinError, bin_str, from_bin_str};
pub use limbs::{from_limbs, limbs};
pub use natural::{Natural, Negative};
