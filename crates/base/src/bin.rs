use core::{
    error,
    fmt::{self, Display, Formatter},
};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::natural::Natural;

/// Returns the minimal big-endian binary digit string of `x`.
///
/// Zero has no digits, so it encodes as the empty string rather than `"0"`. No padding is ever
/// applied.
///
/// ```
/// # use limbgen_base::bin_str;
/// assert_eq!("", bin_str(&0u32));
/// assert_eq!("1", bin_str(&1u32));
/// assert_eq!("101", bin_str(&5u32));
/// ```
pub fn bin_str<N: Natural>(x: &N) -> String {
    let digits = digits_lsb_first(x);
    // Digits are ASCII '0' and '1' only.
    digits.into_iter().rev().map(char::from).collect()
}

// Equivalent to encode(x) = "" if x == 0 else encode(x >> 1) + digit(x & 1), without recursion.
fn digits_lsb_first<N: Natural>(x: &N) -> Vec<u8> {
    let mut x = x.clone();
    let mut digits = Vec::new();
    while !x.is_zero() {
        digits.push(b'0' ^ (x.low_limb() & 1) as u8);
        x = x.shr(1);
    }
    digits
}

/// [`Display`] adapter that writes the same digits as [`bin_str`].
///
/// ```
/// # use limbgen_base::BinStr;
/// assert_eq!("[]", format!("[{}]", BinStr(&0u8)));
/// assert_eq!("[1100]", format!("[{}]", BinStr(&12u8)));
/// ```
pub struct BinStr<'a, N>(pub &'a N);

impl<N: Natural> Display for BinStr<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        digits_lsb_first(self.0)
            .into_iter()
            .rev()
            .try_for_each(|d| write!(f, "{}", char::from(d)))
    }
}

/// Error parsing a binary digit string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseBinError {
    pub offset: usize,
    pub byte: u8,
}

/// Parses a big-endian binary digit string back into an integer.
///
/// This is the inverse of [`bin_str`]: the empty string is zero. Leading zeros are accepted.
pub fn from_bin_str(s: &str) -> Result<BigUint, ParseBinError> {
    let mut ret = BigUint::zero();
    for (offset, byte) in s.bytes().enumerate() {
        let bit = match byte {
            b'0' => 0u8,
            b'1' => 1,
            _ => return Err(ParseBinError { offset, byte }),
        };
        ret <<= 1u32;
        ret += bit;
    }
    Ok(ret)
}

impl Display for ParseBinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid binary digit {:?} at offset {}",
            char::from(self.byte),
            self.offset
        )
    }
}

impl error::Error for ParseBinError {}
