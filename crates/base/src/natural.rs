use core::{error, fmt};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

/// A non-negative integer that can be taken apart by shifting and masking.
///
/// This is the only interface [`bin_str`][crate::bin_str] and [`limbs`][crate::limbs] need. It is
/// implemented for the unsigned primitive integers and for [`BigUint`]; signed types are
/// intentionally left out so that a negative value cannot reach the decomposition routines. Use
/// [`checked`] to bring a [`BigInt`] across.
pub trait Natural: Clone {
    fn is_zero(&self) -> bool;

    /// Returns `self & (2^64 - 1)`.
    fn low_limb(&self) -> u64;

    /// Returns `self >> n`. Shifting by the full width or more yields zero.
    fn shr(&self, n: u32) -> Self;
}

macro_rules! impl_natural {
    ($($t:ty),+) => {
        $(
            impl Natural for $t {
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn low_limb(&self) -> u64 {
                    *self as u64
                }

                fn shr(&self, n: u32) -> Self {
                    self.checked_shr(n).unwrap_or(0)
                }
            }
        )+
    };
}

impl_natural!(u8, u16, u32, u64, u128, usize);

impl Natural for BigUint {
    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn low_limb(&self) -> u64 {
        self.iter_u64_digits().next().unwrap_or(0)
    }

    fn shr(&self, n: u32) -> Self {
        self >> n
    }
}

/// Error returned when a negative value is offered where a [`Natural`] is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Negative(pub BigInt);

/// Converts a signed big integer to a [`BigUint`], rejecting negative values.
///
/// ```
/// # use num_bigint::{BigInt, BigUint};
/// # use limbgen_base::natural::checked;
/// assert_eq!(BigUint::from(7u8), checked(&BigInt::from(7)).unwrap());
/// assert!(checked(&BigInt::from(-1)).is_err());
/// ```
pub fn checked(x: &BigInt) -> Result<BigUint, Negative> {
    match x.sign() {
        Sign::Minus => Err(Negative(x.clone())),
        Sign::NoSign | Sign::Plus => Ok(x.magnitude().clone()),
    }
}

impl fmt::Display for Negative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "negative value {} has no binary or limb form", self.0)
    }
}

impl error::Error for Negative {}
