//! Interop with fixed-width [`crypto_bigint`] integers.

use crypto_bigint::Uint;
use num_bigint::BigUint;

/// Widens a fixed-width [`Uint`] into a [`BigUint`] so that it can be passed to
/// [`bin_str`][crate::bin_str] or [`limbs`][crate::limbs].
///
/// ```
/// # use crypto_bigint::U256;
/// # use limbgen_base::{limbs, uint::to_biguint};
/// let x = U256::from_be_hex("0000000000000000000000000000000000000000000000020000000000000003");
/// assert_eq!(vec![3, 2], limbs(&to_biguint(&x)));
/// ```
pub fn to_biguint<const LIMBS: usize>(x: &Uint<LIMBS>) -> BigUint {
    let bytes: Vec<u8> = x
        .as_words()
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .collect();
    BigUint::from_bytes_le(&bytes)
}

#[cfg(test)]
mod tests {
    use crypto_bigint::{U128, U256};

    use super::*;
    use crate::{bin_str, limbs};

    #[test]
    fn zero_has_no_limbs() {
        assert!(limbs(&to_biguint(&U256::ZERO)).is_empty());
        assert_eq!("", bin_str(&to_biguint(&U128::ZERO)));
    }

    #[test]
    fn leading_zero_words_are_dropped() {
        let x = U256::from_u64(5);
        assert_eq!(vec![5], limbs(&to_biguint(&x)));
        assert_eq!("101", bin_str(&to_biguint(&x)));
    }

    #[test]
    fn full_width() {
        let x = U256::MAX;
        assert_eq!(vec![u64::MAX; 4], limbs(&to_biguint(&x)));
        let x = U256::from_be_hex("8000000000000000000000000000000000000000000000000000000000000001");
        assert_eq!(vec![1, 0, 0, 1 << 63], limbs(&to_biguint(&x)));
        assert_eq!(256, bin_str(&to_biguint(&x)).len());
    }
}
