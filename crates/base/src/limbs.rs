use num_bigint::BigUint;

use crate::natural::Natural;

/// Returns the 64-bit limbs of `x`, least significant first.
///
/// The result is minimal: its last limb is never zero, and zero decomposes to no limbs at all
/// rather than `[0]`.
///
/// ```
/// # use limbgen_base::limbs;
/// assert_eq!(Vec::<u64>::new(), limbs(&0u128));
/// assert_eq!(vec![1], limbs(&1u128));
/// assert_eq!(vec![0, 1], limbs(&(1u128 << 64)));
/// assert_eq!(vec![3, 2], limbs(&((1u128 << 65) + 3)));
/// ```
pub fn limbs<N: Natural>(x: &N) -> Vec<u64> {
    // decompose(x) = [] if x == 0 else [x & (2^64 - 1)] + decompose(x >> 64)
    let mut x = x.clone();
    let mut ret = Vec::new();
    while !x.is_zero() {
        ret.push(x.low_limb());
        x = x.shr(u64::BITS);
    }
    ret
}

/// Recomposes an integer from limbs stored least significant first.
///
/// Trailing zero limbs are allowed and have no effect, so this also accepts fixed-width limb
/// buffers.
pub fn from_limbs(limbs: &[u64]) -> BigUint {
    limbs
        .iter()
        .rev()
        .fold(BigUint::default(), |acc, &limb| (acc << u64::BITS) + limb)
}

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};

    use super::*;

    fn pow2(n: u32) -> BigUint {
        BigUint::one() << n
    }

    #[test]
    fn boundary_cases() {
        assert!(limbs(&BigUint::zero()).is_empty());
        assert_eq!(vec![1], limbs(&BigUint::one()));
        assert_eq!(vec![u64::MAX], limbs(&(pow2(64) - 1u8)));
        assert_eq!(vec![0, 1], limbs(&pow2(64)));
        assert_eq!(vec![3, 2], limbs(&(pow2(65) + 3u8)));
        assert_eq!(vec![0, 0, 1], limbs(&pow2(128)));
    }

    #[test]
    fn primitives_agree_with_biguint() {
        for x in [0u128, 1, 7, u64::MAX as u128, 1 << 64, u128::MAX, 0x1234 << 70] {
            assert_eq!(limbs(&BigUint::from(x)), limbs(&x));
        }
        assert_eq!(vec![0xff], limbs(&0xffu8));
        assert_eq!(vec![u32::MAX as u64], limbs(&u32::MAX));
    }

    #[test]
    fn agrees_with_num_bigint_digits() {
        let mut x = BigUint::one();
        for i in 0..64u32 {
            x = x * 0x1_0000_0001u64 + i;
            assert_eq!(x.to_u64_digits(), limbs(&x));
        }
    }

    #[test]
    fn minimal_and_recomposable() {
        let mut x = BigUint::from(0xfedc_ba98u32);
        for n in [1u32, 63, 64, 65, 127, 128, 129, 500] {
            x = (x << n) | BigUint::from(n);
            let ls = limbs(&x);
            assert_ne!(Some(&0), ls.last());
            assert_eq!(x.bits().div_ceil(64), ls.len() as u64);
            assert_eq!(x, from_limbs(&ls));
        }
    }

    #[test]
    fn from_limbs_ignores_trailing_zeros() {
        assert_eq!(BigUint::zero(), from_limbs(&[]));
        assert_eq!(BigUint::zero(), from_limbs(&[0, 0]));
        assert_eq!(pow2(65) + 3u8, from_limbs(&[3, 2, 0, 0]));
    }
}
