use core::{error, fmt};

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::node::{Expr, Op};

/// Largest result, in bits, that `<<`, `*` and `**` will produce.
pub const MAX_BITS: u64 = 1 << 24;

/// Represents an error evaluating an [`Expr`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    /// A subtraction would have gone below zero.
    Negative { lhs: BigUint, rhs: BigUint },
    DivideByZero,
    /// A shift amount or exponent did not fit in a `u32`, or the result would have been longer
    /// than [`MAX_BITS`].
    TooLarge(Op, BigUint),
}

// Work left to do while walking a tree in post order.
enum Step<'a> {
    Visit(&'a Expr),
    Apply(Op),
}

impl Expr {
    /// Evaluates the expression over the naturals.
    ///
    /// The walk keeps its own stack, so arbitrarily tall trees evaluate without recursing.
    ///
    /// ```
    /// # use limbgen_expr::{EvalError, Expr};
    /// let x: Expr = "2**64 - 1".parse().unwrap();
    /// let max: u64 = x.eval().unwrap().try_into().unwrap();
    /// assert_eq!(u64::MAX, max);
    /// let y: Expr = "1 - 2".parse().unwrap();
    /// assert!(matches!(y.eval(), Err(EvalError::Negative { .. })));
    /// ```
    pub fn eval(&self) -> Result<BigUint, EvalError> {
        let mut steps = vec![Step::Visit(self)];
        let mut values = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expr::Literal(n)) => values.push(n.clone()),
                Step::Visit(Expr::Binary(op, lhs, rhs)) => {
                    steps.push(Step::Apply(*op));
                    steps.push(Step::Visit(&**rhs));
                    steps.push(Step::Visit(&**lhs));
                }
                Step::Apply(op) => {
                    let rhs = values.pop().expect("operands are pushed before their operator");
                    let lhs = values.pop().expect("operands are pushed before their operator");
                    values.push(apply(op, lhs, rhs)?);
                }
            }
        }
        Ok(values.pop().expect("a tree evaluates to one value"))
    }
}

fn apply(op: Op, lhs: BigUint, rhs: BigUint) -> Result<BigUint, EvalError> {
    Ok(match op {
        Op::Add => lhs + rhs,
        Op::Sub => {
            if rhs > lhs {
                return Err(EvalError::Negative { lhs, rhs });
            }
            lhs - rhs
        }
        Op::Mul => {
            if lhs.bits() + rhs.bits() > MAX_BITS {
                return Err(EvalError::TooLarge(op, rhs));
            }
            lhs * rhs
        }
        Op::Div | Op::Rem if rhs.is_zero() => return Err(EvalError::DivideByZero),
        Op::Div => lhs / rhs,
        Op::Rem => lhs % rhs,
        // Shifting right past the top bit is zero no matter how far.
        Op::Shr => match rhs.to_u32() {
            Some(n) => lhs >> n,
            None => BigUint::zero(),
        },
        Op::Shl => {
            let n = small(op, rhs)?;
            if !lhs.is_zero() && lhs.bits() + u64::from(n) > MAX_BITS {
                return Err(EvalError::TooLarge(op, n.into()));
            }
            lhs << n
        }
        Op::Pow => {
            let n = small(op, rhs)?;
            // Zero and one stay put; anything else has at least `n` bits after `** n`.
            if lhs.bits() > 1 && lhs.bits().saturating_mul(u64::from(n)) > MAX_BITS {
                return Err(EvalError::TooLarge(op, n.into()));
            }
            lhs.pow(n)
        }
    })
}

fn small(op: Op, n: BigUint) -> Result<u32, EvalError> {
    n.to_u32().ok_or(EvalError::TooLarge(op, n))
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { lhs, rhs } => write!(f, "{lhs} - {rhs} is negative"),
            Self::DivideByZero => f.write_str("division by zero"),
            Self::TooLarge(op, n) => write!(f, "right operand of {op} too large: {n}"),
        }
    }
}

impl error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use limbgen_base::{bin_str, limbs};

    use super::*;

    fn eval(s: &str) -> Result<BigUint, EvalError> {
        s.parse::<Expr>().unwrap().eval()
    }

    #[test]
    fn arithmetic() {
        let tests = [
            ("1 + 2 * 3", 7u64),
            ("(1 + 2) * 3", 9),
            ("10 - 3 - 2", 5),
            ("2 ** 3 ** 2", 512),
            ("17 / 5", 3),
            ("17 % 5", 2),
            ("1 << 16", 65536),
            ("65536 >> 17", 0),
            ("5 >> 0x1_0000_0000", 0),
            ("0 ** 0", 1),
        ];
        for (input, want) in tests {
            assert_eq!(BigUint::from(want), eval(input).unwrap(), "{input}");
        }
    }

    #[test]
    fn feeds_decomposition() {
        assert_eq!(vec![0, 1], limbs(&eval("2**64").unwrap()));
        assert_eq!(vec![3, 2], limbs(&eval("2**65 + 3").unwrap()));
        assert_eq!(Vec::<u64>::new(), limbs(&eval("2**64 - 2**64").unwrap()));
        assert_eq!("101", bin_str(&eval("0b101").unwrap()));
        assert_eq!("", bin_str(&eval("7 % 7").unwrap()));
    }

    #[test]
    fn errors() {
        assert_eq!(
            Err(EvalError::Negative {
                lhs: 1u8.into(),
                rhs: 2u8.into()
            }),
            eval("1 - 2")
        );
        assert_eq!(Err(EvalError::DivideByZero), eval("1 / (2 - 2)"));
        assert_eq!(Err(EvalError::DivideByZero), eval("1 % 0"));
        assert_eq!(
            Err(EvalError::TooLarge(Op::Shl, BigUint::from(1u64 << 32))),
            eval("1 << 2**32")
        );
        assert!(matches!(eval("2 ** 2**40"), Err(EvalError::TooLarge(Op::Pow, _))));
        assert_eq!(
            "right operand of ** too large: 4294967296",
            eval("3 ** 2**32").unwrap_err().to_string()
        );
    }

    #[test]
    fn results_are_bounded() {
        assert_eq!(
            Err(EvalError::TooLarge(Op::Pow, u32::MAX.into())),
            eval("10 ** 4294967295")
        );
        assert_eq!(
            Err(EvalError::TooLarge(Op::Shl, u32::MAX.into())),
            eval("1 << 4294967295")
        );
        assert!(matches!(
            eval("(1 << 16777215) * (1 << 16777215)"),
            Err(EvalError::TooLarge(Op::Mul, _))
        ));
        // Trivial bases and zero shifts stay cheap however large the operand.
        assert_eq!(Ok(BigUint::from(1u8)), eval("1 ** 4294967295"));
        assert_eq!(Ok(BigUint::zero()), eval("0 ** 4294967295"));
        assert_eq!(Ok(BigUint::zero()), eval("0 << 4294967295"));
        assert_eq!(MAX_BITS, eval("1 << 16777215").unwrap().bits());
    }

    #[test]
    fn tall_trees() {
        let sum = vec!["1"; 1001].join("+").parse::<Expr>().unwrap();
        assert_eq!(Ok(BigUint::from(1001u32)), sum.eval());
        let tower = vec!["1"; 1001].join(" ** ").parse::<Expr>().unwrap();
        assert_eq!(Ok(BigUint::from(1u8)), tower.eval());

        // Trees built by hand are not bound by the parser's limits.
        let mut tall = Expr::Literal(BigUint::zero());
        for _ in 0..3000 {
            tall = Expr::binary(Op::Add, tall, Expr::Literal(BigUint::from(2u8)));
        }
        assert_eq!(Ok(BigUint::from(6000u32)), tall.eval());
    }
}
