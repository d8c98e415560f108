//! Integer expressions for writing [limbgen] test inputs.
//!
//! Test values for big-integer code are most naturally written the way one would write them in
//! Python, e.g. `2**65 + 3` or `(1 << 128) - 1`. This crate parses that small language with
//! [`nom`] and evaluates it over [`BigUint`], refusing anything that would go negative.
//!
//! [limbgen]: https://github.com/mrdomino/limbgen

pub mod eval;
pub mod node;
pub mod parse;

use core::{error, fmt};

use num_bigint::BigUint;

pub use eval::EvalError;
pub use node::{Expr, Op};
pub use parse::Error as ParseError;

/// Either stage of turning text into a natural number can fail.
#[derive(Debug, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Eval(EvalError),
}

/// Parses and evaluates `input` in one step.
///
/// ```
/// # use limbgen_expr::parse_natural;
/// let x: u32 = parse_natural("1 << 16").unwrap().try_into().unwrap();
/// assert_eq!(65536, x);
/// assert!(parse_natural("1 - 2").is_err());
/// assert!(parse_natural("-1").is_err());
/// ```
pub fn parse_natural(input: &str) -> Result<BigUint, Error> {
    let expr: Expr = input.parse()?;
    Ok(expr.eval()?)
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use Error::*;

        Some(match self {
            Parse(e) => e,
            Eval(e) => e,
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (t, e): (&str, &dyn error::Error) = match self {
            Error::Parse(e) => ("parse", e),
            Error::Eval(e) => ("eval", e),
        };
        write!(f, "{t}: {e}")
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Self::Eval(e)
    }
}
