use core::fmt;

use num_bigint::BigUint;

/// A parsed integer expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Literal(BigUint),
    Binary(Op, Box<Expr>, Box<Expr>),
}

/// Binary operators, in the order the grammar nests them from loosest to tightest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Expr {
    pub fn binary(op: Op, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

impl Op {
    pub const fn symbol(self) -> &'static str {
        use Op::*;

        match self {
            Shl => "<<",
            Shr => ">>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            Pow => "**",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expressions display fully parenthesized with decimal literals, so the output parses back to the
/// same tree regardless of precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(n) => write!(f, "{n}"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}
