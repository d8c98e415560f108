use core::str;

use nom::{
    Finish, IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{char, multispace0, satisfy},
    combinator::{all_consuming, map, map_opt, not, recognize, value},
    error::{self, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use num_bigint::BigUint;

use crate::node::{Expr, Op};

pub type Error = nom::error::Error<String>;

/// Deepest nesting of parentheses accepted.
pub const MAX_NESTING: u32 = 64;

/// Tallest expression tree accepted. Every operator adds at most one level.
pub const MAX_HEIGHT: u32 = 1000;

impl Expr {
    /// Parses an expression from the front of `input`, returning the unparsed remainder.
    ///
    /// The syntax is a small subset of Python integer arithmetic:
    ///
    /// # Literals
    /// Decimal literals, plus `0x`, `0o` and `0b` prefixed hexadecimal, octal and binary ones.
    /// Underscores may separate digits, as in `0xffff_ffff`. There is no unary minus; a negative
    /// number cannot be written.
    ///
    /// # Operators
    /// From loosest to tightest binding: `<<` and `>>`; `+` and `-`; `*`, `/` and `%`; `**`. Every
    /// operator is left associative except `**`, which is right associative. Parentheses group.
    /// As in Python, shifts bind looser than addition, so `1 << 64 + 1` is `2**65`.
    ///
    /// # Limits
    /// Parentheses nest at most [`MAX_NESTING`] deep and the resulting tree is at most
    /// [`MAX_HEIGHT`] operators tall. Past either limit parsing fails with
    /// [`ErrorKind::TooLarge`].
    ///
    /// ```
    /// # use limbgen_expr::Expr;
    /// assert_eq!("((2 ** 65) + 3)", "2**65 + 3".parse::<Expr>().unwrap().to_string());
    /// assert_eq!("(1 << (64 + 1))", "1 << 64 + 1".parse::<Expr>().unwrap().to_string());
    /// ```
    pub fn parse(input: &str) -> IResult<&str, Expr> {
        map(ws(|i| parse_shift(i, 0)), |tree: Tree| tree.0).parse(input)
    }
}

impl str::FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match all_consuming(Expr::parse).parse(s).finish() {
            Ok((_remaining, expr)) => Ok(expr),
            Err(error::Error { input, code }) => Err(Error {
                input: input.to_string(),
                code,
            }),
        }
    }
}

// An expression with the height of its tree.
struct Tree(Expr, u32);

impl Tree {
    fn leaf(n: BigUint) -> Self {
        Tree(Expr::Literal(n), 0)
    }

    fn join<'a>(
        input: &'a str,
        op: Op,
        lhs: Tree,
        rhs: Tree,
    ) -> Result<Tree, nom::Err<error::Error<&'a str>>> {
        let height = lhs.1.max(rhs.1) + 1;
        if height > MAX_HEIGHT {
            return Err(too_large(input));
        }
        Ok(Tree(Expr::binary(op, lhs.0, rhs.0), height))
    }
}

// Past a limit there is no point backtracking, so this is a failure rather than an error.
fn too_large(input: &str) -> nom::Err<error::Error<&str>> {
    nom::Err::Failure(error::Error::new(input, ErrorKind::TooLarge))
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

// Folds `operand (op operand)*` to the left.
fn left_assoc<'a, F, P>(input: &'a str, mut operand: F, op: P) -> IResult<&'a str, Tree>
where
    F: FnMut(&'a str) -> IResult<&'a str, Tree> + Copy,
    P: Parser<&'a str, Output = Op, Error = error::Error<&'a str>>,
{
    let (mut input, mut acc) = operand(input)?;
    let mut next = pair(ws(op), operand);
    loop {
        match next.parse(input) {
            Ok((rest, (op, rhs))) => {
                acc = Tree::join(input, op, acc, rhs)?;
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}

fn parse_shift(input: &str, nesting: u32) -> IResult<&str, Tree> {
    left_assoc(
        input,
        move |i| parse_sum(i, nesting),
        alt((value(Op::Shl, tag("<<")), value(Op::Shr, tag(">>")))),
    )
}

fn parse_sum(input: &str, nesting: u32) -> IResult<&str, Tree> {
    left_assoc(
        input,
        move |i| parse_product(i, nesting),
        alt((value(Op::Add, char('+')), value(Op::Sub, char('-')))),
    )
}

fn parse_product(input: &str, nesting: u32) -> IResult<&str, Tree> {
    left_assoc(
        input,
        move |i| parse_power(i, nesting),
        alt((
            value(Op::Mul, terminated(char('*'), not(char('*')))),
            value(Op::Div, char('/')),
            value(Op::Rem, char('%')),
        )),
    )
}

fn parse_power(input: &str, nesting: u32) -> IResult<&str, Tree> {
    let atom = move |i| parse_atom(i, nesting);
    let (rest, first) = atom(input)?;
    let (rest, mut exps) = many0(preceded(ws(tag("**")), atom)).parse(rest)?;
    // Right associative: fold from the last operand back to the first.
    let Some(mut acc) = exps.pop() else {
        return Ok((rest, first));
    };
    while let Some(base) = exps.pop() {
        acc = Tree::join(input, Op::Pow, base, acc)?;
    }
    Ok((rest, Tree::join(input, Op::Pow, first, acc)?))
}

fn parse_atom(input: &str, nesting: u32) -> IResult<&str, Tree> {
    alt((
        map(parse_number, Tree::leaf),
        delimited(char('('), move |i| parse_group(i, nesting + 1), char(')')),
    ))
    .parse(input)
}

fn parse_group(input: &str, nesting: u32) -> IResult<&str, Tree> {
    if nesting > MAX_NESTING {
        return Err(too_large(input));
    }
    ws(move |i| parse_shift(i, nesting)).parse(input)
}

fn parse_number(input: &str) -> IResult<&str, BigUint> {
    alt((
        preceded(tag_no_case("0x"), digits(16)),
        preceded(tag_no_case("0o"), digits(8)),
        preceded(tag_no_case("0b"), digits(2)),
        digits(10),
    ))
    .parse(input)
}

// A run of digits in `radix`, optionally separated by underscores. Must start with a digit.
fn digits<'a>(radix: u32) -> impl Parser<&'a str, Output = BigUint, Error = error::Error<&'a str>> {
    map_opt(
        recognize(pair(
            satisfy(move |c| c.is_digit(radix)),
            take_while(move |c: char| c.is_digit(radix) || c == '_'),
        )),
        move |s: &str| BigUint::parse_bytes(s.replace('_', "").as_bytes(), radix),
    )
}
