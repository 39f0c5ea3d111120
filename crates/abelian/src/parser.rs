//! Parsers for the plain text literals used in data files: integers, rationals and matrices.
//!
//! A matrix is written as its height and width followed by its entries in row-major order, all
//! separated by whitespace:
//! ```text
//! 2 3
//! 1 0 -1/2
//! 0 3 4
//! ```

use anyhow::{anyhow, Context};
use nom::{
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize},
    error::{context, ParseError, VerboseError},
    multi::{count, many0},
    sequence::{delimited, pair, preceded, terminated},
    IResult as IResultBase, Parser,
};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use plocal::matrix::Matrix;
use std::str::FromStr;

type IResult<I, O> = IResultBase<I, O, VerboseError<I>>;

/// Pad both ends with whitespace, including newlines.
fn ws<'a, O, E: ParseError<&'a str>, F: Parser<&'a str, O, E>>(
    f: F,
) -> impl FnMut(&'a str) -> IResultBase<&'a str, O, E> {
    delimited(multispace0, f, multispace0)
}

fn integer(i: &str) -> IResult<&str, BigInt> {
    context(
        "integer",
        map_res(recognize(pair(opt(char('-')), digit1)), BigInt::from_str),
    )(i)
}

fn dimension(i: &str) -> IResult<&str, usize> {
    context("dimension", map_res(digit1, usize::from_str))(i)
}

fn rational(i: &str) -> IResult<&str, BigRational> {
    context(
        "rational",
        map_res(
            pair(integer, opt(preceded(char('/'), integer))),
            |(numer, denom)| match denom {
                None => Ok(BigRational::from_integer(numer)),
                Some(d) if d.is_zero() => Err("zero denominator"),
                Some(d) => Ok(BigRational::new(numer, d)),
            },
        ),
    )(i)
}

/// The height and width of a matrix, together with its number of entries.
fn dimensions(i: &str) -> IResult<&str, (usize, usize, usize)> {
    context(
        "matrix dimensions",
        map_res(pair(ws(dimension), ws(dimension)), |(rows, columns)| {
            rows.checked_mul(columns)
                .map(|len| (rows, columns, len))
                .ok_or("too many entries")
        }),
    )(i)
}

fn matrix(i: &str) -> IResult<&str, Matrix> {
    let (i, (rows, columns, len)) = dimensions(i)?;
    let (i, entries) = context("matrix entries", count(ws(rational), len))(i)?;
    Ok((i, Matrix::from_entries(rows, columns, entries)))
}

fn convert_error(i: &str) -> impl FnOnce(nom::Err<VerboseError<&str>>) -> anyhow::Error + '_ {
    move |err| {
        anyhow!(match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => nom::error::convert_error(i, e),
            nom::Err::Incomplete(_) => unreachable!(),
        })
    }
}

fn parse_all<'a, O>(
    i: &'a str,
    what: &str,
    parser: impl Parser<&'a str, O, VerboseError<&'a str>>,
) -> anyhow::Result<O> {
    let (_, result) = all_consuming(ws(parser))(i)
        .map_err(convert_error(i))
        .with_context(|| format!("Error when parsing {what} {i:?}"))?;
    Ok(result)
}

pub fn parse_integer(i: &str) -> anyhow::Result<BigInt> {
    parse_all(i, "integer", integer)
}

/// Parse `a` or `a/b`. The result is in lowest terms.
pub fn parse_rational(i: &str) -> anyhow::Result<BigRational> {
    parse_all(i, "rational", rational)
}

pub fn parse_matrix(i: &str) -> anyhow::Result<Matrix> {
    parse_all(i, "matrix", matrix)
}

/// Parse any number of matrices, one after the other.
pub fn parse_matrices(i: &str) -> anyhow::Result<Vec<Matrix>> {
    parse_all(i, "matrices", terminated(many0(matrix), multispace0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use rstest::rstest;

    #[rstest]
    #[case("12", 12, 1)]
    #[case(" -7\n", -7, 1)]
    #[case("-45/90", -1, 2)]
    #[case("3/-6", -1, 2)]
    #[case("0/5", 0, 1)]
    fn rationals(#[case] input: &str, #[case] numer: i64, #[case] denom: i64) {
        assert_eq!(
            parse_rational(input).unwrap(),
            BigRational::new(numer.into(), denom.into())
        );
    }

    #[rstest]
    #[case("1/0")]
    #[case("1/")]
    #[case("--1")]
    #[case("1.5")]
    #[case("")]
    fn bad_rationals(#[case] input: &str) {
        assert!(parse_rational(input).is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(
            parse_integer("-123456789012345678901234567890").unwrap(),
            BigInt::from_str("-123456789012345678901234567890").unwrap()
        );
        assert!(parse_integer("1/2").is_err());
    }

    #[test]
    fn rectangular_matrix() {
        let m = parse_matrix("2 3\n1 0 -1/2\r\n0\t3 4\n").unwrap();
        expect![[r#"
            Matrix (2x3)
            1 0 -1/2 
            0 3 4 
        "#]]
        .assert_eq(&m.to_string());
    }

    #[test]
    fn empty_matrix() {
        assert_eq!(parse_matrix("0 4").unwrap(), Matrix::new(0, 4));
    }

    #[test]
    fn matrix_errors() {
        assert!(parse_matrix("2 2 1 2 3").is_err());
        assert!(parse_matrix("1 1 1 2").is_err());
        assert!(parse_matrix("1 1 1/0").is_err());
    }

    #[test]
    fn oversized_matrix() {
        let err = parse_matrix("4294967296 4294967296").unwrap_err();
        assert!(format!("{err:#}").contains("matrix dimensions"));
        assert!(parse_matrices("1 1 2\n18446744073709551615 2").is_err());
    }

    #[test]
    fn several_matrices() {
        let ms = parse_matrices("1 1 5\n\n1 2\n1 -1\n0 0\n").unwrap();
        assert_eq!(
            ms,
            vec![
                Matrix::from_vec(&[vec![5]]),
                Matrix::from_vec(&[vec![1, -1]]),
                Matrix::new(0, 0)
            ]
        );
        assert!(parse_matrices("").unwrap().is_empty());
    }
}
