//! Low-level nom parser functions for CSS-like page geometry values.
//!
//! This module provides composable parser functions for lengths and the
//! 1/2/3/4-value margin shorthand.

use crate::dimension::{Length, Margins, Unit};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while1};
use nom::character::complete::{char, digit1, multispace0, multispace1};
use nom::combinator::{map_res, opt, recognize, value};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur while parsing page geometry values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Unknown page format: {0}")]
    UnknownFormat(String),
}

// --- Helper Parsers ---

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize((digit1, opt((char('.'), digit1)))),
                recognize((char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

/// Parses a CSS identifier (page names, pseudo-classes, keywords).
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse(input)
}

// --- Unit & Length Parsers ---

fn parse_unit(input: &str) -> IResult<&str, Unit> {
    alt((
        value(Unit::Px, tag_no_case("px")),
        value(Unit::Pt, tag_no_case("pt")),
        value(Unit::Pc, tag_no_case("pc")),
        value(Unit::In, tag_no_case("in")),
        value(Unit::Cm, tag_no_case("cm")),
        value(Unit::Mm, tag_no_case("mm")),
        value(Unit::Q, tag_no_case("q")),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12pt", "1in", "10mm").
/// A bare number is read as px.
pub fn parse_length(input: &str) -> IResult<&str, Length> {
    let (input, value) = parse_f32(input)?;
    let (input, unit) = opt(parse_unit).parse(input)?;
    Ok((input, Length::new(value, unit.unwrap_or(Unit::Px))))
}

/// Parses a whitespace separated list of lengths.
pub fn parse_length_list(input: &str) -> IResult<&str, Vec<Length>> {
    delimited(
        multispace0,
        separated_list1(multispace1, parse_length),
        multispace0,
    )
    .parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

/// Removes a trailing `!important` flag from a declaration value.
pub fn strip_important(value: &str) -> &str {
    let trimmed = value.trim_end();
    let lower = trimmed.to_ascii_lowercase();
    match lower.strip_suffix("important") {
        Some(head) if head.trim_end().ends_with('!') => {
            let cut = head.trim_end().len() - 1;
            trimmed[..cut].trim_end()
        }
        _ => trimmed,
    }
}

/// Parses CSS shorthand margins (1, 2, 3, or 4 values).
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let parts: Vec<f32> = run_parser(parse_length_list, strip_important(input))
        .map_err(|_| {
            StyleParseError::Parse(format!("Failed to parse margins value: '{}'", input))
        })?
        .into_iter()
        .map(Length::to_px)
        .collect();

    match parts.as_slice() {
        [all] => Ok(Margins::all(*all)),
        [vertical, horizontal] => Ok(Margins::symmetric(*vertical, *horizontal)),
        [top, horizontal, bottom] => Ok(Margins {
            top: *top,
            right: *horizontal,
            bottom: *bottom,
            left: *horizontal,
        }),
        [top, right, bottom, left] => Ok(Margins {
            top: *top,
            right: *right,
            bottom: *bottom,
            left: *left,
        }),
        _ => Err(StyleParseError::Parse(format!(
            "Invalid number of values for margin shorthand: got {}, expected 1 to 4.",
            parts.len()
        ))),
    }
}

/// Parses a single margin side value such as `margin-top: 12mm`.
pub fn parse_margin_side(property: &str, input: &str) -> Result<f32, StyleParseError> {
    run_parser(parse_length, strip_important(input))
        .map(Length::to_px)
        .map_err(|_| StyleParseError::InvalidValue {
            property: property.to_string(),
            value: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(run_parser(parse_length, "12px").unwrap(), Length::px(12.0));
        assert_eq!(run_parser(parse_length, " 1in ").unwrap().to_px(), 96.0);
        assert_eq!(run_parser(parse_length, "10MM").unwrap(), Length::mm(10.0));
        assert_eq!(run_parser(parse_length, "10").unwrap(), Length::px(10.0));
        assert_eq!(run_parser(parse_length, ".5in").unwrap().to_px(), 48.0);
        assert_eq!(run_parser(parse_length, "-4px").unwrap(), Length::px(-4.0));
        assert!(run_parser(parse_length, "abc").is_err());
        assert!(run_parser(parse_length, "12em").is_err());
    }

    #[test]
    fn test_parse_shorthand_margins() {
        let cm = Length::cm(1.0).to_px();

        let m1 = parse_shorthand_margins("2cm").unwrap();
        assert!(approx(m1.top, 2.0 * cm) && approx(m1.left, 2.0 * cm));
        assert_eq!(m1.top, m1.right);
        assert_eq!(m1.top, m1.bottom);

        let m2 = parse_shorthand_margins("10px 20px").unwrap();
        assert_eq!(m2, Margins::symmetric(10.0, 20.0));

        let m3 = parse_shorthand_margins("10 20 30").unwrap();
        assert_eq!(
            m3,
            Margins {
                top: 10.0,
                right: 20.0,
                bottom: 30.0,
                left: 20.0
            }
        );

        let m4 = parse_shorthand_margins("10 20 30 40").unwrap();
        assert_eq!(
            m4,
            Margins {
                top: 10.0,
                right: 20.0,
                bottom: 30.0,
                left: 40.0
            }
        );

        assert!(parse_shorthand_margins("10 20 30 40 50").is_err());
        assert!(parse_shorthand_margins("").is_err());
        assert!(parse_shorthand_margins("auto").is_err());
    }

    #[test]
    fn shorthand_round_trips_through_reconstruction() {
        for input in ["7px", "7px 9px", "1px 2px 3px", "1px 2px 3px 4px", "2cm 1.8cm"] {
            let parsed = parse_shorthand_margins(input).unwrap();
            let rebuilt = parse_shorthand_margins(&parsed.to_shorthand()).unwrap();
            assert_eq!(parsed, rebuilt, "round trip of '{}'", input);
        }
    }

    #[test]
    fn important_flag_is_ignored() {
        assert_eq!(strip_important("1in !important"), "1in");
        assert_eq!(strip_important("1in ! IMPORTANT "), "1in");
        assert_eq!(strip_important("1in"), "1in");
        assert_eq!(
            parse_shorthand_margins("4px!important").unwrap(),
            Margins::all(4.0)
        );
    }

    #[test]
    fn test_parse_margin_side() {
        assert_eq!(parse_margin_side("margin-top", "1in").unwrap(), 96.0);
        assert!(matches!(
            parse_margin_side("margin-top", "wide"),
            Err(StyleParseError::InvalidValue { .. })
        ));
    }
}
