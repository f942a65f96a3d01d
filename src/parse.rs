//! String-side parsing for the string-keyed setters and property bags.
//!
//! Keyword values are table-driven: one `multi_keyword_parser!`
//! invocation per enum, one match arm per CSS identifier. Dimension
//! values accept a bare number (points), `auto`, a percentage of the
//! form `-?\d+(\.\d+)?%`, or — for `flex-basis` only — `content`.

use crate::error::Error;
use crate::number::Number;
use crate::style::*;

macro_rules! multi_keyword_parser {
    ($fn:ident, $prop:expr, $return:ident, $([$keyword:expr, $variant:ident]),+ $(,)?) => {
        pub fn $fn(input: &str) -> Result<$return, Error> {
            match input.trim() {
                $(
                    $keyword => Ok($return::$variant),
                )+
                other => Err(Error::invalid($prop, other)),
            }
        }
    };
}

multi_keyword_parser!(parse_flex_direction, "flex-direction", FlexDirection,
    ["row", Row],
    ["row-reverse", RowReverse],
    ["column", Column],
    ["column-reverse", ColumnReverse]);

multi_keyword_parser!(parse_flex_wrap, "flex-wrap", FlexWrap,
    ["nowrap", NoWrap],
    ["wrap", Wrap],
    ["wrap-reverse", WrapReverse]);

multi_keyword_parser!(parse_display, "display", Display,
    ["flex", Flex],
    ["none", None]);

multi_keyword_parser!(parse_position_type, "position", PositionType,
    ["static", Static],
    ["relative", Relative],
    ["absolute", Absolute]);

multi_keyword_parser!(parse_direction, "direction", Direction,
    ["inherit", Inherit],
    ["ltr", Ltr],
    ["rtl", Rtl]);

multi_keyword_parser!(parse_writing_mode, "writing-mode", WritingMode,
    ["horizontal-tb", HorizontalTb],
    ["vertical-rl", VerticalRl],
    ["vertical-lr", VerticalLr]);

multi_keyword_parser!(parse_justify_content, "justify-content", JustifyContent,
    ["flex-start", FlexStart],
    ["flex-end", FlexEnd],
    ["center", Center],
    ["space-between", SpaceBetween],
    ["space-around", SpaceAround],
    ["space-evenly", SpaceEvenly],
    ["start", Start],
    ["end", End],
    ["normal", Normal],
    ["left", Left],
    ["right", Right]);

multi_keyword_parser!(parse_align_items, "align-items", AlignItems,
    ["flex-start", FlexStart],
    ["flex-end", FlexEnd],
    ["center", Center],
    ["baseline", Baseline],
    ["stretch", Stretch],
    ["start", Start],
    ["end", End],
    ["self-start", SelfStart],
    ["self-end", SelfEnd],
    ["normal", Normal]);

multi_keyword_parser!(parse_align_self, "align-self", AlignSelf,
    ["auto", Auto],
    ["flex-start", FlexStart],
    ["flex-end", FlexEnd],
    ["center", Center],
    ["baseline", Baseline],
    ["stretch", Stretch],
    ["start", Start],
    ["end", End],
    ["self-start", SelfStart],
    ["self-end", SelfEnd],
    ["normal", Normal]);

multi_keyword_parser!(parse_align_content, "align-content", AlignContent,
    ["flex-start", FlexStart],
    ["flex-end", FlexEnd],
    ["center", Center],
    ["stretch", Stretch],
    ["space-between", SpaceBetween],
    ["space-around", SpaceAround],
    ["space-evenly", SpaceEvenly],
    ["start", Start],
    ["end", End],
    ["normal", Normal]);

multi_keyword_parser!(parse_justify_items, "justify-items", JustifyItems,
    ["start", Start],
    ["center", Center],
    ["end", End],
    ["stretch", Stretch]);

multi_keyword_parser!(parse_justify_self, "justify-self", JustifySelf,
    ["auto", Auto],
    ["start", Start],
    ["center", Center],
    ["end", End],
    ["stretch", Stretch]);

multi_keyword_parser!(parse_align_safety, "alignment safety", AlignSafety,
    ["unsafe", Unsafe],
    ["safe", Safe]);

/// `-?\d+(\.\d+)?` — the digit shape percentages are restricted to.
fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

fn parse_finite_number(property: &'static str, input: &str) -> Result<f32, Error> {
    match input.trim().parse::<f32>() {
        Ok(num) if num.is_finite() => Ok(num),
        _ => Err(Error::invalid(property, input)),
    }
}

/// Parses a dimension value: a numeric string (points), `auto`, or a
/// percentage. `content` is rejected here; only `flex-basis` admits it.
pub fn parse_dimension(property: &'static str, input: &str) -> Result<Dimension, Error> {
    let input = input.trim();
    if input == "auto" {
        return Ok(Dimension::Auto);
    }
    if let Some(percent) = input.strip_suffix('%') {
        if is_plain_decimal(percent) {
            return Ok(Dimension::Percent(parse_finite_number(property, percent)?));
        }
        return Err(Error::invalid(property, input));
    }
    parse_finite_number(property, input).map(Dimension::Points)
}

pub fn parse_flex_basis(input: &str) -> Result<Dimension, Error> {
    if input.trim() == "content" {
        Ok(Dimension::Content)
    } else {
        parse_dimension("flex-basis", input)
    }
}

/// A positive number or a `W/H` quotient.
pub fn parse_aspect_ratio(input: &str) -> Result<Number, Error> {
    let input = input.trim();
    if input == "auto" {
        return Ok(Number::Undefined);
    }
    let ratio = match input.split_once('/') {
        Some((w, h)) => {
            let w = parse_finite_number("aspect-ratio", w)?;
            let h = parse_finite_number("aspect-ratio", h)?;
            if h <= 0.0 {
                return Err(Error::invalid("aspect-ratio", input));
            }
            w / h
        }
        None => parse_finite_number("aspect-ratio", input)?,
    };
    if ratio.is_finite() && ratio > 0.0 {
        Ok(Number::Defined(ratio))
    } else {
        Err(Error::invalid("aspect-ratio", input))
    }
}

/// A non-negative finite factor (`flex-grow` / `flex-shrink`).
pub fn parse_flex_factor(property: &'static str, input: &str) -> Result<f32, Error> {
    let factor = parse_finite_number(property, input)?;
    if factor >= 0.0 {
        Ok(factor)
    } else {
        Err(Error::invalid(property, input))
    }
}

/// An integer-valued order; fractional input is rounded, NaN rejected.
pub fn parse_order(input: &str) -> Result<i32, Error> {
    parse_finite_number("order", input).map(|num| num.round() as i32)
}

/// Canonicalises a property key: lowercase with `-`/`_` stripped, so
/// `flexDirection`, `flex-direction` and `flex_direction` all address
/// the same field.
pub fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
