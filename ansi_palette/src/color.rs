// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! More info:
//! - <https://commons.wikimedia.org/wiki/File:Xterm_256color_chart.svg>
//! - <https://www.ditig.com/256-colors-cheat-sheet>
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code#8-bit>
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code#24-bit>

use crate::{ANSI_COLOR_PALETTE, find_nearest_ansi256};

pub trait TransformColor {
    /// Returns a [`RgbColor`] representation of the `self` color.
    fn as_rgb(&self) -> RgbColor;

    /// Returns the index of a color in 256-color ANSI palette approximating the `self`
    /// color.
    fn as_ansi256(&self) -> Ansi256Color;
}

/// Three 8-bit channels. Never mutated once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self { Self::new(red, green, blue) }
}

impl RgbColor {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self { Self { red, green, blue } }

    /// Parse a hex payload of 3 or 6 digits, without a leading `#`. A 3 digit payload
    /// is expanded by doubling each digit, eg: `b0b` -> `bb00bb`.
    #[must_use]
    pub fn try_from_hex_digits(hex_digits: &str) -> Option<RgbColor> {
        match hex_digits.len() {
            3 => {
                let expanded = expand_short_hex(hex_digits)?;
                hex_color_parser::parse_hex_rgb(&expanded)
                    .ok()
                    .map(|(_, it)| it)
            }
            6 => hex_color_parser::parse_hex_rgb(hex_digits)
                .ok()
                .map(|(_, it)| it),
            _ => None,
        }
    }
}

/// `b0b` -> `bb00bb`. Returns [None] if any character is not a hex digit.
#[must_use]
pub fn expand_short_hex(hex_digits: &str) -> Option<String> {
    let mut acc = String::with_capacity(hex_digits.len() * 2);
    for ch in hex_digits.chars() {
        if !ch.is_ascii_hexdigit() {
            return None;
        }
        acc.push(ch);
        acc.push(ch);
    }
    Some(acc)
}

impl TransformColor for RgbColor {
    fn as_rgb(&self) -> RgbColor { *self }

    fn as_ansi256(&self) -> Ansi256Color { find_nearest_ansi256(*self) }
}

/// An index into the 256-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ansi256Color {
    pub index: u8,
}

impl From<u8> for Ansi256Color {
    fn from(index: u8) -> Self { Self { index } }
}

impl Ansi256Color {
    #[must_use]
    pub const fn new(index: u8) -> Self { Self { index } }
}

impl TransformColor for Ansi256Color {
    fn as_rgb(&self) -> RgbColor { ANSI_COLOR_PALETTE[self.index as usize].into() }

    fn as_ansi256(&self) -> Ansi256Color { *self }
}

/// This module contains a parser that parses a 6 digit hex string (no `#`) into a
/// [`RgbColor`], eg: `bb00bb`.
pub mod hex_color_parser {
    use nom::{IResult, Parser,
              bytes::complete::take_while_m_n,
              combinator::{all_consuming, map_res}};

    use super::RgbColor;

    pub fn parse_hex_rgb(input: &str) -> IResult<&str, RgbColor> {
        let (input, (red, green, blue)) =
            all_consuming((parse_hex_seg, parse_hex_seg, parse_hex_seg)).parse(input)?;
        Ok((input, RgbColor { red, green, blue }))
    }

    fn parse_hex_seg(input: &str) -> IResult<&str, u8> {
        map_res(
            take_while_m_n(2, 2, |it: char| it.is_ascii_hexdigit()),
            |it: &str| u8::from_str_radix(it, 16),
        )
        .parse(input)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("bb00bb", 187, 0, 187)]
    #[test_case("b0b", 187, 0, 187)]
    #[test_case("FF8000", 255, 128, 0)]
    #[test_case("f80", 255, 136, 0)]
    #[test_case("000", 0, 0, 0)]
    fn test_try_from_hex_digits(input: &str, red: u8, green: u8, blue: u8) {
        assert_eq!(
            RgbColor::try_from_hex_digits(input),
            Some(RgbColor { red, green, blue })
        );
    }

    #[test_case("")]
    #[test_case("bb00b")]
    #[test_case("bb00bbb")]
    #[test_case("zz0000")]
    #[test_case("b0g")]
    #[test_case("#bb00bb")]
    fn test_try_from_hex_digits_invalid(input: &str) {
        assert_eq!(RgbColor::try_from_hex_digits(input), None);
    }

    #[test]
    fn test_short_hex_expands_to_same_color() {
        assert_eq!(
            RgbColor::try_from_hex_digits("b0b"),
            RgbColor::try_from_hex_digits("bb00bb")
        );
    }

    #[test]
    fn test_parse_hex_rgb_rejects_trailing_input() {
        assert!(hex_color_parser::parse_hex_rgb("2F14DFaa").is_err());
        let Ok((rem, color)) = hex_color_parser::parse_hex_rgb("2F14DF") else {
            panic!();
        };
        assert_eq!(rem, "");
        assert_eq!(color, RgbColor::new(47, 20, 223));
    }

    #[test_case(Ansi256Color{index: 42}, RgbColor{red: 0, green: 215, blue: 135})]
    #[test_case(Ansi256Color{index: 208}, RgbColor{red: 255, green: 135, blue: 0})]
    fn test_ansi256_color_as_rgb(ansi_color: Ansi256Color, rgb_color: RgbColor) {
        assert_eq!(ansi_color.as_rgb(), rgb_color);
    }

    #[test_case(RgbColor{red: 95, green: 0, blue: 255}, 57)]
    #[test_case(RgbColor{red: 0, green: 128, blue: 255}, 33)]
    fn test_rgb_color_as_ansi256(rgb_color: RgbColor, index: u8) {
        assert_eq!(rgb_color.as_ansi256(), Ansi256Color { index });
    }
}
