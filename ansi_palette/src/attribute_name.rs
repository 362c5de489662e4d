// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The closed grammar of attribute names that are not pre-registered basic names.
//!
//! Each form is checked by a small fixed-shape matcher, in this order. The prefix
//! character is case sensitive, and is followed by an optional `_`.
//!
//! | Form      | Shape                               | Payload             |
//! | --------- | ----------------------------------- | ------------------- |
//! | index     | `i` `_`? 1-3 decimal digits         | digits              |
//! | nearest   | `n` `_`? 3 hex digits               | hex digits          |
//! | truecolor | `t` `_`? 3 or 6 hex digits          | hex digits          |
//! | X11       | `x` 4-64 word characters            | name, `_` stripped  |
//! | web       | `w` 4-64 word characters            | name, `_` stripped  |
//! | bare      | anything else                       | the whole name      |

use crate::PaletteTier;

/// The category an attribute name falls in, along with its payload, borrowed from
/// the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeName<'a> {
    /// 256-color index, eg: `i208`, `i_42`. The digits are not range checked here.
    Index(&'a str),
    /// Nearest 256-color match to a 3 digit hex color, eg: `n_f80`.
    Nearest(&'a str),
    /// 3 or 6 digit hex color, eg: `t_b0b`, `tbb00bb`.
    Truecolor(&'a str),
    /// X11 color name, eg: `x_navyblue`.
    X11(&'a str),
    /// Web color name, eg: `w_orchid`.
    Web(&'a str),
    /// Any other name. Looked up as a web color, then as an X11 color.
    Bare(&'a str),
}

const NAME_PAYLOAD_MIN_LEN: usize = 4;
const NAME_PAYLOAD_MAX_LEN: usize = 64;

impl<'a> AttributeName<'a> {
    /// Sort `name` into one of the grammar categories. Never fails, since anything
    /// that does not match a prefixed form is [`AttributeName::Bare`].
    #[must_use]
    pub fn classify(name: &'a str) -> Self {
        if let Some(digits) = match_index(name) {
            return AttributeName::Index(digits);
        }
        if let Some(hex_digits) = match_nearest(name) {
            return AttributeName::Nearest(hex_digits);
        }
        if let Some(hex_digits) = match_truecolor(name) {
            return AttributeName::Truecolor(hex_digits);
        }
        if let Some(color_name) = match_color_name('x', name) {
            return AttributeName::X11(color_name);
        }
        if let Some(color_name) = match_color_name('w', name) {
            return AttributeName::Web(color_name);
        }
        AttributeName::Bare(name)
    }

    /// The tier that has to be enabled for this name to produce a real style.
    #[must_use]
    pub fn tier(&self) -> PaletteTier {
        match self {
            AttributeName::Index(_) | AttributeName::Nearest(_) => PaletteTier::Extended,
            AttributeName::Truecolor(_)
            | AttributeName::X11(_)
            | AttributeName::Web(_)
            | AttributeName::Bare(_) => PaletteTier::Truecolor,
        }
    }
}

mod matchers {
    /// `prefix` then an optional `_`. Returns what follows.
    pub fn strip_prefix(prefix: char, name: &str) -> Option<&str> {
        let rest = name.strip_prefix(prefix)?;
        Some(rest.strip_prefix('_').unwrap_or(rest))
    }

    pub fn match_index(name: &str) -> Option<&str> {
        let digits = strip_prefix('i', name)?;
        let is_match = (1..=3).contains(&digits.len())
            && digits.bytes().all(|it| it.is_ascii_digit());
        is_match.then_some(digits)
    }

    pub fn match_nearest(name: &str) -> Option<&str> {
        let hex_digits = strip_prefix('n', name)?;
        let is_match = hex_digits.len() == 3 && is_all_hex(hex_digits);
        is_match.then_some(hex_digits)
    }

    pub fn match_truecolor(name: &str) -> Option<&str> {
        let hex_digits = strip_prefix('t', name)?;
        let is_match =
            matches!(hex_digits.len(), 3 | 6) && is_all_hex(hex_digits);
        is_match.then_some(hex_digits)
    }

    /// The length check covers everything after the prefix character, including a
    /// leading `_`. The payload has that `_` stripped.
    pub fn match_color_name(prefix: char, name: &str) -> Option<&str> {
        let word = name.strip_prefix(prefix)?;
        let is_match = (super::NAME_PAYLOAD_MIN_LEN..=super::NAME_PAYLOAD_MAX_LEN)
            .contains(&word.len())
            && word.bytes().all(is_word_byte);
        is_match.then(|| word.trim_start_matches('_'))
    }

    fn is_all_hex(it: &str) -> bool { it.bytes().all(|b| b.is_ascii_hexdigit()) }

    fn is_word_byte(b: u8) -> bool { b.is_ascii_alphanumeric() || b == b'_' }
}
use matchers::*;
