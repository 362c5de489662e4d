// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! More info:
//! - <https://doc.rust-lang.org/reference/tokens.html#ascii-escapes>
//! - <https://notes.burke.libbey.me/ansi-escape-codes/>
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code#SGR_(Select_Graphic_Rendition)_parameters>

use std::fmt::{Display, Formatter, Result};

use smallstr::SmallString;
use smallvec::SmallVec;

use crate::{Ansi256Color, RgbColor};

pub const CSI: &str = "\x1b[";
pub const SGR: &str = "m";
pub const SGR_PARAM_SEPARATOR: &str = ";";

/// The generic reset. Used as the default of any entry that was combined from entries
/// of different palettes, since no single family specific default restores both.
pub const SGR_RESET: &str = "\x1b[0m";

pub mod sizing {
    use super::{SmallString, SmallVec};

    /// Longest single token is a truecolor one, eg: `38;2;255;255;255` (16 bytes).
    pub const DEFAULT_PARAM_TOKEN_SIZE: usize = 16;
    pub type ParamToken = SmallString<[u8; DEFAULT_PARAM_TOKEN_SIZE]>;

    /// Most entries hold one token. Combinations of fg + bg + a couple of effects still
    /// fit without spilling to the heap.
    pub const MAX_PARAMS_INLINE_SIZE: usize = 4;
    pub type InlineVecParams = SmallVec<[ParamToken; MAX_PARAMS_INLINE_SIZE]>;

    pub const DEFAULT_STRING_STORAGE_SIZE: usize = 16;
    pub type InlineString = SmallString<[u8; DEFAULT_STRING_STORAGE_SIZE]>;
}
pub use sizing::{InlineString, InlineVecParams, ParamToken};

/// A single SGR parameter, before it is rendered into a [`ParamToken`].
///
/// The `start` codes for extended and truecolor parameters depend on the palette
/// family, eg: `38;5` for foreground and `48;5` for background.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SgrParam<'a> {
    Code(&'a str),
    Ansi256 { start: &'a str, color: Ansi256Color },
    Rgb { start: &'a str, color: RgbColor },
}

mod sgr_param_impl {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    impl SgrParam<'_> {
        #[must_use]
        pub fn to_token(&self) -> ParamToken {
            let mut acc = ParamToken::new();
            // Writing into a SmallString can't fail.
            _ = std::fmt::Write::write_fmt(&mut acc, format_args!("{self}"));
            acc
        }
    }

    impl Display for SgrParam<'_> {
        #[rustfmt::skip]
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match *self {
                SgrParam::Code(code)             => write!(f, "{code}"),
                SgrParam::Ansi256 { start, color } => write!(f, "{start};{}", color.index),
                SgrParam::Rgb { start, color }   => {
                    let RgbColor { red, green, blue } = color;
                    write!(f, "{start};{red};{green};{blue}")
                }
            }
        }
    }
}

/// A borrowed list of parameter tokens, rendered as a single escape sequence:
/// `ESC [ <param> (; <param>)* m`. An empty list renders as the empty string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SgrSequence<'a>(pub &'a [ParamToken]);

mod sgr_sequence_impl {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    impl SgrSequence<'_> {
        /// Just the parameters, without the `CSI` and `m` framing.
        #[must_use]
        pub fn params_joined(&self) -> String {
            let mut acc = String::new();
            for (index, token) in self.0.iter().enumerate() {
                if index > 0 {
                    acc.push_str(SGR_PARAM_SEPARATOR);
                }
                acc.push_str(token);
            }
            acc
        }
    }

    impl Display for SgrSequence<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            if self.0.is_empty() {
                return Ok(());
            }
            write!(f, "{CSI}{}{SGR}", self.params_joined())
        }
    }
}
