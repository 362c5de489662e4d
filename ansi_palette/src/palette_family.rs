// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Static descriptions of the style families. Each [`crate::Palette`] is built from
//! one of these.
//!
//! More info:
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code#SGR_(Select_Graphic_Rendition)_parameters>

use crate::PaletteTier;

/// A family of styles that share a default (reset) code, eg: all the foreground colors
/// are reset by `39`.
#[derive(Debug, PartialEq, Eq)]
pub struct PaletteFamily {
    /// Used in diagnostics only.
    pub name: &'static str,
    /// Name the default code is registered under, alongside the basic names.
    pub default_name: &'static str,
    /// SGR code that undoes any style in this family.
    pub default_code: &'static str,
    /// Pre-registered names, built when a palette is constructed.
    pub basic_codes: &'static [(&'static str, &'static str)],
    /// Eg: `38;5`. [None] if the family has no 256-color form.
    pub extended_start: Option<&'static str>,
    /// Eg: `38;2`. [None] if the family has no 24-bit form.
    pub truecolor_start: Option<&'static str>,
}

impl PaletteFamily {
    /// Code registered under `name`, including the default name.
    #[must_use]
    pub fn basic_code(&self, name: &str) -> Option<&'static str> {
        if name == self.default_name {
            return Some(self.default_code);
        }
        self.basic_codes
            .iter()
            .find(|(it, _)| *it == name)
            .map(|(_, code)| *code)
    }

    /// The default name first, then the basic names in declaration order.
    pub fn basic_names(&self) -> impl Iterator<Item = &'static str> + use<> {
        let default_name = self.default_name;
        let basic_codes = self.basic_codes;
        std::iter::once(default_name).chain(basic_codes.iter().map(|(name, _)| *name))
    }

    /// Start code for a high color tier. [None] for [`PaletteTier::Basic`], or if the
    /// family does not support that tier.
    #[must_use]
    pub fn start_code(&self, tier: PaletteTier) -> Option<&'static str> {
        match tier {
            PaletteTier::Basic => None,
            PaletteTier::Extended => self.extended_start,
            PaletteTier::Truecolor => self.truecolor_start,
        }
    }
}

#[rustfmt::skip]
pub static FOREGROUND: PaletteFamily = PaletteFamily {
    name: "foreground",
    default_name: "default",
    default_code: "39",
    basic_codes: &[
        ("black",        "30"), ("red",          "31"),
        ("green",        "32"), ("yellow",       "33"),
        ("blue",         "34"), ("purple",       "35"),
        ("magenta",      "35"), ("cyan",         "36"),
        ("white",        "37"),
        ("lightblack",   "90"), ("lightred",     "91"),
        ("lightgreen",   "92"), ("lightyellow",  "93"),
        ("lightblue",    "94"), ("lightpurple",  "95"),
        ("lightmagenta", "95"), ("lightcyan",    "96"),
        ("lightwhite",   "97"),
    ],
    extended_start: Some("38;5"),
    truecolor_start: Some("38;2"),
};

#[rustfmt::skip]
pub static BACKGROUND: PaletteFamily = PaletteFamily {
    name: "background",
    default_name: "default",
    default_code: "49",
    basic_codes: &[
        ("black",        "40"),  ("red",          "41"),
        ("green",        "42"),  ("yellow",       "43"),
        ("blue",         "44"),  ("purple",       "45"),
        ("magenta",      "45"),  ("cyan",         "46"),
        ("white",        "47"),
        ("lightblack",   "100"), ("lightred",     "101"),
        ("lightgreen",   "102"), ("lightyellow",  "103"),
        ("lightblue",    "104"), ("lightpurple",  "105"),
        ("lightmagenta", "105"), ("lightcyan",    "106"),
        ("lightwhite",   "107"),
    ],
    extended_start: Some("48;5"),
    truecolor_start: Some("48;2"),
};

/// Text effects. Only the basic tier applies, there are no color forms.
#[rustfmt::skip]
pub static EFFECTS: PaletteFamily = PaletteFamily {
    name: "effects",
    default_name: "end",
    default_code: "0",
    basic_codes: &[
        ("bold",             "1"),
        ("dim",              "2"),
        ("italic",           "3"),
        ("underline",        "4"),
        ("blink",            "5"),
        ("fastblink",        "6"),
        ("reverse",          "7"),
        ("conceal",          "8"),
        ("crossed",          "9"),
        ("double_underline", "21"),
        ("frame",            "51"),
        ("encircle",         "52"),
        ("overline",         "53"),
    ],
    extended_start: None,
    truecolor_start: None,
};

/// Underline color. Has no basic colors, only the 256-color and 24-bit forms.
pub static UNDERLINE_COLOR: PaletteFamily = PaletteFamily {
    name: "underline color",
    default_name: "default",
    default_code: "59",
    basic_codes: &[],
    extended_start: Some("58;5"),
    truecolor_start: Some("58;2"),
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(&FOREGROUND, "red", Some("31"))]
    #[test_case(&FOREGROUND, "magenta", Some("35"))]
    #[test_case(&FOREGROUND, "default", Some("39"))]
    #[test_case(&BACKGROUND, "lightwhite", Some("107"))]
    #[test_case(&EFFECTS, "bold", Some("1"))]
    #[test_case(&EFFECTS, "end", Some("0"))]
    #[test_case(&EFFECTS, "default", None)]
    #[test_case(&UNDERLINE_COLOR, "red", None)]
    fn test_basic_code(family: &PaletteFamily, name: &str, expected: Option<&str>) {
        assert_eq!(family.basic_code(name), expected);
    }

    #[test]
    fn test_basic_names_default_first() {
        let names: Vec<_> = EFFECTS.basic_names().take(2).collect();
        assert_eq!(names, vec!["end", "bold"]);
        assert_eq!(UNDERLINE_COLOR.basic_names().count(), 1);
    }

    #[test]
    fn test_start_code() {
        assert_eq!(FOREGROUND.start_code(PaletteTier::Extended), Some("38;5"));
        assert_eq!(BACKGROUND.start_code(PaletteTier::Truecolor), Some("48;2"));
        assert_eq!(FOREGROUND.start_code(PaletteTier::Basic), None);
        assert_eq!(EFFECTS.start_code(PaletteTier::Extended), None);
    }
}
