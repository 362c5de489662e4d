// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Web (CSS) named colors, eg: `orchid`, `rebeccapurple`.
//!
//! The names come from the `colorgrad` crate's `named-colors` table (`web-colors`
//! feature, on by default).
//! When the feature is off every lookup fails with
//! [`PaletteError::SourceUnavailable`], and web color names resolve to no-op styles.

use crate::{PaletteError, PaletteResult, RgbColor};

pub const WEB_SOURCE_NAME: &str = "web colors";

/// Whether the web color names were compiled in.
#[must_use]
pub const fn is_web_color_source_available() -> bool { cfg!(feature = "web-colors") }

/// Case insensitive lookup of a CSS color name.
///
/// # Errors
///
/// - [`PaletteError::ColorNotFound`] if `name` is not a CSS color name. Hex strings
///   and functional notations (eg: `#fff`, `rgb(0,0,0)`) are not names.
/// - [`PaletteError::SourceUnavailable`] if the `web-colors` feature is disabled.
#[cfg(feature = "web-colors")]
pub fn lookup_web_color(name: &str) -> PaletteResult<RgbColor> {
    let name = name.to_ascii_lowercase();
    if !is_plain_color_name(&name) {
        return Err(not_found(&name));
    }
    match colorgrad::Color::from_html(&name) {
        Ok(color) => {
            let [red, green, blue, _alpha] = color.to_rgba8();
            Ok(RgbColor::new(red, green, blue))
        }
        Err(_) => Err(not_found(&name)),
    }
}

#[cfg(not(feature = "web-colors"))]
pub fn lookup_web_color(_name: &str) -> PaletteResult<RgbColor> {
    Err(PaletteError::SourceUnavailable {
        source_name: WEB_SOURCE_NAME,
        reason: "compiled without the `web-colors` feature".to_string(),
    })
}

/// Only letters. `transparent` parses as a color but has no RGB meaning.
#[cfg_attr(not(feature = "web-colors"), allow(dead_code))]
fn is_plain_color_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|it| it.is_ascii_alphabetic())
        && name != "transparent"
}

#[cfg_attr(not(feature = "web-colors"), allow(dead_code))]
fn not_found(name: &str) -> PaletteError {
    PaletteError::ColorNotFound {
        name: name.to_string(),
        source_name: WEB_SOURCE_NAME,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_color_name() {
        assert!(is_plain_color_name("orchid"));
        assert!(!is_plain_color_name("#fff"));
        assert!(!is_plain_color_name("rgb(0,0,0)"));
        assert!(!is_plain_color_name("transparent"));
        assert!(!is_plain_color_name(""));
    }

    #[test]
    fn test_not_found_error() {
        let it = not_found("nope");
        assert!(matches!(
            it,
            PaletteError::ColorNotFound { source_name: WEB_SOURCE_NAME, .. }
        ));
    }

    #[cfg(feature = "web-colors")]
    #[test]
    fn test_lookup() {
        assert!(is_web_color_source_available());
        assert_eq!(lookup_web_color("orchid").unwrap(), RgbColor::new(218, 112, 214));
        assert_eq!(lookup_web_color("Orchid").unwrap(), RgbColor::new(218, 112, 214));
        assert_eq!(
            lookup_web_color("rebeccapurple").unwrap(),
            RgbColor::new(102, 51, 153)
        );
    }

    #[cfg(feature = "web-colors")]
    #[test]
    fn test_lookup_rejects_non_names() {
        assert!(matches!(
            lookup_web_color("#ff0000"),
            Err(PaletteError::ColorNotFound { .. })
        ));
        assert!(matches!(
            lookup_web_color("bogusnamexyz"),
            Err(PaletteError::ColorNotFound { .. })
        ));
    }

    #[cfg(not(feature = "web-colors"))]
    #[test]
    fn test_lookup_unavailable() {
        assert!(!is_web_color_source_available());
        assert!(lookup_web_color("orchid").is_err_and(|it| it.is_source_unavailable()));
    }
}
