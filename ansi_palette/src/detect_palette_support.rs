// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{env,
          io::IsTerminal,
          sync::atomic::{AtomicI8, Ordering}};

use crate::{PaletteTier, PaletteTierSet};

/// Global state which can be used to:
/// 1. Override the palette support.
/// 2. Memoize the result of running [`examine_env_vars_to_determine_palette_support`].
///
/// Palettes built with [`crate::TierConfig::AutoDetect`] call [`detect()`] once, at
/// construction.
///
/// [`detect()`]: global_palette_support::detect
pub mod global_palette_support {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    /// Explicit override, takes precedence over the cached detection result.
    static PALETTE_SUPPORT_OVERRIDE: AtomicI8 = AtomicI8::new(NOT_SET_VALUE);

    /// Memoized result of [`examine_env_vars_to_determine_palette_support`].
    static PALETTE_SUPPORT_CACHED: AtomicI8 = AtomicI8::new(NOT_SET_VALUE);

    const NOT_SET_VALUE: i8 = -1;

    /// 1. If [`set_override`] was called, return that value.
    /// 2. If detection already ran, return the cached result.
    /// 3. Otherwise examine the environment once, and cache the result.
    #[must_use]
    pub fn detect() -> PaletteSupport {
        if let Ok(it) = try_get_override() {
            return it;
        }
        if let Ok(cached) = try_get_cached() {
            return cached;
        }
        let detected = examine_env_vars_to_determine_palette_support(Stream::Stdout);
        set_cached(detected);
        detected
    }

    /// Override the palette support. Regardless of the value of the environment
    /// variables the value you set here will be used when you call [`detect()`].
    ///
    /// # Testing support
    ///
    /// The [serial_test](https://crates.io/crates/serial_test) crate is used to test this
    /// function. In any test in which this function is called, please use the `#[serial]`
    /// attribute to annotate that test. Otherwise there will be flakiness in the test
    /// results (tests are run in parallel using many threads).
    pub fn set_override(value: PaletteSupport) {
        PALETTE_SUPPORT_OVERRIDE.store(i8::from(value), Ordering::Release);
    }

    pub fn clear_override() {
        PALETTE_SUPPORT_OVERRIDE.store(NOT_SET_VALUE, Ordering::Release);
    }

    /// Forces re-detection on the next call to [`detect()`].
    pub fn clear_cache() { PALETTE_SUPPORT_CACHED.store(NOT_SET_VALUE, Ordering::Release); }

    pub fn set_cached(value: PaletteSupport) {
        PALETTE_SUPPORT_CACHED.store(i8::from(value), Ordering::Release);
    }

    /// # Errors
    ///
    /// Returns `Err(())` if no override value has been set.
    #[allow(clippy::result_unit_err)]
    pub fn try_get_override() -> Result<PaletteSupport, ()> {
        PaletteSupport::try_from(PALETTE_SUPPORT_OVERRIDE.load(Ordering::Acquire))
    }

    /// # Errors
    ///
    /// Returns `Err(())` if detection has not run yet.
    #[allow(clippy::result_unit_err)]
    pub fn try_get_cached() -> Result<PaletteSupport, ()> {
        PaletteSupport::try_from(PALETTE_SUPPORT_CACHED.load(Ordering::Acquire))
    }
}

/// Determine the palette support heuristically, based on environment variables.
#[must_use]
pub fn examine_env_vars_to_determine_palette_support(stream: Stream) -> PaletteSupport {
    let term = env::var("TERM").unwrap_or_default();
    let colorterm = env::var("COLORTERM").unwrap_or_default();

    if env_no_color()
        || term == "dumb"
        || !(is_a_tty(stream) || env_flag_is_set("IGNORE_IS_TERMINAL"))
    {
        return PaletteSupport::NoColor;
    }

    if check_truecolor(&colorterm)
        || env::var("TERM_PROGRAM").is_ok_and(|it| it == "iTerm.app")
    {
        return PaletteSupport::Truecolor;
    }

    if env::consts::OS == "windows" {
        return PaletteSupport::Truecolor;
    }

    if check_256_color(&term) {
        return PaletteSupport::Extended;
    }

    if !colorterm.is_empty()
        || check_ansi_color(&term)
        || env_flag_is_set("CLICOLOR")
        || is_ci::uncached()
    {
        return PaletteSupport::Basic;
    }

    PaletteSupport::NoColor
}

/// The stream to check for a terminal.
#[derive(Clone, Copy, Debug)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// The result of the palette support check. The highest tier the terminal handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSupport {
    NoColor,
    Basic,
    Extended,
    Truecolor,
}

impl PaletteSupport {
    #[must_use]
    pub fn max_tier(self) -> Option<PaletteTier> {
        match self {
            PaletteSupport::NoColor => None,
            PaletteSupport::Basic => Some(PaletteTier::Basic),
            PaletteSupport::Extended => Some(PaletteTier::Extended),
            PaletteSupport::Truecolor => Some(PaletteTier::Truecolor),
        }
    }
}

impl From<PaletteSupport> for PaletteTierSet {
    fn from(value: PaletteSupport) -> Self {
        value
            .max_tier()
            .map_or_else(PaletteTierSet::none, PaletteTierSet::up_to)
    }
}

/// These trait implementations allow us to use `PaletteSupport` and `i8`
/// interchangeably.
mod convert_between_palette_support_and_i8 {
    impl TryFrom<i8> for super::PaletteSupport {
        type Error = ();

        #[rustfmt::skip]
        fn try_from(value: i8) -> Result<Self, Self::Error> {
            match value {
                0 => Ok(super::PaletteSupport::NoColor),
                1 => Ok(super::PaletteSupport::Basic),
                2 => Ok(super::PaletteSupport::Extended),
                3 => Ok(super::PaletteSupport::Truecolor),
                _ => Err(()),
            }
        }
    }

    impl From<super::PaletteSupport> for i8 {
        #[rustfmt::skip]
        fn from(value: super::PaletteSupport) -> Self {
            match value {
                super::PaletteSupport::NoColor   => 0,
                super::PaletteSupport::Basic     => 1,
                super::PaletteSupport::Extended  => 2,
                super::PaletteSupport::Truecolor => 3,
            }
        }
    }
}

mod helpers {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    #[must_use]
    pub fn is_a_tty(stream: Stream) -> bool {
        match stream {
            Stream::Stdout => std::io::stdout().is_terminal(),
            Stream::Stderr => std::io::stderr().is_terminal(),
        }
    }

    #[must_use]
    pub fn check_truecolor(colorterm: &str) -> bool {
        matches!(colorterm, "truecolor" | "24bit")
    }

    #[must_use]
    pub fn check_256_color(term: &str) -> bool {
        term.ends_with("256") || term.ends_with("256color")
    }

    #[must_use]
    pub fn check_ansi_color(term: &str) -> bool {
        term.starts_with("screen")
            || term.starts_with("xterm")
            || term.starts_with("vt100")
            || term.starts_with("vt220")
            || term.starts_with("rxvt")
            || term.contains("color")
            || term.contains("ansi")
            || term.contains("cygwin")
            || term.contains("linux")
    }

    /// `NO_COLOR` set to anything but `0` (or empty) disables color.
    #[must_use]
    pub fn env_no_color() -> bool { env_flag_is_set("NO_COLOR") }

    #[must_use]
    pub fn env_flag_is_set(key: &str) -> bool {
        env::var(key).is_ok_and(|it| !it.is_empty() && it != "0")
    }
}
pub use helpers::*;
