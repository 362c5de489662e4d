// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_ansi_palette
//!
//! Resolve symbolic style names into ANSI SGR escape sequences, once, and cache them.
//!
//! A [`Palette`] is a family of styles (foreground, background, effects, underline
//! color). You ask it for a style by name, and get back a shared [`StyleEntry`] that
//! you can render, combine with other entries, wrap text with, or use as a scoped
//! "emit on enter, reset on exit" guard.
//!
//! ## Attribute names
//!
//! | Name form                      | Example          | Tier        |
//! | ------------------------------ | ---------------- | ----------- |
//! | pre-registered basic name      | `red`, `default` | `basic`     |
//! | `i` / `i_` + 1-3 digits        | `i208`, `i_42`   | `extended`  |
//! | `n` / `n_` + 3 hex digits      | `n_f80`          | `extended`  |
//! | `t` / `t_` + 3 or 6 hex digits | `t_b0b`, `tbb00bb` | `truecolor` |
//! | `x` + 4-64 word characters     | `x_navyblue`     | `truecolor` |
//! | `w` + 4-64 word characters     | `w_orchid`       | `truecolor` |
//! | any other name                 | `orchid`         | `truecolor` (web, then X11 lookup) |
//!
//! Tiers that are not enabled resolve to a no-op entry, which renders as the empty
//! string. That way the same code runs unchanged on terminals with fewer colors.
//!
//! ## Example
//!
//! ```rust
//! use r3bl_ansi_palette::{PaletteConfig, PaletteTierSet, PaletteTier, Palettes,
//!                         StyleLookup, TierConfig};
//!
//! let config = PaletteConfig::default()
//!     .with_tiers(TierConfig::Explicit(PaletteTierSet::up_to(PaletteTier::Extended)));
//! let palettes = Palettes::new(&config);
//!
//! let red = palettes.fg.get("red").unwrap();
//! assert_eq!(red.to_string(), "\x1b[31m");
//!
//! let orange = palettes.fg.get("i208").unwrap();
//! assert_eq!(orange.apply("hi"), "\x1b[38;5;208mhi\x1b[39m");
//!
//! // Truecolor is not enabled, so this is a no-op.
//! let purple = palettes.fg.get("t_bb00bb").unwrap();
//! assert_eq!(purple.apply("hi"), "hi");
//! ```

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
mod ansi256_table;
mod ansi_escape_codes;
mod attribute_name;
mod color;
mod color_source;
mod detect_palette_support;
mod output_device;
mod palette;
mod palette_error;
mod palette_family;
mod palette_tier;
mod style_entry;
mod web_colors;
mod x11_color_map;

// Re-export.
pub use ansi256_table::*;
pub use ansi_escape_codes::*;
pub use attribute_name::*;
pub use color::*;
pub use color_source::*;
pub use detect_palette_support::*;
pub use output_device::*;
pub use palette::*;
pub use palette_error::*;
pub use palette_family::*;
pub use palette_tier::*;
pub use style_entry::*;
pub use web_colors::*;
pub use x11_color_map::*;
