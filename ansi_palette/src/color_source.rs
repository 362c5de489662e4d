// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug, path::PathBuf, sync::Arc};

use crate::{Ansi256Color, PaletteResult, RgbColor, X11ColorMap, find_nearest_ansi256,
            global_x11_color_map, lookup_web_color, platform_x11_rgb_file};

/// The adapters a palette uses to turn color identifiers into numbers. Swap this out
/// to use a different nearest color search, or different named color databases.
pub trait ColorSource: Debug + Send + Sync {
    /// Index in the 256-color table closest to `rgb_color`.
    fn nearest_ansi256(&self, rgb_color: RgbColor) -> Ansi256Color;

    /// # Errors
    ///
    /// [`crate::PaletteError::ColorNotFound`] or
    /// [`crate::PaletteError::SourceUnavailable`].
    fn x11_color(&self, name: &str) -> PaletteResult<RgbColor>;

    /// # Errors
    ///
    /// [`crate::PaletteError::ColorNotFound`] or
    /// [`crate::PaletteError::SourceUnavailable`].
    fn web_color(&self, name: &str) -> PaletteResult<RgbColor>;
}

/// Default adapters: [`find_nearest_ansi256`], an [`X11ColorMap`], and
/// [`lookup_web_color`].
#[derive(Debug, Clone)]
pub struct SystemColorSource {
    x11_color_map: Arc<X11ColorMap>,
}

impl Default for SystemColorSource {
    /// Shares the process wide X11 map.
    fn default() -> Self {
        Self {
            x11_color_map: global_x11_color_map(),
        }
    }
}

impl SystemColorSource {
    /// Uses its own X11 map, read from `x11_rgb_file`, unless that is the platform
    /// default file, in which case the process wide map is shared.
    #[must_use]
    pub fn with_x11_rgb_file(x11_rgb_file: Option<PathBuf>) -> Self {
        if x11_rgb_file == platform_x11_rgb_file() {
            return Self::default();
        }
        Self {
            x11_color_map: Arc::new(X11ColorMap::new(x11_rgb_file)),
        }
    }

    #[must_use]
    pub fn x11_color_map(&self) -> &X11ColorMap { &self.x11_color_map }
}

impl ColorSource for SystemColorSource {
    fn nearest_ansi256(&self, rgb_color: RgbColor) -> Ansi256Color {
        find_nearest_ansi256(rgb_color)
    }

    fn x11_color(&self, name: &str) -> PaletteResult<RgbColor> {
        self.x11_color_map.lookup(name)
    }

    fn web_color(&self, name: &str) -> PaletteResult<RgbColor> { lookup_web_color(name) }
}
