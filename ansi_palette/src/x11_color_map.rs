// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! X11 named colors, loaded from the system `rgb.txt` file.
//!
//! The file is read at most once per [`X11ColorMap`], on first lookup. The process
//! wide map returned by [`global_x11_color_map`] is shared by every palette that uses
//! the platform default file, and is never invalidated.
//!
//! ## File format
//!
//! ```text
//! ! comment lines start with a bang
//! 255 250 250		snow
//! 248 248 255		ghost white
//! 248 248 255		GhostWhite
//! ```
//!
//! Names that contain a space (eg: `ghost white`) are skipped, so that every name is
//! a single token that can be used as an attribute name.

use std::{collections::HashMap,
          path::{Path, PathBuf},
          sync::{Arc, LazyLock, OnceLock}};

use tracing::debug;

use crate::{PaletteError, PaletteResult, RgbColor};

pub const X11_SOURCE_NAME: &str = "X11 rgb.txt";

/// Where the X11 color database lives on this platform. [None] on Windows.
#[must_use]
pub fn platform_x11_rgb_file() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        Some(PathBuf::from("/etc/X11/rgb.txt"))
    } else if cfg!(target_os = "macos") {
        Some(PathBuf::from("/opt/X11/share/X11/rgb.txt"))
    } else {
        None
    }
}

static GLOBAL_X11_COLOR_MAP: LazyLock<Arc<X11ColorMap>> =
    LazyLock::new(|| Arc::new(X11ColorMap::new(platform_x11_rgb_file())));

/// The process wide map, backed by [`platform_x11_rgb_file`].
#[must_use]
pub fn global_x11_color_map() -> Arc<X11ColorMap> { GLOBAL_X11_COLOR_MAP.clone() }

#[derive(Debug)]
pub struct X11ColorMap {
    rgb_file: Option<PathBuf>,
    /// The [`OnceLock`] is the guard for concurrent first access: only one thread
    /// reads the file, the others block until it is done.
    loaded: OnceLock<Result<HashMap<String, RgbColor>, String>>,
}

impl X11ColorMap {
    #[must_use]
    pub fn new(rgb_file: Option<PathBuf>) -> Self {
        Self {
            rgb_file,
            loaded: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn rgb_file(&self) -> Option<&Path> { self.rgb_file.as_deref() }

    #[must_use]
    pub fn is_loaded(&self) -> bool { self.loaded.get().is_some() }

    /// Case insensitive lookup.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::SourceUnavailable`] if there is no file for this platform, or
    ///   it could not be read.
    /// - [`PaletteError::ColorNotFound`] if the name is not in the file.
    pub fn lookup(&self, name: &str) -> PaletteResult<RgbColor> {
        let map = self.get_or_load().as_ref().map_err(|reason| {
            PaletteError::SourceUnavailable {
                source_name: X11_SOURCE_NAME,
                reason: reason.clone(),
            }
        })?;
        map.get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| PaletteError::ColorNotFound {
                name: name.to_string(),
                source_name: X11_SOURCE_NAME,
            })
    }

    /// Number of names loaded, `0` if the file is unavailable.
    pub fn len(&self) -> usize {
        self.get_or_load().as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn get_or_load(&self) -> &Result<HashMap<String, RgbColor>, String> {
        self.loaded.get_or_init(|| {
            let Some(path) = self.rgb_file.as_deref() else {
                debug!("error: X11 palette not found, no rgb.txt on this platform");
                return Err("no rgb.txt file on this platform".to_string());
            };
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    let map = parse_x11_rgb_text(&text);
                    debug!(path = %path.display(), count = map.len(), "loaded X11 palette");
                    Ok(map)
                }
                Err(err) => {
                    debug!(path = %path.display(), %err, "error: X11 palette not found");
                    Err(format!("{}: {err}", path.display()))
                }
            }
        })
    }
}

/// Parse the contents of an `rgb.txt` file into a map of lower cased name to color.
#[must_use]
pub fn parse_x11_rgb_text(text: &str) -> HashMap<String, RgbColor> {
    text.lines()
        .filter_map(parse_x11_rgb_line)
        .map(|(name, color)| (name.to_lowercase(), color))
        .collect()
}

/// Returns [None] for comments, blank lines, names with spaces, and malformed lines.
fn parse_x11_rgb_line(line: &str) -> Option<(&str, RgbColor)> {
    if line.starts_with('!') || line.trim().is_empty() {
        return None;
    }

    let mut rest = line.trim();
    let mut channels = [0_u8; 3];
    for channel in &mut channels {
        let (token, tail) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        *channel = token.parse().ok()?;
        rest = tail.trim_start();
    }

    // Whatever is left is the name, which may have spaces in it.
    let name = rest;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }

    let [red, green, blue] = channels;
    Some((name, RgbColor::new(red, green, blue)))
}
