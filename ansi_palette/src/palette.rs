// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashMap,
          path::PathBuf,
          str::FromStr,
          sync::{Arc, Mutex as StdMutex, PoisonError}};

use tracing::{debug, trace};

use crate::{AttributeName, BACKGROUND, CSI, ColorSource, EFFECTS, FOREGROUND,
            InlineVecParams, PaletteError, PaletteFamily, PaletteId, PaletteResult,
            PaletteTier, PaletteTierSet, RgbColor, SGR, SgrParam, StyleEntry,
            SystemColorSource, TierConfig, UNDERLINE_COLOR, platform_x11_rgb_file};

/// What client code uses to look styles up, regardless of whether the palette is
/// active or disabled.
pub trait StyleLookup {
    /// Resolve `name` into a style. The first call for a name does the work, later
    /// calls return the cached entry.
    ///
    /// # Errors
    ///
    /// [`PaletteError::UnrecognizedAttribute`] if `name` matches no grammar
    /// category and no named color lookup found it.
    fn get(&self, name: &str) -> PaletteResult<Arc<StyleEntry>>;

    fn family(&self) -> &'static PaletteFamily;

    fn tiers(&self) -> PaletteTierSet;

    fn is_enabled(&self, tier: PaletteTier) -> bool { self.tiers().contains(tier) }

    /// Drop every lazily built entry. Useful to bound the memory used by truecolor
    /// entries.
    fn clear(&self);
}

/// Palette configuration, shared by all the palettes built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteConfig {
    pub tiers: TierConfig,
    /// X11 color database, defaults to [`platform_x11_rgb_file`].
    pub x11_rgb_file: Option<PathBuf>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            tiers: TierConfig::default(),
            x11_rgb_file: platform_x11_rgb_file(),
        }
    }
}

impl PaletteConfig {
    #[must_use]
    pub fn with_tiers(mut self, tiers: TierConfig) -> Self {
        self.tiers = tiers;
        self
    }

    /// Eg: `"auto"`, `"none"`, `"basic,extended"`.
    ///
    /// # Errors
    ///
    /// [`PaletteError::InvalidTierConfiguration`] if `tiers` can't be parsed.
    pub fn with_tiers_str(self, tiers: &str) -> PaletteResult<Self> {
        Ok(self.with_tiers(TierConfig::from_str(tiers)?))
    }

    #[must_use]
    pub fn with_x11_rgb_file(mut self, x11_rgb_file: Option<PathBuf>) -> Self {
        self.x11_rgb_file = x11_rgb_file;
        self
    }
}

/// An active palette. Owns its tier set, its basic entries (built up front), and a
/// cache of entries built on first use.
#[derive(Debug)]
pub struct PaletteContainer {
    id: PaletteId,
    family: &'static PaletteFamily,
    tiers: PaletteTierSet,
    color_source: Arc<dyn ColorSource>,
    default_sequence: String,
    basic_entries: HashMap<&'static str, Arc<StyleEntry>>,
    cache: StdMutex<HashMap<String, Arc<StyleEntry>>>,
}

impl PaletteContainer {
    #[must_use]
    pub fn new(
        family: &'static PaletteFamily,
        tiers: PaletteTierSet,
        color_source: Arc<dyn ColorSource>,
    ) -> Self {
        let id = PaletteId::new_unique();
        let default_sequence = format!("{CSI}{}{SGR}", family.default_code);
        let is_basic_enabled = tiers.contains(PaletteTier::Basic);

        let basic_entries = family
            .basic_names()
            .filter_map(|name| {
                let code = family.basic_code(name)?;
                let entry = if is_basic_enabled {
                    let mut params = InlineVecParams::new();
                    params.push(SgrParam::Code(code).to_token());
                    Arc::new(StyleEntry::new(
                        name,
                        params,
                        default_sequence.clone(),
                        Some(id),
                    ))
                } else {
                    StyleEntry::noop()
                };
                Some((name, entry))
            })
            .collect();

        debug!(family = family.name, %tiers, "palette created");

        Self {
            id,
            family,
            tiers,
            color_source,
            default_sequence,
            basic_entries,
            cache: StdMutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn id(&self) -> PaletteId { self.id }

    /// Number of lazily built entries, no-ops included.
    #[must_use]
    pub fn cached_len(&self) -> usize { self.lock_cache().len() }

    /// The tier gate. Returns the shared no-op entry without calling `build_fn` if
    /// `tier` is not enabled.
    ///
    /// # Errors
    ///
    /// Whatever `build_fn` returns.
    pub fn resolve_or_noop(
        &self,
        tier: PaletteTier,
        build_fn: impl FnOnce() -> PaletteResult<Arc<StyleEntry>>,
    ) -> PaletteResult<Arc<StyleEntry>> {
        if self.tiers.contains(tier) {
            build_fn()
        } else {
            Ok(StyleEntry::noop())
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<StyleEntry>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StyleLookup for PaletteContainer {
    fn get(&self, name: &str) -> PaletteResult<Arc<StyleEntry>> {
        if let Some(entry) = self.basic_entries.get(name) {
            return Ok(entry.clone());
        }

        // The lock is held while building, so each name is built at most once.
        let mut cache = self.lock_cache();
        if let Some(entry) = cache.get(name) {
            return Ok(entry.clone());
        }

        let entry = self.build_entry(name)?;
        trace!(
            family = self.family.name,
            name,
            sequence = ?entry.render(),
            "palette entry cached"
        );
        cache.insert(name.to_string(), entry.clone());
        Ok(entry)
    }

    fn family(&self) -> &'static PaletteFamily { self.family }

    fn tiers(&self) -> PaletteTierSet { self.tiers }

    fn clear(&self) { self.lock_cache().clear(); }
}

mod build_entry_impl {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    impl PaletteContainer {
        pub(super) fn build_entry(&self, name: &str) -> PaletteResult<Arc<StyleEntry>> {
            let attribute_name = AttributeName::classify(name);
            let tier = attribute_name.tier();
            let start = self
                .family
                .start_code(tier)
                .ok_or_else(|| PaletteError::unrecognized(name))?;

            match attribute_name {
                AttributeName::Index(digits) => self.resolve_or_noop(tier, || {
                    let index = digits
                        .parse::<u8>()
                        .map_err(|_| PaletteError::unrecognized(name))?;
                    Ok(self.new_entry(name, SgrParam::Ansi256 {
                        start,
                        color: index.into(),
                    }))
                }),
                AttributeName::Nearest(hex_digits) => self.resolve_or_noop(tier, || {
                    let rgb_color = parse_hex(name, hex_digits)?;
                    let color = self.color_source.nearest_ansi256(rgb_color);
                    Ok(self.new_entry(name, SgrParam::Ansi256 { start, color }))
                }),
                AttributeName::Truecolor(hex_digits) => self.resolve_or_noop(tier, || {
                    let color = parse_hex(name, hex_digits)?;
                    Ok(self.new_entry(name, SgrParam::Rgb { start, color }))
                }),
                AttributeName::X11(color_name) => self.resolve_or_noop(tier, || {
                    let result = self.color_source.x11_color(color_name);
                    self.named_color_entry(name, start, result)
                }),
                AttributeName::Web(color_name) => self.resolve_or_noop(tier, || {
                    let result = self.color_source.web_color(color_name);
                    self.named_color_entry(name, start, result)
                }),
                AttributeName::Bare(_) => {
                    let color = self.lookup_bare_name(name)?;
                    self.resolve_or_noop(tier, || {
                        Ok(self.new_entry(name, SgrParam::Rgb { start, color }))
                    })
                }
            }
        }

        /// An unavailable source is a no-op. A missing color gets a second chance as
        /// a bare name, eg: `wheat` looks like a web form for `heat`.
        fn named_color_entry(
            &self,
            name: &str,
            start: &str,
            result: PaletteResult<RgbColor>,
        ) -> PaletteResult<Arc<StyleEntry>> {
            match result {
                Ok(color) => Ok(self.new_entry(name, SgrParam::Rgb { start, color })),
                Err(PaletteError::SourceUnavailable {
                    source_name,
                    reason,
                }) => {
                    debug!(name, source_name, %reason, "color source unavailable, no-op");
                    Ok(StyleEntry::noop())
                }
                Err(PaletteError::ColorNotFound { .. }) => {
                    let color = self.lookup_bare_name(name)?;
                    Ok(self.new_entry(name, SgrParam::Rgb { start, color }))
                }
                Err(err) => Err(err),
            }
        }

        /// Web colors first, then X11.
        fn lookup_bare_name(&self, name: &str) -> PaletteResult<RgbColor> {
            debug!(name, "attempting web color lookup");
            self.color_source
                .web_color(name)
                .or_else(|err| {
                    debug!(name, %err, "web color lookup failed, trying X11");
                    self.color_source.x11_color(name)
                })
                .map_err(|err| {
                    debug!(name, %err, "X11 color lookup failed");
                    PaletteError::unrecognized(name)
                })
        }

        fn new_entry(&self, name: &str, param: SgrParam<'_>) -> Arc<StyleEntry> {
            let mut params = InlineVecParams::new();
            params.push(param.to_token());
            Arc::new(StyleEntry::new(
                name,
                params,
                self.default_sequence.clone(),
                Some(self.id),
            ))
        }
    }

    fn parse_hex(name: &str, hex_digits: &str) -> PaletteResult<RgbColor> {
        RgbColor::try_from_hex_digits(hex_digits)
            .ok_or_else(|| PaletteError::unrecognized(name))
    }
}

/// Stands in for a palette when color is turned off. Every name, even one that is not
/// recognized, resolves to the no-op entry.
#[derive(Debug)]
pub struct DisabledPalette {
    family: &'static PaletteFamily,
}

impl DisabledPalette {
    #[must_use]
    pub fn new(family: &'static PaletteFamily) -> Self { Self { family } }
}

impl StyleLookup for DisabledPalette {
    fn get(&self, _name: &str) -> PaletteResult<Arc<StyleEntry>> { Ok(StyleEntry::noop()) }

    fn family(&self) -> &'static PaletteFamily { self.family }

    fn tiers(&self) -> PaletteTierSet { PaletteTierSet::none() }

    fn clear(&self) {}
}

/// A palette for one style family. Which variant you get is decided once, at
/// construction, by [`TierConfig::resolve`].
#[derive(Debug)]
pub enum Palette {
    Active(PaletteContainer),
    Disabled(DisabledPalette),
}

impl Palette {
    /// Uses a [`SystemColorSource`] for `config.x11_rgb_file`. The platform default
    /// file is shared process wide, but any other file gets its own map here, read
    /// once per palette. To read it once for several palettes, use [`Palettes::new`]
    /// or pass one source to [`Self::with_color_source`].
    #[must_use]
    pub fn new(family: &'static PaletteFamily, config: &PaletteConfig) -> Self {
        let color_source =
            Arc::new(SystemColorSource::with_x11_rgb_file(config.x11_rgb_file.clone()));
        Self::with_color_source(family, &config.tiers, color_source)
    }

    #[must_use]
    pub fn with_color_source(
        family: &'static PaletteFamily,
        tiers: &TierConfig,
        color_source: Arc<dyn ColorSource>,
    ) -> Self {
        match tiers.resolve() {
            Some(tiers) => {
                Palette::Active(PaletteContainer::new(family, tiers, color_source))
            }
            None => {
                debug!(family = family.name, "palette disabled");
                Palette::Disabled(DisabledPalette::new(family))
            }
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool { matches!(self, Palette::Disabled(_)) }

    fn as_lookup(&self) -> &dyn StyleLookup {
        match self {
            Palette::Active(it) => it,
            Palette::Disabled(it) => it,
        }
    }
}

impl StyleLookup for Palette {
    fn get(&self, name: &str) -> PaletteResult<Arc<StyleEntry>> {
        self.as_lookup().get(name)
    }

    fn family(&self) -> &'static PaletteFamily { self.as_lookup().family() }

    fn tiers(&self) -> PaletteTierSet { self.as_lookup().tiers() }

    fn clear(&self) { self.as_lookup().clear() }
}

/// The four palettes, built from one configuration, sharing one color source.
#[derive(Debug)]
pub struct Palettes {
    /// Foreground colors.
    pub fg: Palette,
    /// Background colors.
    pub bg: Palette,
    /// Text effects, eg: `bold`.
    pub fx: Palette,
    /// Underline colors.
    pub ul: Palette,
}

impl Palettes {
    #[must_use]
    pub fn new(config: &PaletteConfig) -> Self {
        let color_source: Arc<dyn ColorSource> =
            Arc::new(SystemColorSource::with_x11_rgb_file(config.x11_rgb_file.clone()));
        Self::with_color_source(&config.tiers, &color_source)
    }

    /// Auto detection, if configured, runs once per palette. The result is memoized by
    /// [`crate::global_palette_support`], so all four agree.
    #[must_use]
    pub fn with_color_source(
        tiers: &TierConfig,
        color_source: &Arc<dyn ColorSource>,
    ) -> Self {
        let build = |family: &'static PaletteFamily| {
            Palette::with_color_source(family, tiers, color_source.clone())
        };
        Self {
            fg: build(&FOREGROUND),
            bg: build(&BACKGROUND),
            fx: build(&EFFECTS),
            ul: build(&UNDERLINE_COLOR),
        }
    }

    /// Drop the lazily built entries of all four palettes.
    pub fn clear(&self) {
        for palette in [&self.fg, &self.bg, &self.fx, &self.ul] {
            palette.clear();
        }
    }
}
