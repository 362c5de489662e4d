// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter},
          str::FromStr};

use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{PaletteError, PaletteResult, global_palette_support};

/// Color capability levels, in increasing order. Each tier implies the ones below it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    IntoStaticStr,
    strum_macros::Display,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PaletteTier {
    /// 8/16 colors and effects.
    Basic,
    /// 256 colors.
    Extended,
    /// 24-bit colors.
    Truecolor,
}

/// The enabled tiers. Always a prefix of [`PaletteTier`]'s ordering, so it is stored
/// as the highest enabled tier. Immutable once a palette is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteTierSet {
    max: Option<PaletteTier>,
}

impl PaletteTierSet {
    /// Nothing enabled.
    #[must_use]
    pub const fn none() -> Self { Self { max: None } }

    /// `tier` and every tier below it.
    #[must_use]
    pub const fn up_to(tier: PaletteTier) -> Self { Self { max: Some(tier) } }

    #[must_use]
    pub const fn all() -> Self { Self::up_to(PaletteTier::Truecolor) }

    /// Build a set from tier names. The set is closed downward, so naming only
    /// `truecolor` enables all three tiers.
    ///
    /// # Errors
    ///
    /// [`PaletteError::InvalidTierConfiguration`] if a name is not a tier.
    pub fn from_names<I, S>(names: I) -> PaletteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut max = None;
        for name in names {
            let name = name.as_ref().trim();
            let tier = PaletteTier::from_str(name).map_err(|_| {
                PaletteError::InvalidTierConfiguration {
                    value: name.to_string(),
                }
            })?;
            max = max.max(Some(tier));
        }
        Ok(Self { max })
    }

    #[must_use]
    pub fn contains(&self, tier: PaletteTier) -> bool {
        self.max.is_some_and(|max| tier <= max)
    }

    #[must_use]
    pub const fn max_tier(&self) -> Option<PaletteTier> { self.max }

    #[must_use]
    pub const fn is_empty(&self) -> bool { self.max.is_none() }

    /// Enabled tiers, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = PaletteTier> + use<> {
        let this = *self;
        PaletteTier::iter().filter(move |tier| this.contains(*tier))
    }
}

impl Display for PaletteTierSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.iter().map(Into::into).collect();
        write!(f, "({})", names.join(", "))
    }
}

impl From<PaletteTier> for PaletteTierSet {
    fn from(tier: PaletteTier) -> Self { Self::up_to(tier) }
}

/// How a palette decides which tiers to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierConfig {
    /// Ask [`global_palette_support::detect`]. If that finds no color support, the
    /// palette is disabled.
    #[default]
    AutoDetect,
    /// Use exactly this set.
    Explicit(PaletteTierSet),
    /// Every style is a no-op.
    Disabled,
}

impl TierConfig {
    /// # Errors
    ///
    /// [`PaletteError::InvalidTierConfiguration`] if a name is not a tier.
    pub fn from_names<I, S>(names: I) -> PaletteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PaletteTierSet::from_names(names).map(TierConfig::Explicit)
    }

    /// The enabled set, or [None] if the palette should be disabled altogether.
    #[must_use]
    pub fn resolve(&self) -> Option<PaletteTierSet> {
        match self {
            TierConfig::AutoDetect => global_palette_support::detect()
                .max_tier()
                .map(PaletteTierSet::up_to),
            TierConfig::Explicit(set) => Some(*set),
            TierConfig::Disabled => None,
        }
    }
}

/// Accepts `auto`, `none` (also `off`, `disabled`), or a comma separated list of tier
/// names, eg: `basic,extended`.
impl FromStr for TierConfig {
    type Err = PaletteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "auto" => Ok(TierConfig::AutoDetect),
            "none" | "off" | "disabled" => Ok(TierConfig::Disabled),
            "" => Err(PaletteError::InvalidTierConfiguration {
                value: value.to_string(),
            }),
            _ => TierConfig::from_names(trimmed.split(',')),
        }
    }
}
