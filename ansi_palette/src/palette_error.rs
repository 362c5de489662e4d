// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Convenience type alias used by every fallible operation in this crate.
pub type PaletteResult<T> = Result<T, PaletteError>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum PaletteError {
    /// The name matches no grammar category, and every named color lookup failed.
    #[error("🔍 '{name}' is not a recognized attribute name")]
    #[diagnostic(
        code(r3bl_ansi_palette::unrecognized_attribute),
        help("use a basic name, `i_DDD`, `n_HHH`, `t_HHH`/`t_HHHHHH`, `x_NAME`, `w_NAME`, or a known color name")
    )]
    UnrecognizedAttribute { name: String },

    /// A named color lookup found no matching entry. Caught by the fallback path.
    #[error("🎨 Color '{name}' not found in {source_name}")]
    #[diagnostic(code(r3bl_ansi_palette::color_not_found))]
    ColorNotFound {
        name: String,
        source_name: &'static str,
    },

    /// The named color database file is missing or unreadable, or the web color
    /// library is not compiled in. Resolves to a no-op style.
    #[error("📭 Color source {source_name} is unavailable: {reason}")]
    #[diagnostic(code(r3bl_ansi_palette::source_unavailable))]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("⚙️ Invalid palette tier configuration: '{value}'")]
    #[diagnostic(
        code(r3bl_ansi_palette::invalid_tier_configuration),
        help("use one or more of `basic`, `extended`, `truecolor`; or `auto`, or `none`")
    )]
    InvalidTierConfiguration { value: String },

    /// Writing a style (or its reset) to the output device failed.
    #[error("📤 Could not write style to output device")]
    #[diagnostic(code(r3bl_ansi_palette::output_write_failure))]
    OutputWriteFailure(#[from] std::io::Error),
}

impl PaletteError {
    pub fn unrecognized(name: impl Into<String>) -> Self {
        Self::UnrecognizedAttribute { name: name.into() }
    }

    #[must_use]
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_display() {
        let it = PaletteError::unrecognized("bogus");
        assert_eq!(it.to_string(), "🔍 'bogus' is not a recognized attribute name");
    }

    #[test]
    fn test_io_error_converts() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let it: PaletteError = io_error.into();
        assert!(matches!(it, PaletteError::OutputWriteFailure(_)));
    }

    #[test]
    fn test_is_source_unavailable() {
        let it = PaletteError::SourceUnavailable {
            source_name: "X11 rgb.txt",
            reason: "missing".into(),
        };
        assert!(it.is_source_unavailable());
        assert!(!PaletteError::unrecognized("x").is_source_unavailable());
    }
}
