// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The fixed 256-color index to RGB table, and the nearest color search that maps an
//! arbitrary [`RgbColor`] onto it.
//!
//! - Indices 0-15 are the 16 basic colors (as rendered by a classic console).
//! - Indices 16-231 are the 6x6x6 color cube.
//! - Indices 232-255 are the grayscale ramp.
//!
//! More info: <https://en.wikipedia.org/wiki/ANSI_escape_code#8-bit>

use crate::{Ansi256Color, RgbColor};

#[rustfmt::skip]
pub const ANSI_COLOR_PALETTE: [(u8, u8, u8); 256] = [
    (0, 0, 0), (128, 0, 0), (0, 128, 0), (128, 128, 0),
    (0, 0, 128), (128, 0, 128), (0, 128, 128), (192, 192, 192),
    (128, 128, 128), (255, 0, 0), (0, 255, 0), (255, 255, 0),
    (0, 0, 255), (255, 0, 255), (0, 255, 255), (255, 255, 255),
    (0, 0, 0), (0, 0, 95), (0, 0, 135), (0, 0, 175),
    (0, 0, 215), (0, 0, 255), (0, 95, 0), (0, 95, 95),
    (0, 95, 135), (0, 95, 175), (0, 95, 215), (0, 95, 255),
    (0, 135, 0), (0, 135, 95), (0, 135, 135), (0, 135, 175),
    (0, 135, 215), (0, 135, 255), (0, 175, 0), (0, 175, 95),
    (0, 175, 135), (0, 175, 175), (0, 175, 215), (0, 175, 255),
    (0, 215, 0), (0, 215, 95), (0, 215, 135), (0, 215, 175),
    (0, 215, 215), (0, 215, 255), (0, 255, 0), (0, 255, 95),
    (0, 255, 135), (0, 255, 175), (0, 255, 215), (0, 255, 255),
    (95, 0, 0), (95, 0, 95), (95, 0, 135), (95, 0, 175),
    (95, 0, 215), (95, 0, 255), (95, 95, 0), (95, 95, 95),
    (95, 95, 135), (95, 95, 175), (95, 95, 215), (95, 95, 255),
    (95, 135, 0), (95, 135, 95), (95, 135, 135), (95, 135, 175),
    (95, 135, 215), (95, 135, 255), (95, 175, 0), (95, 175, 95),
    (95, 175, 135), (95, 175, 175), (95, 175, 215), (95, 175, 255),
    (95, 215, 0), (95, 215, 95), (95, 215, 135), (95, 215, 175),
    (95, 215, 215), (95, 215, 255), (95, 255, 0), (95, 255, 95),
    (95, 255, 135), (95, 255, 175), (95, 255, 215), (95, 255, 255),
    (135, 0, 0), (135, 0, 95), (135, 0, 135), (135, 0, 175),
    (135, 0, 215), (135, 0, 255), (135, 95, 0), (135, 95, 95),
    (135, 95, 135), (135, 95, 175), (135, 95, 215), (135, 95, 255),
    (135, 135, 0), (135, 135, 95), (135, 135, 135), (135, 135, 175),
    (135, 135, 215), (135, 135, 255), (135, 175, 0), (135, 175, 95),
    (135, 175, 135), (135, 175, 175), (135, 175, 215), (135, 175, 255),
    (135, 215, 0), (135, 215, 95), (135, 215, 135), (135, 215, 175),
    (135, 215, 215), (135, 215, 255), (135, 255, 0), (135, 255, 95),
    (135, 255, 135), (135, 255, 175), (135, 255, 215), (135, 255, 255),
    (175, 0, 0), (175, 0, 95), (175, 0, 135), (175, 0, 175),
    (175, 0, 215), (175, 0, 255), (175, 95, 0), (175, 95, 95),
    (175, 95, 135), (175, 95, 175), (175, 95, 215), (175, 95, 255),
    (175, 135, 0), (175, 135, 95), (175, 135, 135), (175, 135, 175),
    (175, 135, 215), (175, 135, 255), (175, 175, 0), (175, 175, 95),
    (175, 175, 135), (175, 175, 175), (175, 175, 215), (175, 175, 255),
    (175, 215, 0), (175, 215, 95), (175, 215, 135), (175, 215, 175),
    (175, 215, 215), (175, 215, 255), (175, 255, 0), (175, 255, 95),
    (175, 255, 135), (175, 255, 175), (175, 255, 215), (175, 255, 255),
    (215, 0, 0), (215, 0, 95), (215, 0, 135), (215, 0, 175),
    (215, 0, 215), (215, 0, 255), (215, 95, 0), (215, 95, 95),
    (215, 95, 135), (215, 95, 175), (215, 95, 215), (215, 95, 255),
    (215, 135, 0), (215, 135, 95), (215, 135, 135), (215, 135, 175),
    (215, 135, 215), (215, 135, 255), (215, 175, 0), (215, 175, 95),
    (215, 175, 135), (215, 175, 175), (215, 175, 215), (215, 175, 255),
    (215, 215, 0), (215, 215, 95), (215, 215, 135), (215, 215, 175),
    (215, 215, 215), (215, 215, 255), (215, 255, 0), (215, 255, 95),
    (215, 255, 135), (215, 255, 175), (215, 255, 215), (215, 255, 255),
    (255, 0, 0), (255, 0, 95), (255, 0, 135), (255, 0, 175),
    (255, 0, 215), (255, 0, 255), (255, 95, 0), (255, 95, 95),
    (255, 95, 135), (255, 95, 175), (255, 95, 215), (255, 95, 255),
    (255, 135, 0), (255, 135, 95), (255, 135, 135), (255, 135, 175),
    (255, 135, 215), (255, 135, 255), (255, 175, 0), (255, 175, 95),
    (255, 175, 135), (255, 175, 175), (255, 175, 215), (255, 175, 255),
    (255, 215, 0), (255, 215, 95), (255, 215, 135), (255, 215, 175),
    (255, 215, 215), (255, 215, 255), (255, 255, 0), (255, 255, 95),
    (255, 255, 135), (255, 255, 175), (255, 255, 215), (255, 255, 255),
    (8, 8, 8), (18, 18, 18), (28, 28, 28), (38, 38, 38),
    (48, 48, 48), (58, 58, 58), (68, 68, 68), (78, 78, 78),
    (88, 88, 88), (98, 98, 98), (108, 108, 108), (118, 118, 118),
    (128, 128, 128), (138, 138, 138), (148, 148, 148), (158, 158, 158),
    (168, 168, 168), (178, 178, 178), (188, 188, 188), (198, 198, 198),
    (208, 208, 208), (218, 218, 218), (228, 228, 228), (238, 238, 238),
];

/// Squared Euclidean distance in RGB space.
#[must_use]
pub fn rgb_distance_squared(lhs: RgbColor, rhs: RgbColor) -> u32 {
    let delta = |a: u8, b: u8| {
        let it = i32::from(a) - i32::from(b);
        it.unsigned_abs() * it.unsigned_abs()
    };
    delta(lhs.red, rhs.red) + delta(lhs.green, rhs.green) + delta(lhs.blue, rhs.blue)
}

/// Returns the index in [`ANSI_COLOR_PALETTE`] whose color is closest to `rgb_color`.
/// Ties are broken by the lowest index.
#[must_use]
pub fn find_nearest_ansi256(rgb_color: RgbColor) -> Ansi256Color {
    let mut best_index: u8 = 0;
    let mut best_distance = u32::MAX;
    for (index, entry) in (0..=u8::MAX).zip(ANSI_COLOR_PALETTE.iter()) {
        let distance = rgb_distance_squared(rgb_color, RgbColor::from(*entry));
        // Strictly less than, so the first (lowest) index wins a tie.
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
        }
        if distance == 0 {
            break;
        }
    }
    Ansi256Color::new(best_index)
}

/// Same as [`find_nearest_ansi256`], for a 3 or 6 digit hex payload, eg: `f80`.
#[must_use]
pub fn find_nearest_ansi256_hex(hex_digits: &str) -> Option<Ansi256Color> {
    RgbColor::try_from_hex_digits(hex_digits).map(find_nearest_ansi256)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(7, (192, 192, 192))]
    #[test_case(16, (0, 0, 0))]
    #[test_case(42, (0, 215, 135))]
    #[test_case(208, (255, 135, 0))]
    #[test_case(232, (8, 8, 8))]
    #[test_case(255, (238, 238, 238))]
    fn test_table_entries(index: usize, rgb: (u8, u8, u8)) {
        assert_eq!(ANSI_COLOR_PALETTE[index], rgb);
    }

    #[test_case((255, 136, 0), 208)]
    #[test_case((255, 135, 0), 208)]
    #[test_case((255, 255, 255), 15)]
    #[test_case((128, 128, 128), 8)]
    #[test_case((187, 0, 187), 127)]
    #[test_case((1, 1, 1), 0)]
    fn test_find_nearest(rgb: (u8, u8, u8), index: u8) {
        assert_eq!(find_nearest_ansi256(rgb.into()), Ansi256Color::new(index));
    }

    /// Both index 0 and index 16 are black, the lowest index wins.
    #[test]
    fn test_find_nearest_tie_goes_to_lowest_index() {
        assert_eq!(
            find_nearest_ansi256(RgbColor::new(0, 0, 0)),
            Ansi256Color::new(0)
        );
    }

    #[test]
    fn test_find_nearest_hex() {
        assert_eq!(find_nearest_ansi256_hex("f80"), Some(Ansi256Color::new(208)));
        assert_eq!(find_nearest_ansi256_hex("ff8800"), Some(Ansi256Color::new(208)));
        assert_eq!(find_nearest_ansi256_hex("xyz"), None);
    }

    #[test]
    fn test_distance() {
        assert_eq!(
            rgb_distance_squared(RgbColor::new(0, 0, 0), RgbColor::new(3, 4, 0)),
            25
        );
    }
}
