//! Named color palettes and the built-in option tables.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::weighted::Weighted;

/// An ordered set of colors with a display name.
///
/// Particles store an index into `colors`; the order is shuffled once per
/// scene generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<Color>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Build a palette from hex strings.
    pub fn from_hex(name: impl Into<String>, hex: &[&str]) -> Result<Self, ConfigError> {
        let colors = hex
            .iter()
            .map(|h| Color::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, colors))
    }

    /// Append a color, returning the extended palette.
    pub fn with_color(mut self, color: Color) -> Self {
        self.colors.push(color);
        self
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette(self.name.clone()));
        }
        Ok(())
    }

    // =========================================================================
    // BUILT-INS
    // =========================================================================

    /// Deep teal water with two orange highlights.
    pub fn deep_sea() -> Self {
        Self::new(
            "Deep Sea",
            vec![
                Color::rgb(0x07, 0x17, 0x1b),
                Color::rgb(0x13, 0x3c, 0x3e),
                Color::rgb(0x02, 0x52, 0x50),
                Color::rgb(0xfd, 0x7d, 0x02),
                Color::rgb(0xfa, 0x9f, 0x03),
            ],
        )
    }

    /// Plum through crimson to orange.
    pub fn sunset() -> Self {
        Self::new(
            "Sunset",
            vec![
                Color::rgb(0x40, 0x23, 0x34),
                Color::rgb(0x6a, 0x01, 0x36),
                Color::rgb(0xac, 0x03, 0x49),
                Color::rgb(0xd9, 0x04, 0x2b),
                Color::rgb(0xf1, 0x46, 0x16),
            ],
        )
    }

    /// Blues and greens with one amber accent.
    pub fn spring_bloom() -> Self {
        Self::new(
            "Spring Bloom",
            vec![
                Color::rgb(0x0f, 0x4c, 0x81),
                Color::rgb(0x22, 0x74, 0xa5),
                Color::rgb(0x32, 0x93, 0x6f),
                Color::rgb(0x03, 0xa6, 0x78),
                Color::rgb(0xf1, 0x8f, 0x01),
            ],
        )
    }

    /// Reds against steel greys.
    pub fn gun_metal() -> Self {
        Self::new(
            "Gun Metal",
            vec![
                Color::rgb(0xd9, 0x04, 0x29),
                Color::rgb(0xef, 0x23, 0x3c),
                Color::rgb(0xed, 0xf2, 0xf4),
                Color::rgb(0x8d, 0x99, 0xae),
                Color::rgb(0x2b, 0x2d, 0x42),
            ],
        )
    }

    /// The single fixed palette of the earliest sketches.
    pub fn classic() -> Self {
        Self {
            name: "Classic".into(),
            ..Self::deep_sea()
        }
    }

    /// Deep Sea (1), Sunset (2), Spring Bloom (3).
    pub fn classic_table() -> Vec<Weighted<Palette>> {
        vec![
            Weighted::new(Self::deep_sea(), 1.0),
            Weighted::new(Self::sunset(), 2.0),
            Weighted::new(Self::spring_bloom(), 3.0),
        ]
    }

    /// Deep Sea (1), Sunset (2), Gun Metal (3), each with black appended.
    pub fn spiral_table() -> Vec<Weighted<Palette>> {
        vec![
            Weighted::new(Self::deep_sea().with_color(Color::BLACK), 1.0),
            Weighted::new(Self::sunset().with_color(Color::BLACK), 2.0),
            Weighted::new(Self::gun_metal().with_color(Color::BLACK), 3.0),
        ]
    }
}

/// A named noise scale applied to positions before sampling the direction field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoisePreset {
    pub name: String,
    pub scale: f64,
}

impl NoisePreset {
    pub fn new(name: impl Into<String>, scale: f64) -> Self {
        Self {
            name: name.into(),
            scale,
        }
    }

    /// Subtle / Medium / Hard / Extreme with equal weights.
    pub fn table(extreme: f64) -> Vec<Weighted<NoisePreset>> {
        vec![
            Weighted::new(Self::new("Subtle", 0.0003), 1.0),
            Weighted::new(Self::new("Medium", 0.0007), 1.0),
            Weighted::new(Self::new("Hard", 0.001), 1.0),
            Weighted::new(Self::new("Extreme", extreme), 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palettes_have_five_colors() {
        for palette in [
            Palette::deep_sea(),
            Palette::sunset(),
            Palette::spring_bloom(),
            Palette::gun_metal(),
            Palette::classic(),
        ] {
            assert_eq!(palette.len(), 5, "{}", palette.name);
            assert!(palette.validate().is_ok());
        }
    }

    #[test]
    fn test_spiral_table_appends_black() {
        for entry in Palette::spiral_table() {
            assert_eq!(entry.value.len(), 6);
            assert_eq!(entry.value.get(5), Some(Color::BLACK));
        }
    }

    #[test]
    fn test_from_hex_propagates_errors() {
        assert!(Palette::from_hex("ok", &["#000000", "#ffffff"]).is_ok());
        assert!(matches!(
            Palette::from_hex("bad", &["#000000", "nope"]),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_empty_palette_invalid() {
        let empty = Palette::new("empty", Vec::new());
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyPalette(_))));
    }

    #[test]
    fn test_palette_entry_serializes_flat() {
        let entry = Weighted::new(
            Palette::from_hex("Mono", &["#000000", "#ffffff"]).unwrap(),
            1.0,
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Mono");
        assert_eq!(json["colors"][1], "#ffffff");
        assert_eq!(json["weight"], 1.0);
    }
}
