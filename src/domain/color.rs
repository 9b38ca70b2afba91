//! Palette and color code domain model.
//!
//! On the wire a color is a small integer indexing into the palette, which
//! is resolved from configured color names once at boot and never changes
//! afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index into the palette. Serialized as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorCode(pub u8);

impl ColorCode {
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Errors raised while building a palette from configured color names.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("unknown color name '{0}'")]
    UnknownColor(String),

    #[error("palette must contain between 1 and 256 colors, got {0}")]
    InvalidLength(usize),
}

/// Ordered list of RGBA colors. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Resolve a list of CSS color names into a palette.
    pub fn from_names(names: &[String]) -> Result<Self, PaletteError> {
        if names.is_empty() || names.len() > 256 {
            return Err(PaletteError::InvalidLength(names.len()));
        }

        let mut colors = Vec::with_capacity(names.len());
        for name in names {
            let parsed = csscolorparser::parse(name)
                .map_err(|_| PaletteError::UnknownColor(name.clone()))?;
            let [r, g, b, a] = parsed.to_rgba8();
            colors.push(Rgba::new(r, g, b, a));
        }

        Ok(Self { colors })
    }

    /// Build a palette directly from RGBA values (mostly for tests).
    pub fn from_rgba(colors: Vec<Rgba>) -> Result<Self, PaletteError> {
        if colors.is_empty() || colors.len() > 256 {
            return Err(PaletteError::InvalidLength(colors.len()));
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Whether `code` indexes a color of this palette.
    pub fn contains(&self, code: ColorCode) -> bool {
        code.as_usize() < self.colors.len()
    }

    pub fn get(&self, code: ColorCode) -> Option<Rgba> {
        self.colors.get(code.as_usize()).copied()
    }

    /// Index of the palette color closest to `target`.
    ///
    /// Distance is the channel-weighted squared distance
    /// `(0.30·ΔR)² + (0.59·ΔG)² + (0.11·ΔB)²` (alpha is ignored).
    /// Ties resolve to the lowest palette index.
    pub fn nearest(&self, target: Rgba) -> ColorCode {
        let mut min_distance = f32::MAX;
        let mut min_index = 0usize;

        for (i, candidate) in self.colors.iter().enumerate() {
            let dr = (f32::from(target.r) - f32::from(candidate.r)) * 0.30;
            let dg = (f32::from(target.g) - f32::from(candidate.g)) * 0.59;
            let db = (f32::from(target.b) - f32::from(candidate.b)) * 0.11;
            let distance = dr * dr + dg * dg + db * db;

            if distance < min_distance {
                min_distance = distance;
                min_index = i;
            }
        }

        ColorCode(min_index as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_code_serializes_as_number() {
        // given:
        let code = ColorCode(7);

        // when:
        let json = serde_json::to_string(&code).unwrap();
        let back: ColorCode = serde_json::from_str("7").unwrap();

        // then:
        assert_eq!(json, "7");
        assert_eq!(back, code);
    }

    #[test]
    fn test_from_names_resolves_css_colors() {
        // given:
        let names = vec!["black".to_string(), "white".to_string(), "red".to_string()];

        // when:
        let palette = Palette::from_names(&names).unwrap();

        // then:
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(ColorCode(0)), Some(Rgba::new(0, 0, 0, 255)));
        assert_eq!(
            palette.get(ColorCode(1)),
            Some(Rgba::new(255, 255, 255, 255))
        );
        assert_eq!(palette.get(ColorCode(2)), Some(Rgba::new(255, 0, 0, 255)));
    }

    #[test]
    fn test_standard_web_palette_resolves() {
        // given: the 16 basic web color names
        let names: Vec<String> = [
            "white", "silver", "gray", "black", "red", "maroon", "yellow", "olive", "lime",
            "green", "aqua", "teal", "blue", "navy", "fuchsia", "purple",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // when:
        let palette = Palette::from_names(&names).unwrap();

        // then:
        assert_eq!(palette.len(), 16);
        assert_eq!(palette.get(ColorCode(4)), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(palette.get(ColorCode(12)), Some(Rgba::new(0, 0, 255, 255)));
    }

    #[test]
    fn test_from_names_rejects_unknown_color() {
        // given:
        let names = vec!["definitely-not-a-color".to_string()];

        // when:
        let result = Palette::from_names(&names);

        // then:
        assert!(matches!(result, Err(PaletteError::UnknownColor(_))));
    }

    #[test]
    fn test_from_names_rejects_empty_list() {
        // given / when:
        let result = Palette::from_names(&[]);

        // then:
        assert!(matches!(result, Err(PaletteError::InvalidLength(0))));
    }

    #[test]
    fn test_from_names_rejects_oversized_list() {
        // given: one name more than a color code can address
        let names = vec!["black".to_string(); 257];

        // when:
        let result = Palette::from_names(&names);

        // then:
        assert!(matches!(result, Err(PaletteError::InvalidLength(257))));
    }

    #[test]
    fn test_nearest_light_gray_maps_to_white() {
        // given: black/white palette, a light gray sample
        let palette = Palette::from_rgba(vec![
            Rgba::new(0, 0, 0, 255),
            Rgba::new(255, 255, 255, 255),
        ])
        .unwrap();

        // when:
        let code = palette.nearest(Rgba::new(200, 200, 200, 255));

        // then:
        assert_eq!(code, ColorCode(1));
    }

    #[test]
    fn test_nearest_exact_match_wins() {
        // given:
        let palette = Palette::from_rgba(vec![
            Rgba::new(0, 0, 0, 255),
            Rgba::new(255, 0, 0, 255),
            Rgba::new(0, 255, 0, 255),
        ])
        .unwrap();

        // when:
        let code = palette.nearest(Rgba::new(0, 255, 0, 255));

        // then:
        assert_eq!(code, ColorCode(2));
    }

    #[test]
    fn test_nearest_tie_resolves_to_lowest_index() {
        // given: two identical palette entries
        let palette = Palette::from_rgba(vec![
            Rgba::new(10, 10, 10, 255),
            Rgba::new(10, 10, 10, 255),
        ])
        .unwrap();

        // when:
        let code = palette.nearest(Rgba::new(10, 10, 10, 255));

        // then:
        assert_eq!(code, ColorCode(0));
    }

    #[test]
    fn test_nearest_weights_green_heaviest() {
        // given: candidates differing by the same amount on different channels;
        // the green delta costs the most, so the red-shifted candidate is closer
        let palette = Palette::from_rgba(vec![
            Rgba::new(0, 100, 0, 255), // green delta from target
            Rgba::new(100, 0, 0, 255), // red delta from target
        ])
        .unwrap();

        // when:
        let code = palette.nearest(Rgba::new(0, 0, 0, 255));

        // then:
        assert_eq!(code, ColorCode(1));
    }

    #[test]
    fn test_contains_checks_palette_bounds() {
        // given:
        let palette =
            Palette::from_rgba(vec![Rgba::new(0, 0, 0, 255), Rgba::new(255, 255, 255, 255)])
                .unwrap();

        // then:
        assert!(palette.contains(ColorCode(0)));
        assert!(palette.contains(ColorCode(1)));
        assert!(!palette.contains(ColorCode(2)));
    }
}
