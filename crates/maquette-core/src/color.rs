//! Color handling for Maquette plans
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, providing convenience methods for working with colors
//! in the Maquette project.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{ColorSpaceTag, DynamicColor};

/// Wrapper around the `DynamicColor` type from the color crate
/// This provides convenience methods for working with colors in the Maquette project
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use maquette_core::color::Color;
    ///
    /// let peach = Color::new("#FFCC80").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use maquette_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// The alpha value is a `f32` between 0.0 (fully transparent) and
    /// 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the sRGB components as `[r, g, b, a]` in the 0.0 to 1.0 range.
    ///
    /// Mesh materials carry colors as component factors rather than CSS
    /// strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use maquette_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let [r, g, b, a] = red.to_rgba();
    /// assert_eq!((r, g, b, a), (1.0, 0.0, 0.0, 1.0));
    /// ```
    pub fn to_rgba(&self) -> [f32; 4] {
        self.color.convert(ColorSpaceTag::Srgb).components
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

// For compatibility with code that uses colors as strings
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        let peach = Color::new("#FFCC80");
        assert!(peach.is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_string(), "black");
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap();
        let transparent = color.with_alpha(0.5);
        assert!((transparent.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_color_to_rgba() {
        let [r, g, b, a] = Color::new("#ff0000").unwrap().to_rgba();
        assert!((r - 1.0).abs() < 0.001);
        assert!(g.abs() < 0.001);
        assert!(b.abs() < 0.001);
        assert!((a - 1.0).abs() < 0.001);

        let [r, g, b, _] = Color::new("#90CAF9").unwrap().to_rgba();
        assert!((r - 0x90 as f32 / 255.0).abs() < 0.01);
        assert!((g - 0xCA as f32 / 255.0).abs() < 0.01);
        assert!((b - 0xF9 as f32 / 255.0).abs() < 0.01);
    }

    #[test]
    fn test_color_display() {
        let color = Color::new("blue").unwrap();
        let display = format!("{}", color);
        assert!(!display.is_empty());
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
