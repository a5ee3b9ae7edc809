//! Colors for run fills and outlines.
//!
//! A color token in markup is either a name from a [`ColorRegistry`] or a
//! hexadecimal literal in `AARRGGBB` or `RRGGBB` form. Color is cosmetic, so
//! a token that is neither never fails a render: it resolves to the registry's
//! `default` entry and a warning is printed once.

use std::collections::HashMap;

use cardgen_common::warning::warn_once;
use serde::Serialize;

/// An RGBA color, one byte per channel, alpha 255 = fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green (full intensity, not the CSS half-intensity green).
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    /// Opaque cyan.
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque color from its three channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color from all four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// A color from a packed `0xAARRGGBB` value.
    ///
    /// An alpha byte of zero is read as "no alpha given", so `0x00ff0000`
    /// and `0xff0000` both produce opaque red. Use [`Color::rgba`] for a
    /// fully transparent color.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self {
            r,
            g,
            b,
            a: if a == 0 { 255 } else { a },
        }
    }

    /// Parse a hexadecimal color literal.
    ///
    /// Accepts one to eight hex digits with an optional leading `#`. Eight
    /// digits are `AARRGGBB`; fewer are a right-aligned `RRGGBB` value and
    /// the color is opaque.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.is_empty() || digits.len() > 8 || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        if digits.len() == 8 {
            let [a, r, g, b] = value.to_be_bytes();
            Some(Self { r, g, b, a })
        } else {
            let [_, r, g, b] = value.to_be_bytes();
            Some(Self::rgb(r, g, b))
        }
    }

    /// Packed `0xAARRGGBB` form.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Hex notation, `rrggbb` when opaque and `aarrggbb` otherwise.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        if self.a == 255 {
            format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("{:08x}", self.to_argb())
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Name of the registry entry that unknown tokens fall back to.
pub const DEFAULT_COLOR_NAME: &str = "default";

/// Named color palette consulted before hex parsing.
///
/// Seeded with `default`, `black`, `blue`, `cyan`, `green`, `magenta`,
/// `red`, `white` and `yellow`. Entries can be added or replaced at any time;
/// replacing `default` changes what unknown tokens degrade to.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    colors: HashMap<String, Color>,
}

impl ColorRegistry {
    /// A registry holding the default palette.
    #[must_use]
    pub fn new() -> Self {
        let colors = [
            (DEFAULT_COLOR_NAME, Color::WHITE),
            ("black", Color::BLACK),
            ("blue", Color::BLUE),
            ("cyan", Color::CYAN),
            ("green", Color::GREEN),
            ("magenta", Color::MAGENTA),
            ("red", Color::RED),
            ("white", Color::WHITE),
            ("yellow", Color::YELLOW),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();
        Self { colors }
    }

    /// Register (or replace) a named color.
    pub fn add_color(&mut self, name: impl Into<String>, color: Color) {
        let _ = self.colors.insert(name.into(), color);
    }

    /// Register (or replace) a named color from a packed `0xAARRGGBB` value.
    ///
    /// See [`Color::from_argb`] for how a zero alpha byte is read.
    pub fn add_color_hex(&mut self, name: impl Into<String>, argb: u32) {
        self.add_color(name, Color::from_argb(argb));
    }

    /// Look up a registered name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// The color unknown tokens resolve to.
    #[must_use]
    pub fn default_color(&self) -> Color {
        self.get(DEFAULT_COLOR_NAME).unwrap_or_default()
    }

    /// Resolve a token strictly: a registered name first, then a hex literal.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<Color> {
        self.get(token).or_else(|| Color::from_hex(token))
    }

    /// Resolve a token leniently, falling back to [`Self::default_color`].
    #[must_use]
    pub fn resolve(&self, token: &str) -> Color {
        self.lookup(token).unwrap_or_else(|| {
            let _ = warn_once(
                "markup",
                &format!("unknown color '{token}', using default"),
            );
            self.default_color()
        })
    }

    /// Number of named entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the registry has no named entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_rgb_is_opaque() {
        assert_eq!(Color::from_hex("ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("#0000ff"), Some(Color::BLUE));
    }

    #[test]
    fn test_from_hex_argb_keeps_alpha() {
        assert_eq!(
            Color::from_hex("80ff0000"),
            Some(Color::rgba(255, 0, 0, 0x80))
        );
        assert_eq!(Color::from_hex("00000000"), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_from_hex_short_values_are_right_aligned() {
        assert_eq!(Color::from_hex("ff"), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("gold"), None);
        assert_eq!(Color::from_hex("123456789"), None);
        assert_eq!(Color::from_hex("+ff"), None);
    }

    #[test]
    fn test_from_argb_missing_alpha_is_opaque() {
        assert_eq!(Color::from_argb(0x00ff_0000), Color::RED);
        assert_eq!(Color::from_argb(0x40ff_0000), Color::rgba(255, 0, 0, 0x40));
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(Color::RED.to_hex_string(), "ff0000");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex_string(), "04010203");
    }

    #[test]
    fn test_registry_defaults() {
        let colors = ColorRegistry::new();
        assert_eq!(colors.len(), 9);
        assert_eq!(colors.get("green"), Some(Color::GREEN));
        assert_eq!(colors.default_color(), Color::WHITE);
    }

    #[test]
    fn test_registry_names_shadow_hex() {
        let mut colors = ColorRegistry::new();
        colors.add_color("beef", Color::BLACK);
        assert_eq!(colors.resolve("beef"), Color::BLACK);
    }

    #[test]
    fn test_resolve_unknown_degrades_to_default() {
        let mut colors = ColorRegistry::new();
        assert_eq!(colors.resolve("not-a-color"), Color::WHITE);
        colors.add_color(DEFAULT_COLOR_NAME, Color::YELLOW);
        assert_eq!(colors.resolve("not-a-color"), Color::YELLOW);
    }
}
