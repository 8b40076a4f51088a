//! RGB color representation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An RGB color with red, green, and blue components (0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// The color packed as the single integer bulbs use (`0xRRGGBB`).
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::Color;
    ///
    /// assert_eq!(Color::rgb(255, 0, 0).packed(), 16711680);
    /// assert_eq!(Color::rgb(0, 1, 2).packed(), 258);
    /// ```
    pub fn packed(&self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    /// Unpack a `0xRRGGBB` integer; bits above 24 are ignored.
    pub fn from_packed(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid color component: {e}"))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err("Expected format: r,g,b".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_round_trip() {
        let color = Color::rgb(18, 52, 86);
        assert_eq!(color.packed(), 0x123456);
        assert_eq!(Color::from_packed(0x123456), color);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Color::from_str("255, 128,0"), Ok(Color::rgb(255, 128, 0)));
        assert!(Color::from_str("255,128").is_err());
        assert!(Color::from_str("256,0,0").is_err());
    }
}
