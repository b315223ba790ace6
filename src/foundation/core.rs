use std::{fmt, str::FromStr};

use crate::foundation::error::{ColorLensError, ColorLensResult};

/// An opaque sRGB color written as `#RRGGBB` at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl HexColor {
    /// Pure red, the default custom-mapping background target.
    pub const RED: Self = Self::rgb(0xff, 0x00, 0x00);
    /// Pure green, the default custom-mapping text target.
    pub const GREEN: Self = Self::rgb(0x00, 0xff, 0x00);
    /// Pure blue, the default custom-mapping highlight target.
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xff);

    /// Construct from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`; hex digits are case-insensitive.
    pub fn parse(s: &str) -> ColorLensResult<Self> {
        let Some(digits) = s.strip_prefix('#') else {
            return Err(ColorLensError::invalid_color(format!(
                "'{s}' must start with '#'"
            )));
        };
        if digits.len() != 6 {
            return Err(ColorLensError::invalid_color(format!(
                "'{s}' must be #RRGGBB (6 hex digits)"
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorLensError::invalid_color(format!(
                "'{s}' contains non-hex characters"
            )));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorLensError::invalid_color(format!("invalid hex byte in '{s}'")))
        };
        Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Channels normalized to `[0, 1]`.
    pub fn to_unit_rgb(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
