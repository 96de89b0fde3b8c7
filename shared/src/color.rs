//! Hex color strings (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`) parsed into
//! packed ARGB, the layout the native rendering SDK expects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color packed as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argb(pub u32);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorError {
    #[error("unsupported color format: expected 3, 4, 6 or 8 hex digits, got {0}")]
    UnsupportedLength(usize),
    #[error("invalid hex digit in color")]
    InvalidDigit,
}

impl Argb {
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Parse a hex color. The leading `#` is optional.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit);
        }

        let short = |i: usize| -> Result<u8, ColorError> {
            u8::from_str_radix(&digits[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| ColorError::InvalidDigit)
        };
        let long = |i: usize| -> Result<u8, ColorError> {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidDigit)
        };

        match digits.len() {
            3 => Ok(Self::from_rgba(short(0)?, short(1)?, short(2)?, 0xFF)),
            4 => Ok(Self::from_rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Ok(Self::from_rgba(long(0)?, long(2)?, long(4)?, 0xFF)),
            8 => Ok(Self::from_rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            n => Err(ColorError::UnsupportedLength(n)),
        }
    }

    /// `#RRGGBBAA`, the inverse of [`Argb::from_hex`].
    pub fn to_hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red(),
            self.green(),
            self.blue(),
            self.alpha()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms_expand() {
        assert_eq!(Argb::from_hex("#F00"), Ok(Argb(0xFFFF0000)));
        assert_eq!(Argb::from_hex("#0F08"), Ok(Argb(0x8800FF00)));
    }

    #[test]
    fn test_long_forms() {
        assert_eq!(Argb::from_hex("#336699"), Ok(Argb(0xFF336699)));
        assert_eq!(Argb::from_hex("33669980"), Ok(Argb(0x80336699)));
    }

    #[test]
    fn test_invalid_colors_are_rejected() {
        assert_eq!(Argb::from_hex("#12345"), Err(ColorError::UnsupportedLength(5)));
        assert_eq!(Argb::from_hex("#GGG"), Err(ColorError::InvalidDigit));
        assert_eq!(Argb::from_hex("#+1+1+1"), Err(ColorError::InvalidDigit));
        assert_eq!(Argb::from_hex("#é12"), Err(ColorError::InvalidDigit));
        assert_eq!(Argb::from_hex("##F00"), Err(ColorError::InvalidDigit));
        assert_eq!(Argb::from_hex("#-F0"), Err(ColorError::InvalidDigit));
    }

    #[test]
    fn test_hex_output_is_rgba_order() {
        assert_eq!(Argb(0x80336699).to_hex(), "#33669980");
    }
}
