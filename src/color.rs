//! Packed ARGB colors and the color-string mini-format

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::RasterError;

/// 32-bit ARGB color, `0xAARRGGBB`.
///
/// Channels are straight (not premultiplied). Alpha 0 is fully transparent,
/// 255 fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xFFFF0000);
    pub const GREEN: Color = Color(0xFF00FF00);
    pub const BLUE: Color = Color(0xFF0000FF);
    pub const WHITE: Color = Color(0xFFFFFFFF);
    pub const BLACK: Color = Color(0xFF000000);
    pub const YELLOW: Color = Color(0xFFFFFF00);
    pub const CYAN: Color = Color(0xFF00FFFF);
    pub const MAGENTA: Color = Color(0xFFFF00FF);
    pub const GRAY: Color = Color(0xFF808080);
    pub const LIGHT_GRAY: Color = Color(0xFFC0C0C0);
    pub const DARK_GRAY: Color = Color(0xFF404040);
    pub const ORANGE: Color = Color(0xFFFFA500);
    pub const PINK: Color = Color(0xFFFFC0CB);
    pub const PURPLE: Color = Color(0xFF800080);
    pub const BROWN: Color = Color(0xFFA52A2A);
    pub const DARK_BLUE: Color = Color(0xFF000080);
    pub const DARK_GREEN: Color = Color(0xFF006400);
    pub const DARK_RED: Color = Color(0xFF8B0000);
    pub const LIGHT_BLUE: Color = Color(0xFFADD8E6);
    pub const LIGHT_GREEN: Color = Color(0xFF90EE90);
    /// Fully transparent black; also the "no color" sentinel
    pub const NONE: Color = Color(0x00000000);

    #[inline]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(255, r, g, b)
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Same RGB, different alpha
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Color((alpha as u32) << 24 | (self.0 & 0x00FF_FFFF))
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// Parse `#RRGGBB`, `#AARRGGBB`, `R,G,B` or `A,R,G,B`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let value = u32::from_str_radix(hex, 16).ok()?;
            return match hex.len() {
                6 => Some(Color(0xFF00_0000 | value)),
                8 => Some(Color(value)),
                _ => None,
            };
        }

        let mut channels = [0u8; 4];
        let mut count = 0;
        for part in s.split(',') {
            if count == 4 {
                return None;
            }
            channels[count] = part.trim().parse::<u8>().ok()?;
            count += 1;
        }
        match count {
            3 => Some(Self::rgb(channels[0], channels[1], channels[2])),
            4 => Some(Self::argb(channels[0], channels[1], channels[2], channels[3])),
            _ => None,
        }
    }

    /// Parse, falling back to the zero sentinel (`Color::NONE`)
    pub fn from_str_or_none(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::NONE)
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Color(argb)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl FromStr for Color {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RasterError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

// Scene files store colors as "#AARRGGBB" strings; bare integers are accepted too.
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a color string like \"#AARRGGBB\" or an ARGB integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
                Color::parse(v).ok_or_else(|| E::custom(format!("invalid color {:?}", v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Color, E> {
                u32::try_from(v)
                    .map(Color)
                    .map_err(|_| E::custom("color integer out of range"))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}
