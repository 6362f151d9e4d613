//! 8-bit RGB colors and the packed pixel layout.
//!
//! Frames are flat `u32` buffers with red in bits 16-23, green in bits 8-15
//! and blue in bits 0-7. Bits 24-31 (alpha, when present) are ignored on
//! input; colors written back into a frame are always fully opaque.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// A color with 8-bit red, green and blue channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a pixel, ignoring the alpha byte.
    ///
    /// ```
    /// use frame_dither::Rgb;
    ///
    /// assert_eq!(Rgb::from_packed(0x80_12_34_56), Rgb::new(0x12, 0x34, 0x56));
    /// ```
    #[inline]
    pub const fn from_packed(pixel: u32) -> Self {
        Self {
            r: (pixel >> 16) as u8,
            g: (pixel >> 8) as u8,
            b: pixel as u8,
        }
    }

    /// Pack into an opaque `0xFFRRGGBB` pixel.
    #[inline]
    pub const fn to_packed(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Channels as an array in R, G, B order.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels widened to `i32` for error arithmetic.
    #[inline]
    pub(crate) const fn to_i32(self) -> [i32; 3] {
        [self.r as i32, self.g as i32, self.b as i32]
    }
}

impl From<[u8; 3]> for Rgb {
    #[inline]
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive,
    /// surrounding whitespace trimmed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

/// Add pending error to a packed pixel and clamp each channel to `[0, 255]`.
#[inline]
pub(crate) fn adjust(pixel: u32, error: [i32; 3]) -> [i32; 3] {
    let rgb = Rgb::from_packed(pixel).to_i32();
    [
        (rgb[0] + error[0]).clamp(0, 255),
        (rgb[1] + error[1]).clamp(0, 255),
        (rgb[2] + error[2]).clamp(0, 255),
    ]
}
