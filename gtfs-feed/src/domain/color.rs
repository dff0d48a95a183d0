//! Route colors.

use std::fmt;

use super::error::{MalformedScalar, ScalarKind};

/// A 24-bit RGB color, written in GTFS as six hex digits without a `#`.
///
/// # Examples
///
/// ```
/// use gtfs_feed::domain::Color;
///
/// let c = Color::parse("ff6319").unwrap();
/// assert_eq!(c.rgb(), (0xFF, 0x63, 0x19));
/// assert_eq!(c.to_string(), "FF6319");
///
/// assert!(Color::parse("#FF6319").is_err());
/// assert!(Color::parse("FFF").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Default route color when a feed leaves it blank.
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    /// Default route text color when a feed leaves it blank.
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse six hex digits, case-insensitive.
    pub fn parse(s: &str) -> Result<Self, MalformedScalar> {
        let bytes = s.as_bytes();
        if bytes.len() != 6 {
            return Err(MalformedScalar::new(
                ScalarKind::Color,
                s,
                "must be exactly 6 hex digits",
            ));
        }

        let channel = |i: usize| -> Option<u8> {
            let hi = (bytes[i] as char).to_digit(16)?;
            let lo = (bytes[i + 1] as char).to_digit(16)?;
            u8::try_from(hi * 16 + lo).ok()
        };

        match (channel(0), channel(2), channel(4)) {
            (Some(r), Some(g), Some(b)) => Ok(Self { r, g, b }),
            _ => Err(MalformedScalar::new(
                ScalarKind::Color,
                s,
                "expected hex digits",
            )),
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// The color packed as `0xRRGGBB`.
    pub fn as_u32(&self) -> u32 {
        u32::from(self.r) << 16 | u32::from(self.g) << 8 | u32::from(self.b)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
