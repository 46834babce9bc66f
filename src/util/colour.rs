//! Colour spec parsing for the background client.
//!
//! Accepts the X11-style `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA` forms;
//! alpha defaults to opaque when omitted.

use std::fmt;
use std::str::FromStr;

/// A colour with components normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Colour {
    fn default() -> Self {
        // Opaque black, the original default background.
        Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }
}

/// Error returned for a malformed colour spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColourError(String);

impl fmt::Display for ParseColourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour spec {:?}, expected #RGB[A] or #RRGGBB[AA]", self.0)
    }
}

impl std::error::Error for ParseColourError {}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let err = || ParseColourError(spec.to_owned());

        let hex = spec.strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let component = |byte: u8| f64::from(byte) / 255.0;
        let wide = |s: &str| u8::from_str_radix(s, 16).map(component);
        // Short form digits are doubled: #f08 == #ff0088.
        let narrow = |s: &str| u8::from_str_radix(s, 16).map(|d| component(d * 0x10 + d));

        let (r, g, b, a) = match hex.len() {
            3 | 4 => {
                let a = if hex.len() == 4 { narrow(&hex[3..4]) } else { Ok(1.0) };
                (narrow(&hex[0..1]), narrow(&hex[1..2]), narrow(&hex[2..3]), a)
            }
            6 | 8 => {
                let a = if hex.len() == 8 { wide(&hex[6..8]) } else { Ok(1.0) };
                (wide(&hex[0..2]), wide(&hex[2..4]), wide(&hex[4..6]), a)
            }
            _ => return Err(err()),
        };

        match (r, g, b, a) {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Colour { r, g, b, a }),
            _ => Err(err()),
        }
    }
}

impl Colour {
    /// Pack into an XRGB8888 pixel (alpha ignored, as the buffer is opaque).
    pub fn to_xrgb8888(self) -> u32 {
        let quantise = |c: f64| (c * 255.0).round() as u32;
        0xff00_0000 | (quantise(self.r) << 16) | (quantise(self.g) << 8) | quantise(self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        let colour: Colour = "#ff0000".parse().unwrap();
        assert_eq!(colour, Colour { r: 1.0, g: 0.0, b: 0.0, a: 1.0 });
    }

    #[test]
    fn short_form_matches_long_form() {
        let short: Colour = "#f00".parse().unwrap();
        let long: Colour = "#ff0000".parse().unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn short_alpha_is_doubled() {
        let colour: Colour = "#f008".parse().unwrap();
        assert_eq!(colour.a, f64::from(0x88u8) / 255.0);
    }

    #[test]
    fn long_alpha() {
        let colour: Colour = "#11223344".parse().unwrap();
        assert_eq!(colour.b, f64::from(0x33u8) / 255.0);
        assert_eq!(colour.a, f64::from(0x44u8) / 255.0);
    }

    #[test]
    fn alpha_defaults_to_opaque() {
        let colour: Colour = "#123456".parse().unwrap();
        assert_eq!(colour.a, 1.0);
    }

    #[test]
    fn rejects_missing_hash() {
        assert!("ff0000".parse::<Colour>().is_err());
    }

    #[test]
    fn rejects_bad_lengths_and_digits() {
        assert!("#ff000".parse::<Colour>().is_err());
        assert!("#ff00000".parse::<Colour>().is_err());
        assert!("#gg0000".parse::<Colour>().is_err());
        assert!("#".parse::<Colour>().is_err());
    }

    #[test]
    fn packs_xrgb8888() {
        let colour: Colour = "#123456".parse().unwrap();
        assert_eq!(colour.to_xrgb8888(), 0xff12_3456);
    }
}
