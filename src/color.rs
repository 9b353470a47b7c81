//! Colors.

use std::{error, fmt};
use std::convert::TryFrom;
use std::num::ParseIntError;
use serde::Deserialize;


/// A color.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(try_from = "String")]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64
}

impl Color {
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Color { red, green, blue, alpha: 1. }
    }

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Color { red, green, blue, alpha }
    }

    pub fn hex(mut hex: &str) -> Result<Self, InvalidHexColor> {
        if let Some(stripped) = hex.strip_prefix('#') {
            hex = stripped;
        }
        if !hex.bytes().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(InvalidHexColor)
        }
        let (r, g, b, a) = if hex.len() == 6 {
            (
                u8::from_str_radix(&hex[0..2], 16)?,
                u8::from_str_radix(&hex[2..4], 16)?,
                u8::from_str_radix(&hex[4..6], 16)?,
                0xFF,
            )
        }
        else if hex.len() == 8 {
            (
                u8::from_str_radix(&hex[0..2], 16)?,
                u8::from_str_radix(&hex[2..4], 16)?,
                u8::from_str_radix(&hex[4..6], 16)?,
                u8::from_str_radix(&hex[6..8], 16)?,
            )
        }
        else {
            return Err(InvalidHexColor)
        };
        Ok(Color::rgba(
            r as f64 / 255.,
            g as f64 / 255.,
            b as f64 / 255.,
            a as f64 / 255.,
        ))
    }

    pub fn apply(self, context: &cairo::Context) {
        context.set_source_rgba(self.red, self.green, self.blue, self.alpha)
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0., 0., 0.);
}

impl TryFrom<String> for Color {
    type Error = InvalidHexColor;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Self::hex(&src)
    }
}


//------------ InvalidHexColor -----------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct InvalidHexColor;

impl From<ParseIntError> for InvalidHexColor {
    fn from(_: ParseIntError) -> Self {
        InvalidHexColor
    }
}

impl fmt::Display for InvalidHexColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid color")
    }
}

impl error::Error for InvalidHexColor { }


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex() {
        assert_eq!(Color::hex("#ffffff").unwrap(), Color::rgb(1., 1., 1.));
        assert_eq!(Color::hex("000000").unwrap(), Color::BLACK);
        assert_eq!(
            Color::hex("#00000000").unwrap(), Color::rgba(0., 0., 0., 0.)
        );
        assert_eq!(
            Color::hex("#ff000080").unwrap(),
            Color::rgba(1., 0., 0., 128. / 255.)
        );
        assert!(Color::hex("#fff").is_err());
        assert!(Color::hex("#gggggg").is_err());
        assert!(Color::hex("#ääää").is_err());
    }

    #[test]
    fn hex_rejects_signs() {
        assert!(Color::hex("#+fffff").is_err());
        assert!(Color::hex("ff+fff").is_err());
        assert!(Color::hex("#+fffffff").is_err());
        assert!(Color::hex("#ff-fffff").is_err());
    }
}
