// color.rs
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("missing {0} channel in color string")]
    MissingChannel(&'static str),
    #[error("invalid hex digits {0:?}")]
    InvalidHex(String),
}

/// Hue in degrees [0, 360), saturation and value in percent [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

impl Hsv {
    /// Parses `#rrggbb` (the `#` is optional) and converts it to HSV.
    ///
    /// Components are truncated, not rounded. Anything after the sixth
    /// digit is ignored.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.trim_start_matches('#');
        let r = channel(hex, 0, "red")?;
        let g = channel(hex, 2, "green")?;
        let b = channel(hex, 4, "blue")?;
        Ok(Self::from_rgb(r, g, b))
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (h, s, v) = rgb_to_hsv(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        );

        Self {
            hue: (h * 360.0) as u16,
            saturation: (s * 100.0) as u8,
            value: (v * 100.0) as u8,
        }
    }
}

impl FromStr for Hsv {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn channel(hex: &str, offset: usize, name: &'static str) -> Result<u8, ColorError> {
    let digits = hex
        .get(offset..offset + 2)
        .ok_or(ColorError::MissingChannel(name))?;
    u8::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidHex(digits.to_string()))
}

// All inputs and outputs in [0, 1].
fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return (0.0, 0.0, v);
    }

    let delta = max - min;
    let s = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;

    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    ((h / 6.0).rem_euclid(1.0), s, v)
}
