//! Color utilities: hex parsing for configured colors and the per-pixel
//! blend operations used when compositing snowflakes.
//!
//! Supported hex formats: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.

use image::Rgba;
use thiserror::Error;

use crate::math::{clamp, lerp};

/// Pale blue tint blended into every snowflake mask.
pub const TINT: Rgba<u8> = Rgba([142, 230, 255, 255]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Parse a hex color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use snowfall::color::parse_color;
///
/// assert_eq!(parse_color("#000").unwrap(), image::Rgba([0, 0, 0, 255]));
/// assert_eq!(parse_color("#8EE6FF").unwrap(), image::Rgba([142, 230, 255, 255]));
/// assert_eq!(parse_color("#ffffff80").unwrap(), image::Rgba([255, 255, 255, 128]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty, lacks the leading `#`, has the
/// wrong length, or contains non-hex characters.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    let digits = hex.chars().map(parse_hex_digit).collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        // #RGB and #RGBA double each digit
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c))
}

/// Blend `tint` into `mask` with source-atop semantics at `strength`.
///
/// Only the color channels move toward the tint; the mask's alpha is kept, so
/// fully transparent pixels stay untouched.
pub fn tint_pixel(mask: Rgba<u8>, tint: Rgba<u8>, strength: f64) -> Rgba<u8> {
    if mask[3] == 0 {
        return mask;
    }
    let s = clamp(0.0, 1.0, strength);
    let mix = |m: u8, t: u8| -> u8 { lerp(m as f64, t as f64, s).round().clamp(0.0, 255.0) as u8 };
    Rgba([mix(mask[0], tint[0]), mix(mask[1], tint[1]), mix(mask[2], tint[2]), mask[3]])
}

/// Multiply a pixel's alpha by `opacity` (clamped to `[0, 1]`).
pub fn fade_pixel(pixel: Rgba<u8>, opacity: f64) -> Rgba<u8> {
    let o = clamp(0.0, 1.0, opacity);
    let a = (pixel[3] as f64 * o).round().clamp(0.0, 255.0) as u8;
    Rgba([pixel[0], pixel[1], pixel[2], a])
}

/// Alpha-blend `src` over `dst` ("source over").
pub fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f64 / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f64 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f64 / 255.0;
        let df = d as f64 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
