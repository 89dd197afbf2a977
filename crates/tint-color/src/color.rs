// SPDX-License-Identifier: MIT
//
// tint-color color model — OKLCH values with a contrast-oriented sRGB path.
//
// Single-character variable names (r, g, b, l, c, h, a, x, y, z) are the
// standard mathematical convention in color science.
#![allow(clippy::many_single_char_names)]
//
// Colors are stored in OKLCH, which is what palette scales are generated
// in. Two conversions touch sRGB, and they are deliberately not inverses:
//
//   sRGB → linear sRGB → LMS → Oklab → OKLCH            (parsing, from_rgb)
//   OKLCH → (a, b) → Lab-style f-values → XYZ → sRGB    (to_rgb, contrast)
//
// Parsing uses Ottosson's matrices so that `#808080` lands on a true grey
// and hex/rgb()/hsl() inputs mean in OKLCH what a browser shows. The way
// down is the simplified approximation the palette tooling has always used
// for UI contrast estimation. Contrast classifications downstream depend on
// its exact constants, so they must stay as written.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::parse;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A gamma-encoded 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black, `#000`.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white, `#fff`.
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// WCAG 2.1 relative luminance of this triple.
    #[inline]
    #[must_use]
    pub fn relative_luminance(self) -> f64 {
        relative_luminance(self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// An immutable color stored in OKLCH space with alpha transparency.
///
/// `l` is lightness in `[0, 1]`, `c` is chroma (`>= 0`), `h` is the hue
/// angle in degrees, normalized to `[0, 360)`. When chroma is (near) zero
/// the hue carries no information; comparisons ignore it and conversions
/// never produce a NaN hue.
///
/// # Examples
///
/// ```
/// use tint_color::Color;
///
/// let red: Color = "oklch(62% 0.2 29)".parse().unwrap();
/// assert!((red.l - 0.62).abs() < 1e-9);
/// assert_eq!(red.to_string(), "oklch(62.000% 0.20000 29.000)");
/// ```
#[derive(Clone, Copy)]
pub struct Color {
    /// Lightness: 0.0 (black) to 1.0 (white).
    pub l: f64,

    /// Chroma (colorfulness): 0.0 (gray) upwards.
    pub c: f64,

    /// Hue angle in degrees: 0.0 to 360.0.
    pub h: f64,

    /// Alpha (opacity): 0.0 (fully transparent) to 1.0 (fully opaque).
    pub alpha: f64,
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from OKLCH values.
    #[inline]
    #[must_use]
    pub const fn oklch(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h, alpha: 1.0 }
    }

    /// Create a color from OKLCH values with alpha.
    #[inline]
    #[must_use]
    pub const fn oklcha(l: f64, c: f64, h: f64, alpha: f64) -> Self {
        Self { l, c, h, alpha }
    }

    /// Create a color from an 8-bit sRGB triple using the Oklab matrices.
    ///
    /// Neutral triples come out with chroma exactly 0. This is not the
    /// inverse of [`Color::to_rgb`]; see [`Color::from_contrast_rgb`].
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        let channel = |v: u8| srgb_to_linear(f64::from(v) / 255.0);
        let (l, a, b) = linear_srgb_to_oklab(channel(rgb.r), channel(rgb.g), channel(rgb.b));
        let (c, h) = ab_to_oklch(a, b);
        Self::oklch(l, c, h)
    }

    /// The color that the contrast approximation maps back to `rgb`.
    ///
    /// `Color::from_contrast_rgb(rgb).to_rgb() == rgb` for all but the
    /// darkest greys, which sit on the approximation's discontinuous knee.
    /// Useful for pinning a swatch's contrast-path luminance exactly; use
    /// [`Color::from_rgb`] for anything that ends up in CSS.
    #[must_use]
    pub fn from_contrast_rgb(rgb: Rgb) -> Self {
        let channel = |v: u8| srgb_to_linear(f64::from(v) / 255.0);
        let (x, y, z) = linear_srgb_to_xyz(channel(rgb.r), channel(rgb.g), channel(rgb.b));
        let (l, c, h) = xyz_to_oklch(x, y, z);
        Self::oklch(l, c, h)
    }

    /// Create a color from 8-bit sRGB values.
    #[inline]
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(Rgb::new(r, g, b))
    }

    /// Parse any supported color notation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnsupportedFormat`] for notations this crate
    /// does not understand (including unresolved `var(...)` references)
    /// and [`ParseError::MalformedColor`] for bad numeric payloads.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse::parse(input)
    }

    /// Parse a color, falling back to opaque black on failure.
    ///
    /// The fallback is logged; use [`Color::parse`] when the caller needs
    /// to react to the error instead.
    #[must_use]
    pub fn parse_or_black(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|err| {
            log::warn!("{err}; treating it as black");
            Self::BLACK
        })
    }

    /// Parse a hex color (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, with or
    /// without the `#`).
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        parse::parse_hex(digits).map(|(rgb, alpha)| Self::from_rgb(rgb).with_alpha(alpha))
    }

    /// A pure gray at the given OKLCH lightness.
    #[inline]
    #[must_use]
    pub const fn gray(lightness: f64) -> Self {
        Self::oklch(lightness, 0.0, 0.0)
    }

    /// Pure black.
    pub const BLACK: Self = Self::oklch(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Self = Self::oklch(1.0, 0.0, 0.0);

    // ─── Alpha / predicates ──────────────────────────────────────────────

    /// Return a copy with the given alpha value (clamped to 0.0–1.0).
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Whether this color is fully opaque.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// Whether this color has no visible chroma, making its hue meaningless.
    #[inline]
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.c.abs() < 1e-5
    }

    // ─── Component setters ───────────────────────────────────────────────

    /// Set lightness to an absolute value.
    #[inline]
    #[must_use]
    pub const fn set_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }

    /// Set chroma to an absolute value (clamped to >= 0.0).
    #[inline]
    #[must_use]
    pub fn set_chroma(self, c: f64) -> Self {
        Self {
            c: non_negative(c),
            ..self
        }
    }

    /// Set hue to an absolute angle (normalized to 0°–360°).
    #[inline]
    #[must_use]
    pub fn set_hue(self, h: f64) -> Self {
        Self {
            h: normalize_hue(h),
            ..self
        }
    }

    /// Normalize into canonical form: chroma `>= 0`, hue in `[0, 360)`,
    /// no NaN components.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            l: if self.l.is_nan() { 0.0 } else { self.l },
            c: non_negative(self.c),
            h: normalize_hue(self.h),
            alpha: if self.alpha.is_nan() { 1.0 } else { self.alpha.clamp(0.0, 1.0) },
        }
    }

    /// Round to the precision used in generated output: 3 decimals of the
    /// lightness percentage, 5 decimals of chroma, 3 decimals of hue.
    ///
    /// Rounding twice is a no-op, which is what makes regeneration
    /// byte-reproducible.
    #[must_use]
    pub fn round(self) -> Self {
        let c = self.normalized();
        Self {
            l: round_to(c.l, 5),
            c: non_negative(round_to(c.c, 5)),
            h: normalize_hue(round_to(c.h, 3)),
            alpha: round_to(c.alpha, 3),
        }
    }

    // ─── Conversions ─────────────────────────────────────────────────────

    /// Convert to sRGB channels in 0.0–1.0, before 8-bit quantization.
    ///
    /// Out-of-gamut channels are clamped.
    #[must_use]
    pub fn to_srgb(self) -> (f64, f64, f64) {
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Convert to 8-bit sRGB, clamping each channel to 0–255.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let (r, g, b) = oklch_to_srgb(self.l, self.c, self.h);
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Relative luminance of the unquantized sRGB channels.
    ///
    /// Continuous in lightness, unlike `relative_luminance(self.to_rgb())`,
    /// which steps with every 8-bit channel change. Searches over lightness
    /// use this one.
    #[must_use]
    pub fn luminance(self) -> f64 {
        let (r, g, b) = self.to_srgb();
        weighted_luminance(decode_channel(r), decode_channel(g), decode_channel(b))
    }

    /// Convert to a hex string (`#rrggbb`, or `#rrggbbaa` if alpha < 1.0)
    /// through the same approximation as [`Color::to_rgb`].
    #[must_use]
    pub fn to_hex(self) -> String {
        let rgb = self.to_rgb();
        if self.is_opaque() {
            rgb.to_string()
        } else {
            format!("{rgb}{:02x}", to_u8(self.alpha))
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "Color::oklch({:.5}, {:.5}, {:.3})", self.l, self.c, self.h)
        } else {
            write!(
                f,
                "Color::oklcha({:.5}, {:.5}, {:.3}, {:.3})",
                self.l, self.c, self.h, self.alpha
            )
        }
    }
}

/// Formats as the CSS functional notation used in generated output, e.g.
/// `oklch(90.800% 0.06400 29.000)`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.round();
        write!(f, "oklch({:.3}% {:.5} {:.3}", c.l * 100.0, c.c, c.h)?;
        if !c.is_opaque() {
            write!(f, " / {:.3}", c.alpha)?;
        }
        write!(f, ")")
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        const EPS: f64 = 1e-9;
        (self.l - other.l).abs() < EPS
            && (self.c - other.c).abs() < EPS
            && (self.alpha - other.alpha).abs() < EPS
            && (self.is_achromatic()
                || other.is_achromatic()
                || hue_diff(self.h, other.h) < EPS)
    }
}

impl Default for Color {
    /// Default is fully opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

// ─── Contrast ────────────────────────────────────────────────────────────────

/// Compute the WCAG 2.1 relative luminance of an 8-bit sRGB triple.
///
/// Each channel is decoded (linear below 0.03928, otherwise gamma-expanded
/// with exponent 2.4) and weighted `0.2126 R + 0.7152 G + 0.0722 B`.
/// Returns a value in `[0, 1]`.
#[must_use]
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let channel = |v: u8| decode_channel(f64::from(v) / 255.0);
    weighted_luminance(channel(rgb.r), channel(rgb.g), channel(rgb.b))
}

/// Compute the WCAG 2.1 contrast ratio between two relative luminances.
///
/// `(lighter + 0.05) / (darker + 0.05)`, always in `[1, 21]` regardless of
/// argument order.
#[must_use]
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Pure black or pure white text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextTone {
    Black,
    White,
}

impl TextTone {
    /// Both tones, black first.
    pub const ALL: [Self; 2] = [Self::Black, Self::White];

    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Black => Rgb::BLACK,
            Self::White => Rgb::WHITE,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl fmt::Display for TextTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick whichever of pure black or pure white text reads better on `bg`.
///
/// Ties go to black.
#[must_use]
pub fn contrasting_tone(bg: Color) -> TextTone {
    let lum = relative_luminance(bg.to_rgb());
    let on_white = contrast_ratio(lum, 1.0);
    let on_black = contrast_ratio(lum, 0.0);
    if on_white > on_black {
        TextTone::White
    } else {
        TextTone::Black
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Normalize a hue angle to `[0, 360)`; non-finite hues become 0.
#[inline]
fn normalize_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let h = h.rem_euclid(360.0);
    // rem_euclid can land exactly on 360.0 for tiny negative inputs; the
    // `+ 0.0` turns a negative zero into a positive one.
    if h >= 360.0 { 0.0 } else { h + 0.0 }
}

/// Absolute hue difference (shortest arc on the color wheel).
#[inline]
fn hue_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

#[inline]
fn non_negative(c: f64) -> f64 {
    if c.is_nan() || c <= 0.0 { 0.0 } else { c }
}

#[inline]
fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale + 0.0
}

/// Convert a float (0.0–1.0) to a u8 (0–255), rounding and clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn weighted_luminance(r: f64, g: f64, b: f64) -> f64 {
    0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
}

/// WCAG channel decoding (sRGB → linear) with the 0.03928 breakpoint.
#[inline]
fn decode_channel(v: f64) -> f64 {
    if v <= 0.039_28 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

// ─── Conversion pipeline ─────────────────────────────────────────────────────

/// Lab knee: f-values whose cube is at or below this use the linear segment.
const LAB_EPSILON: f64 = 0.008_856;
/// Slope of the linear segment below the knee.
const LAB_SLOPE: f64 = 7.787;
/// Offset of the linear segment (4/29).
const LAB_OFFSET: f64 = 0.137_931;
/// Y divisor for lightness below the knee.
const Y_DIVISOR: f64 = 9.033;

/// Convert OKLCH chroma and hue to (a, b).
#[inline]
fn oklch_to_ab(c: f64, h: f64) -> (f64, f64) {
    let h_rad = h.to_radians();
    (c * h_rad.cos(), c * h_rad.sin())
}

/// Chroma below this is floating-point residue from a neutral input.
const NEUTRAL_CHROMA: f64 = 1e-6;

/// Convert (a, b) to chroma and hue. Achromatic input gets hue 0.
#[inline]
fn ab_to_oklch(a: f64, b: f64) -> (f64, f64) {
    let c = a.hypot(b);
    if c < NEUTRAL_CHROMA {
        (0.0, 0.0)
    } else {
        (c, normalize_hue(b.atan2(a).to_degrees()))
    }
}

#[inline]
fn lab_f_inverse(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > LAB_EPSILON {
        cube
    } else {
        (f - LAB_OFFSET) / LAB_SLOPE
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE.mul_add(t, LAB_OFFSET)
    }
}

fn oklch_to_xyz(l: f64, c: f64, h: f64) -> (f64, f64, f64) {
    let (a, b) = oklch_to_ab(c, h);
    let fy = (l + 0.16) / 1.16;
    let fx = a / 5.0 + fy;
    let fz = fy - b / 2.0;

    let x = lab_f_inverse(fx);
    let y = if l > LAB_EPSILON { fy * fy * fy } else { l / Y_DIVISOR };
    let z = lab_f_inverse(fz);
    (x, y, z)
}

fn xyz_to_oklch(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let cube_l = 1.16f64.mul_add(y.cbrt(), -0.16);
    let l = if cube_l > LAB_EPSILON { cube_l } else { y * Y_DIVISOR };
    let fy = (l + 0.16) / 1.16;
    let a = 5.0 * (lab_f(x) - fy);
    let b = 2.0 * (fy - lab_f(z));
    let (c, h) = ab_to_oklch(a, b);
    (l, c, h)
}

/// XYZ → linear sRGB (D65).
#[inline]
fn xyz_to_linear_srgb(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let r = 3.2406f64.mul_add(x, (-1.5372f64).mul_add(y, -0.4986 * z));
    let g = (-0.9689f64).mul_add(x, 1.8758f64.mul_add(y, 0.0415 * z));
    let b = 0.0557f64.mul_add(x, (-0.2040f64).mul_add(y, 1.0570 * z));
    (r, g, b)
}

/// Linear sRGB → XYZ (D65), the inverse of [`xyz_to_linear_srgb`].
#[inline]
fn linear_srgb_to_xyz(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let x = 0.4124f64.mul_add(r, 0.3576f64.mul_add(g, 0.1805 * b));
    let y = 0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b));
    let z = 0.0193f64.mul_add(r, 0.1192f64.mul_add(g, 0.9505 * b));
    (x, y, z)
}

/// Gamma-encode a linear channel (breakpoint 0.0031308, exponent 2.4).
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f64) -> f64 {
    if c > 0.003_130_8 {
        1.055f64.mul_add(c.powf(1.0 / 2.4), -0.055)
    } else {
        12.92 * c
    }
}

/// Gamma-decode a channel, the exact inverse of [`linear_to_srgb`].
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// OKLCH → sRGB (0.0–1.0, may be out of gamut).
fn oklch_to_srgb(l: f64, c: f64, h: f64) -> (f64, f64, f64) {
    let (x, y, z) = oklch_to_xyz(l, c, h);
    let (r, g, b) = xyz_to_linear_srgb(x, y, z);
    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

// ─── Oklab ───────────────────────────────────────────────────────────────────
//
// Linear sRGB → LMS → cube root → Oklab, with Björn Ottosson's matrices.
// Only the forward direction is needed: generated colors leave the crate as
// `oklch()` strings, never as sRGB computed here.

/// Convert linear sRGB to Oklab (L, a, b).
#[inline]
fn linear_srgb_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.051_445_992_9f64.mul_add(b, 0.412_221_470_8f64.mul_add(r, 0.536_332_536_3 * g));
    let m = 0.107_396_956_6f64.mul_add(b, 0.211_903_498_2f64.mul_add(r, 0.680_699_545_1 * g));
    let s = 0.629_978_700_5f64.mul_add(b, 0.088_302_461_9f64.mul_add(r, 0.281_718_837_6 * g));

    let (l_, m_, s_) = (l.cbrt(), m.cbrt(), s.cbrt());

    let l_ok = 0.004_072_046_8f64.mul_add(-s_, 0.210_454_255_3f64.mul_add(l_, 0.793_617_785 * m_));
    let a = 0.450_593_709_9f64.mul_add(s_, 1.977_998_495_1f64.mul_add(l_, -(2.428_592_205 * m_)));
    let b_ok = 0.808_675_766f64.mul_add(-s_, 0.025_904_037_1f64.mul_add(l_, 0.782_771_766_2 * m_));

    (l_ok, a, b_ok)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
