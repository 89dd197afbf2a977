// SPDX-License-Identifier: MIT
//
// Color string parsing.
//
// Accepted notations, matched after trimming and lower-casing:
//
//   oklch(L C H)  oklch(L C H / A)   L: 0–1 or %, C: number or % (100% = 0.4)
//   #rgb #rgba #rrggbb #rrggbbaa
//   rgb(r, g, b)  rgba(r, g, b, a)   channels 0–255 or %, commas or spaces
//   hsl(h, s%, l%)  hsla(...)
//   a handful of named colors
//
// Everything that is not OKLCH goes through 8-bit sRGB and is lifted into
// OKLCH with the Oklab matrices (`Color::from_rgb`).

use crate::color::{Color, Rgb};
use crate::error::ParseError;

/// Chroma that `100%` stands for in `oklch()`.
const CHROMA_PERCENT_REFERENCE: f64 = 0.4;

const NAMED: &[(&str, Rgb)] = &[
    ("white", Rgb::WHITE),
    ("black", Rgb::BLACK),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("orange", Rgb::new(255, 165, 0)),
];

/// Parse a color string. See the module docs for accepted notations.
///
/// # Errors
///
/// [`ParseError::UnsupportedFormat`] for unknown notations (including
/// `var(...)` references that were never resolved);
/// [`ParseError::MalformedColor`] when the notation is known but its payload
/// is not.
pub fn parse(input: &str) -> Result<Color, ParseError> {
    let trimmed = input.trim();
    let s = trimmed.to_ascii_lowercase();

    if s.is_empty() {
        return Err(ParseError::malformed(trimmed, "empty color string"));
    }

    if let Some(digits) = s.strip_prefix('#') {
        return parse_hex(digits)
            .map(|(rgb, alpha)| Color::from_rgb(rgb).with_alpha(alpha))
            .ok_or_else(|| ParseError::malformed(trimmed, "expected 3, 4, 6 or 8 hex digits"));
    }

    if let Some((name, args)) = split_function(&s) {
        if name == "var" || args.contains("var(") {
            return Err(ParseError::unsupported(trimmed, "unresolved variable reference"));
        }
        if args.contains('(') {
            return Err(ParseError::unsupported(trimmed, "nested color functions are not supported"));
        }
        let args = Args::split(args);
        return match name {
            "oklch" => parse_oklch(trimmed, &args),
            "rgb" => parse_rgb(trimmed, &args, false),
            "rgba" => parse_rgb(trimmed, &args, true),
            "hsl" | "hsla" => parse_hsl(trimmed, &args),
            _ => Err(ParseError::unsupported(trimmed, "unknown color function")),
        };
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, rgb)| Color::from_rgb(*rgb))
        .ok_or_else(|| ParseError::unsupported(trimmed, "unrecognized color"))
}

// ─── Functional notation ─────────────────────────────────────────────────────

/// Split `name(args)` into its parts. The name must be purely alphabetic.
fn split_function(s: &str) -> Option<(&str, &str)> {
    let (name, rest) = s.split_once('(')?;
    let args = rest.strip_suffix(')')?;
    let name = name.trim_end();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some((name, args))
}

/// Positional components plus an optional `/ alpha`.
struct Args<'a> {
    parts: Vec<&'a str>,
    alpha: Option<&'a str>,
}

impl<'a> Args<'a> {
    fn split(args: &'a str) -> Self {
        let (main, alpha) = match args.split_once('/') {
            Some((main, alpha)) => (main, Some(alpha.trim())),
            None => (args, None),
        };
        let parts = main
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        Self { parts, alpha }
    }

    /// The alpha component: either after `/`, or a trailing positional
    /// component when `positional_alpha` allows one.
    fn alpha(&self, input: &str, positional_alpha: bool) -> Result<f64, ParseError> {
        let token = match (self.alpha, positional_alpha && self.parts.len() == 4) {
            (Some(_), true) => {
                return Err(ParseError::malformed(input, "alpha given twice"));
            }
            (Some(token), false) => token,
            (None, true) => self.parts[3],
            (None, false) => return Ok(1.0),
        };
        Ok(scalar(input, token, 1.0)?.clamp(0.0, 1.0))
    }

    fn expect_components(&self, input: &str, positional_alpha: bool) -> Result<(), ParseError> {
        let n = self.parts.len();
        if n == 3 || (positional_alpha && n == 4) {
            Ok(())
        } else {
            Err(ParseError::malformed(input, format!("expected 3 components, found {n}")))
        }
    }
}

fn parse_oklch(input: &str, args: &Args<'_>) -> Result<Color, ParseError> {
    args.expect_components(input, false)?;
    let l = scalar(input, args.parts[0], 1.0)?;
    let c = scalar(input, args.parts[1], CHROMA_PERCENT_REFERENCE)?;
    if c < 0.0 {
        return Err(ParseError::malformed(input, "chroma must not be negative"));
    }
    let h = hue(input, args.parts[2])?;
    let alpha = args.alpha(input, false)?;
    Ok(Color::oklcha(l, c, h, alpha).normalized())
}

fn parse_rgb(input: &str, args: &Args<'_>, positional_alpha: bool) -> Result<Color, ParseError> {
    args.expect_components(input, positional_alpha)?;
    let r = channel(scalar(input, args.parts[0], 255.0)?);
    let g = channel(scalar(input, args.parts[1], 255.0)?);
    let b = channel(scalar(input, args.parts[2], 255.0)?);
    let alpha = args.alpha(input, positional_alpha)?;
    Ok(Color::from_rgb(Rgb::new(r, g, b)).with_alpha(alpha))
}

fn parse_hsl(input: &str, args: &Args<'_>) -> Result<Color, ParseError> {
    args.expect_components(input, true)?;
    let h = hue(input, args.parts[0])?;
    let s = fraction(input, args.parts[1])?;
    let l = fraction(input, args.parts[2])?;
    let alpha = args.alpha(input, true)?;
    Ok(Color::from_rgb(hsl_to_rgb(h, s, l)).with_alpha(alpha))
}

// ─── Components ──────────────────────────────────────────────────────────────

fn number(input: &str, token: &str) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::malformed(input, format!("\"{token}\" is not a number")))
}

/// A plain number, or a percentage of `percent_reference`.
fn scalar(input: &str, token: &str, percent_reference: f64) -> Result<f64, ParseError> {
    match token.strip_suffix('%') {
        Some(pct) => Ok(number(input, pct)? / 100.0 * percent_reference),
        None => number(input, token),
    }
}

/// A hue angle: degrees with an optional `deg` suffix, or `none`.
fn hue(input: &str, token: &str) -> Result<f64, ParseError> {
    if token == "none" {
        return Ok(0.0);
    }
    number(input, token.strip_suffix("deg").unwrap_or(token))
}

/// An `hsl()` saturation/lightness, with or without `%`, as 0.0–1.0.
fn fraction(input: &str, token: &str) -> Result<f64, ParseError> {
    let value = number(input, token.strip_suffix('%').unwrap_or(token))?;
    Ok((value / 100.0).clamp(0.0, 1.0))
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.round().clamp(0.0, 255.0) as u8
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let to_channel = |v: f64| channel(v * 255.0);
    if s == 0.0 {
        let v = to_channel(l);
        return Rgb::new(v, v, v);
    }

    let h = h.rem_euclid(360.0) / 360.0;
    let q = if l < 0.5 { l * (1.0 + s) } else { l.mul_add(-s, l + s) };
    let p = 2.0f64.mul_add(l, -q);

    Rgb::new(
        to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, h)),
        to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p)
    } else {
        p
    }
}

// ─── Hex ─────────────────────────────────────────────────────────────────────

/// Parse hex digits (no `#`) into an sRGB triple and alpha.
pub(crate) fn parse_hex(s: &str) -> Option<(Rgb, f64)> {
    let bytes = s.as_bytes();
    match bytes.len() {
        // RGB / RGBA
        3 | 4 => {
            let mut nibbles = [0xf_u8; 4];
            for (slot, &b) in nibbles.iter_mut().zip(bytes) {
                *slot = parse_hex_digit(b)?;
            }
            let [r, g, b, a] = nibbles.map(|n| n << 4 | n);
            Some((Rgb::new(r, g, b), f64::from(a) / 255.0))
        }
        // RRGGBB / RRGGBBAA
        6 | 8 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            let a = if bytes.len() == 8 { parse_hex_byte(&bytes[6..8])? } else { 255 };
            Some((Rgb::new(r, g, b), f64::from(a) / 255.0))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn parsed(s: &str) -> Color {
        parse(s).unwrap()
    }

    // ── oklch() ──────────────────────────────────────────────────────────

    #[test]
    fn oklch_percentage_lightness() {
        let c = parse("oklch(62% 0.2 29)").unwrap();
        assert!(approx_eq(c.l, 0.62, 1e-12));
        assert!(approx_eq(c.c, 0.2, 1e-12));
        assert!(approx_eq(c.h, 29.0, 1e-12));
        assert!(c.is_opaque());
    }

    #[test]
    fn oklch_plain_lightness() {
        let c = parse("oklch(0.62 0.2 29)").unwrap();
        assert!(approx_eq(c.l, 0.62, 1e-12));
    }

    #[test]
    fn oklch_units_and_keywords() {
        let c = parse("oklch(50% 25% 120deg)").unwrap();
        assert!(approx_eq(c.c, 0.1, 1e-12));
        assert!(approx_eq(c.h, 120.0, 1e-12));

        let gray = parse("oklch(50% 0 none)").unwrap();
        assert!(approx_eq(gray.h, 0.0, 1e-12));
    }

    #[test]
    fn oklch_with_alpha() {
        let c = parse("oklch(70% 0.1 200 / 50%)").unwrap();
        assert!(approx_eq(c.alpha, 0.5, 1e-12));
    }

    #[test]
    fn oklch_normalizes_case_whitespace_and_commas() {
        let a = parse("  OKLCH( 62%, 0.2, 29 )\n").unwrap();
        let b = parse("oklch(62% 0.2 29)").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oklch_hue_wraps() {
        let c = parse("oklch(50% 0.1 390)").unwrap();
        assert!(approx_eq(c.h, 30.0, 1e-9));
    }

    #[test]
    fn oklch_roundtrips_through_display() {
        let c = parse("oklch(60.446% 0.21553 29.234)").unwrap();
        let again = parse(&c.to_string()).unwrap();
        assert!(approx_eq(c.l, again.l, 1e-3));
        assert!(approx_eq(c.c, again.c, 1e-3));
        assert!(approx_eq(c.h, again.h, 1e-3));
    }

    #[test]
    fn oklch_malformed_payloads() {
        for bad in [
            "oklch(a b c)",
            "oklch(50% 0.1)",
            "oklch(50% 0.1 20 40)",
            "oklch(50% -0.1 20)",
            "oklch(nan 0.1 20)",
            "oklch(50% 0.1 20 /)",
        ] {
            assert!(
                matches!(parse(bad), Err(ParseError::MalformedColor { .. })),
                "{bad} should be malformed"
            );
        }
    }

    // ── Hex ──────────────────────────────────────────────────────────────

    #[test]
    fn hex_forms() {
        assert_eq!(parsed("#f80"), Color::rgb8(255, 136, 0));
        assert_eq!(parsed("#FF8000"), Color::rgb8(255, 128, 0));
        let translucent = parse("#ff000080").unwrap();
        assert!(approx_eq(translucent.alpha, 128.0 / 255.0, 1e-9));
    }

    #[test]
    fn hex_malformed() {
        assert!(matches!(parse("#12"), Err(ParseError::MalformedColor { .. })));
        assert!(matches!(parse("#gggggg"), Err(ParseError::MalformedColor { .. })));
    }

    // ── rgb() / rgba() / hsl() ───────────────────────────────────────────

    #[test]
    fn rgb_forms() {
        assert_eq!(parsed("rgb(200, 100, 50)"), Color::rgb8(200, 100, 50));
        assert_eq!(parsed("rgb(200 100 50)"), Color::rgb8(200, 100, 50));
        assert_eq!(parsed("rgb(100%, 0%, 50%)"), Color::rgb8(255, 0, 128));
    }

    #[test]
    fn rgb_requires_three_components() {
        assert!(matches!(parse("rgb(1, 2)"), Err(ParseError::MalformedColor { .. })));
        assert!(matches!(parse("rgb(1, 2, 3, 0.5)"), Err(ParseError::MalformedColor { .. })));
    }

    #[test]
    fn rgba_reads_alpha() {
        let c = parse("rgba(10.4, 20.6, 30, 0.25)").unwrap();
        assert_eq!(c, Color::rgb8(10, 21, 30).with_alpha(0.25));

        let opaque = parse("rgba(10, 20, 30)").unwrap();
        assert!(opaque.is_opaque());
    }

    #[test]
    fn hsl_matches_named_green() {
        assert_eq!(parse("hsl(120, 100%, 25%)").unwrap(), parse("green").unwrap());
        assert_eq!(parsed("hsl(0, 100%, 50%)"), parsed("red"));
        assert_eq!(parsed("hsl(0, 0%, 50%)"), parsed("gray"));
    }

    // ── Named / unsupported ──────────────────────────────────────────────

    #[test]
    fn named_colors() {
        assert_eq!(parsed("White"), Color::from_rgb(Rgb::WHITE));
        assert_eq!(parsed("black"), Color::BLACK);
        assert_eq!(parsed("red"), Color::rgb8(255, 0, 0));
        assert_eq!(parsed("green"), Color::rgb8(0, 128, 0));
        assert_eq!(parsed("blue"), Color::rgb8(0, 0, 255));
    }

    #[test]
    fn neutral_inputs_parse_as_greys() {
        for input in ["#808080", "gray", "grey", "white", "#f0f0f0", "rgb(50%, 50%, 50%)", "hsl(200, 0%, 30%)"] {
            let c = parsed(input);
            assert!(c.c < 0.01, "{input}: {c}");
            assert!(c.is_achromatic(), "{input}: {c}");
        }
        assert!(approx_eq(parsed("white").l, 1.0, 1e-6));
    }

    #[test]
    fn hex_matches_css_oklch() {
        let slate = parsed("#64748b");
        assert!(approx_eq(slate.l, 0.554, 1e-3), "{slate}");
        assert!(approx_eq(slate.c, 0.041, 1e-3), "{slate}");
        assert!(approx_eq(slate.h, 257.4, 0.1), "{slate}");
    }

    #[test]
    fn variable_references_are_unsupported() {
        let err = parse("var(--fab-colour-red)").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("var(--fab-colour-red)"));

        let relative = parse("oklch(from var(--base) l c h)").unwrap_err();
        assert!(matches!(relative, ParseError::UnsupportedFormat { .. }));
    }

    #[test]
    fn unknown_formats_are_unsupported() {
        for bad in ["chartreuse-ish", "lab(50% 20 30)", "color(display-p3 1 0 0)"] {
            assert!(
                matches!(parse(bad), Err(ParseError::UnsupportedFormat { .. })),
                "{bad} should be unsupported"
            );
        }
    }

    #[test]
    fn empty_is_malformed() {
        assert!(matches!(parse("   "), Err(ParseError::MalformedColor { .. })));
    }

    #[test]
    fn parse_or_black_falls_back() {
        assert_eq!(Color::parse_or_black("var(--x)"), Color::BLACK);
        assert_eq!(Color::parse_or_black("white"), parsed("white"));
    }
}
