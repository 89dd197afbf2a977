//! WCAG pairing analysis for a generated scale.
//!
//! Classification happens on 8-bit sRGB, the same values a browser paints,
//! so a step that passes here passes in a contrast checker too.
//!
//! Two kinds of pairing are reported:
//!
//! - step ↔ step: two steps of the same scale. Contrast is symmetric, so
//!   each combination appears once, lighter step first.
//! - tone → step: pure black or pure white text on a step.
//!
//! Only AA passes are kept. Nothing is ranked beyond sorting; picking a
//! winner is left to whoever reads the report.

use std::cmp::Ordering;
use std::fmt;

use tint_color::{Color, TextTone, contrast_ratio, relative_luminance};

use crate::scale::PaletteScale;

/// Minimum ratio for WCAG AA, normal text.
pub const AA_THRESHOLD: f64 = 4.5;

/// Minimum ratio for WCAG AAA, normal text.
pub const AAA_THRESHOLD: f64 = 7.0;

/// A contrast ratio and the WCAG levels it meets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    pub ratio: f64,
    pub meets_aa: bool,
    pub meets_aaa: bool,
}

/// Classify a contrast ratio against the AA and AAA thresholds.
#[must_use]
pub fn classify(ratio: f64) -> Contrast {
    Contrast {
        ratio,
        meets_aa: ratio >= AA_THRESHOLD,
        meets_aaa: ratio >= AAA_THRESHOLD,
    }
}

/// WCAG contrast ratio between two colors, measured on 8-bit sRGB.
#[must_use]
pub fn contrast(a: Color, b: Color) -> f64 {
    contrast_ratio(relative_luminance(a.to_rgb()), relative_luminance(b.to_rgb()))
}

/// What sits in the foreground of a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Swatch {
    /// A step of the same scale.
    Step(u32),
    /// Pure black or pure white.
    Tone(TextTone),
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(label) => write!(f, "{label}"),
            Self::Tone(tone) => write!(f, "{tone}"),
        }
    }
}

/// One foreground/background combination that meets AA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pairing {
    pub foreground: Swatch,
    /// Step label of the background.
    pub background: u32,
    pub contrast: Contrast,
}

/// Every AA-passing pairing within one scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSet {
    /// Step ↔ step combinations, strongest first.
    pub pairs: Vec<Pairing>,
    /// Black/white text on each step, strongest first.
    pub tones: Vec<Pairing>,
}

impl ReportSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.tones.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len() + self.tones.len()
    }

    /// Step pairs, then tone pairings.
    pub fn iter(&self) -> impl Iterator<Item = &Pairing> {
        self.pairs.iter().chain(&self.tones)
    }

    /// Step pairs that also meet AAA.
    pub fn aaa_pairs(&self) -> impl Iterator<Item = &Pairing> {
        self.pairs.iter().filter(|p| p.contrast.meets_aaa)
    }
}

/// Find every AA-passing pairing within `scale`.
///
/// Scales with fewer than two steps have nothing to pair and produce an
/// empty report.
#[must_use]
pub fn analyze_group(scale: &PaletteScale) -> ReportSet {
    if scale.len() < 2 {
        return ReportSet::default();
    }

    let steps: Vec<(u32, f64)> = scale
        .iter()
        .map(|(label, color)| (label, relative_luminance(color.to_rgb())))
        .collect();

    let mut pairs = Vec::new();
    for (i, &(upper, upper_lum)) in steps.iter().enumerate() {
        for &(lower, lower_lum) in &steps[i + 1..] {
            let contrast = classify(contrast_ratio(upper_lum, lower_lum));
            if contrast.meets_aa {
                let (foreground, background) = lighter_first(upper, upper_lum, lower, lower_lum);
                pairs.push(Pairing { foreground: Swatch::Step(foreground), background, contrast });
            }
        }
    }

    let mut tones = Vec::new();
    for &(label, lum) in &steps {
        for tone in TextTone::ALL {
            let contrast = classify(contrast_ratio(relative_luminance(tone.rgb()), lum));
            if contrast.meets_aa {
                tones.push(Pairing { foreground: Swatch::Tone(tone), background: label, contrast });
            }
        }
    }

    pairs.sort_by(strongest_first);
    tones.sort_by(strongest_first);

    log::debug!("{} step pair(s), {} tone pairing(s) meet AA", pairs.len(), tones.len());
    ReportSet { pairs, tones }
}

/// Order two steps so the lighter one is the foreground. Equal luminance
/// keeps label order.
const fn lighter_first(a: u32, a_lum: f64, b: u32, b_lum: f64) -> (u32, u32) {
    if b_lum > a_lum { (b, a) } else { (a, b) }
}

fn strongest_first(a: &Pairing, b: &Pairing) -> Ordering {
    b.contrast
        .ratio
        .total_cmp(&a.contrast.ratio)
        .then_with(|| a.background.cmp(&b.background))
        .then_with(|| a.foreground.cmp(&b.foreground))
}
