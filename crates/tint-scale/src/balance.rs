//! Midpoint-balanced lightness.
//!
//! For a given chroma and hue, finds the OKLCH lightness at which black
//! text and white text read equally well, i.e. where
//! `contrast(color, white) == contrast(color, black)`. A scale centered on
//! that lightness has a base step that works with either text tone, with
//! the tints favoring black text and the shades favoring white.
//!
//! The search runs on [`Color::luminance`], the unquantized luminance.
//! The 8-bit value steps with every channel change and can jump over the
//! tolerance band entirely.

use tint_color::{Color, contrast_ratio};

/// Acceptable `|contrast vs white − contrast vs black|`.
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Bisection cap. Twenty halvings of `[0, 1]` is below 1e-6 in lightness.
pub const MAX_ITERATIONS: u32 = 20;

/// Below this chroma a color is treated as grey: no hue, no search.
pub const ACHROMATIC_CHROMA: f64 = 0.01;

/// Lightness used for greys instead of searching.
pub const ACHROMATIC_LIGHTNESS: f64 = 0.5;

/// Result of [`balanced_lightness`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    /// Best lightness found.
    pub lightness: f64,
    /// Iterations spent. Zero when the search was skipped.
    pub iterations: u32,
    /// Whether `difference` is within tolerance, or the search was skipped
    /// for an achromatic color.
    pub converged: bool,
    /// `|contrast vs white − contrast vs black|` at `lightness`.
    pub difference: f64,
}

/// Signed contrast gap: positive while white text still wins.
#[must_use]
pub fn contrast_gap(color: Color) -> f64 {
    let lum = color.luminance();
    contrast_ratio(lum, 1.0) - contrast_ratio(lum, 0.0)
}

/// Bisect for the lightness equidistant in contrast from black and white.
///
/// Chroma and hue are held fixed. The gap falls monotonically as
/// lightness rises, so each iteration halves the bracket around the
/// crossing. Returns the best estimate seen even when `max_iterations`
/// runs out first.
#[must_use]
pub fn balanced_lightness(color: Color, tolerance: f64, max_iterations: u32) -> Balance {
    if color.c < ACHROMATIC_CHROMA {
        let probe = Color::oklch(ACHROMATIC_LIGHTNESS, 0.0, 0.0);
        return Balance {
            lightness: ACHROMATIC_LIGHTNESS,
            iterations: 0,
            converged: true,
            difference: contrast_gap(probe).abs(),
        };
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut best = Balance {
        lightness: 0.5,
        iterations: 0,
        converged: false,
        difference: f64::INFINITY,
    };

    for iteration in 1..=max_iterations {
        let mid = (lo + hi) * 0.5;
        let gap = contrast_gap(color.set_lightness(mid));
        let difference = gap.abs();

        if difference < best.difference {
            best.lightness = mid;
            best.difference = difference;
        }
        best.iterations = iteration;

        if difference <= tolerance {
            return Balance { lightness: mid, iterations: iteration, converged: true, difference };
        }

        // Still darker than the crossing: white text wins, go lighter.
        if gap > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    best
}
