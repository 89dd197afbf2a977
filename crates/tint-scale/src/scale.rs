//! Tint/shade scale generation.
//!
//! Each step is the base color pulled toward one of two anchors:
//!
//! ```text
//!   tint anchor (L≈0.98)  ◄── 100 200 300 400 ── 500 ── 600 700 800 900 ──►  shade anchor (L≈0.18)
//!                              factor grows ◄──  base  ──► factor grows
//! ```
//!
//! Lightness and chroma are interpolated linearly; hue never moves. In
//! [`ScaleMode::Balanced`] the base step is first moved to the lightness
//! found by [`balanced_lightness`](crate::balance::balanced_lightness) and
//! the scale is built around that instead.

use std::collections::BTreeMap;
use std::ops::Index;

use tint_color::Color;

use crate::balance::{self, ACHROMATIC_CHROMA, Balance};
use crate::config::{Anchor, ContrastSettings, PaletteConfig, ScaleMode, check_lightness};
use crate::error::{ConvergenceWarning, ScaleError};

/// Chroma of generated foreground text colors: a hint of the step's hue.
pub const FOREGROUND_CHROMA: f64 = 0.01;

// ─── PaletteScale ───────────────────────────────────────────────────────────

/// One color's steps, keyed by label. Lightness falls as the label rises.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteScale {
    steps: BTreeMap<u32, Color>,
}

impl PaletteScale {
    /// Build a scale from existing steps (e.g. read back from CSS).
    ///
    /// No ordering is enforced here; see [`PaletteScale::is_monotonic`].
    #[must_use]
    pub fn from_steps(steps: impl IntoIterator<Item = (u32, Color)>) -> Self {
        Self { steps: steps.into_iter().collect() }
    }

    #[must_use]
    pub fn get(&self, label: u32) -> Option<Color> {
        self.steps.get(&label).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Color)> + '_ {
        self.steps.iter().map(|(&label, &color)| (label, color))
    }

    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.steps.keys().copied()
    }

    /// Whether lightness strictly decreases as the label increases.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.first_break().is_none()
    }

    /// First adjacent `(upper, lower)` label pair whose lightness does not
    /// decrease.
    fn first_break(&self) -> Option<(u32, u32)> {
        self.iter()
            .zip(self.iter().skip(1))
            .find(|((_, a), (_, b))| b.l >= a.l)
            .map(|((upper, _), (lower, _))| (upper, lower))
    }
}

impl Index<u32> for PaletteScale {
    type Output = Color;

    /// # Panics
    ///
    /// Panics if the scale has no step `label`.
    fn index(&self, label: u32) -> &Color {
        &self.steps[&label]
    }
}

// ─── Interpolation ──────────────────────────────────────────────────────────

/// Linear interpolation written so that `factor == 0` yields exactly
/// `from` and `factor == 1` yields exactly `to`.
#[inline]
#[must_use]
pub fn blend(from: f64, to: f64, factor: f64) -> f64 {
    from.mul_add(1.0 - factor, to * factor)
}

/// Pull `base` toward `anchor` by `factor`. Hue and alpha are kept.
#[must_use]
pub fn toward(base: Color, anchor: Anchor, factor: f64) -> Color {
    Color::oklcha(
        blend(base.l, anchor.lightness, factor),
        blend(base.c, anchor.chroma, factor),
        base.h,
        base.alpha,
    )
}

/// Text color for a foreground variant of `step`: dark text on light
/// steps, light text on dark ones, tinted with the step's hue.
#[must_use]
pub fn foreground(step: Color, settings: &ContrastSettings) -> Color {
    let lightness = if step.l > settings.threshold {
        settings.text_lightness.dark
    } else {
        settings.text_lightness.light
    };
    Color::oklch(lightness, FOREGROUND_CHROMA, step.h).round()
}

const fn grey(color: Color) -> Color {
    Color::oklcha(color.l, 0.0, 0.0, color.alpha)
}

// ─── Generation ─────────────────────────────────────────────────────────────

/// A generated scale and how its center was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScale {
    pub scale: PaletteScale,
    /// Midpoint search result, in [`ScaleMode::Balanced`] only.
    pub balance: Option<Balance>,
    /// Set when the midpoint search did not converge.
    pub warning: Option<ConvergenceWarning>,
}

/// Generate the scale for one base color.
///
/// # Errors
///
/// - [`ScaleError::LightnessOutOfRange`] if the base lightness is outside
///   `[0, 1]`.
/// - [`ScaleError::OutsideAnchors`] if the scale center is not strictly
///   between the shade and tint anchors.
/// - [`ScaleError::NonMonotonic`] if rounding collapsed two steps.
pub fn generate_scale(name: &str, base: Color, config: &PaletteConfig) -> Result<GeneratedScale, ScaleError> {
    check_lightness(name, base)?;

    let achromatic = base.c < ACHROMATIC_CHROMA;
    let base = if achromatic { grey(base) } else { base.normalized() };

    let balance = match config.mode {
        ScaleMode::Blend => None,
        ScaleMode::Balanced => Some(balance::balanced_lightness(
            base,
            config.balance.tolerance,
            config.balance.max_iterations,
        )),
    };
    let center = balance.map_or(base, |b| base.set_lightness(b.lightness));

    let (shade, tint) = (config.shade_target.lightness, config.tint_target.lightness);
    if !(shade < center.l && center.l < tint) {
        return Err(ScaleError::OutsideAnchors {
            name: name.to_string(),
            lightness: center.l,
            shade,
            tint,
        });
    }

    let finish = |color: Color| (if achromatic { grey(color) } else { color }).round();

    let mut steps = BTreeMap::new();
    steps.insert(config.base_step, center.round());
    for (&label, &factor) in &config.scale_steps.tint {
        steps.insert(label, finish(toward(center, config.tint_target, factor)));
    }
    for (&label, &factor) in &config.scale_steps.shade {
        steps.insert(label, finish(toward(center, config.shade_target, factor)));
    }

    let scale = PaletteScale { steps };
    if let Some((upper, lower)) = scale.first_break() {
        return Err(ScaleError::NonMonotonic { name: name.to_string(), upper, lower });
    }

    let warning = balance.filter(|b| !b.converged).map(|b| ConvergenceWarning {
        name: name.to_string(),
        lightness: b.lightness,
        difference: b.difference,
        tolerance: config.balance.tolerance,
        iterations: b.iterations,
    });

    log::debug!(
        "{name}: {} steps around {} ({} mode)",
        scale.len(),
        center.round(),
        config.mode
    );
    Ok(GeneratedScale { scale, balance, warning })
}

// ─── Palette ────────────────────────────────────────────────────────────────

/// Every generated scale, plus what went wrong along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    pub scales: BTreeMap<String, PaletteScale>,
    /// Colors that were skipped, at load time or during generation.
    pub failures: Vec<ScaleError>,
    pub warnings: Vec<ConvergenceWarning>,
}

impl Palette {
    /// Generate a scale for every configured color.
    ///
    /// A color that fails is logged and recorded in `failures`; the rest
    /// still generate. Colors rejected while loading the config are carried
    /// over into `failures` too.
    #[must_use]
    pub fn generate(config: &PaletteConfig) -> Self {
        let mut palette = Self {
            failures: config.rejected.clone(),
            ..Self::default()
        };

        for (name, &base) in &config.colors {
            match generate_scale(name, base, config) {
                Ok(generated) => {
                    if let Some(warning) = generated.warning {
                        log::warn!("{warning}");
                        palette.warnings.push(warning);
                    }
                    palette.scales.insert(name.clone(), generated.scale);
                }
                Err(err) => {
                    log::warn!("skipping color: {err}");
                    palette.failures.push(err);
                }
            }
        }

        log::info!(
            "generated {} scale(s) ({} skipped, {} warning(s))",
            palette.scales.len(),
            palette.failures.len(),
            palette.warnings.len()
        );
        palette
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PaletteScale> {
        self.scales.get(name)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::DEFAULT_TOLERANCE;
    use crate::config::{BalanceSettings, TextLightness};
    use pretty_assertions::assert_eq;
    use tint_color::contrast_ratio;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn red() -> Color {
        Color::oklch(0.62, 0.2, 29.0)
    }

    fn generate(base: Color, mode: ScaleMode) -> PaletteScale {
        let config = PaletteConfig { mode, ..PaletteConfig::default() };
        generate_scale("test", base, &config).expect("scale generates").scale
    }

    #[test]
    fn blend_endpoints_are_exact() {
        for (from, to) in [(0.62, 0.98), (0.1, 0.3), (0.333_333_3, 0.18)] {
            assert_eq!(blend(from, to, 0.0).to_bits(), f64::to_bits(from));
            assert_eq!(blend(from, to, 1.0).to_bits(), f64::to_bits(to));
        }
        let base = red();
        assert_eq!(toward(base, Anchor::TINT, 0.0), base);
        let target = toward(base, Anchor::SHADE, 1.0);
        assert_eq!((target.l, target.c), (Anchor::SHADE.lightness, Anchor::SHADE.chroma));
        assert!(approx_eq(target.h, 29.0, 1e-12));
    }

    #[test]
    fn step_100_of_red() {
        let scale = generate(red(), ScaleMode::Blend);
        let step = scale[100];
        assert!(approx_eq(step.l, 0.908, 1e-9), "{step:?}");
        assert!(approx_eq(step.c, 0.064, 1e-9), "{step:?}");
        assert!(approx_eq(step.h, 29.0, 1e-9), "{step:?}");
        assert_eq!(step.to_string(), "oklch(90.800% 0.06400 29.000)");
    }

    #[test]
    fn shade_steps_follow_the_formula() {
        let scale = generate(red(), ScaleMode::Blend);
        // L − (L − 0.18)·0.56, C − (C − 0.03)·0.56
        assert!(approx_eq(scale[800].l, 0.3736, 1e-9));
        assert!(approx_eq(scale[800].c, 0.1048, 1e-9));
    }

    #[test]
    fn base_step_round_trips() {
        for source in ["oklch(62% 0.2 29)", "#3b82f6", "rgb(16, 185, 129)", "hsl(280, 60%, 50%)"] {
            let base = Color::parse(source).expect("parses");
            let scale = generate(base, ScaleMode::Blend);
            let step = scale[500];
            assert!(approx_eq(step.l, base.l, 1e-3), "{source}: {step:?} vs {base:?}");
            assert!(approx_eq(step.c, base.c, 1e-3), "{source}: {step:?} vs {base:?}");
            assert!(approx_eq(step.h, base.h, 1e-3), "{source}: {step:?} vs {base:?}");
        }
    }

    #[test]
    fn every_step_is_present_in_order() {
        let scale = generate(red(), ScaleMode::Blend);
        assert_eq!(
            scale.labels().collect::<Vec<_>>(),
            vec![100, 200, 300, 400, 500, 600, 700, 800, 900]
        );
    }

    #[test]
    fn lightness_is_strictly_monotonic() {
        let bases = [
            red(),
            Color::oklch(0.3, 0.1, 250.0),
            Color::oklch(0.9, 0.15, 100.0),
            Color::oklch(0.5, 0.0, 0.0),
            Color::rgb8(0x64, 0x74, 0x8b),
        ];
        for base in bases {
            for mode in [ScaleMode::Blend, ScaleMode::Balanced] {
                let scale = generate(base, mode);
                assert!(scale.is_monotonic(), "{base} in {mode} mode: {scale:?}");
            }
        }
    }

    #[test]
    fn hue_never_moves() {
        let scale = generate(Color::oklch(0.55, 0.18, 145.5), ScaleMode::Blend);
        for (label, color) in scale.iter() {
            assert!(approx_eq(color.h, 145.5, 1e-9), "step {label}: {color}");
        }
    }

    #[test]
    fn achromatic_bases_stay_grey() {
        for base in [Color::gray(0.55), Color::oklch(0.55, 0.005, 200.0), Color::oklch(0.4, 0.0, 310.0)] {
            for mode in [ScaleMode::Blend, ScaleMode::Balanced] {
                for (label, color) in generate(base, mode).iter() {
                    assert_eq!((color.c, color.h), (0.0, 0.0), "{base} step {label} in {mode} mode");
                }
            }
        }
    }

    #[test]
    fn balanced_mode_centers_on_the_midpoint() {
        let scale = generate(red(), ScaleMode::Balanced);
        let center = scale[500];
        assert!(approx_eq(center.c, 0.2, 1e-9));
        assert!(approx_eq(center.h, 29.0, 1e-9));

        let lum = center.luminance();
        let gap = contrast_ratio(lum, 1.0) - contrast_ratio(lum, 0.0);
        // Rounding the lightness to 5 decimals moves the gap very slightly.
        assert!(gap.abs() <= DEFAULT_TOLERANCE + 1e-3, "gap {gap}");

        // Other steps use the same factor table around the balanced lightness,
        // with chroma still blended from the base.
        assert!(approx_eq(scale[100].l, blend(center.l, 0.98, 0.8), 1e-5));
        assert!(approx_eq(scale[100].c, blend(0.2, 0.03, 0.8), 1e-5));
    }

    #[test]
    fn srgb_neutrals_generate_grey_scales() {
        let config = PaletteConfig::from_json(
            r##"{ "colors": { "grey": "#808080", "gray": "gray", "mist": "#f0f0f0" } }"##,
        )
        .expect("config loads");
        let palette = Palette::generate(&config);
        assert_eq!(palette.scales.len(), 3, "{:?}", palette.failures);
        for (name, scale) in &palette.scales {
            for (label, color) in scale.iter() {
                assert_eq!((color.c, color.h), (0.0, 0.0), "{name} step {label}: {color}");
            }
        }
        assert_eq!(palette.scales["grey"][500].to_string(), "oklch(59.987% 0.00000 0.000)");
    }

    #[test]
    fn white_balances_to_a_grey_scale() {
        let white = Color::parse("white").expect("parses");
        // Blend mode keeps L = 1, above the tint anchor.
        let err = generate_scale("white", white, &PaletteConfig::default()).expect_err("outside anchors");
        assert!(matches!(err, ScaleError::OutsideAnchors { .. }), "{err}");

        let scale = generate(white, ScaleMode::Balanced);
        assert!(approx_eq(scale[500].l, 0.5, 1e-12));
        assert!(scale.iter().all(|(_, color)| color.c == 0.0), "{scale:?}");
    }

    #[test]
    fn slate_hex_keeps_its_hue() {
        let scale = generate(Color::parse("#64748b").expect("parses"), ScaleMode::Blend);
        assert_eq!(scale[500].to_string(), "oklch(55.439% 0.04072 257.417)");
        assert!(scale.iter().all(|(_, color)| approx_eq(color.h, 257.417, 1e-9)));
    }

    #[test]
    fn exhausted_search_is_a_palette_warning() {
        let config = PaletteConfig {
            mode: ScaleMode::Balanced,
            balance: BalanceSettings { tolerance: DEFAULT_TOLERANCE, max_iterations: 2 },
            ..PaletteConfig::new([("red", red()), ("stone", Color::gray(0.6))])
        };
        let palette = Palette::generate(&config);

        // Greys skip the search, so only red warns.
        assert_eq!(palette.warnings.len(), 1, "{:?}", palette.warnings);
        let warning = &palette.warnings[0];
        assert_eq!(warning.name, "red");
        assert_eq!(warning.iterations, 2);
        assert!(warning.difference > warning.tolerance);
        assert!(warning.to_string().contains("`colors.red`"), "{warning}");

        // The best estimate still produces a full scale.
        let scale = palette.get("red").expect("red still generates");
        assert_eq!(scale.len(), 9);
        assert!(scale.is_monotonic());
        assert!(approx_eq(scale[500].l, warning.lightness, 1e-5));
        assert!(palette.failures.is_empty());
    }

    #[test]
    fn balanced_grey_sits_at_half_lightness() {
        let scale = generate(Color::gray(0.8), ScaleMode::Balanced);
        assert!(approx_eq(scale[500].l, 0.5, 1e-12));
    }

    #[test]
    fn modes_are_not_mixed() {
        let blend_scale = generate(red(), ScaleMode::Blend);
        let balanced_scale = generate(red(), ScaleMode::Balanced);
        assert!(approx_eq(blend_scale[500].l, 0.62, 1e-12));
        assert!(!approx_eq(balanced_scale[500].l, 0.62, 1e-3));
    }

    #[test]
    fn base_outside_anchors_is_rejected() {
        let config = PaletteConfig::default();
        for l in [0.99, 0.18, 0.05] {
            let err = generate_scale("edge", Color::oklch(l, 0.1, 30.0), &config)
                .expect_err("outside anchors");
            assert!(matches!(err, ScaleError::OutsideAnchors { .. }), "{err}");
            assert_eq!(err.name(), "edge");
        }
    }

    #[test]
    fn lightness_out_of_range_is_rejected() {
        let err = generate_scale("glare", Color::oklch(1.2, 0.1, 30.0), &PaletteConfig::default())
            .expect_err("out of range");
        assert!(matches!(err, ScaleError::LightnessOutOfRange { .. }));
    }

    #[test]
    fn generation_is_deterministic() {
        let config = PaletteConfig::new([("red", red()), ("blue", Color::oklch(0.55, 0.2, 260.0))]);
        assert_eq!(Palette::generate(&config), Palette::generate(&config));
    }

    #[test]
    fn one_bad_color_does_not_stop_the_rest() {
        let config = PaletteConfig::from_json(
            r##"{ "colors": {
                "red": "oklch(62% 0.2 29)",
                "snow": "oklch(99.5% 0.01 90)",
                "ghost": "var(--brand)",
                "ink": "#334155"
            } }"##,
        )
        .expect("config loads");
        let palette = Palette::generate(&config);

        assert_eq!(palette.scales.keys().collect::<Vec<_>>(), vec!["ink", "red"]);
        let mut failed: Vec<&str> = palette.failures.iter().map(ScaleError::name).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec!["ghost", "snow"]);
        assert!(palette.warnings.is_empty());
    }

    #[test]
    fn foreground_picks_text_lightness_by_threshold() {
        let settings = ContrastSettings {
            threshold: 0.6,
            text_lightness: TextLightness { dark: 0.2, light: 0.98 },
            foreground_variants: vec![500],
        };
        let on_light = foreground(Color::oklch(0.8, 0.1, 29.0), &settings);
        let on_dark = foreground(Color::oklch(0.4, 0.1, 29.0), &settings);
        assert_eq!(on_light, Color::oklch(0.2, FOREGROUND_CHROMA, 29.0));
        assert_eq!(on_dark, Color::oklch(0.98, FOREGROUND_CHROMA, 29.0));
        // At the threshold itself the background counts as dark.
        assert_eq!(foreground(Color::oklch(0.6, 0.1, 29.0), &settings).l, 0.98);
    }

    #[test]
    fn index_and_get_agree() {
        let scale = generate(red(), ScaleMode::Blend);
        assert_eq!(scale.get(300), Some(scale[300]));
        assert_eq!(scale.get(550), None);
        assert_eq!(scale.len(), 9);
    }

    #[test]
    fn from_steps_detects_broken_order() {
        let scale = PaletteScale::from_steps([(100, Color::gray(0.5)), (200, Color::gray(0.7))]);
        assert!(!scale.is_monotonic());
        assert_eq!(scale.first_break(), Some((100, 200)));
    }
}
