//! Palette configuration: JSON shape, defaults, and validation.
//!
//! The file format is camelCase JSON:
//!
//! ```json
//! {
//!   "colors": { "red": "oklch(62% 0.2 29)", "slate": "#64748b" },
//!   "tintTarget": { "lightness": 0.98, "chroma": 0.03 },
//!   "shadeTarget": { "lightness": 0.18, "chroma": 0.03 },
//!   "scaleSteps": {
//!     "tint": { "100": 0.8, "200": 0.64, "300": 0.48, "400": 0.32 },
//!     "shade": { "600": 0.16, "700": 0.32, "800": 0.56, "900": 0.8 }
//!   },
//!   "mode": "blend",
//!   "balance": { "tolerance": 0.02, "maxIterations": 20 },
//!   "surfaces": { "not-black": "oklch(18.22% 0 0)", "not-white": "oklch(97.614% 0 0)" },
//!   "contrast": {
//!     "threshold": 0.6,
//!     "textLightness": { "dark": 0.2, "light": 0.98 },
//!     "foregroundVariants": [400, 500, 600]
//!   }
//! }
//! ```
//!
//! Everything except `colors` (or `colours`) has a default. Structural
//! problems are fatal [`ConfigError`]s. Problems with a single color are
//! [`ScaleError`]s kept in [`PaletteConfig::rejected`] so the rest of the
//! palette still generates.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tint_color::Color;

use crate::balance::{DEFAULT_TOLERANCE, MAX_ITERATIONS};
use crate::error::{ConfigError, ScaleError};

/// Step label the base color sits at unless configured otherwise.
pub const DEFAULT_BASE_STEP: u32 = 500;

/// Custom property prefix: `--colour-<name>-<step>`.
pub const DEFAULT_PREFIX: &str = "colour";

// ─── Anchors ────────────────────────────────────────────────────────────────

/// A tint or shade target. Hue is always borrowed from the base color.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Anchor {
    pub lightness: f64,
    pub chroma: f64,
}

impl Anchor {
    /// Near-white, barely tinted.
    pub const TINT: Self = Self { lightness: 0.98, chroma: 0.03 };
    /// Near-black, barely tinted.
    pub const SHADE: Self = Self { lightness: 0.18, chroma: 0.03 };
}

// ─── Scale mode ─────────────────────────────────────────────────────────────

/// Which lightness the scale is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// The base color sits at the base step, unmodified.
    #[default]
    Blend,
    /// The base step is moved to the lightness equidistant in contrast
    /// from black and white text.
    Balanced,
}

impl ScaleMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blend => "blend",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blend" => Ok(Self::Blend),
            "balanced" => Ok(Self::Balanced),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

// ─── Step table ─────────────────────────────────────────────────────────────

/// Interpolation factor per step label, split by direction.
///
/// Tint factors pull toward [`Anchor::TINT`] and grow as the label
/// shrinks; shade factors pull toward [`Anchor::SHADE`] and grow as the
/// label grows.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSteps {
    pub tint: BTreeMap<u32, f64>,
    pub shade: BTreeMap<u32, f64>,
}

impl Default for ScaleSteps {
    fn default() -> Self {
        Self {
            tint: BTreeMap::from([(100, 0.8), (200, 0.64), (300, 0.48), (400, 0.32)]),
            shade: BTreeMap::from([(600, 0.16), (700, 0.32), (800, 0.56), (900, 0.8)]),
        }
    }
}

impl ScaleSteps {
    /// Every label of a scale, ascending, including `base_step`.
    #[must_use]
    pub fn labels(&self, base_step: u32) -> Vec<u32> {
        let mut labels: Vec<u32> = self.tint.keys().copied().collect();
        labels.push(base_step);
        labels.extend(self.shade.keys().copied());
        labels
    }

    fn validate(&self, base_step: u32) -> Result<(), ConfigError> {
        for (section, factors) in [("tint", &self.tint), ("shade", &self.shade)] {
            for (label, &factor) in factors {
                check_unit(format!("scaleSteps.{section}.{label}"), factor)?;
            }
        }

        if let Some(label) = self.tint.keys().find(|&&label| label >= base_step) {
            return Err(ConfigError::NonIncreasingSteps {
                base: base_step,
                detail: format!("tint step {label} is not below the base step"),
            });
        }
        if let Some(label) = self.shade.keys().find(|&&label| label <= base_step) {
            return Err(ConfigError::NonIncreasingSteps {
                base: base_step,
                detail: format!("shade step {label} is not above the base step"),
            });
        }

        // Ascending labels: tints get closer to the base, shades further away.
        for ((_, prev), (&label, factor)) in self.tint.iter().zip(self.tint.iter().skip(1)) {
            if factor >= prev {
                return Err(ConfigError::NonMonotonicFactors { section: "tint", label });
            }
        }
        for ((_, prev), (&label, factor)) in self.shade.iter().zip(self.shade.iter().skip(1)) {
            if factor <= prev {
                return Err(ConfigError::NonMonotonicFactors { section: "shade", label });
            }
        }
        Ok(())
    }
}

// ─── Midpoint search ────────────────────────────────────────────────────────

/// Budget for the [`ScaleMode::Balanced`] midpoint search.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSettings {
    /// Acceptable `|contrast vs white − contrast vs black|`.
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self { tolerance: DEFAULT_TOLERANCE, max_iterations: MAX_ITERATIONS }
    }
}

impl BalanceSettings {
    fn validate(self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::OutOfRange {
                key: "balance.tolerance".to_string(),
                value: self.tolerance,
                range: "(0, ∞)",
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::OutOfRange {
                key: "balance.maxIterations".to_string(),
                value: 0.0,
                range: "[1, ∞)",
            });
        }
        Ok(())
    }
}

// ─── Foreground variants ────────────────────────────────────────────────────

/// Lightness of generated text colors.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TextLightness {
    /// Used on backgrounds lighter than the threshold.
    pub dark: f64,
    /// Used on backgrounds at or below the threshold.
    pub light: f64,
}

/// The optional `contrast` section: which steps get a `-foreground` text
/// color, and how it is picked.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastSettings {
    pub threshold: f64,
    pub text_lightness: TextLightness,
    pub foreground_variants: Vec<u32>,
}

impl ContrastSettings {
    fn validate(&self, labels: &[u32]) -> Result<(), ConfigError> {
        check_unit("contrast.threshold".to_string(), self.threshold)?;
        check_unit("contrast.textLightness.dark".to_string(), self.text_lightness.dark)?;
        check_unit("contrast.textLightness.light".to_string(), self.text_lightness.light)?;
        if let Some(label) = self.foreground_variants.iter().find(|&&label| !labels.contains(&label)) {
            return Err(ConfigError::InvalidStepLabel {
                key: "contrast.foregroundVariants".to_string(),
                label: label.to_string(),
            });
        }
        Ok(())
    }
}

// ─── PaletteConfig ──────────────────────────────────────────────────────────

/// A validated palette configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteConfig {
    /// Base colors that parsed and passed per-color checks, by name.
    pub colors: BTreeMap<String, Color>,
    /// Colors rejected while loading. Never fatal.
    pub rejected: Vec<ScaleError>,
    pub tint_target: Anchor,
    pub shade_target: Anchor,
    pub scale_steps: ScaleSteps,
    pub base_step: u32,
    pub mode: ScaleMode,
    pub balance: BalanceSettings,
    pub prefix: String,
    /// Fixed tokens written ahead of the scales as `--<prefix>-<name>`.
    pub surfaces: BTreeMap<String, Color>,
    pub contrast: Option<ContrastSettings>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: BTreeMap::new(),
            rejected: Vec::new(),
            tint_target: Anchor::TINT,
            shade_target: Anchor::SHADE,
            scale_steps: ScaleSteps::default(),
            base_step: DEFAULT_BASE_STEP,
            mode: ScaleMode::default(),
            balance: BalanceSettings::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            surfaces: BTreeMap::new(),
            contrast: None,
        }
    }
}

impl PaletteConfig {
    /// Default settings around the given base colors.
    #[must_use]
    pub fn new<N: Into<String>>(colors: impl IntoIterator<Item = (N, Color)>) -> Self {
        Self {
            colors: colors.into_iter().map(|(name, color)| (name.into(), color)).collect(),
            ..Self::default()
        }
    }

    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise whatever
    /// [`PaletteConfig::from_json`] reports.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a config document.
    ///
    /// Colors that fail to parse, have an unusable name, or have lightness
    /// outside `[0, 1]` are logged and moved to [`Self::rejected`].
    /// Surfaces get no such leniency.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the JSON is malformed, the color
    /// section is missing, a surface is unusable, or any structural
    /// setting is invalid.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        let sources = raw.colors.ok_or(ConfigError::MissingSection("colors"))?;

        let scale_steps = match raw.scale_steps {
            Some(steps) => ScaleSteps {
                tint: step_table("scaleSteps.tint", steps.tint)?,
                shade: step_table("scaleSteps.shade", steps.shade)?,
            },
            None => ScaleSteps::default(),
        };

        let mut config = Self {
            tint_target: raw.tint_target.unwrap_or(Anchor::TINT),
            shade_target: raw.shade_target.unwrap_or(Anchor::SHADE),
            scale_steps,
            base_step: raw.base_step.unwrap_or(DEFAULT_BASE_STEP),
            mode: raw.mode.unwrap_or_default(),
            balance: raw.balance.unwrap_or_default(),
            prefix: raw.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            surfaces: surface_table(raw.surfaces)?,
            contrast: raw.contrast.map(RawContrast::resolve).transpose()?,
            ..Self::default()
        };
        config.validate()?;

        for (name, source) in sources {
            match base_color(&name, &source) {
                Ok(_) if config.surfaces.contains_key(&name) => {
                    return Err(ConfigError::NameClash { name });
                }
                Ok(color) => {
                    config.colors.insert(name, color);
                }
                Err(err) => {
                    log::warn!("skipping color: {err}");
                    config.rejected.push(err);
                }
            }
        }

        log::debug!(
            "config: {} color(s), {} rejected, {} step(s), mode {}",
            config.colors.len(),
            config.rejected.len(),
            config.labels().len(),
            config.mode,
        );
        Ok(config)
    }

    /// Check every structural setting. Run again after overriding fields.
    ///
    /// # Errors
    ///
    /// The first invalid setting found, as a [`ConfigError`] naming its key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_anchor("tintTarget", self.tint_target)?;
        check_anchor("shadeTarget", self.shade_target)?;
        if self.shade_target.lightness >= self.tint_target.lightness {
            return Err(ConfigError::InvertedAnchors {
                tint: self.tint_target.lightness,
                shade: self.shade_target.lightness,
            });
        }
        self.scale_steps.validate(self.base_step)?;
        self.balance.validate()?;
        if !is_identifier(&self.prefix) {
            return Err(ConfigError::InvalidName {
                key: "prefix".to_string(),
                name: self.prefix.clone(),
            });
        }
        if let Some(contrast) = &self.contrast {
            contrast.validate(&self.labels())?;
        }
        if let Some(name) = self.colors.keys().find(|name| self.surfaces.contains_key(*name)) {
            return Err(ConfigError::NameClash { name: name.clone() });
        }
        Ok(())
    }

    /// Every step label, ascending, including the base step.
    #[must_use]
    pub fn labels(&self) -> Vec<u32> {
        self.scale_steps.labels(self.base_step)
    }
}

/// Parse one configured base color and apply the per-color checks.
fn base_color(name: &str, source: &str) -> Result<Color, ScaleError> {
    if !is_identifier(name) {
        return Err(ScaleError::InvalidName { name: name.to_string() });
    }
    let color = Color::parse(source).map_err(|source| ScaleError::Parse {
        name: name.to_string(),
        source,
    })?;
    check_lightness(name, color)?;
    Ok(color)
}

/// Base lightness must lie in `[0, 1]`.
pub(crate) fn check_lightness(name: &str, color: Color) -> Result<(), ScaleError> {
    if (0.0..=1.0).contains(&color.l) {
        Ok(())
    } else {
        Err(ScaleError::LightnessOutOfRange {
            name: name.to_string(),
            lightness: color.l,
        })
    }
}

/// `[A-Za-z][A-Za-z0-9_-]*`: safe inside a custom property name.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_unit(key: String, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { key, value, range: "[0, 1]" })
    }
}

fn check_anchor(key: &str, anchor: Anchor) -> Result<(), ConfigError> {
    check_unit(format!("{key}.lightness"), anchor.lightness)?;
    check_unit(format!("{key}.chroma"), anchor.chroma)
}

fn step_table(key: &str, raw: BTreeMap<String, f64>) -> Result<BTreeMap<u32, f64>, ConfigError> {
    let mut table = BTreeMap::new();
    for (label, factor) in raw {
        let step = parse_label(key, &label)?;
        if table.insert(step, factor).is_some() {
            return Err(ConfigError::DuplicateStep { key: key.to_string(), label: step });
        }
    }
    Ok(table)
}

fn surface_table(raw: BTreeMap<String, String>) -> Result<BTreeMap<String, Color>, ConfigError> {
    raw.into_iter()
        .map(|(name, source)| {
            if !is_identifier(&name) {
                return Err(ConfigError::InvalidName { key: "surfaces".to_string(), name });
            }
            let color = Color::parse(&source).map_err(|source| ConfigError::Surface {
                name: name.clone(),
                source,
            })?;
            Ok((name, color.normalized()))
        })
        .collect()
}

fn parse_label(key: &str, label: &str) -> Result<u32, ConfigError> {
    label.trim().parse().map_err(|_| ConfigError::InvalidStepLabel {
        key: key.to_string(),
        label: label.to_string(),
    })
}

// ─── Wire format ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(alias = "colours")]
    colors: Option<BTreeMap<String, String>>,
    tint_target: Option<Anchor>,
    shade_target: Option<Anchor>,
    scale_steps: Option<RawSteps>,
    base_step: Option<u32>,
    mode: Option<ScaleMode>,
    balance: Option<BalanceSettings>,
    prefix: Option<String>,
    #[serde(default)]
    surfaces: BTreeMap<String, String>,
    contrast: Option<RawContrast>,
}

#[derive(Debug, Deserialize)]
struct RawSteps {
    #[serde(default)]
    tint: BTreeMap<String, f64>,
    #[serde(default)]
    shade: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContrast {
    threshold: f64,
    text_lightness: TextLightness,
    #[serde(default)]
    foreground_variants: Vec<StepToken>,
}

/// Step labels show up both as `500` and as `"500"` in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepToken {
    Number(u32),
    Text(String),
}

impl RawContrast {
    fn resolve(self) -> Result<ContrastSettings, ConfigError> {
        let foreground_variants = self
            .foreground_variants
            .into_iter()
            .map(|token| match token {
                StepToken::Number(step) => Ok(step),
                StepToken::Text(label) => parse_label("contrast.foregroundVariants", &label),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ContrastSettings {
            threshold: self.threshold,
            text_lightness: self.text_lightness,
            foreground_variants,
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load(json: &str) -> PaletteConfig {
        PaletteConfig::from_json(json).expect("config should load")
    }

    fn load_err(json: &str) -> ConfigError {
        PaletteConfig::from_json(json).expect_err("config should be rejected")
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config = load(r#"{ "colors": { "red": "oklch(62% 0.2 29)" } }"#);
        assert_eq!(config.tint_target, Anchor::TINT);
        assert_eq!(config.shade_target, Anchor::SHADE);
        assert_eq!(config.scale_steps, ScaleSteps::default());
        assert_eq!(config.base_step, 500);
        assert_eq!(config.mode, ScaleMode::Blend);
        assert_eq!(config.prefix, "colour");
        assert_eq!(config.contrast, None);
        assert_eq!(config.balance, BalanceSettings { tolerance: 0.02, max_iterations: 20 });
        assert!(config.surfaces.is_empty());
        assert_eq!(config.labels(), vec![100, 200, 300, 400, 500, 600, 700, 800, 900]);
        assert_eq!(config.colors["red"], Color::oklch(0.62, 0.2, 29.0));
    }

    #[test]
    fn colours_spelling_is_accepted() {
        let config = load(r##"{ "colours": { "ink": "#112233" } }"##);
        assert_eq!(config.colors.keys().collect::<Vec<_>>(), vec!["ink"]);
    }

    #[test]
    fn full_document_loads() {
        let config = load(
            r#"{
                "colors": { "red": "oklch(62% 0.2 29)" },
                "tintTarget": { "lightness": 0.95, "chroma": 0.02 },
                "shadeTarget": { "lightness": 0.2, "chroma": 0.04 },
                "scaleSteps": {
                    "tint": { "50": 0.9, "100": 0.8 },
                    "shade": { "900": 0.8, "950": 0.9 }
                },
                "baseStep": 500,
                "mode": "balanced",
                "prefix": "fab-colour",
                "contrast": {
                    "threshold": 0.6,
                    "textLightness": { "dark": 0.2, "light": 0.98 },
                    "foregroundVariants": [500, "900"]
                }
            }"#,
        );
        assert_eq!(config.tint_target, Anchor { lightness: 0.95, chroma: 0.02 });
        assert_eq!(config.labels(), vec![50, 100, 500, 900, 950]);
        assert_eq!(config.mode, ScaleMode::Balanced);
        assert_eq!(config.prefix, "fab-colour");
        assert_eq!(
            config.contrast,
            Some(ContrastSettings {
                threshold: 0.6,
                text_lightness: TextLightness { dark: 0.2, light: 0.98 },
                foreground_variants: vec![500, 900],
            })
        );
    }

    #[test]
    fn missing_colors_is_fatal() {
        assert!(matches!(
            load_err(r#"{ "mode": "blend" }"#),
            ConfigError::MissingSection("colors")
        ));
    }

    #[test]
    fn malformed_json_is_fatal() {
        assert!(matches!(load_err("{ colors: "), ConfigError::Json(_)));
        assert!(matches!(
            load_err(r#"{ "colors": {}, "mode": "hybrid" }"#),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn tint_label_above_base_is_rejected() {
        let err = load_err(
            r#"{ "colors": {}, "scaleSteps": { "tint": { "600": 0.5 }, "shade": { "700": 0.5 } } }"#,
        );
        assert!(matches!(err, ConfigError::NonIncreasingSteps { base: 500, .. }), "{err}");
    }

    #[test]
    fn shade_label_below_base_is_rejected() {
        let err = load_err(r#"{ "colors": {}, "scaleSteps": { "shade": { "400": 0.5 } } }"#);
        assert!(matches!(err, ConfigError::NonIncreasingSteps { .. }), "{err}");
        assert!(err.to_string().contains("shade step 400"));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = load_err(r#"{ "colors": {}, "scaleSteps": { "tint": { "100": 0.8, "0100": 0.7 } } }"#);
        assert!(
            matches!(err, ConfigError::DuplicateStep { ref key, label: 100 } if key == "scaleSteps.tint"),
            "{err}"
        );
        assert_eq!(err.to_string(), "`scaleSteps.tint` lists step 100 more than once");
    }

    #[test]
    fn balance_budget_loads_and_is_checked() {
        let config = load(r#"{ "colors": {}, "balance": { "maxIterations": 2 } }"#);
        assert_eq!(config.balance, BalanceSettings { tolerance: 0.02, max_iterations: 2 });

        let err = load_err(r#"{ "colors": {}, "balance": { "tolerance": 0 } }"#);
        assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "balance.tolerance"));
        let err = load_err(r#"{ "colors": {}, "balance": { "maxIterations": 0 } }"#);
        assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "balance.maxIterations"));
    }

    #[test]
    fn surfaces_load_as_colors() {
        let config = load(
            r#"{ "colors": {}, "surfaces": {
                "not-black": "oklch(18.22% 0.00002 271.152)",
                "not-white": "white"
            } }"#,
        );
        assert_eq!(config.surfaces.keys().collect::<Vec<_>>(), vec!["not-black", "not-white"]);
        assert!(config.surfaces["not-white"].is_achromatic());
    }

    #[test]
    fn bad_surfaces_are_fatal() {
        let err = load_err(r#"{ "colors": {}, "surfaces": { "ink": "var(--ink)" } }"#);
        assert!(matches!(err, ConfigError::Surface { ref name, .. } if name == "ink"), "{err}");

        let err = load_err(r#"{ "colors": {}, "surfaces": { "not black": "black" } }"#);
        assert!(matches!(err, ConfigError::InvalidName { ref key, .. } if key == "surfaces"));

        let err = load_err(r#"{ "colors": { "ink": "black" }, "surfaces": { "ink": "black" } }"#);
        assert!(matches!(err, ConfigError::NameClash { ref name } if name == "ink"), "{err}");
    }

    #[test]
    fn factors_must_grow_away_from_base() {
        let err = load_err(
            r#"{ "colors": {}, "scaleSteps": { "tint": { "100": 0.3, "200": 0.6 } } }"#,
        );
        assert!(matches!(
            err,
            ConfigError::NonMonotonicFactors { section: "tint", label: 200 }
        ));

        let err = load_err(
            r#"{ "colors": {}, "scaleSteps": { "shade": { "600": 0.5, "700": 0.5 } } }"#,
        );
        assert!(matches!(
            err,
            ConfigError::NonMonotonicFactors { section: "shade", label: 700 }
        ));
    }

    #[test]
    fn factor_out_of_range_names_its_key() {
        let err = load_err(r#"{ "colors": {}, "scaleSteps": { "tint": { "100": 1.2 } } }"#);
        assert_eq!(err.to_string(), "`scaleSteps.tint.100` = 1.2 is outside [0, 1]");
    }

    #[test]
    fn non_numeric_label_is_rejected() {
        let err = load_err(r#"{ "colors": {}, "scaleSteps": { "tint": { "light": 0.5 } } }"#);
        assert!(matches!(err, ConfigError::InvalidStepLabel { ref label, .. } if label == "light"));
    }

    #[test]
    fn anchors_are_checked() {
        let err = load_err(r#"{ "colors": {}, "tintTarget": { "lightness": 0.1, "chroma": 0.0 } }"#);
        assert!(matches!(err, ConfigError::InvertedAnchors { .. }), "{err}");

        let err = load_err(r#"{ "colors": {}, "shadeTarget": { "lightness": -0.1, "chroma": 0.0 } }"#);
        assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "shadeTarget.lightness"));
    }

    #[test]
    fn bad_prefix_is_rejected() {
        let err = load_err(r#"{ "colors": {}, "prefix": "my colours" }"#);
        assert!(matches!(err, ConfigError::InvalidName { ref key, .. } if key == "prefix"));
    }

    #[test]
    fn foreground_variant_must_be_a_step() {
        let err = load_err(
            r#"{ "colors": {}, "contrast": {
                "threshold": 0.6,
                "textLightness": { "dark": 0.2, "light": 0.98 },
                "foregroundVariants": [550]
            } }"#,
        );
        assert!(matches!(err, ConfigError::InvalidStepLabel { ref label, .. } if label == "550"));
    }

    #[test]
    fn bad_colors_are_set_aside() {
        let config = load(
            r#"{ "colors": {
                "red": "oklch(62% 0.2 29)",
                "ghost": "var(--brand)",
                "glare": "oklch(120% 0.1 30)",
                "1st": "black"
            } }"#,
        );
        assert_eq!(config.colors.keys().collect::<Vec<_>>(), vec!["red"]);
        let mut names: Vec<&str> = config.rejected.iter().map(ScaleError::name).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["1st", "ghost", "glare"]);
        assert!(config.rejected.iter().any(|e| matches!(
            e,
            ScaleError::LightnessOutOfRange { name, .. } if name == "glare"
        )));
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("Balanced".parse::<ScaleMode>().ok(), Some(ScaleMode::Balanced));
        assert_eq!(" blend ".parse::<ScaleMode>().ok(), Some(ScaleMode::Blend));
        assert!(matches!("hybrid".parse::<ScaleMode>(), Err(ConfigError::UnknownMode(_))));
        assert_eq!(ScaleMode::Balanced.to_string(), "balanced");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("red"));
        assert!(is_identifier("brand-blue_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2tone"));
        assert!(!is_identifier("red green"));
        assert!(!is_identifier("-red"));
    }

    #[test]
    fn overrides_are_revalidated() {
        let mut config = PaletteConfig::new([("red", Color::oklch(0.62, 0.2, 29.0))]);
        assert!(config.validate().is_ok());
        config.prefix = "bad prefix".to_string();
        assert!(config.validate().is_err());
    }
}
