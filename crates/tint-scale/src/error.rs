//! Error and diagnostic types for palette generation.
//!
//! Three tiers:
//!
//! - [`ConfigError`]: the configuration as a whole is unusable. Fatal.
//! - [`ScaleError`]: one color cannot be generated. That color is skipped
//!   and reported; the others still generate.
//! - [`ConvergenceWarning`]: the midpoint search ran out of iterations.
//!   The best estimate is used and the warning travels with the result.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tint_color::ParseError;

/// The configuration cannot be used at all.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config is not valid JSON, or has the wrong shape.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required section is absent.
    #[error("config is missing the `{0}` section")]
    MissingSection(&'static str),

    /// A numeric value lies outside its allowed range.
    #[error("`{key}` = {value} is outside {range}")]
    OutOfRange {
        key: String,
        value: f64,
        range: &'static str,
    },

    /// The tint anchor must be lighter than the shade anchor.
    #[error("`tintTarget.lightness` ({tint}) must be greater than `shadeTarget.lightness` ({shade})")]
    InvertedAnchors { tint: f64, shade: f64 },

    /// Step labels do not run tint → base → shade in increasing order.
    #[error("step labels must increase from tint steps through step {base} to shade steps: {detail}")]
    NonIncreasingSteps { base: u32, detail: String },

    /// A step label appears twice in one table (e.g. `"100"` and `"0100"`).
    #[error("`{key}` lists step {label} more than once")]
    DuplicateStep { key: String, label: u32 },

    /// Interpolation factors do not grow away from the base step.
    #[error("`scaleSteps.{section}` factors must grow away from the base step, but step {label} breaks the order")]
    NonMonotonicFactors { section: &'static str, label: u32 },

    /// A step label is not a non-negative integer, or names an unknown step.
    #[error("`{key}`: \"{label}\" is not a configured numeric step label")]
    InvalidStepLabel { key: String, label: String },

    /// A name contains characters that cannot appear in a custom property.
    #[error("`{key}`: \"{name}\" is not a valid name (ASCII letters, digits, `-`, `_`)")]
    InvalidName { key: String, name: String },

    /// A surface token does not parse.
    #[error("`surfaces.{name}`: {source}")]
    Surface {
        name: String,
        #[source]
        source: ParseError,
    },

    /// A surface and a color would write the same custom property.
    #[error("`{name}` is configured both as a surface and as a color")]
    NameClash { name: String },

    /// The scale mode is not recognized.
    #[error("unknown scale mode \"{0}\" (expected `blend` or `balanced`)")]
    UnknownMode(String),
}

/// One color could not be generated. Always names the color.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// The configured base color does not parse.
    #[error("`colors.{name}`: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    /// The color name cannot be used in a custom property.
    #[error("`colors.{name}`: not a valid color name (start with a letter; ASCII letters, digits, `-`, `_`)")]
    InvalidName { name: String },

    /// Base lightness lies outside `[0, 1]`.
    #[error("`colors.{name}`: lightness {lightness} is outside [0, 1]")]
    LightnessOutOfRange { name: String, lightness: f64 },

    /// The scale center is not strictly between the two anchors, so tints
    /// would not be lighter (or shades darker) than the base.
    #[error(
        "`colors.{name}`: lightness {lightness:.5} must lie strictly between the shade target ({shade}) and the tint target ({tint})"
    )]
    OutsideAnchors {
        name: String,
        lightness: f64,
        shade: f64,
        tint: f64,
    },

    /// Rounding collapsed two steps onto the same lightness.
    #[error("`colors.{name}`: steps {upper} and {lower} do not decrease in lightness")]
    NonMonotonic { name: String, upper: u32, lower: u32 },
}

impl ScaleError {
    /// The color this error belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Parse { name, .. }
            | Self::InvalidName { name }
            | Self::LightnessOutOfRange { name, .. }
            | Self::OutsideAnchors { name, .. }
            | Self::NonMonotonic { name, .. } => name,
        }
    }
}

/// The midpoint search stopped before reaching its tolerance.
///
/// Non-fatal: the scale was generated around the best lightness found.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceWarning {
    pub name: String,
    /// Best lightness found.
    pub lightness: f64,
    /// `|contrast vs white − contrast vs black|` at that lightness.
    pub difference: f64,
    pub tolerance: f64,
    pub iterations: u32,
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`colors.{}`: midpoint search stopped after {} iterations at lightness {:.5} \
             (contrast gap {:.4} > tolerance {})",
            self.name, self.iterations, self.lightness, self.difference, self.tolerance
        )
    }
}
