//! # tint-scale — palette scales and the contrast they buy you
//!
//! Turns a handful of base colors into ten-step OKLCH scales (100 … 900)
//! and tells you which steps are safe to put on top of each other.
//!
//! # Architecture
//!
//! ```text
//! palettes.config.json
//!     │
//!     ▼
//! config.rs:   parse + validate → PaletteConfig (per-color failures kept aside)
//!     │
//!     ▼
//! balance.rs:  (balanced mode) bisect for the lightness equidistant
//!     │        in contrast from black and white text
//!     ▼
//! scale.rs:    blend each base toward the tint/shade anchors → PaletteScale
//!     │
//!     ▼
//! contrast.rs: every step↔step and black/white↔step pairing that passes AA
//!     │
//!     ▼
//! css.rs:      :root custom properties + accessibility guidance comment
//! report.rs:   plain-text WCAG table for the terminal
//! ```
//!
//! # Failure model
//!
//! A broken configuration is a [`ConfigError`] and nothing is generated.
//! A broken *color* is a [`ScaleError`]: it is logged, recorded on the
//! [`Palette`], and every other color still generates.

// Mathematical code converts between small integers and floats.
#![allow(clippy::cast_precision_loss)]
// Lightness/chroma/hue variable names are inherently similar.
#![allow(clippy::similar_names)]

pub mod balance;
pub mod config;
pub mod contrast;
pub mod css;
pub mod error;
pub mod report;
pub mod scale;

pub use balance::{Balance, balanced_lightness};
pub use config::{Anchor, BalanceSettings, ContrastSettings, PaletteConfig, ScaleMode, ScaleSteps, TextLightness};
pub use contrast::{Contrast, Pairing, ReportSet, Swatch, analyze_group, classify};
pub use css::{read_css, render_css};
pub use error::{ConfigError, ConvergenceWarning, ScaleError};
pub use report::render_report;
pub use scale::{Palette, PaletteScale, generate_scale};
