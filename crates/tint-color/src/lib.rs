// SPDX-License-Identifier: MIT
//
// tint-color — the color model underneath tint's palette generator.
//
// Colors live in OKLCH because that is where palette scales are built:
// equal steps in lightness look like equal steps to a human. Contrast is a
// different matter. WCAG defines it on sRGB relative luminance, so every
// color also knows how to get down to an 8-bit sRGB triple through a
// fixed, deliberately simple Lab-style approximation. Keeping that
// approximation stable is what keeps AA/AAA classifications stable from
// one run to the next. Going the other way, hex/rgb()/hsl() inputs are
// lifted into OKLCH with the real Oklab matrices, so a parsed `#808080` is
// a true grey.

// Mathematical code converts between small integers and floats.
#![allow(clippy::cast_precision_loss)]
// Lightness/chroma/hue variable names are inherently similar.
#![allow(clippy::similar_names)]

pub mod color;
pub mod error;
pub mod parse;

pub use color::{Color, Rgb, TextTone, contrast_ratio, contrasting_tone, relative_luminance};
pub use error::ParseError;
