//! CSS custom property output, and reading it back.
//!
//! Output is byte-reproducible: colors are rounded before formatting,
//! scales and steps come out of `BTreeMap`s, and nothing time-dependent
//! goes into the header.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regex::Regex;
use tint_color::{Color, TextTone, contrasting_tone};

use crate::config::PaletteConfig;
use crate::contrast::{AA_THRESHOLD, AAA_THRESHOLD, ReportSet};
use crate::scale::{Palette, PaletteScale, foreground};

/// Strongest step pairs listed per color in the guidance comment.
const GUIDANCE_PAIRS: usize = 3;

/// Render the generated stylesheet.
///
/// `reports` is keyed by color name; colors without a report simply get
/// no pairing lines in the guidance comment.
#[must_use]
pub fn render_css(palette: &Palette, config: &PaletteConfig, reports: &BTreeMap<String, ReportSet>) -> String {
    Stylesheet { palette, config, reports }.to_string()
}

struct Stylesheet<'a> {
    palette: &'a Palette,
    config: &'a PaletteConfig,
    reports: &'a BTreeMap<String, ReportSet>,
}

impl fmt::Display for Stylesheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/* AUTO-GENERATED FILE. Do not edit directly.")?;
        writeln!(f, " * Generated by tint ({} mode).", self.config.mode)?;
        writeln!(f, " */")?;
        writeln!(f)?;
        writeln!(f, ":root {{")?;
        self.write_properties(f)?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        self.write_guidance(f)
    }
}

impl Stylesheet<'_> {
    fn write_properties(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = &self.config.prefix;

        for (name, color) in &self.config.surfaces {
            writeln!(f, "  --{prefix}-{name}: {color};")?;
        }

        for (i, (name, scale)) in self.palette.scales.iter().enumerate() {
            if i > 0 || !self.config.surfaces.is_empty() {
                writeln!(f)?;
            }
            if let Some(base) = self.config.colors.get(name) {
                writeln!(f, "  --{prefix}-{name}: {};", base.round())?;
            }
            for (label, color) in scale.iter() {
                writeln!(f, "  --{prefix}-{name}-{label}: {color};")?;
            }
        }

        let Some(settings) = &self.config.contrast else {
            return Ok(());
        };
        let variants: Vec<(&String, u32, Color)> = self
            .palette
            .scales
            .iter()
            .flat_map(move |(name, scale)| {
                settings
                    .foreground_variants
                    .iter()
                    .filter_map(move |&label| scale.get(label).map(|step| (name, label, step)))
            })
            .collect();
        if !variants.is_empty() {
            writeln!(f)?;
        }
        for (name, label, step) in variants {
            writeln!(f, "  --{prefix}-{name}-{label}-foreground: {};", foreground(step, settings))?;
        }
        Ok(())
    }

    fn write_guidance(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/*")?;
        writeln!(f, " * CONTRAST & ACCESSIBILITY GUIDANCE")?;
        writeln!(f, " * WCAG 2.1, normal text: AA needs {AA_THRESHOLD}:1, AAA needs {AAA_THRESHOLD}:1.")?;

        for (name, scale) in &self.palette.scales {
            writeln!(f, " *")?;
            writeln!(f, " * {name}")?;

            if let Some(report) = self.reports.get(name) {
                if report.pairs.is_empty() {
                    writeln!(f, " *   no step pair meets AA")?;
                }
                for pair in report.pairs.iter().take(GUIDANCE_PAIRS) {
                    let level = if pair.contrast.meets_aaa { "AAA" } else { "AA" };
                    writeln!(
                        f,
                        " *   {} on {}: {:.2}:1 ({level})",
                        pair.foreground, pair.background, pair.contrast.ratio
                    )?;
                }
            }

            let (mut black, mut white) = (Vec::new(), Vec::new());
            for (label, color) in scale.iter() {
                match contrasting_tone(color) {
                    TextTone::Black => black.push(label.to_string()),
                    TextTone::White => white.push(label.to_string()),
                }
            }
            writeln!(
                f,
                " *   text: black on {}; white on {}",
                list_or_none(&black),
                list_or_none(&white)
            )?;
        }
        writeln!(f, " */")
    }
}

fn list_or_none(labels: &[String]) -> String {
    if labels.is_empty() { "none".to_string() } else { labels.join(", ") }
}

/// Read `--<prefix>-<name>-<step>: oklch(...)` declarations back into
/// scales.
///
/// Base (`--<prefix>-<name>`) and `-foreground` properties are not steps
/// and are skipped. A base property like `--colour-brand-2` looks exactly
/// like step 2 of `brand`; when a scale named `brand-2` exists, it is
/// taken as that scale's base. Declarations whose value does not parse
/// are logged and skipped.
///
/// # Errors
///
/// Only if the property pattern for `prefix` fails to compile.
pub fn read_css(text: &str, prefix: &str) -> Result<BTreeMap<String, PaletteScale>, regex::Error> {
    let property = Regex::new(&format!(
        r"^\s*--{}-([A-Za-z][A-Za-z0-9_-]*?)-(\d+)\s*:\s*(oklch\([^)]*\))\s*;",
        regex::escape(prefix)
    ))?;

    let mut steps: BTreeMap<String, BTreeMap<u32, Color>> = BTreeMap::new();
    for line in text.lines() {
        let Some(caps) = property.captures(line) else {
            continue;
        };
        let name = &caps[1];
        let Ok(label) = caps[2].parse::<u32>() else {
            log::warn!("--{prefix}-{name}-{}: step label out of range", &caps[2]);
            continue;
        };
        match Color::parse(&caps[3]) {
            Ok(color) => {
                steps.entry(name.to_string()).or_default().insert(label, color);
            }
            Err(err) => log::warn!("--{prefix}-{name}-{label}: {err}"),
        }
    }

    let names: BTreeSet<String> = steps.keys().cloned().collect();
    for (name, labels) in &mut steps {
        labels.retain(|label, _| !names.contains(&format!("{name}-{label}")));
    }
    steps.retain(|_, labels| !labels.is_empty());

    log::debug!("read {} scale(s) with prefix `{prefix}`", steps.len());
    Ok(steps
        .into_iter()
        .map(|(name, steps)| (name, PaletteScale::from_steps(steps)))
        .collect())
}
