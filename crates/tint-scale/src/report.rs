//! Plain-text WCAG tables for the terminal.
//!
//! Cells are padded by display width, not by `char` count, so the ✅/❌
//! marks (two columns wide) stay aligned with the ASCII around them.

use unicode_width::UnicodeWidthStr;

use crate::contrast::{Pairing, ReportSet};

const HEADER: [&str; 5] = ["Text", "Background", "Contrast", "WCAG AA", "WCAG AAA"];

const fn mark(pass: bool) -> &'static str {
    if pass { "✅" } else { "❌" }
}

/// Render one scale's report as a titled table, step pairs first, then
/// black/white text.
#[must_use]
pub fn render_report(name: &str, report: &ReportSet) -> String {
    let mut out = format!("{}\n", name.to_uppercase());
    if report.is_empty() {
        out.push_str("  no combination meets WCAG AA\n");
        return out;
    }

    let rows: Vec<[String; 5]> = report.iter().map(row).collect();

    let mut widths = HEADER.map(UnicodeWidthStr::width);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width());
        }
    }

    push_row(&mut out, &HEADER, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for cells in &rows {
        push_row(&mut out, cells, &widths);
    }
    out
}

fn row(pairing: &Pairing) -> [String; 5] {
    [
        pairing.foreground.to_string(),
        pairing.background.to_string(),
        format!("{:.2}:1", pairing.contrast.ratio),
        mark(pairing.contrast.meets_aa).to_string(),
        mark(pairing.contrast.meets_aaa).to_string(),
    ]
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| pad(cell.as_ref(), width))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Left-align `text` in a column `width` terminal cells wide.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}
