// SPDX-License-Identifier: MIT
//
// tint — OKLCH palette scales with WCAG contrast checks.
//
// This is the binary that wires the two crates together:
//
//   tint-color → OKLCH values, parsing, sRGB approximation, luminance
//   tint-scale → config, scale generation, pairing analysis, CSS
//
// Two subcommands:
//
//   palettes.config.json ─► tint generate ─► palettes.generated.css
//                                         └► report on stdout (--report)
//
//   palettes.generated.css ─► tint check ─► report on stdout
//
// Exit code 1 on anything fatal: unreadable or invalid config, nothing
// generated, unreadable stylesheet. Skipped colors are warnings, not
// failures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use tint_scale::config::{DEFAULT_PREFIX, PaletteConfig, ScaleMode};
use tint_scale::{Palette, PaletteScale, ReportSet, analyze_group, read_css, render_css, render_report};

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tint", version, about = "OKLCH palette scales with WCAG contrast checks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate CSS custom properties from a palette config.
    Generate(GenerateArgs),
    /// Print the WCAG pairing report for a generated stylesheet.
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Palette config (JSON).
    #[arg(short, long, env = "TINT_CONFIG", default_value = "palettes.config.json")]
    config: PathBuf,

    /// Stylesheet to write.
    #[arg(short, long, env = "TINT_OUT", default_value = "palettes.generated.css")]
    out: PathBuf,

    /// Custom property prefix, overriding the config.
    #[arg(long)]
    prefix: Option<String>,

    /// Scale mode (`blend` or `balanced`), overriding the config.
    #[arg(long)]
    mode: Option<ScaleMode>,

    /// Also print the contrast report.
    #[arg(long)]
    report: bool,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Generated stylesheet to analyze.
    css: PathBuf,

    /// Custom property prefix the stylesheet was generated with.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,
}

// ─── Subcommands ────────────────────────────────────────────────────────────

/// Run a subcommand and return what it prints on stdout.
fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Generate(args) => generate(args),
        Command::Check(args) => check(args),
    }
}

fn generate(args: &GenerateArgs) -> Result<String> {
    let mut config = PaletteConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    if let Some(prefix) = &args.prefix {
        config.prefix.clone_from(prefix);
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    config.validate().context("invalid command-line override")?;

    let palette = Palette::generate(&config);
    if palette.scales.is_empty() {
        bail!(
            "no scales generated from {} ({} color(s) skipped)",
            args.config.display(),
            palette.failures.len()
        );
    }

    let reports = reports_for(&palette.scales);
    let css = render_css(&palette, &config, &reports);
    write_file(&args.out, &css)?;
    log::info!(
        "wrote {} ({} scale(s), {} mode)",
        args.out.display(),
        palette.scales.len(),
        config.mode
    );

    Ok(if args.report { render_reports(&reports) } else { String::new() })
}

fn check(args: &CheckArgs) -> Result<String> {
    let text = fs::read_to_string(&args.css).with_context(|| format!("reading {}", args.css.display()))?;
    let scales = read_css(&text, &args.prefix).context("building the property pattern")?;
    if scales.is_empty() {
        bail!(
            "no `--{}-<name>-<step>` properties found in {}",
            args.prefix,
            args.css.display()
        );
    }
    log::info!("checking {} scale(s) from {}", scales.len(), args.css.display());
    Ok(render_reports(&reports_for(&scales)))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn reports_for(scales: &BTreeMap<String, PaletteScale>) -> BTreeMap<String, ReportSet> {
    scales
        .iter()
        .map(|(name, scale)| (name.clone(), analyze_group(scale)))
        .collect()
}

fn render_reports(reports: &BTreeMap<String, ReportSet>) -> String {
    reports
        .iter()
        .map(|(name, report)| render_report(name, report))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("tint: {e:#}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
