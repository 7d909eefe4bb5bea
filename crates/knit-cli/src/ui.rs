//! Terminal output: status messages and per-bundle summaries.
//!
//! Everything goes to stderr so a bundle piped to stdout stays clean.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use knit::{BundleOptions, BundleOutput};
use owo_colors::{OwoColorize, Stream};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Check if color output should be enabled.
///
/// Respects `NO_COLOR` and `FORCE_COLOR`, then falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply `--no-color`, `--quiet` and the environment to every later message.
pub fn init(no_color: bool, quiet: bool) {
    let enabled = !no_color && should_use_color();
    owo_colors::set_override(enabled);
    console::set_colors_enabled_stderr(enabled);
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn success(message: &str) {
    if quiet() {
        return;
    }
    eprintln!(
        "{} {}",
        "✓".if_supports_color(Stream::Stderr, |s| s.green()),
        message
    );
}

pub fn info(message: &str) {
    if quiet() {
        return;
    }
    eprintln!(
        "{} {}",
        "ℹ".if_supports_color(Stream::Stderr, |s| s.blue()),
        message
    );
}

pub fn warning(message: &str) {
    if quiet() {
        return;
    }
    eprintln!(
        "{} {}",
        "⚠".if_supports_color(Stream::Stderr, |s| s.yellow()),
        message.if_supports_color(Stream::Stderr, |s| s.yellow())
    );
}

/// Format file size in human-readable format.
///
/// ```
/// use knit_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// One line per bundle: output path, size, module count, dropped edges.
pub fn summary_line(target: &Path, output: &BundleOutput) -> String {
    format!(
        "{} ({}, {} modules, {} dropped edges)",
        target.display(),
        format_size(output.code.len()),
        output.modules.len(),
        output.dropped_edges()
    )
}

/// Print the summary for a written bundle, plus a warning per dropped edge.
pub fn print_bundle_summary(options: &BundleOptions, output: &BundleOutput) {
    for diagnostic in output.diagnostics.iter().filter(|d| d.is_problem()) {
        warning(&diagnostic.to_string());
    }
    success(&summary_line(&options.target, output));

    if let (Some(path), Some(minified)) = (&options.compress_target, &output.minified) {
        success(&format!("{} ({}, minified)", path.display(), format_size(minified.len())));
    }
}
