use crate::engine::AnalysisResult;
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Create and return a spinner (used when the file count is unknown).
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_spinner() -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("detrail scanning call sites…");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Create a progress bar with file count (used when total files is known).
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Print the findings table and any parse warnings.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    if result.files.is_empty() {
        writeln!(
            writer,
            "{}",
            "[OK] No redundant trailing arguments found.".green()
        )?;
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Location")
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan),
                Cell::new("Call")
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan),
                Cell::new("Removable")
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan),
            ]);

        for finding in result.findings() {
            table.add_row(vec![
                Cell::new(format!(
                    "{}:{}:{}",
                    normalize_display_path(&finding.file),
                    finding.line,
                    finding.col
                )),
                Cell::new(&finding.callee),
                Cell::new(finding.removable.to_string()),
            ]);
        }

        writeln!(writer, "{table}")?;
    }

    print_parse_warnings(writer, result)?;
    Ok(())
}

/// Print only the summary (quiet mode).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report_quiet(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    print_parse_warnings(writer, result)
}

fn print_parse_warnings(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    for report in &result.parse_errors {
        writeln!(
            writer,
            "{} {} {}",
            "[WARN] skipped".yellow(),
            normalize_display_path(&report.file),
            report.error.dimmed()
        )?;
    }
    Ok(())
}

/// Print the `[SUMMARY]` trailer line.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(
        writer,
        "\n[SUMMARY] {} file(s) analyzed, {} file(s) with redundant trailing arguments, {} argument(s) removable",
        result.summary.total_files,
        result.summary.files_with_changes,
        result.summary.arguments_removable
    )
}
