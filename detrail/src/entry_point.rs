use crate::cli::Cli;
use crate::config::Config;
use crate::engine::Detrail;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Runs the rewriter with the given arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run detrail with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["detrail".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured by redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    let paths: Vec<PathBuf> = if let Some(root) = cli_var.paths.root.clone() {
        vec![root]
    } else if cli_var.paths.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli_var.paths.paths.clone()
    };

    for path in &paths {
        if !path.exists() {
            eprintln!(
                "Error: The file or directory '{}' does not exist.",
                path.display()
            );
            return Ok(1);
        }
    }

    // Load config from the first path's directory, traversing up
    let config = Config::load_from_path(&paths[0]);

    let include_tests = cli_var.include_tests || config.detrail.include_tests.unwrap_or(false);

    let mut exclude_folders = config.detrail.exclude_folders.clone().unwrap_or_default();
    exclude_folders.extend(cli_var.exclude_folders.clone());

    let mut include_folders = config.detrail.include_folders.clone().unwrap_or_default();
    include_folders.extend(cli_var.include_folders.clone());

    if cli_var.output.verbose && !cli_var.output.json {
        eprintln!("[VERBOSE] detrail v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Using {} threads", rayon::current_num_threads());
        eprintln!("[VERBOSE] Configuration:");
        if let Some(config_path) = &config.config_file_path {
            eprintln!("   Config file: {}", config_path.display());
        }
        eprintln!("   Mode: {}", if cli_var.apply { "apply" } else { "preview" });
        eprintln!("   Include tests: {include_tests}");
        eprintln!("   Paths: {paths:?}");
        if !exclude_folders.is_empty() {
            eprintln!("   Exclude folders: {exclude_folders:?}");
        }
        eprintln!();
    }

    let mut engine = Detrail::new(
        include_tests,
        exclude_folders,
        include_folders,
        config.clone(),
    );
    engine.verbose = cli_var.output.verbose;

    // Count files first to create a progress bar with an accurate total
    let total_files = engine.count_files(&paths);
    let progress: Option<indicatif::ProgressBar> = if cli_var.output.json || cli_var.output.quiet {
        None
    } else if total_files > 0 {
        Some(crate::output::create_progress_bar(total_files as u64))
    } else {
        Some(crate::output::create_spinner())
    };
    engine.progress_bar = progress.clone().map(std::sync::Arc::new);

    let start_time = std::time::Instant::now();
    let result = engine.analyze_paths(&paths);

    if let Some(p) = progress {
        p.finish_and_clear();
    }

    if cli_var.output.verbose && !cli_var.output.json {
        let elapsed = start_time.elapsed();
        eprintln!(
            "[VERBOSE] Analysis completed in {:.2}s",
            elapsed.as_secs_f64()
        );
        eprintln!("   Files analyzed: {}", result.summary.total_files);
        eprintln!("   Lines analyzed: {}", result.summary.total_lines);
        eprintln!("   Parse errors: {}", result.parse_errors.len());
        eprintln!();
    }

    if cli_var.output.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        if cli_var.output.quiet {
            crate::output::print_report_quiet(writer, &result)?;
        } else {
            crate::output::print_report(writer, &result)?;
        }
        crate::output::print_summary(writer, &result)?;
    }

    if cli_var.apply {
        let mut applied = 0usize;
        for rewrite in &result.files {
            if let Some(text) = &rewrite.rewritten {
                std::fs::write(&rewrite.file, text)?;
                applied += 1;
            }
        }
        if !cli_var.output.json {
            writeln!(
                writer,
                "\n[APPLY] Rewrote {applied} file(s), removed {} argument(s)",
                result.summary.arguments_removable
            )?;
        }
    }

    if !cli_var.output.json {
        let elapsed = start_time.elapsed();
        writeln!(
            writer,
            "\n[TIME] Completed in {:.2}s",
            elapsed.as_secs_f64()
        )?;
    }

    if cli_var.check {
        if result.summary.files_with_changes > 0 {
            if !cli_var.output.json {
                eprintln!(
                    "\n[GATE] {} file(s) would change - FAILED",
                    result.summary.files_with_changes
                );
            }
            return Ok(1);
        }
        if !cli_var.output.json {
            writeln!(writer, "\n[GATE] No pending rewrites - PASSED")?;
        }
    }

    Ok(0)
}
