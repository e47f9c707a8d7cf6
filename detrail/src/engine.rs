//! Analysis engine.
//!
//! Owns file discovery and the per-file rewrite pipeline: parse, index the
//! module's signatures, drive the rule, apply the edits. Files are processed
//! in parallel; each file's tree is owned by exactly one worker, and nothing
//! is shared between files beyond the immutable configuration.

use crate::config::Config;
use crate::driver::{Finding, RuleDriver};
use crate::fix::ByteRangeRewriter;
use crate::signatures::SignatureIndex;
use crate::utils::{self, LineIndex};
use rayon::prelude::*;
use ruff_python_parser::parse_module;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The rewrite computed for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRewrite {
    /// The file the rewrite belongs to.
    pub file: PathBuf,
    /// One finding per rewritable call.
    pub findings: Vec<Finding>,
    /// Total number of removable arguments across the file.
    pub arguments_removable: usize,
    /// The rewritten source, `None` when the file is already clean.
    #[serde(skip)]
    pub rewritten: Option<String>,
}

impl FileRewrite {
    fn clean(file: PathBuf) -> Self {
        Self {
            file,
            findings: Vec::new(),
            arguments_removable: 0,
            rewritten: None,
        }
    }

    /// Whether applying this rewrite would change the file.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.rewritten.is_some()
    }
}

/// A file that could not be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct ParseErrorReport {
    /// The offending file.
    pub file: PathBuf,
    /// Parser or I/O error message.
    pub error: String,
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisSummary {
    /// Number of files analyzed.
    pub total_files: usize,
    /// Number of source lines analyzed.
    pub total_lines: usize,
    /// Number of files with at least one rewritable call.
    pub files_with_changes: usize,
    /// Total number of removable arguments.
    pub arguments_removable: usize,
}

/// Result of analyzing a set of paths.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisResult {
    /// Rewrites for the files that would change. Clean files are only
    /// counted in the summary.
    pub files: Vec<FileRewrite>,
    /// Files skipped because they could not be parsed or read.
    pub parse_errors: Vec<ParseErrorReport>,
    /// Aggregate counters.
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// All findings across all files, in file order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(|f| f.findings.iter())
    }
}

enum FileOutcome {
    Analyzed { lines: usize, rewrite: FileRewrite },
    Failed(ParseErrorReport),
}

/// The main engine struct.
/// Configuration options for the rewrite are stored here.
pub struct Detrail {
    /// Whether to include test files found during directory traversal.
    pub include_tests: bool,
    /// Folders to exclude from analysis.
    pub exclude_folders: Vec<String>,
    /// Folders to force-include in analysis (overrides default exclusions).
    pub include_folders: Vec<String>,
    /// Whether to emit verbose diagnostics.
    pub verbose: bool,
    /// Progress bar for tracking analysis progress (thread-safe).
    pub progress_bar: Option<std::sync::Arc<indicatif::ProgressBar>>,
    /// Configuration object.
    pub config: Config,
}

impl Default for Detrail {
    fn default() -> Self {
        Self {
            include_tests: false,
            exclude_folders: Vec::new(),
            include_folders: Vec::new(),
            verbose: false,
            progress_bar: None,
            config: Config::default(),
        }
    }
}

impl Detrail {
    /// Creates a new engine instance with the given configuration.
    #[must_use]
    pub fn new(
        include_tests: bool,
        exclude_folders: Vec<String>,
        include_folders: Vec<String>,
        config: Config,
    ) -> Self {
        Self {
            include_tests,
            exclude_folders,
            include_folders,
            verbose: false,
            progress_bar: None,
            config,
        }
    }

    /// Number of files the given paths would resolve to.
    #[must_use]
    pub fn count_files(&self, paths: &[PathBuf]) -> usize {
        self.collect_files(paths).len()
    }

    /// Runs the rewrite on multiple paths (files or directories).
    #[must_use]
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> AnalysisResult {
        let files = self.collect_files(paths);

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| {
                let outcome = self.process_file(path);
                if let Some(progress) = &self.progress_bar {
                    progress.inc(1);
                }
                outcome
            })
            .collect();

        let mut result = AnalysisResult::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed { lines, rewrite } => {
                    result.summary.total_files += 1;
                    result.summary.total_lines += lines;
                    if rewrite.is_changed() {
                        result.summary.files_with_changes += 1;
                        result.summary.arguments_removable += rewrite.arguments_removable;
                        result.files.push(rewrite);
                    }
                }
                FileOutcome::Failed(report) => result.parse_errors.push(report),
            }
        }

        // par_iter preserves order, but sort anyway so output stays stable
        // across path-list permutations.
        result.files.sort_by(|a, b| a.file.cmp(&b.file));
        result
    }

    /// Computes the rewrite for one source text.
    ///
    /// # Errors
    ///
    /// Returns a report when the source does not parse; the caller leaves the
    /// file untouched in that case.
    pub fn rewrite_source(&self, source: &str, path: &Path) -> Result<FileRewrite, ParseErrorReport> {
        let parsed = match parse_module(source) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(ParseErrorReport {
                    file: path.to_path_buf(),
                    error: format!("Failed to parse file: {err}"),
                });
            }
        };
        let module = parsed.into_syntax();

        let index = SignatureIndex::build(&module.body);
        let line_index = LineIndex::new(source);
        let ignored_lines = utils::get_ignored_lines(source);

        let outcome =
            RuleDriver::new(&index, &line_index, &ignored_lines, path).drive(&module.body);
        if outcome.edits.is_empty() {
            return Ok(FileRewrite::clean(path.to_path_buf()));
        }

        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edits(outcome.edits);
        match rewriter.apply() {
            Ok(rewritten) => {
                let arguments_removable = outcome.findings.iter().map(|f| f.removable).sum();
                Ok(FileRewrite {
                    file: path.to_path_buf(),
                    findings: outcome.findings,
                    arguments_removable,
                    rewritten: Some(rewritten),
                })
            }
            // Incomplete information degrades to "no change", never to a
            // guessed removal.
            Err(_) => Ok(FileRewrite::clean(path.to_path_buf())),
        }
    }

    fn process_file(&self, path: &Path) -> FileOutcome {
        if self.verbose {
            eprintln!("[VERBOSE] analyzing {}", path.display());
        }
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                return FileOutcome::Failed(ParseErrorReport {
                    file: path.to_path_buf(),
                    error: format!("Failed to read file: {err}"),
                })
            }
        };

        match self.rewrite_source(&source, path) {
            Ok(rewrite) => FileOutcome::Analyzed {
                lines: source.lines().count(),
                rewrite,
            },
            Err(report) => FileOutcome::Failed(report),
        }
    }

    /// Resolves CLI paths to the list of files to analyze.
    ///
    /// Explicitly named files are always analyzed; the test-file filter only
    /// applies to files found by directory traversal.
    fn collect_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_file() {
                if path.extension().is_some_and(|ext| ext == "py") {
                    files.push(path.clone());
                }
            } else if path.is_dir() {
                let mut walked = utils::collect_python_files(
                    path,
                    &self.exclude_folders,
                    &self.include_folders,
                );
                if !self.include_tests {
                    walked.retain(|p| !utils::is_test_path(&p.to_string_lossy()));
                }
                files.extend(walked);
            }
        }
        files.sort();
        files.dedup();
        files
    }
}
