use clap::{Args, Parser};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.detrail.toml):
  Create this file in your project root to set defaults.
  The same keys work under [tool.detrail] in pyproject.toml.

  [detrail]
  include_tests = false      # Rewrite test files too
  exclude_folders = [\"build\", \"dist\", \".venv\"]
  include_folders = [\"src\"]  # Force-include these

SUPPRESSION:
  Append '# noqa: DTR001' or '# pragma: no detrail' to a line to keep
  an explicit argument that repeats the default.
";

/// Shared path arguments (mutually exclusive paths/root).
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Paths to rewrite (files or directories).
    /// Can be a single directory, multiple files, or a mix of both.
    /// When no paths are provided, defaults to the current directory.
    /// Cannot be used with --root.
    #[arg(conflicts_with = "root")]
    pub paths: Vec<PathBuf>,

    /// Project root to rewrite.
    /// Use this instead of positional paths when running from a different
    /// directory. Cannot be used together with positional path arguments.
    #[arg(long, conflicts_with = "paths")]
    pub root: Option<PathBuf>,
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (shows configuration and timing).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the summary (no findings table).
    #[arg(long)]
    pub quiet: bool,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "detrail - Remove trailing call arguments that repeat the declared defaults",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Global path options (paths vs root).
    #[command(flatten)]
    pub paths: PathArgs,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Apply the rewrites to files.
    /// Without this flag, detrail only previews what would be changed.
    #[arg(short = 'a', long)]
    pub apply: bool,

    /// Exit with code 1 if any file would change (for CI).
    /// Implies preview mode.
    #[arg(long, conflicts_with = "apply")]
    pub check: bool,

    /// Include test files found during directory traversal.
    #[arg(long)]
    pub include_tests: bool,

    /// Folders to exclude from analysis.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Folders to force-include in analysis (overrides default exclusions).
    #[arg(long, alias = "include-folder")]
    pub include_folders: Vec<String>,
}
