//! Core library for the detrail refactoring tool.
//!
//! detrail removes trailing positional arguments that exactly repeat the
//! declared default value of their parameter, turning `f(5, 2)` into `f(5)`
//! when `f` is declared as `def f(a, b=2)`. Removal is restricted to a
//! trailing run of arguments: dropping an interior argument would shift the
//! positional binding of everything after it.

// Allow common complexity warnings - these are intentional design choices
#![allow(
    clippy::type_complexity,
    clippy::too_many_arguments,
    clippy::similar_names,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the call-site data contracts.
/// This includes `CallSite`, `Callee`, `CallArg`, and `RemovalPlan`.
pub mod call;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module containing the per-file rule driver.
/// This walks a parsed module and turns removal plans into source edits.
pub mod driver;

/// Module containing the analysis engine.
/// This includes the `Detrail` struct and its methods for running the rewrite.
pub mod engine;

/// Module defining the entry point logic shared by all binaries.
pub mod entry_point;

/// Module containing the byte-range rewriting infrastructure.
pub mod fix;

/// Module for rich CLI output formatting with colored text and spinners.
pub mod output;

/// Module containing the trailing-default-argument rule itself.
/// This includes the eligibility gate and the removal planner.
pub mod rule;

/// Module containing the signature index.
/// This maps call targets to their declared parameter defaults.
pub mod signatures;

/// Module containing utility functions.
pub mod utils;

/// Module defining the lowered expression values compared against defaults.
pub mod value;
