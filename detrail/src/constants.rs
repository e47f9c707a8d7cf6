use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the dedicated configuration file.
pub const CONFIG_FILENAME: &str = ".detrail.toml";

/// Name of the standard Python project file that may carry a `[tool.detrail]` section.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// Rule code attached to every finding, and the code accepted in `# noqa:` comments.
pub const RULE_ID: &str = "DTR001";

/// Suppression comment markers.
///
/// A line containing any of these is skipped by the rewriter:
/// - `# pragma: no detrail` - explicit opt-out
/// - `# noqa: DTR` - standard Python linter format (matches `DTR001` too)
pub fn get_suppression_patterns() -> &'static [&'static str] {
    &["# pragma: no detrail", "# noqa: DTR"]
}

/// Regex for identifying test files.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_test_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(
            r"(?:^|[/\\])tests?[/\\]|(?:^|[/\\])test_[^/\\]+\.py$|[^/\\]+_test\.py$|conftest\.py$",
        )
        .expect("Invalid test file regex pattern")
    })
}

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("__pycache__");
        s.insert(".git");
        s.insert(".pytest_cache");
        s.insert(".mypy_cache");
        s.insert(".tox");
        s.insert("htmlcov");
        s.insert(".coverage");
        s.insert("build");
        s.insert("dist");
        s.insert("*.egg-info");
        s.insert("venv");
        s.insert(".venv");
        s
    })
}

/// Set of builtin function names supplied by the interpreter.
///
/// Builtins have no introspectable declaration in the analyzed sources, so a
/// call to one is never eligible for rewriting, even when a user-defined
/// function shadows the name somewhere in the project.
pub fn get_python_builtins() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "abs",
            "aiter",
            "all",
            "anext",
            "any",
            "ascii",
            "bin",
            "bool",
            "breakpoint",
            "bytearray",
            "bytes",
            "callable",
            "chr",
            "classmethod",
            "compile",
            "complex",
            "delattr",
            "dict",
            "dir",
            "divmod",
            "enumerate",
            "eval",
            "exec",
            "exit",
            "filter",
            "float",
            "format",
            "frozenset",
            "getattr",
            "globals",
            "hasattr",
            "hash",
            "help",
            "hex",
            "id",
            "input",
            "int",
            "isinstance",
            "issubclass",
            "iter",
            "len",
            "list",
            "locals",
            "map",
            "max",
            "memoryview",
            "min",
            "next",
            "object",
            "oct",
            "open",
            "ord",
            "pow",
            "print",
            "property",
            "quit",
            "range",
            "repr",
            "reversed",
            "round",
            "set",
            "setattr",
            "slice",
            "sorted",
            "staticmethod",
            "str",
            "sum",
            "super",
            "tuple",
            "type",
            "vars",
            "zip",
            "__import__",
        ]
        .into_iter()
        .collect()
    })
}
