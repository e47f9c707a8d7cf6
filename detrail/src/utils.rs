use crate::constants::{get_default_exclude_folders, get_suppression_patterns, get_test_file_re};
use ruff_text_size::TextSize;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Maps byte offsets to line and column numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed column number.
    #[must_use]
    pub fn column_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        };
        offset - self.line_starts[line - 1] + 1
    }
}

/// Detects lines with suppression comments.
///
/// Returns a set of line numbers (1-indexed) whose call expressions should be
/// left untouched. This allows users to keep an explicit argument that happens
/// to repeat the default, e.g. for readability at a confusing call site.
#[must_use]
pub fn get_ignored_lines(source: &str) -> FxHashSet<usize> {
    let patterns = get_suppression_patterns();
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| patterns.iter().any(|pattern| line.contains(pattern)))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Checks if a path is a test path.
#[must_use]
pub fn is_test_path(p: &str) -> bool {
    get_test_file_re().is_match(p)
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    for exclude in excludes {
        if exclude.starts_with("*.") {
            if name.ends_with(&exclude[1..]) {
                return true;
            }
        } else if name == exclude {
            return true;
        }
    }
    false
}

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use detrail::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new("./src/api.py")), "src/api.py");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Collects Python files under a root directory, honoring `.gitignore` files
/// and folder exclusion patterns.
///
/// `exclude` extends the default exclusion list; `include` removes folders
/// from it again (force-include).
#[must_use]
pub fn collect_python_files(root: &Path, exclude: &[String], include: &[String]) -> Vec<PathBuf> {
    use ignore::WalkBuilder;

    // Merge user excludes with default excludes
    let default_excludes: Vec<String> = get_default_exclude_folders()
        .iter()
        .map(|&s| s.to_owned())
        .collect();
    let mut all_excludes: Vec<String> = exclude.iter().cloned().chain(default_excludes).collect();

    // Remove force-included folders from exclusion list
    all_excludes.retain(|ex| !include.iter().any(|inc| ex == inc));

    let excludes_for_filter = all_excludes.clone();
    let root_for_filter = root.to_path_buf();

    // Use ignore crate's WalkBuilder for gitignore support.
    // filter_entry skips excluded directories at traversal time, preventing
    // descent into node_modules, .venv, etc.
    let walker = WalkBuilder::new(root)
        .hidden(false) // Don't skip hidden files (we handle that with defaults)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            // Always allow the root directory
            if entry.path() == root_for_filter {
                return true;
            }

            // Only filter directories - files are filtered by extension below
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            if let Some(name) = entry.file_name().to_str() {
                if is_excluded(name, &excludes_for_filter) {
                    return false;
                }
            }

            true
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        if let Ok(entry) = result {
            let path = entry.path();
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }
            if path.extension().is_some_and(|ext| ext == "py") {
                files.push(path.to_path_buf());
            }
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn line_and_column_mapping() {
        let index = LineIndex::new("a = 1\nbb = 2\n");
        assert_eq!(index.line_index(TextSize::new(0)), 1);
        assert_eq!(index.line_index(TextSize::new(6)), 2);
        assert_eq!(index.column_index(TextSize::new(6)), 1);
        assert_eq!(index.column_index(TextSize::new(9)), 4);
    }

    #[test]
    fn suppression_comments_are_detected() {
        let source = "f(1, 2)\nf(1, 2)  # noqa: DTR001\nf(1, 2)  # pragma: no detrail\n";
        let ignored = get_ignored_lines(source);
        assert!(!ignored.contains(&1));
        assert!(ignored.contains(&2));
        assert!(ignored.contains(&3));
    }

    #[test]
    fn exclusion_patterns() {
        let excludes = vec!["build".to_owned(), "*.egg-info".to_owned()];
        assert!(is_excluded("build", &excludes));
        assert!(is_excluded("pkg.egg-info", &excludes));
        assert!(!is_excluded("src", &excludes));
    }

    #[test]
    fn collects_python_files_and_skips_excluded_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.py"), "x = 1\n").unwrap();
        fs::write(root.join("notes.txt"), "not python\n").unwrap();
        fs::create_dir(root.join(".venv")).unwrap();
        fs::write(root.join(".venv").join("b.py"), "x = 2\n").unwrap();
        fs::create_dir(root.join("generated")).unwrap();
        fs::write(root.join("generated").join("c.py"), "x = 3\n").unwrap();

        let files = collect_python_files(root, &["generated".to_owned()], &[]);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert!(names.contains(&"a.py".to_owned()));
        assert!(!names.contains(&"b.py".to_owned()));
        assert!(!names.contains(&"c.py".to_owned()));
    }

    #[test]
    fn force_include_overrides_exclusion() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("build")).unwrap();
        fs::write(root.join("build").join("gen.py"), "x = 1\n").unwrap();

        let excluded = collect_python_files(root, &[], &[]);
        assert!(excluded.is_empty());

        let included = collect_python_files(root, &[], &["build".to_owned()]);
        assert_eq!(included.len(), 1);
    }
}
