//! Byte-range safe code rewriter.
//!
//! Applies a set of non-overlapping edits to a source string. Edits are
//! validated up front and applied back-to-front so earlier offsets stay
//! valid while the string shrinks.

use thiserror::Error;

/// A single edit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive).
    pub start_byte: usize,
    /// End byte offset (exclusive).
    pub end_byte: usize,
    /// Replacement content; empty for a pure deletion.
    pub replacement: String,
}

impl Edit {
    /// Create a new edit.
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
        }
    }

    /// Create a deletion edit.
    #[must_use]
    pub fn delete(start_byte: usize, end_byte: usize) -> Self {
        Self::new(start_byte, end_byte, "")
    }

    /// Check if this edit overlaps with another.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }
}

/// Error during rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two or more edits have overlapping ranges.
    #[error("overlapping edits at indices {edit_a} and {edit_b}")]
    OverlappingEdits {
        /// Index of first overlapping edit.
        edit_a: usize,
        /// Index of second overlapping edit.
        edit_b: usize,
    },
    /// Edit range is out of bounds.
    #[error("edit {edit_index} ends at byte {end_byte}, past the end of the source ({source_len} bytes)")]
    OutOfBounds {
        /// Index of the bad edit.
        edit_index: usize,
        /// End byte of the edit.
        end_byte: usize,
        /// Length of the source.
        source_len: usize,
    },
    /// An edit boundary falls inside a multi-byte character.
    #[error("edit {edit_index} boundary at byte {offset} splits a character")]
    SplitsCharacter {
        /// Index of the bad edit.
        edit_index: usize,
        /// The offending offset.
        offset: usize,
    },
}

/// Safe code rewriter using byte ranges.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    /// Original source code.
    source: String,
    /// Pending edits.
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list.
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Add multiple edits.
    pub fn add_edits(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.edits.extend(edits);
    }

    /// Check if there are any pending edits.
    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Validate edits without applying them.
    ///
    /// # Errors
    /// Returns an error if edits overlap, are out of bounds, or would split
    /// a multi-byte character.
    pub fn validate(&self) -> Result<(), RewriteError> {
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.end_byte > self.source.len() {
                return Err(RewriteError::OutOfBounds {
                    edit_index: i,
                    end_byte: edit.end_byte,
                    source_len: self.source.len(),
                });
            }
            for offset in [edit.start_byte, edit.end_byte] {
                if !self.source.is_char_boundary(offset) {
                    return Err(RewriteError::SplitsCharacter {
                        edit_index: i,
                        offset,
                    });
                }
            }
        }

        for i in 0..self.edits.len() {
            for j in (i + 1)..self.edits.len() {
                if self.edits[i].overlaps(&self.edits[j]) {
                    return Err(RewriteError::OverlappingEdits {
                        edit_a: i,
                        edit_b: j,
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply all edits and return the modified source.
    ///
    /// Edits are applied in reverse order (by start position) to preserve
    /// byte offsets as the string is modified.
    ///
    /// # Errors
    /// Returns an error if validation fails; the source is returned unchanged
    /// in spirit - no partial application happens.
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let mut result = self.source;
        let mut sorted_edits = self.edits;
        sorted_edits.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));

        for edit in sorted_edits {
            result.replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_a_trailing_argument() {
        let source = "f(5, 2)\n";
        let mut rewriter = ByteRangeRewriter::new(source);
        // Drop ", 2": from the end of `5` to the end of `2`.
        rewriter.add_edit(Edit::delete(3, 6));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "f(5)\n");
    }

    #[test]
    fn replaces_a_full_argument_list() {
        let source = "f(1, 2)\n";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(1, 7, "()"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "f()\n");
    }

    #[test]
    fn applies_multiple_disjoint_edits() {
        let source = "f(5, 2)\ng(1, 2)\n";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::delete(3, 6));
        rewriter.add_edit(Edit::new(9, 15, "()"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "f(5)\ng()\n");
    }

    #[test]
    fn rejects_overlapping_edits() {
        let mut rewriter = ByteRangeRewriter::new("hello world");
        rewriter.add_edit(Edit::delete(0, 8));
        rewriter.add_edit(Edit::delete(5, 10));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OverlappingEdits { .. })));
    }

    #[test]
    fn rejects_out_of_bounds_edits() {
        let mut rewriter = ByteRangeRewriter::new("short");
        rewriter.add_edit(Edit::delete(0, 100));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OutOfBounds { .. })));
    }

    #[test]
    fn rejects_edits_inside_a_character() {
        // "é" is two bytes; offset 1 lands in the middle.
        let mut rewriter = ByteRangeRewriter::new("é = 1");
        rewriter.add_edit(Edit::delete(1, 2));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::SplitsCharacter { .. })));
    }

    #[test]
    fn adjacent_edits_do_not_overlap() {
        let mut rewriter = ByteRangeRewriter::new("abcdef");
        rewriter.add_edit(Edit::new(0, 3, "X"));
        rewriter.add_edit(Edit::new(3, 6, "Y"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "XY");
    }

    #[test]
    fn no_edits_returns_the_source_unchanged() {
        let rewriter = ByteRangeRewriter::new("f(1)\n");
        assert!(!rewriter.has_edits());
        assert_eq!(rewriter.apply().expect("should apply"), "f(1)\n");
    }

    #[test]
    fn preserves_surrounding_formatting() {
        let source = "result = f(5,  2)  # important comment\n";
        let mut rewriter = ByteRangeRewriter::new(source);
        let start = source.find('5').expect("should find 5") + 1;
        let end = source.rfind('2').expect("should find 2") + 1;
        rewriter.add_edit(Edit::delete(start, end));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "result = f(5)  # important comment\n");
    }
}
