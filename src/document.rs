//! In-memory text of the target file.
//!
//! The Document has no structure beyond its characters. Every position is a
//! byte offset found by literal substring search.

use crate::edit::{Edit, EditError, EditResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of non-overlapping occurrences of `needle`.
    pub fn occurrences(&self, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        self.text.matches(needle).count()
    }

    /// Byte offsets of every non-overlapping occurrence of `needle`.
    pub fn match_offsets(&self, needle: &str) -> Vec<usize> {
        if needle.is_empty() {
            return Vec::new();
        }
        self.text.match_indices(needle).map(|(idx, _)| idx).collect()
    }

    /// First occurrence of `needle` at or after `from`.
    pub fn find_from(&self, needle: &str, from: usize) -> Option<usize> {
        self.text
            .get(from..)?
            .find(needle)
            .map(|relative| from + relative)
    }

    /// Last occurrence of `needle` that ends at or before `before`.
    pub fn rfind_before(&self, needle: &str, before: usize) -> Option<usize> {
        self.text.get(..before)?.rfind(needle)
    }

    /// Offset of the first byte of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        self.rfind_before("\n", offset).map_or(0, |nl| nl + 1)
    }

    /// Offset just past the newline ending the line containing `offset`.
    ///
    /// `None` when that line runs to the end of the Document.
    pub fn line_end_after(&self, offset: usize) -> Option<usize> {
        self.find_from("\n", offset).map(|nl| nl + 1)
    }

    /// Line terminator used by this Document, judged by its first line break.
    pub fn line_ending(&self) -> &'static str {
        match self.text.find('\n') {
            Some(nl) if nl > 0 && self.text.as_bytes()[nl - 1] == b'\r' => "\r\n",
            _ => "\n",
        }
    }

    pub fn apply(&mut self, edit: &Edit) -> Result<EditResult, EditError> {
        edit.apply_to(&mut self.text)
    }

    pub fn apply_batch(&mut self, edits: &[Edit]) -> Result<Vec<EditResult>, EditError> {
        Edit::apply_batch(edits, &mut self.text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self { text }
    }
}
