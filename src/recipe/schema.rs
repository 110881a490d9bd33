use serde::Deserialize;
use std::fmt;

/// A named set of renames and insertions applied to one file.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Recipe {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub renames: Vec<Rename>,
    #[serde(default)]
    pub insertions: Vec<Insertion>,
}

impl Recipe {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.renames.is_empty() && self.insertions.is_empty() {
            issues.push(ValidationIssue::EmptyRecipe);
        }

        for (idx, rename) in self.renames.iter().enumerate() {
            if rename.search.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    entry: Entry::Rename(idx),
                    field: "search",
                });
            } else if rename.search == rename.replace {
                issues.push(ValidationIssue::InvalidValue {
                    entry: Entry::Rename(idx),
                    message: "search and replace are identical".to_string(),
                });
            }
        }

        for (idx, insertion) in self.insertions.iter().enumerate() {
            let entry = Entry::Insertion(idx);
            if insertion.anchor.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    entry,
                    field: "anchor",
                });
            }
            if insertion.close_marker.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    entry,
                    field: "close_marker",
                });
            }
            if insertion.indent_marker.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    entry,
                    field: "indent_marker",
                });
            }
            if insertion.lines.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    entry,
                    field: "lines",
                });
            }
            if insertion.lines.iter().any(|line| line.contains('\n')) {
                issues.push(ValidationIssue::InvalidValue {
                    entry,
                    message: "block lines must not contain line breaks".to_string(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Default file to patch when none is given on the command line
    #[serde(default)]
    pub target: Option<String>,
}

/// Global literal replacement.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Rename {
    pub search: String,
    pub replace: String,
}

/// Fixed block spliced after the line closing an anchor's block.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub anchor: String,
    pub close_marker: String,
    pub indent_marker: String,
    #[serde(default = "default_leading_blank_line")]
    pub leading_blank_line: bool,
    pub lines: Vec<String>,
}

fn default_leading_blank_line() -> bool {
    true
}

impl Insertion {
    /// Render the block with every line prefixed by `indent`.
    pub fn render(&self, indent: &str, line_ending: &str) -> String {
        let mut block = String::new();
        if self.leading_blank_line {
            block.push_str(line_ending);
        }
        for line in &self.lines {
            block.push_str(indent);
            block.push_str(line);
            block.push_str(line_ending);
        }
        block
    }
}

/// Which recipe entry an issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Rename(usize),
    Insertion(usize),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Rename(idx) => write!(f, "renames[{idx}]"),
            Entry::Insertion(idx) => write!(f, "insertions[{idx}]"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyRecipe,
    MissingField { entry: Entry, field: &'static str },
    InvalidValue { entry: Entry, message: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRecipe => write!(f, "recipe contains no renames or insertions"),
            ValidationIssue::MissingField { entry, field } => {
                write!(f, "{entry} missing required field '{field}'")
            }
            ValidationIssue::InvalidValue { entry, message } => {
                write!(f, "{entry} has invalid configuration: {message}")
            }
        }
    }
}
