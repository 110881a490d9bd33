//! TextPatcher - applies a recipe's renames and insertions to one file
//!
//! The run is read → transform → write with no rollback. Anchors are found by
//! literal search. A missing anchor skips its insertion unless the patcher is
//! strict, and a duplicated anchor only affects its first occurrence.

use crate::document::Document;
use crate::edit::{Edit, EditError, EditResult};
use crate::recipe::{builtin_recipe, Insertion, Recipe, Rename, DEFAULT_TARGET};
use crate::storage::{self, StorageError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    #[error("rename target {search:?} not found")]
    RenameTargetMissing { search: String },

    #[error("anchor {anchor:?} not found")]
    AnchorNotFound { anchor: String },

    #[error("no {close_marker:?} after anchor {anchor:?}")]
    CloseMarkerNotFound { anchor: String, close_marker: String },

    #[error("anchor {anchor:?} matched {count} locations (expected 1)")]
    AmbiguousAnchor { anchor: String, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub search: String,
    pub replaced: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionOutcome {
    /// Block spliced in at `offset`
    Inserted {
        anchor: String,
        offset: usize,
        indent: String,
        anchor_occurrences: usize,
    },
    /// Anchor absent, insertion skipped
    AnchorMissing { anchor: String },
    /// Anchor found but nothing closes its block, insertion skipped
    CloseMarkerMissing { anchor: String, close_marker: String },
}

impl fmt::Display for InsertionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertionOutcome::Inserted {
                anchor,
                offset,
                anchor_occurrences,
                ..
            } => {
                write!(f, "inserted block after {anchor:?} at byte {offset}")?;
                if *anchor_occurrences > 1 {
                    write!(f, " (anchor appears {anchor_occurrences} times, used the first)")?;
                }
                Ok(())
            }
            InsertionOutcome::AnchorMissing { anchor } => {
                write!(f, "skipped: anchor {anchor:?} not found")
            }
            InsertionOutcome::CloseMarkerMissing {
                anchor,
                close_marker,
            } => write!(f, "skipped: no {close_marker:?} after anchor {anchor:?}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub renames: Vec<RenameOutcome>,
    pub insertions: Vec<InsertionOutcome>,
}

impl PatchReport {
    pub fn inserted(&self) -> usize {
        self.insertions
            .iter()
            .filter(|outcome| matches!(outcome, InsertionOutcome::Inserted { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.insertions.len() - self.inserted()
    }

    pub fn replaced(&self) -> usize {
        self.renames.iter().map(|outcome| outcome.replaced).sum()
    }
}

/// Everything one pass produced.
#[derive(Debug, Clone)]
#[must_use = "PatchOutcome should be reported"]
pub struct PatchOutcome {
    pub target: PathBuf,
    pub original: String,
    pub patched: Document,
    pub report: PatchReport,
}

impl PatchOutcome {
    /// The line printed after a successful write.
    pub fn confirmation(&self) -> String {
        format!("Successfully updated {}", display_name(&self.target))
    }
}

/// Final path component, splitting on both separators so Windows targets
/// print the same on every host.
pub fn display_name(path: &Path) -> String {
    let full = path.to_string_lossy();
    full.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(full.as_ref())
        .to_string()
}

/// Target chosen on the command line, else the recipe's, else the default.
pub fn resolve_target(explicit: Option<PathBuf>, recipe: &Recipe) -> PathBuf {
    explicit
        .or_else(|| recipe.meta.target.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET))
}

#[derive(Debug, Clone)]
pub struct TextPatcher {
    target: PathBuf,
    recipe: Recipe,
    strict: bool,
}

impl TextPatcher {
    pub fn new(target: impl Into<PathBuf>, recipe: Recipe) -> Self {
        Self {
            target: target.into(),
            recipe,
            strict: false,
        }
    }

    /// The average-stake recipe against its default target.
    pub fn builtin() -> Self {
        let recipe = builtin_recipe();
        let target = resolve_target(None, &recipe);
        Self::new(target, recipe)
    }

    /// Treat missing or duplicated anchors and absent rename targets as errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Load and transform without writing.
    pub fn plan(&self) -> Result<PatchOutcome, PatchError> {
        let mut document = storage::load(&self.target)?;
        let original = document.as_str().to_string();
        let report = self.transform(&mut document)?;
        Ok(PatchOutcome {
            target: self.target.clone(),
            original,
            patched: document,
            report,
        })
    }

    /// Load, transform, and overwrite the target.
    ///
    /// The file is rewritten even when nothing matched.
    pub fn run(&self) -> Result<PatchOutcome, PatchError> {
        let outcome = self.plan()?;
        storage::store(&self.target, &outcome.patched)?;
        tracing::debug!(
            path = %self.target.display(),
            replaced = outcome.report.replaced(),
            inserted = outcome.report.inserted(),
            skipped = outcome.report.skipped(),
            "patched"
        );
        Ok(outcome)
    }

    /// Apply every rename, then every insertion, to `document`.
    pub fn transform(&self, document: &mut Document) -> Result<PatchReport, PatchError> {
        let mut report = PatchReport::default();

        for rename in &self.recipe.renames {
            report.renames.push(self.apply_rename(document, rename)?);
        }

        for insertion in &self.recipe.insertions {
            report
                .insertions
                .push(self.apply_insertion(document, insertion)?);
        }

        Ok(report)
    }

    fn apply_rename(
        &self,
        document: &mut Document,
        rename: &Rename,
    ) -> Result<RenameOutcome, PatchError> {
        let offsets = document.match_offsets(&rename.search);
        if offsets.is_empty() {
            if self.strict {
                return Err(PatchError::RenameTargetMissing {
                    search: rename.search.clone(),
                });
            }
            tracing::debug!(search = %rename.search, "rename target not present");
        }

        let edits: Vec<Edit> = offsets
            .iter()
            .map(|&offset| {
                Edit::new(
                    offset,
                    offset + rename.search.len(),
                    rename.replace.as_str(),
                    &rename.search,
                )
            })
            .collect();

        let replaced = document
            .apply_batch(&edits)?
            .iter()
            .filter(|result| matches!(result, EditResult::Applied { .. }))
            .count();

        tracing::debug!(search = %rename.search, replaced, "renamed");
        Ok(RenameOutcome {
            search: rename.search.clone(),
            replaced,
        })
    }

    fn apply_insertion(
        &self,
        document: &mut Document,
        insertion: &Insertion,
    ) -> Result<InsertionOutcome, PatchError> {
        let anchor = &insertion.anchor;

        let Some(anchor_at) = document.find_from(anchor, 0) else {
            if self.strict {
                return Err(PatchError::AnchorNotFound {
                    anchor: anchor.clone(),
                });
            }
            tracing::warn!(anchor = %anchor, "anchor not found, skipping insertion");
            return Ok(InsertionOutcome::AnchorMissing {
                anchor: anchor.clone(),
            });
        };

        let anchor_occurrences = document.occurrences(anchor);
        if anchor_occurrences > 1 {
            if self.strict {
                return Err(PatchError::AmbiguousAnchor {
                    anchor: anchor.clone(),
                    count: anchor_occurrences,
                });
            }
            tracing::warn!(
                anchor = %anchor,
                count = anchor_occurrences,
                "anchor is not unique, using the first occurrence"
            );
        }

        // Searched from the anchor's start, so a marker inside the anchor counts
        let Some(close_at) = document.find_from(&insertion.close_marker, anchor_at) else {
            if self.strict {
                return Err(PatchError::CloseMarkerNotFound {
                    anchor: anchor.clone(),
                    close_marker: insertion.close_marker.clone(),
                });
            }
            tracing::warn!(
                anchor = %anchor,
                close_marker = %insertion.close_marker,
                "close marker not found after anchor, skipping insertion"
            );
            return Ok(InsertionOutcome::CloseMarkerMissing {
                anchor: anchor.clone(),
                close_marker: insertion.close_marker.clone(),
            });
        };

        let indent = indent_for(document, anchor_at, &insertion.indent_marker);
        let line_ending = document.line_ending();
        let block = insertion.render(&indent, line_ending);

        let (offset, text) = match document.line_end_after(close_at) {
            Some(line_end) => (line_end, block),
            // Closing line is the last one and has no terminator
            None => (document.len(), format!("{line_ending}{block}")),
        };

        document.apply(&Edit::insert(offset, text))?;

        tracing::debug!(anchor = %anchor, offset, indent = indent.len(), "inserted block");
        Ok(InsertionOutcome::Inserted {
            anchor: anchor.clone(),
            offset,
            indent,
            anchor_occurrences,
        })
    }
}

/// Indentation for an insertion anchored at `anchor_at`.
///
/// Spans from the start of the anchor's line to the last `marker` before the
/// anchor. Non-whitespace in that span becomes a space so the prefix keeps the
/// marker's column. Empty when the marker is not on the anchor's line.
fn indent_for(document: &Document, anchor_at: usize, marker: &str) -> String {
    let line_start = document.line_start(anchor_at);
    match document.rfind_before(marker, anchor_at) {
        Some(marker_at) if marker_at >= line_start => document.as_str()[line_start..marker_at]
            .chars()
            .map(|c| if c.is_whitespace() { c } else { ' ' })
            .collect(),
        _ => String::new(),
    }
}
