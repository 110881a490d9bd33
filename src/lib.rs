//! Markup Patcher: literal-anchor text patching for front-end markup files
//!
//! Applies a recipe of renames and block insertions to one file, in place.
//! Everything is raw text: anchors are literal substrings and nothing is
//! parsed.
//!
//! # Architecture
//!
//! Every mutation compiles down to a single primitive: [`Edit`], a verified
//! byte-span replacement. Renames become one edit per occurrence. An insertion
//! becomes a zero-width edit after the line that closes its anchor's block.
//!
//! # Behavior
//!
//! - Renames are global; every occurrence is replaced
//! - A missing anchor skips its insertion unless strict mode is on
//! - A duplicated anchor only affects its first occurrence
//! - Not idempotent: a second run inserts the block again
//! - The target is overwritten with no backup
//!
//! # Example
//!
//! ```no_run
//! use markup_patcher::TextPatcher;
//!
//! match TextPatcher::builtin().run() {
//!     Ok(outcome) => println!("{}", outcome.confirmation()),
//!     Err(e) => eprintln!("Patch failed: {}", e),
//! }
//! ```

pub mod document;
pub mod edit;
pub mod patcher;
pub mod recipe;
pub mod storage;

// Re-exports
pub use document::Document;
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use patcher::{
    display_name, resolve_target, InsertionOutcome, PatchError, PatchOutcome, PatchReport,
    RenameOutcome, TextPatcher,
};
pub use recipe::{
    builtin_recipe, load_from_path, load_from_str, ConfigError, Insertion, Recipe, Rename,
    DEFAULT_TARGET,
};
pub use storage::StorageError;
