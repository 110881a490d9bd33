pub mod builtin;
pub mod loader;
pub mod schema;

pub use builtin::{
    builtin_recipe, BALANCE_ANCHOR, CASH_LABEL, CASH_LABEL_RENAMED, DEFAULT_TARGET,
};
pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{Insertion, Metadata, Recipe, Rename, ValidationError, ValidationIssue};
