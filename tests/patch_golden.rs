//! Golden and workflow tests for the average-stake recipe against real files

use markup_patcher::{
    builtin_recipe, load_from_path, Document, InsertionOutcome, PatchError, StorageError,
    TextPatcher,
};
use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|err| panic!("failed to load fixture {name}: {err}"))
}

/// Copy the modal fixture into a scratch dir and return its path
fn setup_modal(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("TradingZoneModal.tsx");
    fs::write(&path, load_fixture("TradingZoneModal.tsx.input")).unwrap();
    path
}

#[test]
fn builtin_recipe_matches_golden_output() {
    let dir = TempDir::new().unwrap();
    let path = setup_modal(&dir);

    let outcome = TextPatcher::new(&path, builtin_recipe()).run().unwrap();

    let expected = load_fixture("TradingZoneModal.tsx.expected");
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    assert_eq!(outcome.patched.as_str(), expected);
    assert_eq!(outcome.confirmation(), "Successfully updated TradingZoneModal.tsx");
    assert_eq!(outcome.report.replaced(), 1);
    assert_eq!(outcome.report.inserted(), 1);
}

#[test]
fn shipped_recipe_equals_builtin() {
    let recipe = load_from_path("recipes/average-stake.toml").unwrap();
    assert_eq!(recipe, builtin_recipe());
}

#[test]
fn second_run_duplicates_block() {
    let dir = TempDir::new().unwrap();
    let path = setup_modal(&dir);
    let patcher = TextPatcher::new(&path, builtin_recipe());

    patcher.run().unwrap();
    let second = patcher.run().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("Stake Promedio").count(), 2);
    assert_eq!(second.report.replaced(), 0);
    assert_eq!(second.report.inserted(), 1);
}

#[test]
fn plan_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = setup_modal(&dir);
    let before = fs::read_to_string(&path).unwrap();

    let outcome = TextPatcher::new(&path, builtin_recipe()).plan().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(outcome.original, before);
    assert!(outcome.patched.as_str().contains("${p.averageStake}"));
}

#[test]
fn missing_target_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Nope.tsx");

    let err = TextPatcher::new(&path, builtin_recipe()).run().unwrap_err();

    assert!(matches!(err, PatchError::Storage(StorageError::Read { .. })));
    assert!(!path.exists());
}

#[test]
fn file_without_anchor_is_still_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Other.tsx");
    fs::write(&path, "<span>Caja Disponible (USD)</span>\n").unwrap();

    let outcome = TextPatcher::new(&path, builtin_recipe()).run().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<span>Caja Disponible</span>\n"
    );
    assert!(matches!(
        outcome.report.insertions[0],
        InsertionOutcome::AnchorMissing { .. }
    ));
}

#[test]
fn crlf_fixture_stays_crlf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("TradingZoneModal.tsx");
    let input = load_fixture("TradingZoneModal.tsx.input").replace('\n', "\r\n");
    fs::write(&path, &input).unwrap();

    TextPatcher::new(&path, builtin_recipe()).run().unwrap();

    let expected = load_fixture("TradingZoneModal.tsx.expected").replace('\n', "\r\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

proptest! {
    #[test]
    fn rename_leaves_no_search_text(
        prefix in "[a-z <>/]{0,40}",
        suffix in "[a-z <>/]{0,40}",
    ) {
        let patcher = TextPatcher::new("unused", builtin_recipe());
        let mut document = Document::new(format!("{prefix}Caja Disponible (USD){suffix}"));

        patcher.transform(&mut document).unwrap();

        prop_assert!(!document.as_str().contains("Caja Disponible (USD)"));
        prop_assert_eq!(document.as_str().matches("Caja Disponible").count(), 1);
    }
}
