//! Integration tests for the command-line interface
//!
//! Tests apply (default and explicit), dry run, diff, strict and check

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const MODAL: &str = r#"      <div className="card">
        <span className="label">Caja Disponible (USD)</span>
        <span className="value">${p.balance.toLocaleString()}</span>
      </div>
"#;

fn setup_target(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("TradingZoneModal.tsx");
    fs::write(&path, content).unwrap();
    path
}

fn patcher(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_markup-patcher"))
        .args(args)
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_apply_help() {
    let output = patcher(&["apply", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Patch the target file in place"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--strict"));
}

#[test]
fn test_apply_prints_confirmation() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, MODAL);

    let output = patcher(&["apply", "--file", path_arg(&target)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Successfully updated TradingZoneModal.tsx");

    let content = fs::read_to_string(&target).unwrap();
    assert!(content.contains("Caja Disponible</span>"));
    assert!(content.contains("Stake Promedio"));
    assert!(content.contains("      </div>\n\n        <div className=\"flex"));
}

#[test]
fn test_apply_twice_duplicates_block() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, MODAL);

    assert!(patcher(&["apply", "-f", path_arg(&target)]).status.success());
    assert!(patcher(&["apply", "-f", path_arg(&target)]).status.success());

    let content = fs::read_to_string(&target).unwrap();
    assert_eq!(content.matches("${p.averageStake}").count(), 2);
}

#[test]
fn test_dry_run_with_diff() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, MODAL);

    let output = patcher(&["apply", "-f", path_arg(&target), "--dry-run", "--diff"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DRY RUN"));
    assert!(stdout.contains("(patched)"));
    assert!(stdout.contains("Stake Promedio"));
    assert_eq!(fs::read_to_string(&target).unwrap(), MODAL);
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.tsx");

    let output = patcher(&["apply", "-f", path_arg(&missing)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
    assert!(!missing.exists());
}

#[test]
fn test_missing_anchor_is_silent_unless_strict() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, "<span>Caja Disponible (USD)</span>\n");

    let output = patcher(&["apply", "-f", path_arg(&target)]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "<span>Caja Disponible</span>\n"
    );

    let output = patcher(&["apply", "-f", path_arg(&target), "--strict"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_check_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, MODAL);

    let output = patcher(&["check", "-f", path_arg(&target)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Patch Check Report"));
    assert!(stdout.contains("1 occurrence(s)"));
    assert!(stdout.contains("inserted block after"));
    assert_eq!(fs::read_to_string(&target).unwrap(), MODAL);
}

#[test]
fn test_check_fails_on_missing_anchor() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, "<div>nothing to see</div>\n");

    let output = patcher(&["check", "-f", path_arg(&target)]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not present"));
    assert!(stdout.contains("skipped: anchor"));
}

#[test]
fn test_custom_recipe() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, "<h1>Hola</h1>\n");
    let recipe = dir.path().join("greeting.toml");
    fs::write(
        &recipe,
        r#"[meta]
name = "greeting"

[[renames]]
search = "Hola"
replace = "Buenas"
"#,
    )
    .unwrap();

    let output = patcher(&["apply", "-f", path_arg(&target), "-r", path_arg(&recipe)]);

    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&target).unwrap(), "<h1>Buenas</h1>\n");
}

#[test]
fn test_invalid_recipe_fails() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, MODAL);
    let recipe = dir.path().join("broken.toml");
    fs::write(&recipe, "[[renames]]\nsearch = \"\"\nreplace = \"x\"\n").unwrap();

    let output = patcher(&["apply", "-f", path_arg(&target), "-r", path_arg(&recipe)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid recipe"));
    assert_eq!(fs::read_to_string(&target).unwrap(), MODAL);
}

#[test]
fn test_check_fails_on_duplicate_anchor() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, &format!("{MODAL}{MODAL}"));

    let output = patcher(&["check", "-f", path_arg(&target)]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Recipe: average-stake"));
    assert!(stdout.contains("anchor appears 2 times"));
    assert_eq!(fs::read_to_string(&target).unwrap(), format!("{MODAL}{MODAL}"));
}

#[test]
fn test_identical_rename_recipe_fails() {
    let dir = TempDir::new().unwrap();
    let target = setup_target(&dir, "<h1>Caja Caja</h1>\n");
    let recipe = dir.path().join("noop.toml");
    fs::write(&recipe, "[[renames]]\nsearch = \"Caja\"\nreplace = \"Caja\"\n").unwrap();

    let output = patcher(&["check", "-f", path_arg(&target), "-r", path_arg(&recipe)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("search and replace are identical"));
}
