//! Integration tests for the fontscale binary

mod common;

use common::*;
use predicates::prelude::*;
use read_fonts::{FontRef, TableProvider};
use std::fs;

fn write_input(dir: &tempfile::TempDir, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("input.ttf");
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_single_argument_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &truetype_font(&sample_outlines()));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "no output file should be written");
}

#[test]
fn test_no_arguments_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.assert().failure();
}

#[test]
fn test_scales_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &truetype_font(&sample_outlines()));
    let output = dir.path().join("output.ttf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("✓ Scaled:").and(predicate::str::contains("(X=1.0, Y=0.9)")));

    let data = fs::read(&output).unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.os2().unwrap().s_typo_line_gap(), 72);
}

#[test]
fn test_explicit_factors() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &truetype_font(&sample_outlines()));
    let output = dir.path().join("output.ttf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg(&input).arg(&output).arg("0.5").arg("2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(X=2.0, Y=0.5)"));

    let data = fs::read(&output).unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.hhea().unwrap().ascender().to_i16(), ASCENDER / 2);
    let advance = font.hmtx().unwrap().advance(read_fonts::types::GlyphId::new(1));
    assert_eq!(advance, Some(advance_for(1) * 2));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &truetype_font(&sample_outlines()));
    let output = dir.path().join("output.ttf");
    let config = dir.path().join("fontscale.toml");
    fs::write(&config, "[scale]\ny = 0.5\nx = 1.5\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg("--config").arg(&config).arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(X=1.5, Y=0.5)"));

    // Positional factors override the file
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg("--config").arg(&config).arg(&input).arg(&output).arg("0.8");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(X=1.5, Y=0.8)"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.ttf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg(dir.path().join("absent.ttf")).arg(&output);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("File Error"));
    assert!(!output.exists());
}

#[test]
fn test_invalid_font_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, b"plain text, not a font");
    let output = dir.path().join("output.ttf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg(&input).arg(&output);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Font Format Error"));
    assert!(!output.exists());
}

#[test]
fn test_cff_font_warns_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &cff_font(2));
    let output = dir.path().join("output.otf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.env_remove("RUST_LOG").arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("[WARN]").and(predicate::str::contains("CFF")))
        .stdout(predicate::str::contains("✓ Scaled:"));

    let data = fs::read(&output).unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.os2().unwrap().s_typo_ascender(), 720);
}

#[test]
fn test_quiet_hides_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &cff_font(2));
    let output = dir.path().join("output.otf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.env_remove("RUST_LOG").arg("-q").arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("[WARN]").not());
}

#[test]
fn test_help_output() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fontscale");
    cmd.arg("--help");
    cmd.assert().success().stdout(
        predicate::str::contains("SCALE_Y")
            .and(predicate::str::contains("SCALE_X"))
            .and(predicate::str::contains("--config"))
            .and(predicate::str::contains("--verbose-level")),
    );
}
