//! Tests that drive the `enrichment-boxplot` binary

use std::fs;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_enrichment-boxplot"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_unsupported_extension_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("zscores.txt");
    fs::write(&input, "peptide\tA-M_1\np1\t1\n").unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let output = run(&[
        input.to_str().unwrap(),
        "figure",
        out_dir.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TSV or CSV"));
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn test_missing_input_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("absent.tsv");

    let output = run(&[input.to_str().unwrap(), "figure", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
    assert!(!dir.path().join("figure.svg").exists());
}

#[test]
fn test_non_numeric_input_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("zscores.csv");
    fs::write(&input, "peptide,A-M_1\np1,abc\n").unwrap();

    let output = run(&[input.to_str().unwrap(), "figure", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not convert"));
    assert!(!dir.path().join("figure.svg").exists());
}

#[test]
fn test_bad_config_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("zscores.tsv");
    fs::write(&input, "peptide\tA-M_1\tA-MW_1\np1\t20\t1\n").unwrap();
    let config = dir.path().join("enrichment.toml");
    fs::write(&config, "[plot]\nwidht = 8\n").unwrap();

    let output = run(&[
        input.to_str().unwrap(),
        "figure",
        dir.path().to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("TOML"));
    assert!(!dir.path().join("figure.svg").exists());
}

const TABLE: &str =
    "peptide\tA-M_1\tA-MW_1\tB-M_1\tB-MS_1\nPEPA\t6\t1\t0\t3\nPEPB\t1\t5\t0\t1\nPEPC\t2\t0\t9\t4\n";

#[test]
fn test_writes_pdf_figure_and_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("zscores.tsv");
    fs::write(&input, TABLE).unwrap();
    let export = dir.path().join("long.tsv");

    let output = run(&[
        input.to_str().unwrap(),
        "figure",
        dir.path().to_str().unwrap(),
        "--peptide_threshold",
        "5",
        "--dpi",
        "72",
        "--export",
        export.to_str().unwrap(),
        "-v",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let pdf = fs::read(dir.path().join("figure.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(fs::read_to_string(&export).unwrap().lines().count(), 4);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Filtering enriched peptides"));
}

#[test]
fn test_writes_svg_figure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("zscores.tsv");
    fs::write(&input, TABLE).unwrap();

    let output = run(&[
        input.to_str().unwrap(),
        "figure",
        dir.path().to_str().unwrap(),
        "--peptide_threshold",
        "5",
        "--format",
        "svg",
        "--dpi",
        "72",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let svg = fs::read_to_string(dir.path().join("figure.svg")).unwrap();
    assert!(svg.contains("Zscore Threshold-5.0"));
    assert!(svg.contains(">M_MW<"));
}

#[test]
fn test_failed_render_leaves_no_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("zscores.tsv");
    fs::write(&input, TABLE).unwrap();
    let export = dir.path().join("long.tsv");
    let missing = dir.path().join("missing");

    let output = run(&[
        input.to_str().unwrap(),
        "figure",
        missing.to_str().unwrap(),
        "--peptide_threshold",
        "5",
        "--export",
        export.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to render boxplot"));
    assert!(!export.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
