use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

// End-to-end: scan a tree, filter by a .config, print DOT
#[test]
fn cli_render_prints_filtered_dot() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("Kconfig"), "config A\n\tdepends on B\nconfig B\n");
    write_file(&root.join(".config"), "CONFIG_A=y\nCONFIG_B=y\n");

    let mut cmd = Command::cargo_bin("kconfig-graph").unwrap();
    cmd.arg("render").arg("-d").arg(root).arg("-c").arg(root.join(".config"));
    cmd.assert().success().stdout("digraph G {\n  \"B\" -> \"A\";\n}\n");

    // Relative assignment paths are resolved under --dir
    write_file(&root.join("only_a.config"), "CONFIG_A=y\n# CONFIG_B is not set\n");
    let mut cmd = Command::cargo_bin("kconfig-graph").unwrap();
    cmd.arg("render").arg("-d").arg(root).arg("-c").arg("only_a.config");
    cmd.assert().success().stdout("digraph G {\n}\n");
}

#[test]
fn cli_render_all_and_out_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("Kconfig"), "config A\n\tselect B\n");
    let out = root.join("graph.dot");

    let mut cmd = Command::cargo_bin("kconfig-graph").unwrap();
    cmd.arg("render").arg("-d").arg(root).arg("--all").arg("-o").arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("DOT written to"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "digraph G {\n  \"A\" -> \"B\";\n}\n");
}

#[test]
fn cli_render_custom_prefix() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("Kconfig"), "config A\n\tselect B\n");
    write_file(&root.join("defconfig"), "BR2_A=y\nBR2_B=y\n");

    let mut cmd = Command::cargo_bin("kconfig-graph").unwrap();
    cmd.arg("render")
        .arg("-d")
        .arg(root)
        .arg("-c")
        .arg(root.join("defconfig"))
        .arg("--prefix")
        .arg("BR2_");
    cmd.assert().success().stdout(predicate::str::contains("\"A\" -> \"B\";"));
}

#[test]
fn cli_render_missing_assignment_file_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("Kconfig"), "config A\n");

    let mut cmd = Command::cargo_bin("kconfig-graph").unwrap();
    cmd.arg("render").arg("-d").arg(root).arg("-c").arg(root.join("nope.config"));
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read assignment file"));
}

#[test]
fn cli_completions_smoke() {
    let mut cmd = Command::cargo_bin("kconfig-graph").unwrap();
    cmd.arg("completions").arg("bash");
    cmd.assert().success().stdout(predicate::str::contains("kconfig-graph"));
}
