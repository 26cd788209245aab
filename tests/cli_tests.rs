// End-to-end tests of the inline-expand binary.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const MATH: &str = "export function double(n) { return n * 2; }\n";

/// A project with `src/main.js` and `src/lib/math.js`.
fn project(main: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/lib")).unwrap();
    fs::write(dir.path().join("src/main.js"), main).unwrap();
    fs::write(dir.path().join("src/lib/math.js"), MATH).unwrap();
    dir
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("inline-expand").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn main_js(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("src/main.js")
}

#[test]
fn expand_prints_transformed_source() {
    let dir = project("var y = %inline('./lib/math').double(a + 1);\n");
    cli()
        .arg("expand")
        .arg(main_js(&dir))
        .assert()
        .success()
        .stdout("var y = (a + 1) * 2;\n");
}

#[test]
fn expand_reports_miette_diagnostics_and_fails() {
    let dir = project("%inline('./lib/missing').f(1);\n");
    cli()
        .arg("expand")
        .arg(main_js(&dir))
        .assert()
        .code(1)
        .stdout(contains("/* %inline failed: cannot find module './lib/missing'"))
        .stderr(contains("inline::module_not_found").or(contains("help:")));
}

#[test]
fn expand_writes_out_file() {
    let dir = project("x = %inline('./lib/math').double(3);\n");
    let out = dir.path().join("build/main.js");
    cli()
        .arg("expand")
        .arg(main_js(&dir))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(out).unwrap(), "x = 3 * 2;\n");
}

#[test]
fn expand_directory_mirrors_tree() {
    let dir = project("x = %inline('./lib/math').double(3);\n");
    let out = dir.path().join("out");
    cli()
        .arg("expand")
        .arg(dir.path().join("src"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(out.join("main.js")).unwrap(), "x = 3 * 2;\n");
    assert_eq!(fs::read_to_string(out.join("lib/math.js")).unwrap(), MATH);
}

#[test]
fn expand_lists_dependencies() {
    let dir = project("x = %inline('./lib/math').double(3);\n");
    cli()
        .arg("expand")
        .arg(main_js(&dir))
        .arg("--deps")
        .assert()
        .success()
        .stdout(contains("main.js:").and(contains("math.js")));
}

#[test]
fn expand_rejects_invalid_configuration() {
    let dir = project("x = 1;\n");
    let config = dir.path().join("inline.yaml");
    fs::write(&config, "max_passes: 3\n").unwrap();
    cli()
        .arg("expand")
        .arg(main_js(&dir))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(contains("inline::config").or(contains("invalid configuration")));
}

#[test]
fn exports_lists_functions_as_json() {
    let dir = project("");
    cli()
        .arg("exports")
        .arg(dir.path().join("src/lib/math.js"))
        .arg("--json")
        .assert()
        .success()
        .stdout(contains("\"name\": \"double\"").and(contains("\"body\": \"n * 2\"")));
}

#[test]
fn check_compares_strategies() {
    let dir = project("var y = %inline('./lib/math').double(a);\n");
    cli()
        .arg("check")
        .arg(main_js(&dir))
        .assert()
        .success()
        .stdout(contains("strategies agree"));

    let same_line = project(
        "a = %inline('./lib/math').double(1); b = %inline('./lib/math').double(2);\n",
    );
    cli()
        .arg("check")
        .arg(main_js(&same_line))
        .assert()
        .code(1)
        .stdout(contains("strategies disagree"));
}
