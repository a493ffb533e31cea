//! Integration tests for top-level CLI behavior.
//!
//! The extractor and clustering engine are replaced with shell scripts that
//! follow the same argument conventions as the real tools.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

struct Fixture {
    root: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("project/src");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("Test.java"), "class Test {}").unwrap();
        std::fs::create_dir_all(root.path().join("resources")).unwrap();
        Self { root }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Installs the extractor without an execute bit; the runner sets it.
    fn extractor(&self, body: &str) {
        std::fs::write(self.path("resources/neodepends"), format!("#!/bin/sh\n{body}")).unwrap();
    }

    fn clusterer(&self, body: &str) -> PathBuf {
        let path = self.path("deicide");
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        make_executable(&path);
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_deicide-suite");
        Command::new(bin)
            .args(args)
            .current_dir(self.root.path())
            .env("DEICIDE_RESOURCES", self.path("resources"))
            .env("DEICIDE_CLUSTERER", self.path("deicide"))
            .env_remove("DEICIDE_RECORD")
            .output()
            .expect("failed to run deicide-suite binary")
    }

    fn analyze(&self, extra: &[&str]) -> Output {
        let project = self.path("project");
        let output = self.path("out");
        let mut args = vec![
            "--project",
            project.to_str().unwrap(),
            "--output-dir",
            output.to_str().unwrap(),
            "--filename",
            "src/Test.java",
        ];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

const WORKING_EXTRACTOR: &str = r#"for arg in "$@"; do
  case "$arg" in --output=*) out="${arg#--output=}" ;; esac
done
echo "scanning sources"
printf 'sqlite' > "$out"
"#;

const WORKING_CLUSTERER: &str = r#"args="$*"
while [ $# -gt 0 ]; do
  case "$1" in --output) out="$2"; shift ;; esac
  shift
done
printf '{"args": "%s"}' "$args" > "$out"
"#;

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
#[test]
fn end_to_end_run_produces_both_artifacts() {
    let fx = Fixture::new();
    fx.extractor(WORKING_EXTRACTOR);
    fx.clusterer(WORKING_CLUSTERER);

    let output = fx.analyze(&[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(listing(&fx.path("out")), ["deicide_clustering.json", "dependencies.db"]);
    assert!(stdout.contains("[1/3] Running NeoDepends"));
    assert!(stdout.contains("[2/3] Running Deicide"));
    assert!(stdout.contains("[3/3] Output Summary"));
    assert!(stdout.contains("dependencies.db"));
    assert!(stdout.contains("deicide_clustering.json"));
    assert!(stdout.contains("Analysis complete in"));
    // Extractor stdout is discarded.
    assert!(!stdout.contains("scanning sources"));
}

#[cfg(unix)]
#[test]
fn dv8_flag_reaches_the_clusterer() {
    let fx = Fixture::new();
    fx.extractor(WORKING_EXTRACTOR);
    fx.clusterer(WORKING_CLUSTERER);

    let output = fx.analyze(&["--dv8"]);
    assert!(output.status.success());

    let report = std::fs::read_to_string(fx.path("out/deicide_clustering.json")).unwrap();
    assert!(report.contains("--dv8-result"));
    assert!(report.contains("--filename src/Test.java"));
    assert!(report.contains("dependencies.db"));
}

#[cfg(unix)]
#[test]
fn rerun_replaces_previous_outputs() {
    let fx = Fixture::new();
    fx.extractor(WORKING_EXTRACTOR);
    fx.clusterer(WORKING_CLUSTERER);
    std::fs::create_dir_all(fx.path("out")).unwrap();
    std::fs::write(fx.path("out/stale.txt"), "old").unwrap();

    let output = fx.analyze(&[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("overwriting"));
    assert_eq!(listing(&fx.path("out")), ["deicide_clustering.json", "dependencies.db"]);
}

#[cfg(unix)]
#[test]
fn extractor_failure_forwards_diagnostic_and_skips_clustering() {
    let fx = Fixture::new();
    fx.extractor("echo 'parse error' >&2\nexit 2\n");
    let marker = fx.path("clusterer-ran");
    fx.clusterer(&format!("touch '{}'\n", marker.display()));

    let output = fx.analyze(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("NeoDepends error:"));
    assert!(stderr.contains("✘ NeoDepends failed ("));
    assert!(stderr.contains("parse error"));
    assert!(stderr.contains("failed after"));
    assert!(!marker.exists());
    assert!(listing(&fx.path("out")).is_empty());
}

#[cfg(unix)]
#[test]
fn clusterer_failure_keeps_the_database() {
    let fx = Fixture::new();
    fx.extractor(WORKING_EXTRACTOR);
    fx.clusterer("echo 'target file not found' >&2\nexit 1\n");

    let output = fx.analyze(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Deicide error:"));
    assert!(stderr.contains("target file not found"));
    assert_eq!(listing(&fx.path("out")), ["dependencies.db"]);
}

#[test]
fn missing_project_directory_fails() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "--project",
        fx.path("nope").to_str().unwrap(),
        "--output-dir",
        fx.path("out").to_str().unwrap(),
        "--filename",
        "src/Test.java",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("nope"));
    assert!(!fx.path("out").exists());
}

#[test]
fn help_shows_usage() {
    let fx = Fixture::new();
    let output = fx.run(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--project"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--filename"));
    assert!(stdout.contains("--dv8"));
    assert!(stdout.contains("--language"));
}

#[test]
fn missing_required_flags_exit_with_error() {
    let fx = Fixture::new();
    let output = fx.run(&["--project", "repo"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("--output-dir") || stderr.contains("--filename"));
}

#[test]
fn unknown_language_is_rejected() {
    let fx = Fixture::new();
    let output = fx.run(&["--project=p", "--output-dir=o", "--filename=f", "--lang=cobol"]);

    assert!(!output.status.success());
    assert!(!fx.path("o").exists());
}
