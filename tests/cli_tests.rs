// Integration tests for the speedup-bench binary
//
// A small shell script stands in for the benchmark target. It logs every
// invocation and prints a fixed timing per thread count:
// - serial           -> 2.0 s
// - 2 threads        -> 1.0 s
// - 4 threads        -> 0.5 s
// - anything else    -> 2.0 s

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Target {
    dir: TempDir,
    script: PathBuf,
    log: PathBuf,
}

impl Target {
    fn with_body(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("invocations.log");
        let script = dir.path().join("target.sh");
        let text = format!("echo \"$@\" >> '{}'\n{}\n", log.display(), body);
        fs::write(&script, text).unwrap();
        Self { dir, script, log }
    }

    fn scaling() -> Self {
        Self::with_body(
            "case \"$3\" in\n  2) echo 1.0 ;;\n  4) echo 0.5 ;;\n  *) echo 2.0 ;;\nesac",
        )
    }

    fn output_dir(&self) -> PathBuf {
        self.dir.path().join("graphs")
    }

    fn invocations(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(text) => text.lines().map(|l| l.to_string()).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("speedup-bench").unwrap();
        cmd.arg("--program")
            .arg("sh")
            .arg("--program-arg")
            .arg(&self.script)
            .arg("--output-dir")
            .arg(self.output_dir());
        cmd
    }

    fn write_config(&self, text: &str) -> PathBuf {
        let path = self.dir.path().join("bench.toml");
        fs::write(&path, text).unwrap();
        path
    }
}

fn png_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.ends_with(".png"))
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

#[test]
fn test_unknown_argument_fails_before_spawning() {
    let target = Target::scaling();
    target
        .command()
        .arg("huge")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid arg"))
        .stderr(predicate::str::contains("huge"));

    assert!(target.invocations().is_empty());
    assert!(png_files(&target.output_dir()).is_empty());
}

#[test]
fn test_reduced_run_uses_single_cell() {
    let target = Target::scaling();
    target
        .command()
        .arg("small")
        .arg("--runs")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("median 2.000 s"))
        .stdout(predicate::str::contains("median 1.000 s"));

    assert_eq!(target.invocations(), ["small", "small pipeline 2"]);
    assert_eq!(png_files(&target.output_dir()), ["pipeline.png"]);
}

#[test]
fn test_reduced_run_repeats_each_trial_five_times() {
    let target = Target::scaling();
    target.command().arg("small").assert().success();

    let calls = target.invocations();
    assert_eq!(calls.len(), 10);
    assert!(calls[..5].iter().all(|c| c == "small"));
    assert!(calls[5..].iter().all(|c| c == "small pipeline 2"));
}

#[test]
fn test_json_report_contains_speedups() {
    let target = Target::scaling();
    let config = target.write_config(
        "[matrix]\nsizes = [\"small\"]\nmodes = [\"pipeline\"]\nthreads = [2, 4]\n",
    );

    let output = target
        .command()
        .arg("--config")
        .arg(&config)
        .arg("--runs")
        .arg("1")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["speedups"], serde_json::json!([[[2.0, 4.0]]]));
    assert_eq!(report["baseline"], serde_json::json!([2.0]));
}

#[test]
fn test_failing_target_aborts_before_plotting() {
    let target = Target::with_body("echo boom >&2\nexit 1");
    target
        .command()
        .arg("small")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("status 1"))
        .stderr(predicate::str::contains("boom"));

    // the very first serial invocation fails, nothing else runs
    assert_eq!(target.invocations().len(), 1);
    assert!(png_files(&target.output_dir()).is_empty());
}

#[test]
fn test_garbage_output_is_fatal() {
    let target = Target::with_body("echo done");
    target
        .command()
        .arg("small")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));
}

#[test]
fn test_zero_timing_is_fatal() {
    let target = Target::with_body("if [ -z \"$2\" ]; then echo 1.0; else echo 0.0; fi");
    target
        .command()
        .arg("small")
        .arg("--runs")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Degenerate Measurement"));

    assert!(png_files(&target.output_dir()).is_empty());
}

#[test]
fn test_full_matrix_from_config_writes_one_plot_per_mode() {
    let target = Target::scaling();
    let config = target.write_config(
        "runs = 1\n\n[matrix]\n\
         sizes = [\"small\", \"big\"]\n\
         modes = [\"pipeline\", \"bsp\"]\n\
         threads = [2, 4]\n",
    );

    target.command().arg("--config").arg(&config).assert().success();

    assert_eq!(target.invocations().len(), 2 + 2 * 2 * 2);
    assert_eq!(png_files(&target.output_dir()), ["bsp.png", "pipeline.png"]);
}

#[test]
fn test_rerun_replaces_artifact() {
    let target = Target::scaling();
    fs::create_dir_all(target.output_dir()).unwrap();
    fs::write(target.output_dir().join("pipeline.png"), b"stale").unwrap();

    target.command().arg("small").arg("--runs").arg("1").assert().success();
    target.command().arg("small").arg("--runs").arg("1").assert().success();

    assert_eq!(png_files(&target.output_dir()), ["pipeline.png"]);
    let image = image::open(target.output_dir().join("pipeline.png")).unwrap();
    assert_eq!(image.width(), 640);
}

#[test]
fn test_invalid_config_file_is_reported() {
    let target = Target::scaling();
    let config = target
        .write_config("[matrix]\nsizes = [\"small\"]\nmodes = [\"serial\"]\nthreads = [2]\n");

    target
        .command()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("reserved"));

    assert!(target.invocations().is_empty());
}
