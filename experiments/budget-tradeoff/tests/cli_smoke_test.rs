use std::{fs, process::Command};

use tempfile::TempDir;

const EXPORT: &str = "\
,learner id,fold id,Rel Number of Label Acquisitions,classifications correct (percent)
0,0,0,0.01,55.0
1,0,0,0.10,61.0
2,0,1,0.02,54.0
3,0,1,0.11,63.5
4,1,0,0.20,70.0
5,1,0,0.48,68.0
6,2,0,0.30,66.0
";

#[test]
fn plots_and_updates_report() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("budgets.csv");
    fs::write(&results, EXPORT).unwrap();
    let figure = dir.path().join("out/tradeoff.png");
    let report = dir.path().join("report.md");

    let output = Command::new(env!("CARGO_BIN_EXE_alstream-tradeoff"))
        .arg("-f")
        .arg(&results)
        .arg("-o")
        .arg(&figure)
        .arg("-r")
        .arg(&report)
        .arg("-c")
        .arg(dir.path().join("tradeoff.json"))
        .output()
        .expect("failed to run alstream-tradeoff");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("plotted 4 folds of 3 learners"), "stdout: {stdout}");
    assert!(stdout.contains("learner 0: #ff0000 (2 folds)"), "stdout: {stdout}");
    assert!(stdout.contains("learner 1: #00ffff (1 folds)"), "stdout: {stdout}");

    let png = fs::read(&figure).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");

    let report = fs::read_to_string(&report).unwrap();
    assert!(report.contains("| 1 | #00ffff | 0 | 0.4800 | 68.00 | 5 |"), "report: {report}");
    assert!(report.contains("![Accuracy vs. labelling cost (budgets.csv)](data:image/png;base64,"));
    assert!(report.contains("x: relative number of label acquisitions, y: classifications correct (%)"));
    assert!(report.contains("- learner 2: #ff0000 (1 folds)"));
}

#[test]
fn missing_accuracy_column_fails() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("broken.csv");
    fs::write(
        &results,
        ",learner id,fold id,Rel Number of Label Acquisitions\n0,0,0,0.1\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_alstream-tradeoff"))
        .arg("-f")
        .arg(&results)
        .arg("-c")
        .arg(dir.path().join("tradeoff.json"))
        .output()
        .expect("failed to run alstream-tradeoff");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing required column 'classifications correct (percent)'"),
        "stderr: {stderr}"
    );
}

#[test]
fn missing_result_flag_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_alstream-tradeoff"))
        .output()
        .expect("failed to run alstream-tradeoff");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: alstream-tradeoff"));
}
