//! Command-line tests: run the `barrelfit` binary and check its output.

use std::process::Command;

fn run_barrelfit(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_barrelfit"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to run barrelfit")
}

#[test]
fn test_json_output_parses_for_portrait_sensor() {
    // Portrait sensors trigger a warning during comparison; it must not end up
    // on stdout next to the JSON.
    let out = run_barrelfit(&[
        "--width",
        "1080",
        "--height",
        "1920",
        "--focal-px",
        "1242.36",
        "--k1",
        "0.03",
        "--k2",
        "-0.03",
        "--compare",
        "--json",
    ]);
    assert!(out.status.success(), "exit status {:?}", out.status);

    let stdout = String::from_utf8(out.stdout).expect("stdout is not UTF-8");
    let value: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not valid JSON ({}):\n{}", e, stdout));

    assert_eq!(value["sensor"]["width"], 1080);
    assert_eq!(value["sensor"]["height"], 1920);
    assert!(value["fit"]["model"]["d"].is_f64());
    assert!(value["compare"]["n_samples"].as_u64().unwrap_or(0) > 0);
    assert_eq!(
        value["warper_argument"].as_str().map(|s| s.split_whitespace().count()),
        Some(4)
    );

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("portrait"),
        "expected the portrait warning on stderr, got:\n{}",
        stderr
    );
}

#[test]
fn test_text_output_reference_scenario() {
    let out = run_barrelfit(&[
        "--width",
        "2560",
        "--height",
        "1920",
        "--focal-px",
        "1242.36",
        "--k1",
        "0.03462446",
        "--k2",
        "-0.03762977",
    ]);
    assert!(out.status.success(), "exit status {:?}", out.status);

    let stdout = String::from_utf8(out.stdout).expect("stdout is not UTF-8");
    assert!(
        stdout.contains("Estimated a, b, c, d: -0.033540, 0.050022, -0.010481, 1.001258"),
        "unexpected output:\n{}",
        stdout
    );
    assert!(stdout.contains("-distort barrel '-0.033540 0.050022 -0.010481 1.001258'"));
}

#[test]
fn test_rejects_non_positive_focal_length() {
    let out = run_barrelfit(&["--focal-px", "0", "--k1", "0.1"]);
    assert!(!out.status.success());
}
