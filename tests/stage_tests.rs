#![cfg(unix)]

use chrono::NaiveDate;

use stormset::config::StageConfig;
use stormset::pipeline::{CommandStage, Stage, StageSignal};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn sh(name: &str, script: &str, not_found: Option<i32>) -> CommandStage {
    CommandStage::new(&StageConfig {
        name: name.into(),
        command: "sh".into(),
        args: vec!["-c".into(), script.into()],
        not_found_exit_code: not_found,
    })
}

#[tokio::test]
async fn test_exit_zero_is_success() {
    let stage = sh("fetch", "exit 0", Some(44));
    let signal = stage.run(d("2015-01-02")).await.unwrap();
    assert_eq!(signal, StageSignal::Success);
}

#[tokio::test]
async fn test_configured_exit_code_is_not_found() {
    let stage = sh("fetch", "exit 44", Some(44));
    let signal = stage.run(d("2015-01-02")).await.unwrap();
    assert_eq!(signal, StageSignal::NotFound);
}

#[tokio::test]
async fn test_same_exit_code_without_mapping_is_error() {
    let stage = sh("derive-points", "exit 44", None);
    let signal = stage.run(d("2015-01-02")).await.unwrap();
    assert!(matches!(signal, StageSignal::Error { .. }));
}

#[tokio::test]
async fn test_nonzero_exit_is_error_with_code() {
    let stage = sh("fetch", "exit 3", Some(44));
    match stage.run(d("2015-01-02")).await.unwrap() {
        StageSignal::Error { message } => assert!(message.contains('3')),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unspawnable_command_is_error_not_panic() {
    let stage = CommandStage::new(&StageConfig {
        name: "fetch".into(),
        command: "/nonexistent/binary".into(),
        args: vec![],
        not_found_exit_code: None,
    });
    let signal = stage.run(d("2015-01-02")).await.unwrap();
    assert!(matches!(signal, StageSignal::Error { .. }));
}

#[tokio::test]
async fn test_date_is_passed_via_env_and_placeholder() {
    // Exits 0 only when the env var and the substituted argument agree on
    // the expected ISO date.
    let stage = sh(
        "fetch",
        r#"test "$STORMSET_DATE" = "2015-01-02" && test "{date}" = "2015-01-02""#,
        None,
    );
    let signal = stage.run(d("2015-01-02")).await.unwrap();
    assert_eq!(signal, StageSignal::Success);
}
