//! End-to-end scenarios through the public API: register, run, observe
//! callback effects.

use std::cell::RefCell;
use std::rc::Rc;

use optline_core::{DependencyError, OptionSpec, ParamType, Parser, RunError};

/// Shared recorder the scenario callbacks write into.
#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn sink(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.events)
    }

    fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

fn deploy_parser(recorder: &Recorder) -> Parser {
    let mut parser = Parser::new("deployctl", "2.1.0", "toy deployment driver");

    let sink = recorder.sink();
    parser
        .add_option(
            OptionSpec::new("host")
                .with_description("Target host and port")
                .with_params(&[ParamType::Str, ParamType::U16]),
            move |values| {
                sink.borrow_mut().push(format!(
                    "host={}:{}",
                    values[0].as_str().unwrap(),
                    values[1].as_u64().unwrap(),
                ));
            },
        )
        .expect("host registers");

    let sink = recorder.sink();
    parser
        .add_option(
            OptionSpec::new("retries")
                .with_description("Retry budget")
                .with_params(&[ParamType::U8]),
            move |values| {
                sink.borrow_mut()
                    .push(format!("retries={}", values[0].as_u64().unwrap()));
            },
        )
        .expect("retries registers");

    let sink = recorder.sink();
    parser
        .add_option(
            OptionSpec::new("deploy").with_description("Run the deployment"),
            move |_| sink.borrow_mut().push("deploy".to_string()),
        )
        .expect("deploy registers");

    let sink = recorder.sink();
    parser
        .add_option(
            OptionSpec::new("rollback")
                .with_description("Undo everything and stop"),
            move |_| sink.borrow_mut().push("rollback".to_string()),
        )
        .expect("rollback registers");

    parser
        .add_requirement("deploy", &["host"])
        .expect("deploy dependency declares");
    parser
        .add_conflict("deploy", &["rollback"])
        .expect("deploy conflict declares");
    parser
        .make_exclusive("rollback")
        .expect("rollback becomes exclusive");

    parser
}

#[test]
fn test_full_run_dispatches_in_input_order() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    let report = parser
        .run(["retries", "3", "host", "prod.example", "8443", "deploy"])
        .expect("run should succeed");

    assert_eq!(report.executed, ["retries", "host", "deploy"]);
    assert_eq!(
        recorder.events(),
        ["retries=3", "host=prod.example:8443", "deploy"]
    );
}

#[test]
fn test_missing_requirement_cancels_the_whole_batch() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    let err = parser.run(["retries", "3", "deploy"]).unwrap_err();
    assert_eq!(
        err,
        RunError::Dependency(vec![DependencyError::MissingRequired {
            option: "deploy".to_string(),
            missing: vec!["host".to_string()],
        }]),
    );
    assert!(recorder.events().is_empty(), "no callback may fire");
}

#[test]
fn test_exclusive_option_blocks_everything_when_combined() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    let err = parser.run(["rollback", "retries", "1"]).unwrap_err();
    let RunError::Dependency(violations) = err else {
        panic!("expected a dependency failure");
    };
    assert!(violations.iter().any(|v| matches!(
        v,
        DependencyError::Conflict { option, .. } if option == "rollback"
    )));
    assert!(recorder.events().is_empty());
}

#[test]
fn test_exclusive_option_runs_alone() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    let report = parser.run(["rollback"]).expect("rollback alone is fine");
    assert_eq!(report.executed, ["rollback"]);
    assert_eq!(recorder.events(), ["rollback"]);
}

#[test]
fn test_conversion_failure_reports_usage_label_and_literal() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    let err = parser
        .run(["host", "prod.example", "not-a-port"])
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("host"), "message: {message}");
    assert!(message.contains("<u16>"), "message: {message}");
    assert!(message.contains("not-a-port"), "message: {message}");
    assert!(recorder.events().is_empty());
}

#[test]
fn test_hex_fallback_applies_through_the_run_loop() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    // "1f90" fails the decimal parse and converts as bare hex (0x1f90 = 8080)
    parser
        .run(["host", "localhost", "1f90"])
        .expect("hex port should parse");
    assert_eq!(recorder.events(), ["host=localhost:8080"]);
}

#[test]
fn test_run_line_accepts_quoted_string_parameters() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    parser
        .run_line("host \"staging box\" 80")
        .expect("quoted host should parse");
    assert_eq!(recorder.events(), ["host=staging box:80"]);
}

#[test]
fn test_help_keyword_suppresses_the_batch() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    let report = parser.run(["retries", "3", "?"]).expect("help run succeeds");
    assert!(report.help_shown);
    assert!(report.executed.is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_summary_reflects_declared_dependencies() {
    let recorder = Recorder::default();
    let parser = deploy_parser(&recorder);

    let summary = parser.summary();
    let deploy = summary
        .options
        .iter()
        .find(|option| option.name == "deploy")
        .expect("deploy is registered");
    assert_eq!(deploy.requires, ["host"]);
    assert_eq!(deploy.conflicts, ["rollback"]);

    let json = serde_json::to_string_pretty(&summary).expect("summary serializes");
    assert!(json.contains("\"program\": \"deployctl\""));
}

#[test]
fn test_parser_survives_failed_runs() {
    let recorder = Recorder::default();
    let mut parser = deploy_parser(&recorder);

    assert!(parser.run(["bogus"]).is_err());
    assert!(parser.run(["retries", "way-too-many"]).is_err());

    let report = parser.run(["retries", "2"]).expect("parser still works");
    assert_eq!(report.executed, ["retries"]);
    assert_eq!(recorder.events(), ["retries=2"]);
}
