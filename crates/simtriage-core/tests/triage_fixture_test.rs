use serde::Deserialize;
use simtriage_core::classify::Outcome;
use simtriage_core::report::triage_with_segmentation;
use simtriage_core::signal::Signal;

#[derive(Debug, Deserialize)]
struct Fixture {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    lines: Vec<String>,
    expected_mode: String,
    expected_runs: Vec<ExpectedRun>,
}

#[derive(Debug, Deserialize)]
struct ExpectedRun {
    run_id: u32,
    outcome: Outcome,
    error_count: u32,
    multi_driven_count: u32,
    signals: Vec<Signal>,
}

#[test]
fn triage_fixture_matches_expected_runs() {
    let path = format!("{}/testdata/triage_fixture.json", env!("CARGO_MANIFEST_DIR"));
    let raw = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(err) => panic!("failed reading fixture {path}: {err}"),
    };
    let fixture: Fixture = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(err) => panic!("failed parsing fixture {path}: {err}"),
    };

    for case in fixture.cases {
        let result = triage_with_segmentation(&case.lines);
        assert_eq!(
            result.segmentation.mode.as_str(),
            case.expected_mode,
            "fixture case {}: mode",
            case.name
        );
        assert_eq!(
            result.reports.len(),
            case.expected_runs.len(),
            "fixture case {}: run count",
            case.name
        );

        for (got, want) in result.reports.iter().zip(&case.expected_runs) {
            assert_eq!(got.run_id, want.run_id, "fixture case {}: run_id", case.name);
            assert_eq!(
                got.outcome, want.outcome,
                "fixture case {} run {}: outcome",
                case.name, want.run_id
            );
            assert_eq!(
                got.error_count, want.error_count,
                "fixture case {} run {}: error_count",
                case.name, want.run_id
            );
            assert_eq!(
                got.multi_driven_count, want.multi_driven_count,
                "fixture case {} run {}: multi_driven_count",
                case.name, want.run_id
            );
            assert_eq!(
                got.signals, want.signals,
                "fixture case {} run {}: signals",
                case.name, want.run_id
            );
        }
    }
}
