use pctsptw_structs::{config::ConversionConfig, core::*};
use pctsptw_utils::dejsonify;
use serde_json::{json, Value};
use std::path::PathBuf;

fn outcomes() -> Vec<FileOutcome> {
    vec![
        FileOutcome::Converted(ConvertedInstance {
            rel_path: "n20w20/a.txt".to_string(),
            out_path: PathBuf::from("out/n20w20/a_pctsptw.txt"),
            seed: 42,
            num_nodes: 21,
            metric_closure_applied: true,
            total_reward: 1000,
            quota: 650,
        }),
        FileOutcome::Skipped {
            rel_path: "n20w20/b.txt".to_string(),
            reason: "empty instance file".to_string(),
        },
    ]
}

#[test]
fn test_report_counts() {
    let report = ConversionReport::new(ConversionConfig::default(), outcomes());
    assert_eq!(report.num_files, 2);
    assert_eq!(report.num_converted, 1);
    assert_eq!(report.num_skipped(), 1);
    assert_eq!(report.outcomes[1].rel_path(), "n20w20/b.txt");
}

#[test]
fn test_outcome_json_is_tagged() {
    let value = serde_json::to_value(&outcomes()).unwrap();
    assert_eq!(
        value[1],
        json!({
            "status": "skipped",
            "rel_path": "n20w20/b.txt",
            "reason": "empty instance file",
        })
    );
    assert_eq!(value[0]["status"], "converted");
    assert_eq!(value[0]["quota"], 650);
}

#[test]
fn test_report_json_reads_back() {
    let report = ConversionReport::new(ConversionConfig::default(), outcomes());
    let s = report.to_json().unwrap();
    let value = dejsonify::<Value>(&s).unwrap();
    assert_eq!(value["num_converted"], 1);
    assert_eq!(dejsonify::<ConversionReport>(&s).unwrap(), report);
}
