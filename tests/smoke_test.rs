//! Smoke test to verify basic functionality

use netstate::{compare_snapshots, Snapshot, SpecRegistry};

#[test]
fn smoke_test_basic_compare() {
    let before = Snapshot::from_json(
        r#"[{"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"],
                        ["10.0.0.0", "24", "1.1.1.1", "Eth1"],
                        ["10.1.0.0", "16", "2.2.2.2", "Eth2"]]}]"#,
    )
    .unwrap();
    let after = Snapshot::from_json(
        r#"[{"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"],
                        ["10.0.0.0", "24", "1.1.1.1", "Eth1"],
                        ["10.2.0.0", "16", "3.3.3.3", "Eth3"]]}]"#,
    )
    .unwrap();

    let report = compare_snapshots(&before, &after, &SpecRegistry::builtin());

    // Basic sanity checks
    let routes = &report.diffs["show ip route"];
    assert_eq!(routes.new.len(), 1);
    assert_eq!(routes.missing.len(), 1);
    assert!(routes.changed.is_empty());
    assert_eq!(report.total_differences(), 2);
    assert!(!report.to_report().is_empty());
}
