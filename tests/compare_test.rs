//! End-to-end comparison scenarios over persisted snapshots

use netstate::{compare_snapshots, Field, SkipReason, Snapshot, SpecRegistry, Value};
use pretty_assertions::assert_eq;

fn route_snapshot(routes: &[(&str, &str, &str, &str)]) -> Snapshot {
    let mut rows = vec![serde_json::json!(["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"])];
    for (network, mask, next_hop, interface) in routes {
        rows.push(serde_json::json!([network, mask, next_hop, interface]));
    }
    let doc = serde_json::json!([
        {"command": "show ip route", "encoding": "list", "result": rows}
    ]);
    Snapshot::from_json(&doc.to_string()).unwrap()
}

fn key_of(entry: &netstate::DiffEntry) -> Vec<String> {
    entry.key.iter().map(|f| f.value.to_string()).collect()
}

#[test]
fn changed_next_hop_reports_one_entry() {
    let a = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let b = route_snapshot(&[("10.0.0.0", "24", "2.2.2.2", "Eth1")]);

    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    let routes = &report.diffs["show ip route"];

    assert_eq!(routes.new.len(), 0);
    assert_eq!(routes.missing.len(), 0);
    assert_eq!(routes.changed.len(), 1);
    assert_eq!(key_of(&routes.changed[0]), vec!["10.0.0.0", "24"]);
}

#[test]
fn extra_route_is_new_one_way_and_missing_the_other() {
    let a = route_snapshot(&[
        ("10.0.0.0", "24", "1.1.1.1", "Eth1"),
        ("10.9.0.0", "16", "3.3.3.3", "Eth3"),
    ]);
    let b = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let registry = SpecRegistry::builtin();

    let forward = compare_snapshots(&a, &b, &registry);
    let routes = &forward.diffs["show ip route"];
    assert_eq!(routes.new.len(), 1);
    assert_eq!(routes.missing.len(), 0);
    assert_eq!(key_of(&routes.new[0]), vec!["10.9.0.0", "16"]);

    let backward = compare_snapshots(&b, &a, &registry);
    let routes = &backward.diffs["show ip route"];
    assert_eq!(routes.new.len(), 0);
    assert_eq!(routes.missing.len(), 1);
    assert_eq!(key_of(&routes.missing[0]), vec!["10.9.0.0", "16"]);
}

#[test]
fn identical_snapshots_compare_clean() {
    let a = route_snapshot(&[
        ("10.0.0.0", "24", "1.1.1.1", "Eth1"),
        ("10.1.0.0", "16", "2.2.2.2", "Eth2"),
    ]);

    let report = compare_snapshots(&a, &a, &SpecRegistry::builtin());
    assert!(report.is_clean());
    assert_eq!(report.total_differences(), 0);
    assert!(report.skipped.is_empty());
}

#[test]
fn ecmp_routes_collapse_before_comparison() {
    // Same prefix twice with different next hops: one logical entry.
    let a = route_snapshot(&[
        ("10.0.0.0", "24", "1.1.1.1", "Eth1"),
        ("10.0.0.0", "24", "2.2.2.2", "Eth2"),
    ]);
    let b = route_snapshot(&[
        ("10.0.0.0", "24", "2.2.2.2", "Eth2"),
        ("10.0.0.0", "24", "1.1.1.1", "Eth1"),
    ]);

    // Row order differs but the value sets match: clean.
    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    assert!(report.is_clean());

    // Dropping one ECMP leg is a change of the same single entry.
    let c = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let report = compare_snapshots(&a, &c, &SpecRegistry::builtin());
    let routes = &report.diffs["show ip route"];
    assert_eq!(routes.changed.len(), 1);
    assert_eq!(routes.new.len() + routes.missing.len(), 0);
}

#[test]
fn mismatched_command_sets_skip_with_diagnostics() {
    let a = Snapshot::from_json(
        r#"[{"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"]]}]"#,
    )
    .unwrap();
    let b = Snapshot::from_json(
        r#"[{"command": "show ip bgp", "encoding": "list",
             "result": [["NEIGHBOR", "STATE"]]}]"#,
    )
    .unwrap();

    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    assert!(report.diffs.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .all(|s| matches!(s.reason, SkipReason::Unpaired { .. })));
}

#[test]
fn changed_entry_carries_both_sides() {
    let a = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let b = route_snapshot(&[("10.0.0.0", "24", "2.2.2.2", "Eth1")]);

    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    let entry = &report.diffs["show ip route"].changed[0];

    let left = entry.left.as_ref().unwrap();
    let right = entry.right.as_ref().unwrap();

    let left_hop = left.iter().find(|f| f.column == "NEXT_HOP").unwrap();
    let right_hop = right.iter().find(|f| f.column == "NEXT_HOP").unwrap();
    assert_ne!(left_hop.value, right_hop.value);

    // Unchecked columns ride along for rendering, tagged by side.
    assert!(left.iter().any(|f| f.column == "INTERFACE"));
    assert!(right.iter().any(|f| f.column == "INTERFACE"));
}

#[test]
fn numeric_masks_match_across_representations() {
    let a = Snapshot::from_json(
        r#"[{"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"],
                        ["10.0.0.0", 24, "1.1.1.1", "Eth1"]]}]"#,
    )
    .unwrap();
    let b = Snapshot::from_json(
        r#"[{"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"],
                        ["10.0.0.0", 24.0, "1.1.1.1", "Eth1"]]}]"#,
    )
    .unwrap();

    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    assert!(report.is_clean());
}

#[test]
fn custom_registry_changes_what_counts_as_changed() {
    let a = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let b = route_snapshot(&[("10.0.0.0", "24", "2.2.2.2", "Eth1")]);

    // Only INTERFACE is checked; the next-hop change is invisible.
    let registry = SpecRegistry::from_yaml(
        r#"
show ip route:
  grouping: [NETWORK, MASK]
  index: [NETWORK, MASK]
  check: [INTERFACE]
"#,
    )
    .unwrap();

    let report = compare_snapshots(&a, &b, &registry);
    assert!(report.is_clean());
}

#[test]
fn report_serializes_to_json() {
    let a = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let b = route_snapshot(&[("10.0.0.0", "24", "2.2.2.2", "Eth1")]);

    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    let json = serde_json::to_string(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["diffs"]["show ip route"]["changed"][0]["key"][0]["column"], "NETWORK");

    let human = report.to_report();
    assert!(human.contains("show ip route"));
    assert!(human.contains("~ NETWORK=10.0.0.0 MASK=24"));
}

#[test]
fn key_fields_expose_typed_values() {
    let a = route_snapshot(&[("10.0.0.0", "24", "1.1.1.1", "Eth1")]);
    let b = route_snapshot(&[]);

    let report = compare_snapshots(&a, &b, &SpecRegistry::builtin());
    let entry = &report.diffs["show ip route"].new[0];
    assert_eq!(entry.key[0].column, "NETWORK");
    assert_eq!(entry.key[0].value, Field::One(Value::Text("10.0.0.0".into())));
}
