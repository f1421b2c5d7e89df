//! Property-based tests for homelab summaries
//!
//! These tests verify invariants that must hold for all inputs:
//! - Pod phase buckets always sum to the pod count
//! - ArgoCD sync tallies partition the app list
//! - Alert results stay bounded and respect the severity filter
//! - Summarizers never panic on arbitrary JSON
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;
use serde_json::{json, Value};

/// Phase strings kubectl can report, plus junk and missing values
fn phase() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(Some("Running".to_string())),
        Just(Some("Pending".to_string())),
        Just(Some("Failed".to_string())),
        Just(Some("Succeeded".to_string())),
        Just(Some("Unknown".to_string())),
        Just(None),
        "[a-zA-Z]{0,12}".prop_map(Some),
    ]
}

/// Arbitrary shallow JSON values
fn any_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,16}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::hash_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

// ============================================================================
// POD SUMMARY TESTS
// ============================================================================

mod pod_tests {
    use super::*;
    use homelab::tools::pods::summarize_pods;

    fn pods(phases: &[Option<String>]) -> Value {
        let items: Vec<Value> = phases
            .iter()
            .map(|p| match p {
                Some(p) => json!({"status": {"phase": p}}),
                None => json!({"status": {}}),
            })
            .collect();
        json!({ "items": items })
    }

    proptest! {
        /// Invariant: buckets sum exactly to the total, which is the item count
        #[test]
        fn buckets_sum_to_total(phases in prop::collection::vec(phase(), 0..64)) {
            let counts = summarize_pods(pods(&phases)).summary;
            prop_assert_eq!(counts.total, phases.len());
            prop_assert_eq!(
                counts.running + counts.pending + counts.failed + counts.unknown,
                counts.total
            );
        }

        /// Invariant: anything outside Running/Pending/Failed lands in unknown
        #[test]
        fn other_phases_are_unknown(phases in prop::collection::vec(phase(), 0..64)) {
            let expected_unknown = phases
                .iter()
                .filter(|p| !matches!(p.as_deref(), Some("Running" | "Pending" | "Failed")))
                .count();
            prop_assert_eq!(summarize_pods(pods(&phases)).summary.unknown, expected_unknown);
        }

        /// Invariant: never panics on arbitrary JSON
        #[test]
        fn never_panics(raw in any_json()) {
            let _ = summarize_pods(raw);
        }
    }
}

// ============================================================================
// ARGOCD SUMMARY TESTS
// ============================================================================

mod argocd_tests {
    use super::*;
    use homelab::tools::argocd::summarize_apps;

    fn status() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(Some("Synced".to_string())),
            Just(Some("OutOfSync".to_string())),
            Just(Some("Healthy".to_string())),
            Just(Some("Degraded".to_string())),
            Just(Some("Progressing".to_string())),
            Just(None),
        ]
    }

    proptest! {
        /// Invariant: synced + out_of_sync == total and healthy + degraded <= total
        #[test]
        fn tallies_hold(apps in prop::collection::vec((status(), status()), 0..48)) {
            let items: Vec<Value> = apps
                .iter()
                .enumerate()
                .map(|(i, (sync, health))| json!({
                    "metadata": {"name": format!("app-{i}")},
                    "status": {"sync": {"status": sync}, "health": {"status": health}}
                }))
                .collect();

            let summary = summarize_apps(&json!({ "items": items }));
            prop_assert_eq!(summary.total, apps.len());
            prop_assert_eq!(summary.synced + summary.out_of_sync, summary.total);
            prop_assert!(summary.healthy + summary.degraded <= summary.total);
            prop_assert_eq!(summary.apps.len(), summary.total);
        }

        /// Invariant: never panics on arbitrary JSON
        #[test]
        fn never_panics(raw in any_json()) {
            let _ = summarize_apps(&raw);
        }
    }
}

// ============================================================================
// ALERT FILTER TESTS
// ============================================================================

mod alert_tests {
    use super::*;
    use homelab::config::MAX_ALERTS;
    use homelab::tools::alerts::summarize_alerts;

    fn alert() -> impl Strategy<Value = Value> {
        (
            prop_oneof![Just("critical"), Just("warning"), Just("info")],
            prop_oneof![Just("firing"), Just("pending"), Just("inactive")],
        )
            .prop_map(|(severity, state)| json!({"labels": {"severity": severity}, "state": state}))
    }

    proptest! {
        /// Invariant: the returned list never exceeds the cap
        #[test]
        fn bounded(alerts in prop::collection::vec(alert(), 0..40)) {
            let payload = json!({"data": {"alerts": alerts}});
            let summary = summarize_alerts(&payload, None).unwrap();
            prop_assert!(summary.alerts.len() <= MAX_ALERTS);
            prop_assert_eq!(summary.alerts.len(), summary.active_alerts.min(MAX_ALERTS));
            prop_assert!(summary.active_alerts <= summary.total_alerts);
        }

        /// Invariant: with a severity filter every returned alert matches it and is firing
        #[test]
        fn filter_respected(
            alerts in prop::collection::vec(alert(), 0..40),
            severity in prop_oneof![Just("critical"), Just("warning"), Just("info")],
        ) {
            let payload = json!({"data": {"alerts": alerts.clone()}});
            let summary = summarize_alerts(&payload, Some(severity)).unwrap();

            let matching = alerts
                .iter()
                .filter(|a| a["labels"]["severity"] == severity)
                .count();
            prop_assert_eq!(summary.total_alerts, matching);
            for a in &summary.alerts {
                prop_assert_eq!(&a["labels"]["severity"], severity);
                prop_assert_eq!(&a["state"], "firing");
            }
        }

        /// Invariant: never panics on arbitrary JSON
        #[test]
        fn never_panics(raw in any_json(), severity in proptest::option::of("[a-z]{0,8}")) {
            let _ = summarize_alerts(&raw, severity.as_deref());
        }
    }
}
