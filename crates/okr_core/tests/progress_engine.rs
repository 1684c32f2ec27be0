use okr_core::{
    derive_status, key_result_progress, objective_progress, status_breakdown, unique_owners,
    KeyResult, KeyResultType, Objective, ObjectiveStatus,
};

fn kr(start: f64, target: f64, current: f64) -> KeyResult {
    KeyResult {
        id: Some("kr".to_string()),
        title: "metric".to_string(),
        how_it_is_measured: "dashboard".to_string(),
        kind: KeyResultType::Numeric,
        start_value: start,
        target_value: target,
        current_value: current,
    }
}

fn objective(owner: &str, status: Option<ObjectiveStatus>, key_results: Vec<KeyResult>) -> Objective {
    Objective {
        id: format!("obj-{owner}"),
        title: "Ship the thing".to_string(),
        description: "desc".to_string(),
        owner: owner.to_string(),
        why_is_important: None,
        status,
        key_results,
        q2_status_update: None,
        q3_status_update: None,
        final_status_update: None,
    }
}

/// Objective whose single Key Result sits at exactly `progress` percent.
fn objective_at(progress: f64, status: Option<ObjectiveStatus>) -> Objective {
    objective("Team", status, vec![kr(0.0, 100.0, progress)])
}

#[test]
fn degenerate_range_is_zero() {
    assert_eq!(key_result_progress(&kr(5.0, 5.0, 5.0)), 0.0);
    assert_eq!(key_result_progress(&kr(5.0, 5.0, 500.0)), 0.0);
    assert_eq!(key_result_progress(&kr(0.0, 0.0, -3.0)), 0.0);
}

#[test]
fn decreasing_metric_measures_distance_down() {
    assert_eq!(key_result_progress(&kr(10.0, 0.0, 4.0)), 60.0);
    assert_eq!(key_result_progress(&kr(250.0, 150.0, 180.0)), 70.0);
}

#[test]
fn increasing_metric_measures_distance_up() {
    assert_eq!(key_result_progress(&kr(0.0, 20.0, 15.0)), 75.0);
    assert_eq!(key_result_progress(&kr(0.0, 500.0, 350.0)), 70.0);
}

#[test]
fn progress_is_clamped_for_overshoot_and_regression() {
    let cases = [
        kr(0.0, 20.0, 40.0),
        kr(0.0, 20.0, -40.0),
        kr(10.0, 0.0, -100.0),
        kr(10.0, 0.0, 1_000.0),
        kr(-5.0, 5.0, 1e12),
        kr(f64::MIN, f64::MAX, 0.0),
    ];
    for case in &cases {
        let progress = key_result_progress(case);
        assert!(
            (0.0..=100.0).contains(&progress),
            "progress {progress} out of range for {case:?}"
        );
    }
    assert_eq!(key_result_progress(&kr(0.0, 20.0, 40.0)), 100.0);
    assert_eq!(key_result_progress(&kr(10.0, 0.0, 11.0)), 0.0);
}

#[test]
fn non_finite_values_never_escape_range() {
    assert_eq!(key_result_progress(&kr(0.0, 10.0, f64::NAN)), 0.0);
    assert_eq!(key_result_progress(&kr(0.0, 10.0, f64::INFINITY)), 100.0);
}

#[test]
fn objective_without_key_results_is_zero() {
    assert_eq!(objective_progress(&objective("Team", None, Vec::new())), 0.0);
}

#[test]
fn objective_progress_is_unweighted_mean() {
    let obj = objective(
        "Team",
        None,
        vec![kr(0.0, 20.0, 15.0), kr(10.0, 0.0, 4.0), kr(0.0, 1_000_000.0, 0.0)],
    );
    assert_eq!(objective_progress(&obj), (75.0 + 60.0 + 0.0) / 3.0);
}

#[test]
fn terminal_status_overrides_progress() {
    let completed = objective_at(10.0, Some(ObjectiveStatus::Completed));
    assert_eq!(derive_status(&completed), ObjectiveStatus::Completed);

    let missed = objective_at(95.0, Some(ObjectiveStatus::DidNotMeet));
    assert_eq!(derive_status(&missed), ObjectiveStatus::DidNotMeet);
}

#[test]
fn status_is_derived_from_progress_when_not_terminal() {
    assert_eq!(derive_status(&objective_at(72.0, None)), ObjectiveStatus::OnTrack);
    assert_eq!(derive_status(&objective_at(50.0, None)), ObjectiveStatus::AtRisk);
    assert_eq!(derive_status(&objective_at(10.0, None)), ObjectiveStatus::OffTrack);
}

#[test]
fn stored_non_terminal_status_is_ignored() {
    let stale = objective_at(10.0, Some(ObjectiveStatus::OnTrack));
    assert_eq!(derive_status(&stale), ObjectiveStatus::OffTrack);

    let pessimistic = objective_at(90.0, Some(ObjectiveStatus::OffTrack));
    assert_eq!(derive_status(&pessimistic), ObjectiveStatus::OnTrack);
}

#[test]
fn breakdown_counts_every_status() {
    let objectives = vec![
        objective_at(90.0, None),
        objective_at(80.0, Some(ObjectiveStatus::AtRisk)),
        objective_at(40.0, None),
        objective_at(5.0, Some(ObjectiveStatus::Completed)),
    ];
    let breakdown = status_breakdown(&objectives);

    assert_eq!(breakdown.count(ObjectiveStatus::OnTrack), 2);
    assert_eq!(breakdown.count(ObjectiveStatus::AtRisk), 1);
    assert_eq!(breakdown.count(ObjectiveStatus::OffTrack), 0);
    assert_eq!(breakdown.count(ObjectiveStatus::Completed), 1);
    assert_eq!(breakdown.count(ObjectiveStatus::DidNotMeet), 0);
    assert_eq!(breakdown.total(), 4);
    assert_eq!(breakdown.iter().count(), 5);
}

#[test]
fn unique_owners_keep_first_seen_order() {
    let objectives = vec![
        objective("Product Team", None, vec![]),
        objective("Marketing Team", None, vec![]),
        objective("Product Team", None, vec![]),
    ];
    assert_eq!(
        unique_owners(&objectives),
        vec!["Product Team".to_string(), "Marketing Team".to_string()]
    );
}
