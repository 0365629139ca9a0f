//! Proximity conflict detection between a primary mission and other traffic.
//!
//! Samples both trajectories at a fixed cadence across their shared time
//! window and records every instant the separation drops below the
//! configured threshold.

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Mission;
use crate::rules::SafetyRules;
use crate::spatial::euclidean_distance;

/// A sampled instant at which the primary came too close to another mission.
///
/// `location` is the primary's interpolated position at that instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConflictEvent {
    pub time: DateTime<Utc>,
    pub location: (f64, f64, f64),
}

/// Conflict events keyed by the offending mission's name, ascending in time
/// within each key. A missing key means no conflict was found against that
/// mission; an empty map means the plan is clear.
pub type ConflictReport = HashMap<String, Vec<ConflictEvent>>;

/// Check the primary mission against other traffic with default rules.
pub fn check_conflicts(primary: &Mission, others: &[Mission]) -> ConflictReport {
    check_conflicts_with_rules(primary, others, &SafetyRules::default())
}

/// Check the primary mission against other traffic using configured rules.
///
/// Traffic sharing the primary's name is skipped entirely. A pair whose time
/// windows do not overlap produces no report entry.
pub fn check_conflicts_with_rules(
    primary: &Mission,
    others: &[Mission],
    rules: &SafetyRules,
) -> ConflictReport {
    let mut report = ConflictReport::new();
    for other in others {
        if other.name() == primary.name() {
            continue;
        }
        let events = scan_pair(primary, other, rules);
        if !events.is_empty() {
            report.insert(other.name().to_string(), events);
        }
    }
    report
}

/// Parallel variant of [`check_conflicts_with_rules`].
///
/// Each pair reads only immutable mission data, so the scan fans out across
/// the rayon pool and per-pair results collect into the same report shape.
/// Event order within a key comes from a single pair scan and is unaffected.
pub fn check_conflicts_parallel(
    primary: &Mission,
    others: &[Mission],
    rules: &SafetyRules,
) -> ConflictReport {
    others
        .par_iter()
        .filter(|other| other.name() != primary.name())
        .filter_map(|other| {
            let events = scan_pair(primary, other, rules);
            (!events.is_empty()).then(|| (other.name().to_string(), events))
        })
        .collect()
}

/// Sample one mission pair across its overlap window.
///
/// Returns the violating samples in ascending time order; empty when the
/// windows do not overlap or the separation never drops below the threshold.
fn scan_pair(primary: &Mission, other: &Mission, rules: &SafetyRules) -> Vec<ConflictEvent> {
    let latest_start = primary.start_time().max(other.start_time());
    let earliest_end = primary.end_time().min(other.end_time());

    let overlap = earliest_end - latest_start;
    if overlap <= Duration::zero() {
        return Vec::new();
    }

    // Sample at whole-second offsets covering the truncated overlap span.
    let step_secs = rules.time_step_secs.max(1);
    let overlap_secs = overlap.num_seconds();

    let mut events = Vec::new();
    let mut offset_secs = 0i64;
    while offset_secs <= overlap_secs {
        let t = latest_start + Duration::seconds(offset_secs);
        let p_primary = primary.position_at(t);
        let p_other = other.position_at(t);

        // Strict inequality: separation exactly at the threshold is not a
        // conflict, and a non-finite distance from degenerate coordinates
        // never compares below it, so bad samples drop out of the scan.
        if euclidean_distance(p_primary, p_other) < rules.distance_threshold_m {
            events.push(ConflictEvent {
                time: t,
                location: p_primary,
            });
        }

        offset_secs += step_secs;
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MissionPlan, Waypoint};
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn mission(
        name: &str,
        waypoints: Vec<Waypoint>,
        start_secs: i64,
        end_secs: i64,
    ) -> Mission {
        MissionPlan {
            name: name.to_string(),
            waypoints,
            start_time: Some(base_time() + Duration::seconds(start_secs)),
            end_time: Some(base_time() + Duration::seconds(end_secs)),
        }
        .build()
        .unwrap()
    }

    fn rules(threshold_m: f64, step_secs: i64) -> SafetyRules {
        SafetyRules {
            distance_threshold_m: threshold_m,
            time_step_secs: step_secs,
        }
    }

    #[test]
    fn linear_flyby_of_stationary_traffic_conflicts_at_closest_approach() {
        // Primary crosses (5,0,0) at t=5s; the hovering drone sits there.
        let primary = mission(
            "primary",
            vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)],
            0,
            10,
        );
        let hover = mission("SimDrone-001", vec![Waypoint::new(5.0, 0.0, 0.0)], 0, 10);

        let report = check_conflicts_with_rules(&primary, &[hover], &rules(1.0, 1));
        let events = report.get("SimDrone-001").expect("conflict entry");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time, base_time() + Duration::seconds(5));
        assert_eq!(events[0].location, (5.0, 0.0, 0.0));
    }

    #[test]
    fn disjoint_time_windows_never_conflict() {
        // Same path, but the windows do not intersect.
        let waypoints = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)];
        let primary = mission("primary", waypoints.clone(), 0, 10);
        let later = mission("SimDrone-001", waypoints, 20, 30);

        let report = check_conflicts(&primary, &[later]);
        assert!(report.is_empty());
    }

    #[test]
    fn stationary_traffic_conflicts_only_near_the_crossing_time() {
        // Primary passes through the origin at t=50s.
        let primary = mission(
            "primary",
            vec![
                Waypoint::new(-50.0, 0.0, 0.0),
                Waypoint::new(50.0, 0.0, 0.0),
            ],
            0,
            100,
        );
        let hover = mission("SimDrone-001", vec![Waypoint::new(0.0, 0.0, 0.0)], 0, 100);

        let report = check_conflicts_with_rules(&primary, &[hover], &rules(2.0, 5));
        let events = report.get("SimDrone-001").expect("conflict entry");
        assert!(!events.is_empty());
        for event in events {
            let offset = event.time - base_time();
            assert!((offset.num_seconds() - 50).abs() < 2);
        }
    }

    #[test]
    fn self_exclusion_skips_identically_named_mission() {
        let waypoints = vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)];
        let primary = mission("primary", waypoints.clone(), 0, 10);
        let shadow = mission("primary", waypoints, 0, 10);

        let report = check_conflicts(&primary, &[shadow]);
        assert!(report.is_empty());
    }

    #[test]
    fn separation_equal_to_threshold_is_not_a_conflict() {
        let primary = mission("primary", vec![Waypoint::new(0.0, 0.0, 0.0)], 0, 10);
        let at_threshold = mission("A", vec![Waypoint::new(10.0, 0.0, 0.0)], 0, 10);
        let inside = mission("B", vec![Waypoint::new(10.0 - 1e-6, 0.0, 0.0)], 0, 10);

        let report =
            check_conflicts_with_rules(&primary, &[at_threshold, inside], &rules(10.0, 5));
        assert!(!report.contains_key("A"));
        assert!(report.contains_key("B"));
    }

    #[test]
    fn events_are_recorded_in_ascending_time_order() {
        let primary = mission("primary", vec![Waypoint::new(0.0, 0.0, 0.0)], 0, 20);
        let neighbor = mission("SimDrone-001", vec![Waypoint::new(1.0, 0.0, 0.0)], 0, 20);

        let report = check_conflicts(&primary, &[neighbor]);
        let events = &report["SimDrone-001"];
        assert_eq!(events.len(), 5); // samples at 0, 5, 10, 15, 20
        for pair in events.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn zero_time_step_is_clamped_instead_of_looping_forever() {
        let primary = mission("primary", vec![Waypoint::new(0.0, 0.0, 0.0)], 0, 2);
        let neighbor = mission("A", vec![Waypoint::new(1.0, 0.0, 0.0)], 0, 2);

        let report = check_conflicts_with_rules(&primary, &[neighbor], &rules(10.0, 0));
        assert_eq!(report["A"].len(), 3); // samples at 0, 1, 2
    }

    #[test]
    fn parallel_check_matches_sequential_report() {
        let primary = mission(
            "primary",
            vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(40.0, 0.0, 0.0)],
            0,
            40,
        );
        let others = vec![
            mission("A", vec![Waypoint::new(10.0, 0.0, 0.0)], 0, 40),
            mission("B", vec![Waypoint::new(20.0, 3.0, 4.0)], 0, 40),
            mission("C", vec![Waypoint::new(0.0, 500.0, 0.0)], 0, 40),
            mission("primary", vec![Waypoint::new(0.0, 0.0, 0.0)], 0, 40),
            mission("D", vec![Waypoint::new(35.0, 0.0, 0.0)], 60, 90),
        ];

        let rules = rules(8.0, 5);
        let sequential = check_conflicts_with_rules(&primary, &others, &rules);
        let parallel = check_conflicts_parallel(&primary, &others, &rules);
        assert_eq!(sequential, parallel);
        assert!(sequential.contains_key("A"));
        assert!(!sequential.contains_key("C"));
        assert!(!sequential.contains_key("primary"));
        assert!(!sequential.contains_key("D"));
    }

    #[test]
    fn report_serializes_to_json() {
        let primary = mission("primary", vec![Waypoint::new(0.0, 0.0, 0.0)], 0, 10);
        let neighbor = mission("A", vec![Waypoint::new(1.0, 0.0, 0.0)], 0, 10);

        let report = check_conflicts(&primary, &[neighbor]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"A\""));
        assert!(json.contains("location"));
    }
}
