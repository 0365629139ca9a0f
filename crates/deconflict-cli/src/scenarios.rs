//! Built-in sample missions for the demo subcommand.

use chrono::{DateTime, Duration, Utc};
use deconflict_core::{Mission, MissionError, MissionPlan, Waypoint};

/// Four overlapping sample missions around a common reference time.
///
/// The first is used as the primary and the rest as surrounding traffic.
pub fn sample_missions(now: DateTime<Utc>) -> Result<Vec<Mission>, MissionError> {
    let missions = vec![
        MissionPlan {
            name: "Flight_One".to_string(),
            waypoints: vec![
                Waypoint::new(0.0, 0.0, 0.0),
                Waypoint::new(10.0, 10.0, 5.0),
                Waypoint::new(20.0, 5.0, 10.0),
            ],
            start_time: Some(now),
            end_time: Some(now + Duration::minutes(15)),
        }
        .build()?,
        MissionPlan {
            name: "Flight_Two".to_string(),
            waypoints: vec![
                Waypoint::new(5.0, -5.0, 2.0),
                Waypoint::new(15.0, 15.0, 8.0),
                Waypoint::new(25.0, 10.0, 12.0),
            ],
            start_time: Some(now + Duration::minutes(5)),
            end_time: Some(now + Duration::minutes(20)),
        }
        .build()?,
        MissionPlan {
            name: "Flight_Three".to_string(),
            waypoints: vec![
                Waypoint::new(-10.0, 0.0, 3.0),
                Waypoint::new(0.0, 10.0, 6.0),
                Waypoint::new(10.0, 20.0, 9.0),
            ],
            start_time: Some(now - Duration::minutes(10)),
            end_time: Some(now + Duration::minutes(5)),
        }
        .build()?,
        MissionPlan {
            name: "Flight_Four".to_string(),
            waypoints: vec![
                Waypoint::new(0.0, 0.0, 0.0),
                Waypoint::new(5.0, 5.0, 7.0),
                Waypoint::new(15.0, 15.0, 7.0),
            ],
            start_time: Some(now + Duration::minutes(2)),
            end_time: Some(now + Duration::minutes(18)),
        }
        .build()?,
    ];
    Ok(missions)
}
