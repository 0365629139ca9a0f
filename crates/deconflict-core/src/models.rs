//! Core data models for mission deconfliction.
//!
//! A [`MissionPlan`] is the raw description handed over by a loader or
//! operator; [`MissionPlan::build`] validates it into an immutable
//! [`Mission`] whose waypoints all carry resolved timestamps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`Mission`] from plan data.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("mission `{0}` has no waypoints")]
    NoWaypoints(String),
    #[error("mission `{0}` mixes timed and untimed waypoints")]
    PartiallyTimed(String),
    #[error("mission `{0}` has untimed waypoints but no start/end window to derive them from")]
    MissingTimeWindow(String),
}

/// A single 3D waypoint, optionally tagged with a mission time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    /// Altitude. Defaults to 0.0 for 2D mission input.
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

impl Waypoint {
    /// Create an untimed waypoint.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, time: None }
    }

    /// Create a waypoint with an explicit mission time.
    pub fn timed(x: f64, y: f64, z: f64, time: DateTime<Utc>) -> Self {
        Self {
            x,
            y,
            z,
            time: Some(time),
        }
    }
}

/// Raw mission description prior to validation.
///
/// Waypoints must be either all timed or all untimed. An untimed plan needs
/// a start/end window so timestamps can be derived; a fully timed plan may
/// omit the window and have it taken from the first/last waypoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionPlan {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl MissionPlan {
    /// Validate the plan and resolve waypoint times.
    pub fn build(self) -> Result<Mission, MissionError> {
        let MissionPlan {
            name,
            waypoints,
            start_time,
            end_time,
        } = self;

        if waypoints.is_empty() {
            return Err(MissionError::NoWaypoints(name));
        }

        let timed = waypoints.iter().filter(|wp| wp.time.is_some()).count();
        if timed > 0 && timed < waypoints.len() {
            return Err(MissionError::PartiallyTimed(name));
        }

        let resolved: Vec<TimedWaypoint> = if timed == waypoints.len() {
            waypoints
                .iter()
                .filter_map(|wp| {
                    wp.time.map(|time| TimedWaypoint {
                        time,
                        x: wp.x,
                        y: wp.y,
                        z: wp.z,
                    })
                })
                .collect()
        } else {
            let (Some(start), Some(end)) = (start_time, end_time) else {
                return Err(MissionError::MissingTimeWindow(name));
            };
            spread_over_window(&waypoints, start, end)
        };

        // Both branches map the non-empty waypoint list 1:1.
        let start_time = start_time.unwrap_or(resolved[0].time);
        let end_time = end_time.unwrap_or(resolved[resolved.len() - 1].time);

        Ok(Mission {
            name,
            waypoints: resolved,
            start_time,
            end_time,
        })
    }
}

/// Evenly distribute untimed waypoints across the mission window.
fn spread_over_window(
    waypoints: &[Waypoint],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<TimedWaypoint> {
    let n = waypoints.len();
    if n == 1 {
        let wp = waypoints[0];
        return vec![TimedWaypoint {
            time: start,
            x: wp.x,
            y: wp.y,
            z: wp.z,
        }];
    }

    let span_ms = (end - start).num_milliseconds() as f64;
    waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| {
            let offset_ms = (span_ms * i as f64 / (n - 1) as f64).round() as i64;
            TimedWaypoint {
                time: start + Duration::milliseconds(offset_ms),
                x: wp.x,
                y: wp.y,
                z: wp.z,
            }
        })
        .collect()
}

/// A waypoint whose mission time has been resolved.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimedWaypoint {
    pub time: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TimedWaypoint {
    pub fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

/// A validated, immutable time-parameterized flight path.
///
/// One type serves both roles of a deconfliction check: the primary mission
/// under review and the surrounding traffic it is checked against.
#[derive(Debug, Clone, Serialize)]
pub struct Mission {
    name: String,
    waypoints: Vec<TimedWaypoint>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl Mission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn waypoints(&self) -> &[TimedWaypoint] {
        &self.waypoints
    }

    /// Interpolated position at `t`, defined for every instant.
    ///
    /// Before the first waypoint the position clamps to it, and likewise
    /// after the last. In between, the enclosing segment is found by binary
    /// search over the waypoint times and interpolated linearly. Waypoint
    /// times are assumed non-decreasing; with out-of-order input the lookup
    /// degrades to a nearest-segment result but never fails.
    pub fn position_at(&self, t: DateTime<Utc>) -> (f64, f64, f64) {
        let first = self.waypoints[0];
        if t <= first.time {
            return first.position();
        }
        let last = self.waypoints[self.waypoints.len() - 1];
        if t >= last.time {
            return last.position();
        }

        let idx = self
            .waypoints
            .partition_point(|wp| wp.time < t)
            .clamp(1, self.waypoints.len() - 1);
        let seg_start = self.waypoints[idx - 1];
        let seg_end = self.waypoints[idx];

        let span_ms = (seg_end.time - seg_start.time).num_milliseconds();
        if span_ms == 0 {
            return seg_start.position();
        }

        let elapsed_ms = (t - seg_start.time).num_milliseconds();
        let ratio = elapsed_ms as f64 / span_ms as f64;
        (
            seg_start.x + ratio * (seg_end.x - seg_start.x),
            seg_start.y + ratio * (seg_end.y - seg_start.y),
            seg_start.z + ratio * (seg_end.z - seg_start.z),
        )
    }
}
