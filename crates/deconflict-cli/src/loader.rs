//! Scenario file loading.
//!
//! Parses the primary-mission and simulated-flights JSON shapes into
//! validated [`Mission`]s. The files carry already-ordered waypoints;
//! timing gaps are resolved by mission construction.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use deconflict_core::{Mission, MissionPlan, Waypoint};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Primary mission file: waypoints plus the mission time window.
#[derive(Debug, Deserialize)]
struct PrimaryFile {
    #[serde(default = "default_primary_name")]
    name: String,
    waypoints: Vec<Waypoint>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

fn default_primary_name() -> String {
    "Primary".to_string()
}

/// Simulated traffic file: a list of flights with their own waypoints.
#[derive(Debug, Deserialize)]
struct FlightsFile {
    simulated_flights: Vec<FlightRecord>,
}

#[derive(Debug, Deserialize)]
struct FlightRecord {
    drone_id: String,
    waypoints: Vec<Waypoint>,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
}

/// Load the primary mission from a JSON file.
pub fn load_primary_mission(path: &Path) -> Result<Mission> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading primary mission {}", path.display()))?;
    parse_primary_mission(&raw)
        .with_context(|| format!("parsing primary mission {}", path.display()))
}

fn parse_primary_mission(raw: &str) -> Result<Mission> {
    let file: PrimaryFile = serde_json::from_str(raw)?;
    let mission = MissionPlan {
        name: file.name,
        waypoints: file.waypoints,
        start_time: Some(file.start_time),
        end_time: Some(file.end_time),
    }
    .build()?;
    Ok(mission)
}

/// Load the simulated flights from a JSON file.
pub fn load_simulated_flights(path: &Path) -> Result<Vec<Mission>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading simulated flights {}", path.display()))?;
    parse_simulated_flights(&raw)
        .with_context(|| format!("parsing simulated flights {}", path.display()))
}

fn parse_simulated_flights(raw: &str) -> Result<Vec<Mission>> {
    let file: FlightsFile = serde_json::from_str(raw)?;
    file.simulated_flights
        .into_iter()
        .map(|flight| {
            let mission = MissionPlan {
                name: flight.drone_id,
                waypoints: flight.waypoints,
                start_time: flight.start_time,
                end_time: flight.end_time,
            }
            .build()?;
            Ok(mission)
        })
        .collect()
}
