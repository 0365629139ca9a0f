//! Core logic for strategic UAV mission deconfliction.
//!
//! A [`Mission`] is a time-parameterized 3D path built from ordered
//! waypoints. The conflict checker samples a primary mission against
//! surrounding traffic across their shared time window and reports every
//! instant the separation drops below the configured safety threshold.

pub mod conflict;
pub mod models;
pub mod rules;
pub mod spatial;

pub use conflict::{
    check_conflicts, check_conflicts_parallel, check_conflicts_with_rules, ConflictEvent,
    ConflictReport,
};
pub use models::{Mission, MissionError, MissionPlan, TimedWaypoint, Waypoint};
pub use rules::SafetyRules;
pub use spatial::euclidean_distance;
