//! Safety rules and thresholds for deconfliction checks.

use serde::{Deserialize, Serialize};

/// Configuration for a deconfliction check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyRules {
    /// Minimum safe distance between missions in meters
    pub distance_threshold_m: f64,
    /// Sampling cadence across the overlap window in seconds
    pub time_step_secs: i64,
}

impl Default for SafetyRules {
    fn default() -> Self {
        Self {
            distance_threshold_m: 10.0,
            time_step_secs: 5,
        }
    }
}
