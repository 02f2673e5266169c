// src/health/state.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every value a health state can take, at check level or after rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Health check is passing
    Passed,
    /// Health check is responsive, but failing
    Failed,
    /// Health check did not answer in time; never counted in a rollup
    Timeout,
    /// Instance is not running
    NotRunning,
    /// Instance hasn't checked in within the allowed window
    Unknown,
    /// Forcibly stopped; overrides everything else, never counted in a rollup
    EmergencyShutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized health state: {0:?}")]
pub struct UnknownHealthState(pub String);

impl HealthState {
    pub const ALL: [HealthState; 6] = [
        HealthState::Passed,
        HealthState::Failed,
        HealthState::Timeout,
        HealthState::NotRunning,
        HealthState::Unknown,
        HealthState::EmergencyShutdown,
    ];

    /// The categories a [`StatusRollup`](super::StatusRollup) tallies.
    pub const ROLLUP: [HealthState; 4] = [
        HealthState::Passed,
        HealthState::Failed,
        HealthState::NotRunning,
        HealthState::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Passed => "passed",
            HealthState::Failed => "failed",
            HealthState::Timeout => "timeout",
            HealthState::NotRunning => "not_running",
            HealthState::Unknown => "unknown",
            HealthState::EmergencyShutdown => "emergency_shutdown",
        }
    }

    pub fn is_rollup_category(&self) -> bool {
        Self::ROLLUP.contains(self)
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthState {
    type Err = UnknownHealthState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownHealthState(s.to_string()))
    }
}
