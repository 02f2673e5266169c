// src/health/rollup.rs
use super::state::HealthState;
use serde::Serialize;
use tracing::debug;

/// Tallies how many children fall into each rollup category.
///
/// `total` always equals the sum of the four counters; anything that is not
/// a rollup category is ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusRollup {
    passed: u32,
    failed: u32,
    not_running: u32,
    unknown: u32,
    total: u32,
}

impl StatusRollup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `state` if it is a rollup category. Returns whether it counted.
    pub fn increment(&mut self, state: HealthState) -> bool {
        let counter = match state {
            HealthState::Passed => &mut self.passed,
            HealthState::Failed => &mut self.failed,
            HealthState::NotRunning => &mut self.not_running,
            HealthState::Unknown => &mut self.unknown,
            HealthState::Timeout | HealthState::EmergencyShutdown => return false,
        };
        *counter += 1;
        self.total += 1;
        true
    }

    /// Count a raw check result as supplied by a collaborator.
    pub fn increment_raw(&mut self, raw: &str) -> bool {
        match raw.parse::<HealthState>() {
            Ok(state) => self.increment(state),
            Err(e) => {
                debug!("Ignoring health check result: {}", e);
                false
            }
        }
    }

    pub fn count(&self, state: HealthState) -> u32 {
        match state {
            HealthState::Passed => self.passed,
            HealthState::Failed => self.failed,
            HealthState::NotRunning => self.not_running,
            HealthState::Unknown => self.unknown,
            HealthState::Timeout | HealthState::EmergencyShutdown => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn any_failed(&self) -> bool {
        self.failed > 0
    }

    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.failed == self.total
    }

    pub fn any_ok(&self) -> bool {
        self.passed > 0
    }

    pub fn all_ok(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }

    pub fn any_not_running(&self) -> bool {
        self.not_running > 0
    }

    /// Unlike the other `all_*` predicates this one holds for an empty rollup.
    pub fn all_not_running(&self) -> bool {
        self.not_running == self.total
    }

    pub fn any_unknown(&self) -> bool {
        self.unknown > 0
    }

    pub fn all_unknown(&self) -> bool {
        self.total > 0 && self.unknown == self.total
    }
}

impl FromIterator<HealthState> for StatusRollup {
    fn from_iter<I: IntoIterator<Item = HealthState>>(iter: I) -> Self {
        iter.into_iter().fold(StatusRollup::new(), |mut acc, state| {
            acc.increment(state);
            acc
        })
    }
}
