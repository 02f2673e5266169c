// src/health/status.rs
use super::describe::{Describe, DescriptionKey};
use super::rollup::StatusRollup;
use super::state::HealthState;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Identity fields shared by every kind of status node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub desired_state: i32,
    pub emergency_shutdown: bool,
}

/// One raw check result recorded under an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub name: String,
    pub status: String,
}

/// What a status node was aggregated from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusKind {
    /// Rolled up from raw health check results.
    Instance { checks: Vec<CheckEntry> },
    /// Rolled up from already evaluated instance statuses.
    Service { instances: Vec<Arc<Status>> },
    /// Stand-in for an id the cache has never seen.
    Placeholder,
}

/// Computed health of one instance or service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
    pub desired_state: i32,
    pub emergency_shutdown: bool,
    pub rollup: StatusRollup,
    #[serde(flatten)]
    pub kind: StatusKind,
    pub status: HealthState,
    pub description: String,
}

impl Status {
    /// Aggregate raw check results, kept in the order supplied.
    pub fn from_health_checks(
        subject: Subject,
        checks: &IndexMap<String, String>,
        describer: &dyn Describe,
    ) -> Self {
        let mut rollup = StatusRollup::new();
        let mut entries = Vec::with_capacity(checks.len());

        for (name, result) in checks {
            rollup.increment_raw(result);
            entries.push(CheckEntry {
                name: name.clone(),
                status: result.clone(),
            });
        }

        Self::derive(subject, rollup, StatusKind::Instance { checks: entries }, describer)
    }

    /// Aggregate child statuses. Children must already be evaluated.
    pub fn from_children(
        subject: Subject,
        children: Vec<Arc<Status>>,
        describer: &dyn Describe,
    ) -> Self {
        let rollup = children.iter().map(|child| child.status).collect();
        Self::derive(subject, rollup, StatusKind::Service { instances: children }, describer)
    }

    /// Status handed out for ids with nothing cached.
    ///
    /// The single `unknown` tally keeps the vacuous `all_not_running` branch
    /// from claiming the entity is down.
    pub fn placeholder(id: impl Into<String>, describer: &dyn Describe) -> Self {
        let subject = Subject {
            id: id.into(),
            name: HealthState::Unknown.as_str().to_string(),
            desired_state: 0,
            emergency_shutdown: false,
        };
        let rollup = std::iter::once(HealthState::Unknown).collect();
        Self::derive(subject, rollup, StatusKind::Placeholder, describer)
    }

    fn derive(
        subject: Subject,
        rollup: StatusRollup,
        kind: StatusKind,
        describer: &dyn Describe,
    ) -> Self {
        let (status, key) = decide(subject.emergency_shutdown, &rollup);

        Self {
            id: subject.id,
            name: subject.name,
            desired_state: subject.desired_state,
            emergency_shutdown: subject.emergency_shutdown,
            rollup,
            kind,
            status,
            description: describer.describe(key),
        }
    }

    /// Child statuses, when this is a service.
    pub fn instances(&self) -> &[Arc<Status>] {
        match &self.kind {
            StatusKind::Service { instances } => instances,
            _ => &[],
        }
    }

    /// Raw check entries, when this is an instance.
    pub fn checks(&self) -> &[CheckEntry] {
        match &self.kind {
            StatusKind::Instance { checks } => checks,
            _ => &[],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, StatusKind::Placeholder)
    }
}

/// First match wins.
fn decide(emergency_shutdown: bool, rollup: &StatusRollup) -> (HealthState, DescriptionKey) {
    if emergency_shutdown {
        (HealthState::EmergencyShutdown, DescriptionKey::EmergencyShutdown)
    } else if rollup.all_ok() {
        (HealthState::Passed, DescriptionKey::PassingHealthChecks)
    } else if rollup.all_failed() {
        (HealthState::Failed, DescriptionKey::Failed)
    } else if rollup.all_not_running() {
        (HealthState::NotRunning, DescriptionKey::ContainerDown)
    } else {
        (HealthState::Unknown, DescriptionKey::MissingHealthChecks)
    }
}
