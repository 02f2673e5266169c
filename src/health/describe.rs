// src/health/describe.rs
//
// Human-readable descriptions are looked up through `Describe`, so callers
// can plug in their own translations.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionKey {
    EmergencyShutdown,
    PassingHealthChecks,
    Failed,
    ContainerDown,
    MissingHealthChecks,
}

impl DescriptionKey {
    pub const ALL: [DescriptionKey; 5] = [
        DescriptionKey::EmergencyShutdown,
        DescriptionKey::PassingHealthChecks,
        DescriptionKey::Failed,
        DescriptionKey::ContainerDown,
        DescriptionKey::MissingHealthChecks,
    ];

    /// Translation id.
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionKey::EmergencyShutdown => "emergency_shutdown",
            DescriptionKey::PassingHealthChecks => "passing_health_checks",
            DescriptionKey::Failed => "failed",
            DescriptionKey::ContainerDown => "container_down",
            DescriptionKey::MissingHealthChecks => "missing_health_checks",
        }
    }

    fn default_text(&self) -> &'static str {
        match self {
            DescriptionKey::EmergencyShutdown => "emergency shutdown",
            DescriptionKey::PassingHealthChecks => "passing health checks",
            DescriptionKey::Failed => "failed",
            DescriptionKey::ContainerDown => "container down",
            DescriptionKey::MissingHealthChecks => "missing health checks",
        }
    }
}

pub trait Describe: Send + Sync {
    fn describe(&self, key: DescriptionKey) -> String;
}

/// English defaults with optional per-key overrides.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overrides: HashMap<DescriptionKey, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<DescriptionKey, String>) -> Self {
        Self { overrides }
    }

    pub fn set(&mut self, key: DescriptionKey, text: impl Into<String>) {
        self.overrides.insert(key, text.into());
    }
}

impl Describe for Catalog {
    fn describe(&self, key: DescriptionKey) -> String {
        self.overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_text().to_string())
    }
}
