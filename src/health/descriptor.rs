// src/health/descriptor.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A service as supplied by whatever feeds the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desired_state: i32,
    #[serde(default)]
    pub emergency_shutdown: bool,
    #[serde(default)]
    pub instances: Vec<InstanceDescriptor>,
}

/// One running instance and its raw check results, keyed by check name.
///
/// Results stay as strings so values this crate does not recognize can be
/// passed through instead of failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDescriptor {
    pub instance_id: String,
    #[serde(default)]
    pub health_checks: IndexMap<String, String>,
}

impl ServiceDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            desired_state: 0,
            emergency_shutdown: false,
            instances: Vec::new(),
        }
    }

    pub fn with_desired_state(mut self, desired_state: i32) -> Self {
        self.desired_state = desired_state;
        self
    }

    pub fn with_emergency_shutdown(mut self, emergency_shutdown: bool) -> Self {
        self.emergency_shutdown = emergency_shutdown;
        self
    }

    pub fn with_instance(mut self, instance: InstanceDescriptor) -> Self {
        self.instances.push(instance);
        self
    }
}

impl InstanceDescriptor {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            health_checks: IndexMap::new(),
        }
    }

    pub fn with_check(mut self, name: impl Into<String>, result: impl Into<String>) -> Self {
        self.health_checks.insert(name.into(), result.into());
        self
    }
}

/// Cache id of an instance: `<service id>.<instance id>`.
pub fn instance_key(service_id: &str, instance_id: &str) -> String {
    format!("{}.{}", service_id, instance_id)
}
