// src/health/mod.rs
mod cache;
mod describe;
mod descriptor;
mod evaluator;
mod rollup;
mod state;
mod status;

pub use cache::StatusCache;
pub use describe::{Catalog, Describe, DescriptionKey};
pub use descriptor::{instance_key, InstanceDescriptor, ServiceDescriptor};
pub use evaluator::{Evaluation, Evaluator};
pub use rollup::StatusRollup;
pub use state::{HealthState, UnknownHealthState};
pub use status::{CheckEntry, Status, StatusKind, Subject};
