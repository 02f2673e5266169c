// src/lib.rs
pub mod config;
pub mod health;
pub mod metrics;
pub mod refresh;
pub mod server;
pub mod source;

pub use self::config::{load_config, Config};
pub use health::{
    Catalog, Describe, Evaluation, Evaluator, HealthState, InstanceDescriptor,
    ServiceDescriptor, Status, StatusCache, StatusKind, StatusRollup,
};
pub use refresh::StatusPoller;
pub use source::{FileSource, ServiceSource, SourceError, StaticSource};
