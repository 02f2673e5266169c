// src/source/mod.rs
mod file;

pub use file::FileSource;

use crate::health::ServiceDescriptor;
use async_trait::async_trait;
use std::path::PathBuf;

/// Supplies the current service list to the evaluator.
#[async_trait]
pub trait ServiceSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ServiceDescriptor>, SourceError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Fixed service list, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    services: Vec<ServiceDescriptor>,
}

impl StaticSource {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl ServiceSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<ServiceDescriptor>, SourceError> {
        Ok(self.services.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
