// src/source/file.rs
use super::{ServiceSource, SourceError};
use crate::health::ServiceDescriptor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a service snapshot from disk on every fetch (YAML or JSON).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}

#[async_trait]
impl ServiceSource for FileSource {
    async fn fetch(&self) -> Result<Vec<ServiceDescriptor>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        let parse_error = |message: String| SourceError::Parse {
            path: self.path.clone(),
            message,
        };

        let services: Vec<ServiceDescriptor> = if self.is_yaml() {
            serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        } else {
            serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        };

        debug!("Read {} services from {}", services.len(), self.path.display());
        Ok(services)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("service-health-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_reads_yaml_snapshot() {
        let path = temp_path("services.yaml");
        tokio::fs::write(
            &path,
            "- id: svc1\n  name: web\n  emergencyShutdown: true\n  instances:\n    - instanceId: \"0\"\n      healthChecks:\n        ready: passed\n",
        )
        .await
        .unwrap();

        let services = FileSource::new(&path).fetch().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(services.len(), 1);
        assert!(services[0].emergency_shutdown);
        assert_eq!(services[0].instances[0].health_checks["ready"], "passed");
    }

    #[tokio::test]
    async fn test_reads_json_snapshot() {
        let path = temp_path("services.json");
        tokio::fs::write(&path, r#"[{"id": "svc1", "name": "web"}]"#)
            .await
            .unwrap();

        let services = FileSource::new(&path).fetch().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(services[0].id, "svc1");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = FileSource::new(temp_path("absent.json")).fetch().await;
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let path = temp_path("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = FileSource::new(&path).fetch().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
