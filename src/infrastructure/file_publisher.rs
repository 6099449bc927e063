// YAML file publisher - Atomic replacement of the rendered config
use crate::application::config_publisher::ConfigPublisher;
use crate::domain::dashboard::DashboardConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct YamlFilePublisher {
    path: PathBuf,
}

impl YamlFilePublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the output file, so the final rename stays on one filesystem
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConfigPublisher for YamlFilePublisher {
    async fn publish(&self, config: &DashboardConfig) -> Result<()> {
        let data = serde_yaml::to_string(config).context("Failed to serialize dashboard config")?;

        // Atomic write: write to .tmp then rename
        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, data)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| {
                format!("Failed to move {} into place", self.path.display())
            });
        }

        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }
}
