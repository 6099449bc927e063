// Template merger - Injects discovered containers into the base template
use crate::application::errors::TemplateError;
use crate::domain::dashboard::{DashboardConfig, DashboardItem};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TemplateMerger {
    template_path: PathBuf,
}

impl TemplateMerger {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Read and parse the base template. Never cached, so edits apply on the next pass.
    /// Whether it has a service group is checked by [`TemplateMerger::merge`].
    pub async fn load_template(&self) -> Result<DashboardConfig, TemplateError> {
        let data = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|source| TemplateError::Read {
                path: self.template_path.clone(),
                source,
            })?;

        serde_yaml::from_str(&data).map_err(|source| TemplateError::Parse {
            path: self.template_path.clone(),
            source,
        })
    }

    /// Load a fresh template and append `items` to its first service group.
    /// A template without any service group is rejected.
    pub async fn merge(&self, items: Vec<DashboardItem>) -> Result<DashboardConfig, TemplateError> {
        let config = self.load_template().await?;
        merge_items(config, items).ok_or_else(|| TemplateError::NoServiceGroup {
            path: self.template_path.clone(),
        })
    }
}

/// Append `items` after the items already listed in the first group.
/// Returns `None` when the config has no group to append to.
pub fn merge_items(mut config: DashboardConfig, items: Vec<DashboardItem>) -> Option<DashboardConfig> {
    config.services.first_mut()?.items.extend(items);
    Some(config)
}
