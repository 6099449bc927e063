// Dashboard domain model - Mirrors the structure of the base template
use super::container::{ContainerRecord, ICON_LABEL, LOGO_LABEL, NAME_LABEL, URL_LABEL};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// One entry in a service group. Missing fields are written as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub icon: String,
    /// Fields of a template item this tool does not interpret
    #[serde(flatten)]
    pub extra: Mapping,
}

impl From<&ContainerRecord> for DashboardItem {
    fn from(record: &ContainerRecord) -> Self {
        Self {
            name: record.label(NAME_LABEL).to_string(),
            url: record.label(URL_LABEL).to_string(),
            logo: record.label(LOGO_LABEL).to_string(),
            icon: record.label(ICON_LABEL).to_string(),
            extra: Mapping::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<DashboardItem>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub services: Vec<ServiceGroup>,
    #[serde(flatten)]
    pub extra: Mapping,
}
