// Container domain models
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const ENABLE_LABEL: &str = "homer.enable";
pub const NAME_LABEL: &str = "homer.name";
pub const LOGO_LABEL: &str = "homer.logo";
pub const ICON_LABEL: &str = "homer.icon";
pub const URL_LABEL: &str = "homer.url";

/// Lifecycle action reported by the runtime for a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    Start,
    Die,
    Other(String),
}

impl EventAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "start" => EventAction::Start,
            "die" => EventAction::Die,
            other => EventAction::Other(other.to_string()),
        }
    }

    /// Only starts and deaths change the set of containers worth listing
    pub fn triggers_regeneration(&self) -> bool {
        matches!(self, EventAction::Start | EventAction::Die)
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub container_id: String,
    pub action: EventAction,
    pub labels: HashMap<String, String>,
    pub time: Option<DateTime<Utc>>,
}

impl LifecycleEvent {
    /// Dashboard name from the event's labels, falling back to the runtime's
    /// container name and then the id
    pub fn display_name(&self) -> &str {
        [NAME_LABEL, "name"]
            .iter()
            .filter_map(|key| self.labels.get(*key))
            .find(|value| !value.is_empty())
            .map(String::as_str)
            .unwrap_or(self.container_id.as_str())
    }
}

/// Snapshot of one container as listed by the runtime
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRecord {
    pub id: String,
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, labels: HashMap<String, String>) -> Self {
        Self {
            id: id.into(),
            labels,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.labels.get(ENABLE_LABEL).map(String::as_str) == Some("true")
    }

    /// Label value, or an empty string when the label is missing
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or_default()
    }
}
