// Error taxonomy for the regeneration pipeline
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read base template {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse base template {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("base template {} defines no service group", .path.display())]
    NoServiceGroup { path: PathBuf },
}

/// Every variant is fatal to the process unless the watcher is told to reconnect
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to list containers: {0:#}")]
    Query(anyhow::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("failed to publish config: {0:#}")]
    Publish(anyhow::Error),

    #[error("error watching container events: {0:#}")]
    Stream(anyhow::Error),

    #[error("container event stream closed")]
    StreamClosed,
}

impl SyncError {
    /// Whether the error came from the event subscription rather than a pass
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SyncError::Stream(_) | SyncError::StreamClosed)
    }
}
