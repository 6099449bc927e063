// Port for the container runtime the watcher observes
use crate::domain::container::{ContainerRecord, LifecycleEvent};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Lifecycle events of eligible containers. An `Err` item or the end of the
/// stream both mean the subscription is gone.
pub type EventStream = BoxStream<'static, anyhow::Result<LifecycleEvent>>;

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Subscribe to container lifecycle events for containers carrying the enable label
    async fn subscribe(&self) -> anyhow::Result<EventStream>;

    /// List every container carrying the enable label, running or not
    async fn list_eligible(&self) -> anyhow::Result<Vec<ContainerRecord>>;
}
