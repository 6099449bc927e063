// Port for publishing the merged dashboard config
use crate::domain::dashboard::DashboardConfig;
use async_trait::async_trait;

#[async_trait]
pub trait ConfigPublisher: Send + Sync {
    /// Replace the published config with `config`
    async fn publish(&self, config: &DashboardConfig) -> anyhow::Result<()>;
}
