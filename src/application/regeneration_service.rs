// Regeneration service - One full enumerate, merge and publish pass
use crate::application::config_publisher::ConfigPublisher;
use crate::application::container_runtime::ContainerRuntime;
use crate::application::errors::SyncError;
use crate::application::template_merger::TemplateMerger;
use crate::domain::dashboard::DashboardItem;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct RegenerationService {
    runtime: Arc<dyn ContainerRuntime>,
    merger: TemplateMerger,
    publisher: Arc<dyn ConfigPublisher>,
}

impl RegenerationService {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        merger: TemplateMerger,
        publisher: Arc<dyn ConfigPublisher>,
    ) -> Self {
        Self {
            runtime,
            merger,
            publisher,
        }
    }

    /// Rebuild the config from scratch and publish it. Returns the number of
    /// items discovered. Nothing is written unless the merge fully succeeds.
    pub async fn regenerate(&self) -> Result<usize, SyncError> {
        println!("Generating config...");
        let start_time = Instant::now();

        let items = self.enumerate().await?;
        let count = items.len();

        let config = self.merger.merge(items).await?;
        self.publisher
            .publish(&config)
            .await
            .map_err(SyncError::Publish)?;

        tracing::info!(
            "Published {} container item(s) from {} in {} ms",
            count,
            self.merger.template_path().display(),
            start_time.elapsed().as_millis()
        );
        Ok(count)
    }

    async fn enumerate(&self) -> Result<Vec<DashboardItem>, SyncError> {
        let containers = self
            .runtime
            .list_eligible()
            .await
            .map_err(SyncError::Query)?;

        let items = containers
            .iter()
            .filter(|container| {
                let eligible = container.is_eligible();
                if !eligible {
                    tracing::debug!("Skipping container {} without enable label", container.id);
                }
                eligible
            })
            .map(DashboardItem::from)
            .collect();

        Ok(items)
    }
}
