// Main entry point - Dependency injection and event loop startup
mod application;
mod domain;
mod infrastructure;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::event_watcher::EventWatcher;
use crate::application::regeneration_service::RegenerationService;
use crate::application::template_merger::TemplateMerger;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::docker_runtime::DockerRuntime;
use crate::infrastructure::file_publisher::YamlFilePublisher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings().context("Failed to load settings")?;

    // Create adapters (infrastructure layer)
    let runtime = Arc::new(DockerRuntime::connect().await?);
    let publisher = Arc::new(YamlFilePublisher::new(settings.output_file.clone()));
    tracing::info!(
        "Syncing {} into {}",
        settings.base_file.display(),
        publisher.path().display()
    );

    // Create services (application layer)
    let merger = TemplateMerger::new(settings.base_file.clone());
    let service = RegenerationService::new(runtime.clone(), merger, publisher);
    let watcher = EventWatcher::new(runtime, service, settings.watcher_options());

    if let Err(e) = watcher.run(shutdown_signal()).await {
        if e.is_disconnect() {
            tracing::error!("Lost the Docker event stream, exiting for the supervisor to restart");
        }
        return Err(e.into());
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
