// Docker runtime adapter backed by bollard
use crate::application::container_runtime::{ContainerRuntime, EventStream};
use crate::domain::container::{ContainerRecord, ENABLE_LABEL, EventAction, LifecycleEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bollard::Docker;
use bollard::container::ListContainersOptions;
use bollard::models::{ContainerSummary, EventMessage};
use bollard::system::EventsOptions;
use chrono::DateTime;
use futures::StreamExt;
use std::collections::HashMap;

#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect to the daemon named by `DOCKER_HOST` and negotiate the API version
    pub async fn connect() -> Result<Self> {
        let docker = client_from_env()?
            .negotiate_version()
            .await
            .context("Failed to negotiate Docker API version")?;

        tracing::info!("Connected to Docker API {}", docker.client_version());
        Ok(Self { docker })
    }
}

/// `unix://` hosts use the socket, `tcp://` and `http://` hosts use HTTP
/// (TLS when `DOCKER_TLS_VERIFY` is set), and an unset `DOCKER_HOST` falls
/// back to the platform default socket
fn client_from_env() -> Result<Docker> {
    Docker::connect_with_defaults().context("Failed to create Docker client")
}

fn enable_filter() -> String {
    format!("{}=true", ENABLE_LABEL)
}

fn event_filters() -> HashMap<String, Vec<String>> {
    HashMap::from([
        ("label".to_string(), vec![enable_filter()]),
        ("type".to_string(), vec!["container".to_string()]),
    ])
}

fn list_filters() -> HashMap<String, Vec<String>> {
    HashMap::from([("label".to_string(), vec![enable_filter()])])
}

fn to_lifecycle_event(message: EventMessage) -> LifecycleEvent {
    let actor = message.actor.unwrap_or_default();
    LifecycleEvent {
        container_id: actor.id.unwrap_or_default(),
        action: EventAction::parse(message.action.as_deref().unwrap_or_default()),
        labels: actor.attributes.unwrap_or_default(),
        time: message.time.and_then(|secs| DateTime::from_timestamp(secs, 0)),
    }
}

fn to_container_record(summary: ContainerSummary) -> ContainerRecord {
    ContainerRecord::new(
        summary.id.unwrap_or_default(),
        summary.labels.unwrap_or_default(),
    )
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn subscribe(&self) -> Result<EventStream> {
        let docker = self.docker.clone();
        let options = EventsOptions::<String> {
            filters: event_filters(),
            ..Default::default()
        };

        // Own the client inside the stream so it outlives this call
        let events = async_stream::stream! {
            let messages = docker.events(Some(options));
            futures::pin_mut!(messages);
            while let Some(message) = messages.next().await {
                yield message
                    .map(to_lifecycle_event)
                    .context("Docker event stream failed");
            }
        };

        Ok(events.boxed())
    }

    async fn list_eligible(&self) -> Result<Vec<ContainerRecord>> {
        let options = ListContainersOptions::<String> {
            all: true,
            filters: list_filters(),
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .context("Failed to list containers")?;

        tracing::debug!("Docker reported {} labelled container(s)", containers.len());
        Ok(containers.into_iter().map(to_container_record).collect())
    }
}
