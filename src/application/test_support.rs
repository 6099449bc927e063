// In-memory fakes for the application ports
use crate::application::config_publisher::ConfigPublisher;
use crate::application::container_runtime::{ContainerRuntime, EventStream};
use crate::domain::container::{ContainerRecord, EventAction, LifecycleEvent};
use crate::domain::dashboard::DashboardConfig;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, mpsc};
use tokio_stream::wrappers::UnboundedReceiverStream;

pub type EventSender = mpsc::UnboundedSender<anyhow::Result<LifecycleEvent>>;

pub fn labelled(id: &str, pairs: &[(&str, &str)]) -> ContainerRecord {
    ContainerRecord::new(
        id,
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

pub fn event(id: &str, action: &str) -> anyhow::Result<LifecycleEvent> {
    Ok(LifecycleEvent {
        container_id: id.to_string(),
        action: EventAction::parse(action),
        labels: HashMap::new(),
        time: None,
    })
}

/// Sets or removes environment variables until dropped, then restores them.
/// Tests using it must be `#[serial]`.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn set(vars: &[(&str, Option<&str>)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect();
        for (key, value) in vars {
            apply(key, *value);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            apply(key, value.as_deref());
        }
    }
}

fn apply(key: &str, value: Option<&str>) {
    // SAFETY: callers are serialized, so no other test thread touches the environment
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Temporary directory holding `base.yml` with `contents`
pub fn template_dir(contents: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("base.yml"), contents).unwrap();
    dir
}

#[derive(Default)]
pub struct StubRuntime {
    containers: Mutex<Vec<ContainerRecord>>,
    list_error: Mutex<Option<String>>,
    subscriptions: Mutex<VecDeque<anyhow::Result<EventStream>>>,
    list_calls: AtomicUsize,
    subscribe_calls: AtomicUsize,
}

impl StubRuntime {
    pub fn with_containers(containers: Vec<ContainerRecord>) -> Self {
        Self {
            containers: Mutex::new(containers),
            ..Default::default()
        }
    }

    pub fn set_containers(&self, containers: Vec<ContainerRecord>) {
        *self.containers.lock().unwrap() = containers;
    }

    pub fn reverse_containers(&self) {
        self.containers.lock().unwrap().reverse();
    }

    pub fn fail_listing(&self, message: &str) {
        *self.list_error.lock().unwrap() = Some(message.to_string());
    }

    /// Queue a subscription fed by the returned sender. Dropping the sender ends the stream.
    pub fn push_channel(&self) -> EventSender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriptions
            .lock()
            .unwrap()
            .push_back(Ok(UnboundedReceiverStream::new(rx).boxed()));
        tx
    }

    /// Queue a subscription attempt that fails with `message`
    pub fn push_subscribe_error(&self, message: &str) {
        self.subscriptions
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerRuntime for StubRuntime {
    async fn subscribe(&self) -> anyhow::Result<EventStream> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        // Once the queued subscriptions run out, park the watcher on a silent stream
        self.subscriptions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(futures::stream::pending().boxed()))
    }

    async fn list_eligible(&self) -> anyhow::Result<Vec<ContainerRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.list_error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(self.containers.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<DashboardConfig>>,
    failure: Mutex<Option<String>>,
    notify: Notify,
}

impl RecordingPublisher {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    pub fn published(&self) -> Vec<DashboardConfig> {
        self.published.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<DashboardConfig> {
        self.published.lock().unwrap().last().cloned()
    }

    /// Wait until at least `count` configs have been published
    pub async fn wait_for(&self, count: usize) {
        while self.count() < count {
            self.notify.notified().await;
        }
    }
}

#[async_trait]
impl ConfigPublisher for RecordingPublisher {
    async fn publish(&self, config: &DashboardConfig) -> anyhow::Result<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        self.published.lock().unwrap().push(config.clone());
        self.notify.notify_one();
        Ok(())
    }
}
