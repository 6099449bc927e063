// Event watcher - Filters lifecycle events and debounces them into regeneration passes
use crate::application::backoff::Backoff;
use crate::application::container_runtime::{ContainerRuntime, EventStream};
use crate::application::errors::SyncError;
use crate::application::regeneration_service::RegenerationService;
use futures::StreamExt;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// What to do when the event subscription ends or fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisconnectPolicy {
    /// Stop with an error and leave restarts to the supervisor
    Exit,
    /// Re-subscribe after a backoff delay and resync with a fresh pass
    Reconnect,
}

#[derive(Debug, Clone)]
pub struct WatcherOptions {
    pub settle_window: Duration,
    pub on_disconnect: DisconnectPolicy,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    pub sync_on_start: bool,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            settle_window: Duration::from_secs(1),
            on_disconnect: DisconnectPolicy::Exit,
            reconnect_initial: Duration::from_secs(1),
            reconnect_max: Duration::from_secs(30),
            sync_on_start: false,
        }
    }
}

enum WatchExit {
    Shutdown,
    Disconnected(SyncError),
}

pub struct EventWatcher {
    runtime: Arc<dyn ContainerRuntime>,
    service: RegenerationService,
    options: WatcherOptions,
}

impl EventWatcher {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        service: RegenerationService,
        options: WatcherOptions,
    ) -> Self {
        Self {
            runtime,
            service,
            options,
        }
    }

    /// Watch container events until `shutdown` resolves or a fatal error occurs.
    ///
    /// Regeneration passes run inline, so the event stream is not polled while
    /// a pass is in flight and at most one pass runs at a time.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), SyncError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut backoff = Backoff::new(self.options.reconnect_initial, self.options.reconnect_max);
        let mut resync = self.options.sync_on_start;

        println!("Watching for container...");

        loop {
            let exit = match self.runtime.subscribe().await {
                Ok(events) => {
                    if resync {
                        self.service.regenerate().await?;
                    }
                    self.watch(events, shutdown.as_mut(), &mut backoff).await?
                }
                Err(e) => WatchExit::Disconnected(SyncError::Stream(e)),
            };

            let err = match exit {
                WatchExit::Shutdown => {
                    tracing::info!("Shutdown requested, closing event subscription");
                    return Ok(());
                }
                WatchExit::Disconnected(err) => err,
            };

            if self.options.on_disconnect == DisconnectPolicy::Exit {
                return Err(err);
            }

            let delay = backoff.next_delay();
            tracing::warn!(
                "{}; reconnecting in {} ms (attempt {})",
                err,
                delay.as_millis(),
                backoff.attempts()
            );

            tokio::select! {
                _ = &mut shutdown => return Ok(()),
                _ = tokio::time::sleep(delay) => {}
            }

            // Events may have been missed while disconnected
            resync = true;
        }
    }

    async fn watch<F>(
        &self,
        mut events: EventStream,
        mut shutdown: Pin<&mut F>,
        backoff: &mut Backoff,
    ) -> Result<WatchExit, SyncError>
    where
        F: Future<Output = ()>,
    {
        let settle_window = self.options.settle_window;
        let settle = tokio::time::sleep(settle_window);
        tokio::pin!(settle);
        let mut pending = false;

        loop {
            tokio::select! {
                _ = &mut shutdown => return Ok(WatchExit::Shutdown),
                _ = &mut settle, if pending => {
                    pending = false;
                    self.service.regenerate().await?;
                }
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        backoff.reset();
                        if event.action.triggers_regeneration() {
                            let at = event
                                .time
                                .map(|t| t.to_rfc3339())
                                .unwrap_or_else(|| "unknown time".to_string());
                            tracing::debug!(
                                "Container {} {:?} at {}, regenerating in {} ms",
                                event.display_name(),
                                event.action,
                                at,
                                settle_window.as_millis()
                            );
                            // Every trigger pushes the deadline back; one pass per burst
                            pending = true;
                            settle.as_mut().reset(Instant::now() + settle_window);
                        } else {
                            tracing::trace!(
                                "Ignoring {:?} for container {}",
                                event.action,
                                event.display_name()
                            );
                        }
                    }
                    Some(Err(e)) => return Ok(WatchExit::Disconnected(SyncError::Stream(e))),
                    None => return Ok(WatchExit::Disconnected(SyncError::StreamClosed)),
                },
            }
        }
    }
}
