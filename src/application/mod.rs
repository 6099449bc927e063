// Application layer - Regeneration pipeline and the ports it drives
pub mod backoff;
pub mod config_publisher;
pub mod container_runtime;
pub mod errors;
pub mod event_watcher;
pub mod regeneration_service;
pub mod template_merger;

#[cfg(test)]
pub mod test_support;
