// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod docker_runtime;
pub mod file_publisher;
