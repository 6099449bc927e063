use crate::application::event_watcher::{DisconnectPolicy, WatcherOptions};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const SETTINGS_FILE: &str = "homer-sync";
const ENV_PREFIX: &str = "HOMER_SYNC";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub base_file: PathBuf,
    pub output_file: PathBuf,
    pub settle_window_ms: u64,
    pub on_disconnect: DisconnectPolicy,
    pub reconnect_initial_ms: u64,
    pub reconnect_max_ms: u64,
    pub sync_on_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_file: PathBuf::from("base.yml"),
            output_file: PathBuf::from("config.yml"),
            settle_window_ms: 1000,
            on_disconnect: DisconnectPolicy::Exit,
            reconnect_initial_ms: 1000,
            reconnect_max_ms: 30_000,
            sync_on_start: false,
        }
    }
}

impl Settings {
    pub fn watcher_options(&self) -> WatcherOptions {
        WatcherOptions {
            settle_window: Duration::from_millis(self.settle_window_ms),
            on_disconnect: self.on_disconnect,
            reconnect_initial: Duration::from_millis(self.reconnect_initial_ms),
            reconnect_max: Duration::from_millis(self.reconnect_max_ms),
            sync_on_start: self.sync_on_start,
        }
    }
}

/// Defaults, then an optional `homer-sync.{toml,yaml,json}`, then `HOMER_SYNC_*` variables
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(SETTINGS_FILE)
}

pub fn load_settings_from(file_name: &str) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(file_name).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;

    Ok(settings.try_deserialize()?)
}
