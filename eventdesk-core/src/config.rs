//! Global eventdesk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::access::RoleConfig;
use crate::constants::{
    DEFAULT_EVENTS_FILE, DEFAULT_FLOW_TIMEOUT, DEFAULT_ITEMS_FILE, DEFAULT_PAGE_SIZE,
    DEFAULT_SWEEP_INTERVAL,
};
use crate::error::{DeskError, DeskResult};
use crate::event::Event;
use crate::item::WorkItem;
use crate::store::JsonStore;

static DEFAULT_DATA_DIR: &str = "~/.local/share/eventdesk";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_events_file() -> String {
    DEFAULT_EVENTS_FILE.to_string()
}

fn default_items_file() -> String {
    DEFAULT_ITEMS_FILE.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_sweep_interval() -> String {
    DEFAULT_SWEEP_INTERVAL.to_string()
}

fn default_flow_timeout() -> String {
    DEFAULT_FLOW_TIMEOUT.to_string()
}

/// Configuration at ~/.config/eventdesk/config.toml
///
/// Every key is optional. `EVENTDESK_*` environment variables override the
/// file, e.g. `EVENTDESK_PAGE_SIZE=10` or `EVENTDESK_ROLES__ELEVATED=admin`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeskConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_events_file")]
    pub events_file: String,

    #[serde(default = "default_items_file")]
    pub items_file: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// humantime duration, e.g. "60s"
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: String,

    /// humantime duration, e.g. "2m"
    #[serde(default = "default_flow_timeout")]
    pub flow_timeout: String,

    #[serde(default)]
    pub roles: RoleConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            data_dir: default_data_dir(),
            events_file: default_events_file(),
            items_file: default_items_file(),
            page_size: default_page_size(),
            sweep_interval: default_sweep_interval(),
            flow_timeout: default_flow_timeout(),
            roles: RoleConfig::default(),
        }
    }
}

impl DeskConfig {
    pub fn config_path() -> DeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DeskError::Config("Could not determine config directory".into()))?
            .join("eventdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file on first run.
    pub fn load() -> DeskResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
        }

        Self::load_from(&path)
    }

    /// Load from `path` (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> DeskResult<Self> {
        let config: DeskConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("EVENTDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DeskError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> DeskResult<()> {
        if self.page_size == 0 {
            return Err(DeskError::Config("page_size must be at least 1".into()));
        }
        if self.sweep_interval()?.is_zero() {
            return Err(DeskError::Config("sweep_interval must be positive".into()));
        }
        self.flow_timeout()?;
        Ok(())
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_path().join(&self.events_file)
    }

    pub fn items_path(&self) -> PathBuf {
        self.data_path().join(&self.items_file)
    }

    pub fn event_store(&self) -> JsonStore<Event> {
        JsonStore::new(self.events_path())
    }

    pub fn item_store(&self) -> JsonStore<WorkItem> {
        JsonStore::new(self.items_path())
    }

    pub fn sweep_interval(&self) -> DeskResult<Duration> {
        parse_duration("sweep_interval", &self.sweep_interval)
    }

    pub fn flow_timeout(&self) -> DeskResult<Duration> {
        parse_duration("flow_timeout", &self.flow_timeout)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DeskResult<()> {
        let defaults = toml::to_string_pretty(&DeskConfig::default())
            .map_err(|e| DeskError::Config(e.to_string()))?;

        let mut contents = String::from(
            "# eventdesk configuration\n\
             #\n\
             # Every key is optional; uncomment to override the default shown.\n\
             # sweep_interval and flow_timeout take durations such as \"90s\" or \"5m\".\n\n",
        );
        for line in defaults.lines() {
            if line.is_empty() {
                contents.push('\n');
            } else {
                contents.push_str("# ");
                contents.push_str(line);
                contents.push('\n');
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn parse_duration(key: &str, value: &str) -> DeskResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| DeskError::Config(format!("Invalid {key} '{value}': {e}")))
}
