// ABOUTME: Configuration types and parsing for .ecstools.yml.
// ABOUTME: Handles YAML parsing and layering of the home and project config files.

mod alias;
mod deserialize;
mod monitor;

pub use alias::expand_alias;
pub use monitor::MonitorConfig;

use crate::error::{Error, Result};
use deserialize::deserialize_groups_option;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = ".ecstools.yml";
pub const CONFIG_FILENAME_ALT: &str = ".ecstools.yaml";

/// Name of the section holding service groups, as written in the file.
pub const SERVICE_GROUP_SECTION: &str = "service-group";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Default AWS profile.
    #[serde(default)]
    pub profile: Option<String>,

    /// Default AWS region.
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub monitor: Option<MonitorConfig>,

    #[serde(
        default,
        rename = "service-group",
        deserialize_with = "deserialize_groups_option"
    )]
    pub service_groups: Option<HashMap<String, NonEmpty<String>>>,

    #[serde(default)]
    pub alias: Option<HashMap<String, String>>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, if any.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let candidates = [dir.join(CONFIG_FILENAME), dir.join(CONFIG_FILENAME_ALT)];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading config from {}", path.display());
                return Self::load(path).map(Some);
            }
        }

        Ok(None)
    }

    /// Layer the home directory config under the project directory config.
    ///
    /// Both files are optional. Keys in the project file win, section by
    /// section, so a project can add one service group without repeating
    /// the groups defined at home.
    pub fn discover(home: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut config = Config::default();

        if let Some(home) = home
            && home != cwd
            && let Some(global) = Self::load_from_dir(home)?
        {
            config = config.merge(global);
        }

        if let Some(local) = Self::load_from_dir(cwd)? {
            config = config.merge(local);
        }

        Ok(config)
    }

    /// Merge `other` on top of `self`.
    pub fn merge(mut self, other: Config) -> Config {
        self.profile = other.profile.or(self.profile);
        self.region = other.region.or(self.region);
        self.monitor = other.monitor.or(self.monitor);
        self.service_groups = merge_section(self.service_groups, other.service_groups);
        self.alias = merge_section(self.alias, other.alias);
        self
    }

    /// Monitor settings, falling back to defaults when the section is absent.
    pub fn monitor(&self) -> MonitorConfig {
        self.monitor.clone().unwrap_or_default()
    }

    pub fn aliases(&self) -> HashMap<String, String> {
        self.alias.clone().unwrap_or_default()
    }
}

fn merge_section<V>(
    base: Option<HashMap<String, V>>,
    overlay: Option<HashMap<String, V>>,
) -> Option<HashMap<String, V>> {
    match (base, overlay) {
        (Some(mut base), Some(overlay)) => {
            base.extend(overlay);
            Some(base)
        }
        (base, overlay) => overlay.or(base),
    }
}
