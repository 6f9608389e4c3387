//! Application configuration loaded from JSON and the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::admin::AdminGate;
use crate::editor::DEFAULT_CENTER;
use crate::geometry::GeoPoint;
use crate::map::{MapConfig, MapType};

pub const ENV_MAP_API_KEY: &str = "CAMPUS_NAV_MAP_API_KEY";
pub const ENV_MAP_TYPE: &str = "CAMPUS_NAV_MAP_TYPE";
pub const ENV_DATA_DIR: &str = "CAMPUS_NAV_DATA_DIR";
pub const ENV_ADMIN_PASSCODE: &str = "CAMPUS_NAV_ADMIN_PASSCODE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map_api_key: Option<String>,
    pub map_type: MapType,
    /// Directory of the persisted key/value storage.
    pub data_dir: PathBuf,
    pub admin_passcode: Option<String>,
    pub campus_center: GeoPoint,
    pub default_zoom: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_api_key: None,
            map_type: MapType::Hosted,
            data_dir: PathBuf::from(".campus_nav"),
            admin_passcode: None,
            campus_center: DEFAULT_CENTER,
            default_zoom: 16,
        }
    }
}

impl AppConfig {
    /// Loads a config file. Missing fields take their defaults.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Overlays values from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// Overlays values looked up through `var`.
    pub fn with_vars<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var(ENV_MAP_API_KEY) {
            self.map_api_key = Some(key);
        }
        if let Some(value) = var(ENV_MAP_TYPE) {
            self.map_type = value.parse().map_err(|reason| ConfigError::InvalidValue {
                var: ENV_MAP_TYPE,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(dir) = var(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(code) = var(ENV_ADMIN_PASSCODE) {
            self.admin_passcode = Some(code);
        }
        Ok(self)
    }

    /// Gate checking logins against the configured admin passcode.
    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.admin_passcode.clone())
    }

    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            api_key: self.map_api_key.clone(),
            center: self.campus_center,
            zoom: self.default_zoom,
        }
    }
}
