//! sldsrv configuration
//!
//! Loaded in increasing priority from defaults, an optional YAML file and
//! `SLDSRV_*` environment variables (`__` separates nested keys), e.g.
//! `SLDSRV_NETWORK_STORE__BASE_URL=http://store:8080`.

use crate::error::{Result, SldSrvError};
use common::LoggingSettings;
use serde::{Deserialize, Serialize};
use sld_diagram::{LayoutParameters, LIBRARY_NAMES};
use std::path::{Path, PathBuf};

/// Default API port
pub const DEFAULT_PORT: u16 = 5005;

pub const SERVICE_NAME: &str = "sldsrv";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SLDSRV_";

/// Configuration file used when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/sldsrv.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SldsrvConfig {
    pub service: ServiceConfig,
    pub api: ApiConfig,
    pub network_store: NetworkStoreConfig,
    pub diagram: DiagramSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub description: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            description: "Single-line diagram service".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStoreKind {
    /// Remote network store server
    #[default]
    Rest,
    /// `<uuid>.json` files loaded into memory at startup
    Directory,
}

impl NetworkStoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkStoreKind::Rest => "rest",
            NetworkStoreKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStoreConfig {
    pub kind: NetworkStoreKind,
    pub base_url: String,
    pub directory: PathBuf,
    /// REST request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for NetworkStoreConfig {
    fn default() -> Self {
        Self {
            kind: NetworkStoreKind::Rest,
            base_url: "http://network-store-server".to_string(),
            directory: PathBuf::from("data/networks"),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    pub component_library: String,
    pub layout: LayoutParameters,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            component_library: "Convergence".to_string(),
            layout: LayoutParameters::default(),
        }
    }
}

impl SldsrvConfig {
    /// Load with priority: ENV > YAML file > defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = common::load_layered::<Self>(
            path,
            Path::new(DEFAULT_CONFIG_PATH),
            ENV_PREFIX,
        )?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(SldSrvError::invalid_config("api.port", "must be non-zero"));
        }

        match self.network_store.kind {
            NetworkStoreKind::Rest if self.network_store.base_url.trim().is_empty() => {
                return Err(SldSrvError::invalid_config(
                    "network_store.base_url",
                    "required for the rest store",
                ));
            },
            NetworkStoreKind::Directory if !self.network_store.directory.is_dir() => {
                return Err(SldSrvError::invalid_config(
                    "network_store.directory",
                    format!(
                        "{} is not a directory",
                        self.network_store.directory.display()
                    ),
                ));
            },
            _ => {},
        }

        if !LIBRARY_NAMES.contains(&self.diagram.component_library.as_str()) {
            return Err(SldSrvError::invalid_config(
                "diagram.component_library",
                format!(
                    "unknown library '{}', expected one of {:?}",
                    self.diagram.component_library, LIBRARY_NAMES
                ),
            ));
        }

        let scale_factor = self.diagram.layout.scale_factor;
        if scale_factor.is_nan() || scale_factor <= 0.0 {
            return Err(SldSrvError::invalid_config(
                "diagram.layout.scale_factor",
                "must be positive",
            ));
        }

        Ok(())
    }

    /// `host:port`, unless an explicit bind address is given
    pub fn bind_address(&self, override_address: Option<&str>) -> String {
        match override_address {
            Some(address) => address.to_string(),
            None => format!("{}:{}", self.api.host, self.api.port),
        }
    }
}
