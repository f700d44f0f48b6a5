//! Unified service bootstrap utilities
//!
//! Startup banner, logging initialization from the service's `logging`
//! configuration section, and development environment loading.

use crate::logging::{self, LogConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};

/// Service metadata for startup
pub struct ServiceInfo {
    /// Service name (e.g., "sldsrv")
    pub name: String,
    /// Service version from Cargo.toml
    pub version: String,
    /// Service description
    pub description: String,
    /// Default port
    pub default_port: u16,
}

impl ServiceInfo {
    /// Create new service info
    pub fn new(name: impl Into<String>, description: impl Into<String>, default_port: u16) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: description.into(),
            default_port,
        }
    }

    /// Override the version reported in the banner
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// `logging` section shared by service configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Log root directory; `SLD_LOG_DIR` takes precedence
    pub dir: String,
    /// JSON lines in the business log file
    pub json: bool,
    /// Write daily-rolling log files
    pub file: bool,
    /// Separate HTTP access log
    pub api_log: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            json: false,
            file: true,
            api_log: true,
        }
    }
}

/// Print unified startup banner for any service
pub fn print_startup_banner(service: &ServiceInfo) {
    let banner = match service.name.as_str() {
        "sldsrv" => {
            r#"
 ███████╗██╗     ██████╗ ███████╗██████╗ ██╗   ██╗
 ██╔════╝██║     ██╔══██╗██╔════╝██╔══██╗██║   ██║
 ███████╗██║     ██║  ██║███████╗██████╔╝██║   ██║
 ╚════██║██║     ██║  ██║╚════██║██╔══██╗╚██╗ ██╔╝
 ███████║███████╗██████╔╝███████║██║  ██║ ╚████╔╝
 ╚══════╝╚══════╝╚═════╝ ╚══════╝╚═╝  ╚═╝  ╚═══╝
            "#
        },
        _ => "",
    };

    if !banner.is_empty() {
        info!("{}", banner);
    }
    info!("");
    info!(" {} v{}", service.name.to_uppercase(), service.version);
    info!(" {}", service.description);
    info!(" Default Port: {}", service.default_port);
    info!("");
}

/// Initialize logging for a service
///
/// Log root directory priority:
/// 1. `SLD_LOG_DIR` environment variable
/// 2. `settings.dir`
/// 3. Default "logs"
///
/// `--log-level` style overrides are passed through `level_override`.
pub fn init_logging(
    service: &ServiceInfo,
    settings: &LoggingSettings,
    level_override: Option<&str>,
    ansi: bool,
) -> anyhow::Result<()> {
    logging::init_log_root(Some(settings.dir.as_str()));

    let raw_level = level_override.unwrap_or(settings.level.as_str());
    let level = raw_level
        .parse::<Level>()
        .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", raw_level))?;

    let log_config = LogConfig {
        service_name: service.name.clone(),
        log_dir: logging::get_log_root().join(&service.name),
        level,
        enable_file: settings.file,
        enable_json: settings.json,
        enable_api_log: settings.api_log,
        ansi,
    };

    logging::init_with_config(log_config).map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// Load environment variables in development mode
///
/// In debug builds, reads `.env` without overriding variables that are
/// already set. No-op in release builds.
pub fn load_development_env() {
    #[cfg(debug_assertions)]
    {
        if let Ok(content) = std::fs::read_to_string(".env") {
            for line in content.lines() {
                let trimmed = line.trim();
                if trimmed.starts_with('#') || trimmed.is_empty() {
                    continue;
                }

                if let Some((key, value)) = trimmed.split_once('=') {
                    let key = key.trim();
                    let value = value.trim();

                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
        }
    }
}
