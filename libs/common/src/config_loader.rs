//! Configuration loading helper functions
//!
//! Services describe their configuration as a serde struct with a `Default`
//! implementation. [`load_layered`] merges, in increasing priority:
//! 1. the struct's defaults
//! 2. an optional YAML file
//! 3. environment variables with the service prefix (`__` separates nesting)

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Errors raised while assembling a layered configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

/// Build the figment used by [`load_layered`]
///
/// Exposed separately so callers and tests can inspect or extend the
/// provider chain before extraction. Environment keys arrive lowercased, so
/// only snake_case field names can be overridden from the environment.
pub fn layered_figment<T: Serialize + Default>(file: Option<&Path>, env_prefix: &str) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(T::default()));
    if let Some(path) = file {
        figment = figment.merge(Yaml::file(path));
    }
    figment.merge(Env::prefixed(env_prefix).split("__"))
}

/// Load configuration with priority: ENV > YAML file > Default
///
/// An explicitly requested file must exist; `fallback` is used only when it
/// exists on disk, otherwise defaults and environment are enough.
pub fn load_layered<T>(
    explicit: Option<&Path>,
    fallback: &Path,
    env_prefix: &str,
) -> Result<T, ConfigLoadError>
where
    T: Serialize + DeserializeOwned + Default,
{
    let file = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        },
        Some(path) => Some(path),
        None if fallback.exists() => Some(fallback),
        None => None,
    };

    match file {
        Some(path) => info!("Loading configuration from: {}", path.display()),
        None => debug!("No configuration file, using defaults and {}* environment", env_prefix),
    }

    layered_figment::<T>(file, env_prefix)
        .extract()
        .map_err(|e| ConfigLoadError::Extract(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        port: u16,
        nested: Nested,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Nested {
        name: String,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                port: 5005,
                nested: Nested {
                    name: "default".to_string(),
                },
            }
        }
    }

    #[test]
    fn test_defaults_when_no_file() {
        figment::Jail::expect_with(|jail| {
            let missing = jail.directory().join("missing.yaml");
            let sample: Sample = load_layered(None, &missing, "SAMPLE_").unwrap();
            assert_eq!(sample, Sample::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("sample.yaml", "port: 6000\nnested:\n  name: from-file\n")?;
            jail.set_env("SAMPLE_NESTED__NAME", "from-env");

            let path = jail.directory().join("sample.yaml");
            let sample: Sample = load_layered(Some(&path), &path, "SAMPLE_").unwrap();
            assert_eq!(sample.port, 6000);
            assert_eq!(sample.nested.name, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let result: Result<Sample, _> = load_layered(Some(&path), &path, "SAMPLE_");
        assert!(matches!(result, Err(ConfigLoadError::FileNotFound(_))));
    }
}
