use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;

pub const CONFIG_ENV: &str = "DEPUTY_VIEWER_CONFIG";
pub const CONFIG_FILE: &str = "deputy-viewer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("parsing {path}: {error}")]
    Parse {
        path: String,
        #[source]
        error: toml::de::Error,
    },
}

/// Startup settings. Every field has a default, so a partial file is fine:
///
/// ```toml
/// deputies_path = "dados/engajamentodeputados.csv"
/// engagement_path = "dados/engajamento.csv"
/// posts_path = "dados/posts.csv"
/// api_base_url = "https://dadosabertos.camara.leg.br/api/v2/deputados"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Deputies CSV used when nothing was uploaded.
    pub deputies_path: PathBuf,
    /// When set, deputies are left-joined with this engagement CSV.
    pub engagement_path: Option<PathBuf>,
    pub posts_path: PathBuf,
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deputies_path: PathBuf::from("engajamentodeputados.csv"),
            engagement_path: None,
            posts_path: PathBuf::from("posts.csv"),
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;
        Self::from_toml(&text).map_err(|error| ConfigError::Parse {
            path: path.display().to_string(),
            error,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Resolve the config file from `DEPUTY_VIEWER_CONFIG` or the working
    /// directory. A missing file means defaults; a broken one is logged and
    /// also falls back to defaults.
    pub fn load() -> Self {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if explicit.is_none() && !path.exists() {
            log::debug!("no {CONFIG_FILE}, using defaults");
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(cfg) => {
                log::info!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(r#"engagement_path = "eng.csv""#).unwrap();
        assert_eq!(cfg.engagement_path, Some(PathBuf::from("eng.csv")));
        assert_eq!(cfg.deputies_path, AppConfig::default().deputies_path);
        assert_eq!(cfg.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_toml("deputes_path = \"x.csv\"").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let err = AppConfig::from_file(Path::new("/no/such/deputy-viewer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
