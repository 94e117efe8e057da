//! The configuration file.
//!
//! Configuration is read from the first of `$HOME/.config/modelroute/config.toml`,
//! `$HOME/.modelroute.toml` and `/etc/modelroute.toml` that exists, unless a path is given
//! explicitly. A missing file yields the default configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml;

use crate::failures::DEFAULT_FAILURE_WINDOW;
use crate::providers::catalog::StaticCatalog;
use crate::providers::ProviderDescriptor;
use crate::settings::UserSettings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(
        #[from]
        #[source]
        toml::de::Error,
    ),
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct Gateway {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct Failures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_secs: Option<u64>,
}

/// Replaces fields of a builtin provider descriptor.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ProviderOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_var_name: Option<String>,
}

/// A user-defined endpoint speaking the OpenAI-style chat API.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CustomProvider {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_var_name: Option<String>,
}

impl From<&CustomProvider> for ProviderDescriptor {
    fn from(value: &CustomProvider) -> Self {
        let mut descriptor = ProviderDescriptor::custom(&value.id, value.api_base_url.as_deref());
        descriptor.env_var_name = value.env_var_name.clone();

        descriptor
    }
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub gateway: Gateway,
    #[serde(default)]
    pub failures: Failures,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderOverride>,
    #[serde(default)]
    pub custom_providers: Vec<CustomProvider>,
}

impl Config {
    /// Builds the provider catalog: builtin providers with overrides applied, followed by
    /// custom providers. A custom provider replaces a builtin one with the same id.
    pub fn catalog(&self) -> StaticCatalog {
        let mut catalog = StaticCatalog::builtin();

        for (id, over) in &self.providers {
            match catalog.get_mut(id) {
                Some(descriptor) => {
                    if let Some(url) = &over.api_base_url {
                        descriptor.api_base_url = Some(url.clone());
                    }
                    if let Some(var) = &over.env_var_name {
                        descriptor.env_var_name = Some(var.clone());
                    }
                }
                None => {
                    tracing::warn!(provider = %id, "override for unknown builtin provider ignored")
                }
            }
        }

        for custom in &self.custom_providers {
            catalog.insert(custom.into());
        }

        catalog
    }

    pub fn gateway_url(&self) -> Option<String> {
        self.gateway.base_url.clone()
    }

    pub fn failure_window(&self) -> Duration {
        self.failures
            .window_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FAILURE_WINDOW)
    }
}

/// A parsed configuration and the keys it contained that were not recognized.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub extraneous_keys: Vec<String>,
}

fn get_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME");

    if let Some(home) = home {
        let home = PathBuf::from(home);

        const USER_PATHS: [&str; 2] = [".config/modelroute/config.toml", ".modelroute.toml"];

        for &path in USER_PATHS.iter() {
            let fullpath = home.join(path);

            if fullpath.exists() {
                return Some(fullpath);
            }
        }
    }

    let system_config = PathBuf::from("/etc/modelroute.toml");

    if system_config.exists() {
        Some(system_config)
    } else {
        None
    }
}

fn extraneous_keys_helper<'a>(
    path: &mut Vec<&'a String>,
    user_config: &'a toml::Table,
    config: &'a toml::Table,
    found: &mut Vec<String>,
) {
    for (user_key, user_value) in user_config {
        path.push(user_key);

        if let Some(config_value) = config.get(user_key) {
            if let (toml::Value::Table(user_value), toml::Value::Table(config_value)) =
                (user_value, config_value)
            {
                extraneous_keys_helper(path, user_value, config_value, found)
            }
        } else {
            let path: Vec<&str> = path.iter().map(|&s| s.as_str()).collect();

            found.push(path.join("."));
        }

        path.pop();
    }
}

/// Lists the dotted paths of keys in `raw_config` that do not survive a round trip through
/// [`Config`].
fn extraneous_keys(config: &Config, raw_config: &str) -> Result<Vec<String>, ConfigError> {
    let user_config: toml::Table = toml::from_str(raw_config)?;

    let config: toml::Table = match toml::to_string(config) {
        Ok(reserialized) => toml::from_str(&reserialized)?,
        Err(err) => {
            tracing::debug!(error = %err, "could not reserialize config, skipping key check");
            return Ok(Vec::new());
        }
    };

    let mut path = Vec::new();
    let mut found = Vec::new();

    extraneous_keys_helper(&mut path, &user_config, &config, &mut found);

    Ok(found)
}

pub fn parse_config(raw_config: &str) -> Result<LoadedConfig, ConfigError> {
    let config: Config = toml::from_str(raw_config)?;

    let extraneous_keys = extraneous_keys(&config, raw_config)?;

    Ok(LoadedConfig {
        config,
        extraneous_keys,
    })
}

fn read_config_file(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let raw_config = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&raw_config)
}

/// Reads the configuration from `config`, or from the first default location that exists.
pub fn read_config(config: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let config_path = config.or_else(get_config_path);

    match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading config");
            read_config_file(&path)
        }
        None => Ok(LoadedConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::catalog::ProviderCatalog;
    use crate::providers::ProviderType;

    const SAMPLE: &str = r#"
        [settings]
        enable_dyad_pro = true
        enable_pro_saver_mode = true

        [settings.provider_settings.auto]
        api_key = { value = "dyad-key" }

        [gateway]
        base_url = "http://localhost:8080/v1"

        [failures]
        window_secs = 60

        [providers.ollama]
        api_base_url = "http://10.0.0.2:11434"

        [[custom_providers]]
        id = "together"
        api_base_url = "https://api.together.xyz/v1"
        env_var_name = "TOGETHER_API_KEY"
    "#;

    #[test]
    fn parses_full_config() {
        let LoadedConfig {
            config,
            extraneous_keys,
        } = parse_config(SAMPLE).unwrap();

        assert!(extraneous_keys.is_empty(), "{:?}", extraneous_keys);
        assert!(config.settings.enable_dyad_pro);
        assert_eq!(config.settings.gateway_key(), Some("dyad-key"));
        assert_eq!(config.gateway_url().as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.failure_window(), Duration::from_secs(60));
    }

    #[test]
    fn reports_extraneous_keys() {
        let loaded = parse_config(
            r#"
            colour = "red"

            [settings]
            enable_dyad_pro = true
            enable_turbo = true
            "#,
        )
        .unwrap();

        let mut keys = loaded.extraneous_keys;
        keys.sort();
        assert_eq!(keys, vec!["colour", "settings.enable_turbo"]);
    }

    #[test]
    fn rejects_malformed_config() {
        let err = parse_config("[settings\nenable_dyad_pro = ").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_config(Some(PathBuf::from("/nonexistent/modelroute.toml"))).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn defaults_without_config() {
        let config = Config::default();

        assert_eq!(config.failure_window(), DEFAULT_FAILURE_WINDOW);
        assert_eq!(config.gateway_url(), None);
        assert!(!config.settings.enable_dyad_pro);
    }

    #[tokio::test]
    async fn catalog_applies_overrides_and_custom_providers() {
        let catalog = parse_config(SAMPLE).unwrap().config.catalog();

        let ollama = catalog.provider("ollama").await.unwrap();
        assert_eq!(ollama.api_base_url.as_deref(), Some("http://10.0.0.2:11434"));

        let together = catalog.provider("together").await.unwrap();
        assert_eq!(together.provider_type, ProviderType::Custom);
        assert_eq!(together.env_var_name.as_deref(), Some("TOGETHER_API_KEY"));

        // Untouched builtins keep their descriptors
        let google = catalog.provider("google").await.unwrap();
        assert_eq!(google.gateway_prefix.as_deref(), Some("gemini/"));
    }
}
