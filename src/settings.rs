//! The user's stored settings, as consumed by the resolver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::providers::AUTO_PROVIDER_ID;

/// A secret stored in settings.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct SecretValue {
    pub value: String,
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(<redacted>)")
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretValue>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UserSettings {
    /// Per-provider settings. The `"auto"` entry holds the gateway-wide key.
    #[serde(default)]
    pub provider_settings: HashMap<String, ProviderSetting>,
    #[serde(default)]
    pub enable_dyad_pro: bool,
    #[serde(default)]
    pub enable_pro_saver_mode: bool,
}

impl UserSettings {
    /// The API key the user stored for `provider`, trimmed, if non-empty.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.provider_settings
            .get(provider)
            .and_then(|s| s.api_key.as_ref())
            .map(|key| key.value.trim())
            .filter(|value| !value.is_empty())
    }

    /// The gateway-wide key, if configured.
    pub fn gateway_key(&self) -> Option<&str> {
        self.api_key(AUTO_PROVIDER_ID)
    }

    pub fn set_api_key(&mut self, provider: &str, value: &str) {
        self.provider_settings
            .entry(provider.to_string())
            .or_default()
            .api_key = Some(SecretValue {
            value: value.to_string(),
        });
    }

    pub fn with_api_key(mut self, provider: &str, value: &str) -> UserSettings {
        self.set_api_key(provider, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_absent() {
        let settings = UserSettings::default()
            .with_api_key("openai", "   ")
            .with_api_key("anthropic", "sk-ant");

        assert_eq!(settings.api_key("openai"), None);
        assert_eq!(settings.api_key("anthropic"), Some("sk-ant"));
        assert_eq!(settings.api_key("google"), None);
    }

    #[test]
    fn keys_are_trimmed() {
        let settings = UserSettings::default()
            .with_api_key("openai", "  sk-own\n")
            .with_api_key("auto", " dyad-key ");

        assert_eq!(settings.api_key("openai"), Some("sk-own"));
        assert_eq!(settings.gateway_key(), Some("dyad-key"));
    }

    #[test]
    fn gateway_key_is_the_auto_entry() {
        let settings = UserSettings::default().with_api_key("auto", "dyad-key");

        assert_eq!(settings.gateway_key(), Some("dyad-key"));
    }

    #[test]
    fn deserializes_from_toml() {
        let settings: UserSettings = toml::from_str(
            r#"
            enable_dyad_pro = true

            [provider_settings.google]
            api_key = { value = "g-key" }

            [provider_settings.ollama]
            "#,
        )
        .unwrap();

        assert!(settings.enable_dyad_pro);
        assert!(!settings.enable_pro_saver_mode);
        assert_eq!(settings.api_key("google"), Some("g-key"));
        assert_eq!(settings.api_key("ollama"), None);
    }
}
