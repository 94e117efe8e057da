//! Credential resolution.
//!
//! An API key may come from three places, listed from highest to lowest precedence:
//! 1. The gateway-wide key stored under the `"auto"` provider in settings. This is only
//!    considered when routing through the gateway or when probing auto-cascade candidates.
//! 2. The key the user stored for the provider in settings.
//! 3. The environment variable named by the provider descriptor.
//!
//! Credentials are recomputed on every resolution and never cached.

use std::collections::HashMap;
use std::env::VarError;
use std::fmt;

use serde::Serialize;

use crate::providers::ProviderDescriptor;
use crate::settings::UserSettings;

/// A read-only view of environment variables.
pub trait Environment: Send + Sync {
    /// Returns the value of `name`, or `None` if it is unset or blank.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value.trim().to_string()).filter(|v| !v.is_empty()),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                tracing::warn!(
                    var = name,
                    "ignoring environment variable that is not valid unicode"
                );
                None
            }
        }
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Where a credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// The gateway-wide key in settings
    Gateway,
    /// The provider's own key in settings
    Settings,
    /// The provider's environment variable
    Environment,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Credential {
        Credential {
            value: value.into(),
            source,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// The user's own key for the provider, stored in settings.
pub fn settings_credential(
    descriptor: &ProviderDescriptor,
    settings: &UserSettings,
) -> Option<Credential> {
    settings
        .api_key(&descriptor.id)
        .map(|key| Credential::new(key, CredentialSource::Settings))
}

/// The key held by the environment variable the descriptor names.
pub fn environment_credential(
    descriptor: &ProviderDescriptor,
    env: &dyn Environment,
) -> Option<Credential> {
    let name = descriptor.env_var_name.as_deref()?;

    env.var(name)
        .map(|key| Credential::new(key, CredentialSource::Environment))
}

/// The gateway-wide key.
pub fn gateway_credential(settings: &UserSettings) -> Option<Credential> {
    settings
        .gateway_key()
        .map(|key| Credential::new(key, CredentialSource::Gateway))
}

/// Resolves the credential for connecting to a provider directly: the settings key, else the
/// environment key. The gateway-wide key is never used here.
pub fn provider_credential(
    descriptor: &ProviderDescriptor,
    settings: &UserSettings,
    env: &dyn Environment,
) -> Option<Credential> {
    settings_credential(descriptor, settings).or_else(|| environment_credential(descriptor, env))
}

/// Resolves any credential that would make a provider usable, gateway-wide key included.
pub fn any_credential(
    descriptor: &ProviderDescriptor,
    settings: &UserSettings,
    env: &dyn Environment,
) -> Option<Credential> {
    gateway_credential(settings).or_else(|| provider_credential(descriptor, settings, env))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> ProviderDescriptor {
        ProviderDescriptor::builtin("google").with_env_var("GEMINI_API_KEY")
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn settings_beat_environment() {
        let settings = UserSettings::default().with_api_key("google", "from-settings");
        let env = env(&[("GEMINI_API_KEY", "from-env")]);

        let credential = provider_credential(&google(), &settings, &env).unwrap();
        assert_eq!(credential.value(), "from-settings");
        assert_eq!(credential.source(), CredentialSource::Settings);
    }

    #[test]
    fn environment_is_the_fallback() {
        let env = env(&[("GEMINI_API_KEY", " from-env ")]);

        let credential = provider_credential(&google(), &UserSettings::default(), &env).unwrap();
        assert_eq!(credential.value(), "from-env");
        assert_eq!(credential.source(), CredentialSource::Environment);
    }

    #[test]
    fn direct_lookup_ignores_gateway_key() {
        let settings = UserSettings::default().with_api_key("auto", "gateway");

        assert!(provider_credential(&google(), &settings, &env(&[])).is_none());
    }

    #[test]
    fn gateway_key_has_highest_precedence_for_candidates() {
        let settings = UserSettings::default()
            .with_api_key("auto", "gateway")
            .with_api_key("google", "own");

        let credential = any_credential(&google(), &settings, &env(&[])).unwrap();
        assert_eq!(credential.source(), CredentialSource::Gateway);
    }

    #[test]
    fn descriptor_without_env_var_never_reads_environment() {
        let descriptor = ProviderDescriptor::builtin("ollama");
        let env = env(&[("OLLAMA_API_KEY", "unused")]);

        assert!(environment_credential(&descriptor, &env).is_none());
    }

    #[test]
    fn blank_environment_values_are_absent() {
        let env = env(&[("GEMINI_API_KEY", "  ")]);

        assert!(environment_credential(&google(), &env).is_none());
    }
}
