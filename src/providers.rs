//! Provider identities and descriptors.
//!
//! A provider is addressed by a string id (e.g. `"openai"`, `"ollama"` or the id of a
//! user-defined endpoint). The id is matched against the closed set of kinds this crate knows
//! how to construct, described by [`ProviderKind`]. Providers declared as
//! [`ProviderType::Custom`] bypass that set: they are assumed to speak the OpenAI-style chat API
//! at a user-supplied base URL.
//!
//! ## Descriptors
//!
//! Each provider is described by a [`ProviderDescriptor`], which is owned by a
//! [`catalog::ProviderCatalog`]. The descriptor carries:
//! - The provider type (builtin or custom).
//! - An optional API base URL. Required for custom providers, used by local providers.
//! - An optional environment variable name holding the provider's API key.
//! - An optional gateway prefix. Its presence is the only signal that requests for this
//!   provider may be routed through the paid gateway.
//!
//! ## Dispatch
//!
//! [`ProviderVariant`] pairs a descriptor with its kind and implements the per-kind client
//! construction table.

pub mod catalog;
mod dispatch;

use serde::{Deserialize, Serialize};
use strum_macros;

pub use dispatch::ProviderVariant;

/// The provider id used to request the automatic model cascade, and the identity tag
/// of clients routed through the gateway.
pub const AUTO_PROVIDER_ID: &str = "auto";

/// The `ProviderKind` is the closed set of builtin providers this crate can construct
/// clients for.
///
/// The `to_string` and `FromStr` representations are the provider ids used in settings
/// and on the command line and should remain stable.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Google,
    OpenRouter,
    Ollama,
    LmStudio,
}

impl ProviderKind {
    /// Returns the provider id for this kind.
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Local providers run on the user's machine and need no credential.
    pub fn is_local(self) -> bool {
        matches!(self, ProviderKind::Ollama | ProviderKind::LmStudio)
    }
}

/// Whether a provider ships with the crate or was defined by the user.
#[derive(
    Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Builtin,
    Custom,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// The provider id, e.g. `"google"`.
    pub id: String,
    #[serde(rename = "type", default)]
    pub provider_type: ProviderType,
    /// The API base URL. Custom providers must define one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// The environment variable holding the provider's API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_var_name: Option<String>,
    /// The gateway model prefix. Providers without one are not gateway-eligible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_prefix: Option<String>,
}

impl ProviderDescriptor {
    pub fn builtin(id: &str) -> ProviderDescriptor {
        ProviderDescriptor {
            id: id.to_string(),
            provider_type: ProviderType::Builtin,
            api_base_url: None,
            env_var_name: None,
            gateway_prefix: None,
        }
    }

    pub fn custom(id: &str, api_base_url: Option<&str>) -> ProviderDescriptor {
        ProviderDescriptor {
            id: id.to_string(),
            provider_type: ProviderType::Custom,
            api_base_url: api_base_url.map(str::to_string),
            env_var_name: None,
            gateway_prefix: None,
        }
    }

    pub fn with_api_base_url(mut self, url: &str) -> ProviderDescriptor {
        self.api_base_url = Some(url.to_string());
        self
    }

    pub fn with_env_var(mut self, name: &str) -> ProviderDescriptor {
        self.env_var_name = Some(name.to_string());
        self
    }

    pub fn with_gateway_prefix(mut self, prefix: &str) -> ProviderDescriptor {
        self.gateway_prefix = Some(prefix.to_string());
        self
    }
}
