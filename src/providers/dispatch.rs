use std::str::FromStr;

use super::catalog::OLLAMA_DEFAULT_API_BASE;
use super::{ProviderDescriptor, ProviderKind, ProviderType};
use crate::client::{Backend, ClientFactory};
use crate::credentials::{Credential, Environment};
use crate::error::{Error, Result};

pub const LMSTUDIO_DEFAULT_API_BASE: &str = "http://localhost:1234/v1";

const OLLAMA_HOST_VAR: &str = "OLLAMA_HOST";

/// A provider, classified by how its clients are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderVariant {
    Builtin(ProviderKind),
    /// A user-defined endpoint speaking the OpenAI-style chat API
    Custom,
}

impl ProviderVariant {
    /// Classifies a descriptor. Builtin descriptors with an id outside [`ProviderKind`] are
    /// unsupported.
    pub fn of(descriptor: &ProviderDescriptor) -> Result<ProviderVariant> {
        match descriptor.provider_type {
            ProviderType::Custom => Ok(ProviderVariant::Custom),
            ProviderType::Builtin => ProviderKind::from_str(&descriptor.id)
                .map(ProviderVariant::Builtin)
                .map_err(|_| Error::UnsupportedProvider(descriptor.id.clone())),
        }
    }

    pub fn backend(self) -> Backend {
        match self {
            ProviderVariant::Builtin(ProviderKind::OpenAI) => Backend::OpenAI,
            ProviderVariant::Builtin(ProviderKind::Anthropic) => Backend::Anthropic,
            ProviderVariant::Builtin(ProviderKind::Google) => Backend::Google,
            ProviderVariant::Builtin(ProviderKind::OpenRouter) => Backend::OpenRouter,
            ProviderVariant::Builtin(ProviderKind::Ollama) => Backend::Ollama,
            ProviderVariant::Builtin(ProviderKind::LmStudio) | ProviderVariant::Custom => {
                Backend::OpenAICompatible
            }
        }
    }

    /// Remote builtin providers cannot be reached without a credential.
    pub fn requires_credential(self) -> bool {
        match self {
            ProviderVariant::Builtin(kind) => !kind.is_local(),
            ProviderVariant::Custom => false,
        }
    }

    /// The provider id clients of this variant are tagged with. Local and custom providers
    /// have no normalized identity.
    pub fn identity(self) -> Option<ProviderKind> {
        match self {
            ProviderVariant::Builtin(kind) if !kind.is_local() => Some(kind),
            _ => None,
        }
    }

    /// The base URL to connect to. `None` selects the backend's default endpoint.
    fn api_base(
        self,
        descriptor: &ProviderDescriptor,
        env: &dyn Environment,
    ) -> Result<Option<String>> {
        let configured = descriptor.api_base_url.clone();

        match self {
            ProviderVariant::Builtin(ProviderKind::Ollama) => Ok(Some(
                configured
                    .or_else(|| env.var(OLLAMA_HOST_VAR).map(|host| with_http_scheme(&host)))
                    .unwrap_or_else(|| OLLAMA_DEFAULT_API_BASE.to_string()),
            )),
            ProviderVariant::Builtin(ProviderKind::LmStudio) => Ok(Some(
                configured.unwrap_or_else(|| LMSTUDIO_DEFAULT_API_BASE.to_string()),
            )),
            ProviderVariant::Builtin(_) => Ok(None),
            ProviderVariant::Custom => match configured {
                Some(url) => Ok(Some(url)),
                None => Err(Error::MissingApiBaseUrl(descriptor.id.clone())),
            },
        }
    }

    /// Constructs a client for `model` at this provider.
    pub fn construct<F: ClientFactory>(
        self,
        factory: &F,
        descriptor: &ProviderDescriptor,
        model: &str,
        credential: Option<&Credential>,
        env: &dyn Environment,
    ) -> Result<F::Client> {
        if self.requires_credential() && credential.is_none() {
            return Err(Error::MissingCredential {
                provider: descriptor.id.clone(),
                env_var: descriptor.env_var_name.clone(),
            });
        }

        let api_base = self.api_base(descriptor, env)?;

        // Local providers are keyless
        let api_key = match self {
            ProviderVariant::Builtin(kind) if kind.is_local() => None,
            _ => credential.map(Credential::value),
        };

        factory
            .build_client(self.backend(), model, api_key, api_base.as_deref())
            .map_err(|source| Error::Construction {
                provider: descriptor.id.clone(),
                model: model.to_string(),
                source,
            })
    }
}

fn with_http_scheme(host: &str) -> String {
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialSource;
    use crate::error::ErrorKind;
    use crate::providers::catalog::builtin_providers;
    use crate::testing::{env, FakeClient, FakeFactory};

    fn descriptor(id: &str) -> ProviderDescriptor {
        builtin_providers().into_iter().find(|p| p.id == id).unwrap()
    }

    fn key(value: &str) -> Credential {
        Credential::new(value, CredentialSource::Settings)
    }

    #[test]
    fn classifies_descriptors() {
        assert_eq!(
            ProviderVariant::of(&descriptor("openrouter")).unwrap(),
            ProviderVariant::Builtin(ProviderKind::OpenRouter)
        );
        assert_eq!(
            ProviderVariant::of(&ProviderDescriptor::custom("together", None)).unwrap(),
            ProviderVariant::Custom
        );

        let err = ProviderVariant::of(&ProviderDescriptor::builtin("mistral")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedProvider);
    }

    #[test]
    fn remote_builtins_use_default_endpoint_and_key() {
        let google = descriptor("google");

        let client = ProviderVariant::of(&google)
            .unwrap()
            .construct(&FakeFactory, &google, "gemini-2.5-pro", Some(&key("g")), &env(&[]))
            .unwrap();

        assert_eq!(
            client,
            FakeClient::new(Backend::Google, "gemini-2.5-pro", Some("g"), None)
        );
    }

    #[test]
    fn remote_builtins_require_a_key() {
        let anthropic = descriptor("anthropic");

        let err = ProviderVariant::Builtin(ProviderKind::Anthropic)
            .construct(&FakeFactory, &anthropic, "claude", None, &env(&[]))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingCredential { ref provider, ref env_var }
                if provider == "anthropic" && env_var.as_deref() == Some("ANTHROPIC_API_KEY")
        ));
    }

    #[test]
    fn ollama_prefers_descriptor_then_host_variable() {
        let variant = ProviderVariant::Builtin(ProviderKind::Ollama);
        let ollama = descriptor("ollama");
        let host = env(&[("OLLAMA_HOST", "box:11434")]);

        let client = variant
            .construct(&FakeFactory, &ollama, "llama3", None, &host)
            .unwrap();
        assert_eq!(client.base_url.as_deref(), Some("http://box:11434"));

        let client = variant
            .construct(&FakeFactory, &ollama, "llama3", None, &env(&[]))
            .unwrap();
        assert_eq!(client.base_url.as_deref(), Some(OLLAMA_DEFAULT_API_BASE));
        assert_eq!(client.api_key, None);

        let pinned = ollama.with_api_base_url("http://10.0.0.2:11434");

        let client = variant
            .construct(&FakeFactory, &pinned, "llama3", None, &host)
            .unwrap();
        assert_eq!(client.base_url.as_deref(), Some("http://10.0.0.2:11434"));
    }

    #[test]
    fn lmstudio_defaults_its_endpoint() {
        let lmstudio = descriptor("lmstudio");

        let client = ProviderVariant::Builtin(ProviderKind::LmStudio)
            .construct(&FakeFactory, &lmstudio, "qwen", Some(&key("ignored")), &env(&[]))
            .unwrap();

        assert_eq!(
            client,
            FakeClient::new(
                Backend::OpenAICompatible,
                "qwen",
                None,
                Some(LMSTUDIO_DEFAULT_API_BASE)
            )
        );
    }

    #[test]
    fn custom_providers_need_a_base_url() {
        let bare = ProviderDescriptor::custom("together", None);

        let err = ProviderVariant::Custom
            .construct(&FakeFactory, &bare, "llama", None, &env(&[]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingApiBaseUrl(ref id) if id == "together"));

        let with_url = ProviderDescriptor::custom("together", Some("https://api.together.xyz/v1"));

        let client = ProviderVariant::Custom
            .construct(&FakeFactory, &with_url, "llama", None, &env(&[]))
            .unwrap();
        assert_eq!(client.base_url.as_deref(), Some("https://api.together.xyz/v1"));
        assert_eq!(ProviderVariant::Custom.identity(), None);
    }

    #[test]
    fn factory_errors_are_wrapped_unmodified() {
        let broken = ProviderDescriptor::custom("broken", Some(crate::testing::FAILING_URL));

        let err = ProviderVariant::Custom
            .construct(&FakeFactory, &broken, "m", None, &env(&[]))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Construction);
    }
}
