//! The provider catalog: the set of providers the resolver may look up.

use async_trait::async_trait;
use lazy_static::lazy_static;

use super::{ProviderDescriptor, ProviderKind};

lazy_static! {
    // The providers that ship with modelroute. The gateway prefixes must match the
    // namespaces the gateway uses to route requests to each upstream.
    pub(crate) static ref BUILTIN_PROVIDERS: [ProviderDescriptor; 6] = [
        ProviderDescriptor::builtin(ProviderKind::OpenAI.id())
            .with_env_var("OPENAI_API_KEY")
            .with_gateway_prefix("openai/"),
        ProviderDescriptor::builtin(ProviderKind::Anthropic.id())
            .with_env_var("ANTHROPIC_API_KEY")
            .with_gateway_prefix("anthropic/"),
        ProviderDescriptor::builtin(ProviderKind::Google.id())
            .with_env_var("GEMINI_API_KEY")
            .with_gateway_prefix("gemini/"),
        ProviderDescriptor::builtin(ProviderKind::OpenRouter.id())
            .with_env_var("OPENROUTER_API_KEY")
            .with_gateway_prefix("openrouter/"),
        ProviderDescriptor::builtin(ProviderKind::Ollama.id()),
        ProviderDescriptor::builtin(ProviderKind::LmStudio.id()),
    ];
}

pub const OLLAMA_DEFAULT_API_BASE: &str = "http://localhost:11434";

/// Returns the builtin provider descriptors.
pub fn builtin_providers() -> Vec<ProviderDescriptor> {
    BUILTIN_PROVIDERS.to_vec()
}

/// A read-only source of provider descriptors.
///
/// Descriptors are looked up fresh on every resolution, so implementations may reload
/// their backing store between calls.
#[async_trait]
pub trait ProviderCatalog: Send + Sync {
    /// Returns every known provider.
    async fn providers(&self) -> Vec<ProviderDescriptor>;

    /// Returns the provider with the given id, if any.
    async fn provider(&self, id: &str) -> Option<ProviderDescriptor> {
        self.providers().await.into_iter().find(|p| p.id == id)
    }
}

/// A catalog backed by a fixed list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    providers: Vec<ProviderDescriptor>,
}

impl StaticCatalog {
    pub fn new(providers: Vec<ProviderDescriptor>) -> StaticCatalog {
        StaticCatalog { providers }
    }

    /// A catalog containing only the builtin providers.
    pub fn builtin() -> StaticCatalog {
        StaticCatalog::new(builtin_providers())
    }

    /// Inserts a descriptor, replacing any existing descriptor with the same id.
    pub fn insert(&mut self, descriptor: ProviderDescriptor) {
        match self.providers.iter_mut().find(|p| p.id == descriptor.id) {
            Some(existing) => *existing = descriptor,
            None => self.providers.push(descriptor),
        }
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ProviderDescriptor> {
        self.providers.iter_mut().find(|p| p.id == id)
    }
}

#[async_trait]
impl ProviderCatalog for StaticCatalog {
    async fn providers(&self) -> Vec<ProviderDescriptor> {
        self.providers.clone()
    }
}
