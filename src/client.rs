//! Client construction.
//!
//! The resolver decides *which* backend, model, credential and base URL to use. Turning
//! that decision into a usable transport handle is the job of a [`ClientFactory`]. The
//! factory is generic over its client type, so tests and embedders can substitute their own
//! handles for the reqwest-backed [`HttpModelClient`].

mod http;

use std::error::Error as StdError;

use strum_macros;
use thiserror::Error;

pub use http::{HttpClientFactory, HttpModelClient};

/// The wire API a client speaks.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, strum_macros::Display)]
pub enum Backend {
    #[strum(serialize = "openai")]
    OpenAI,
    #[strum(serialize = "anthropic")]
    Anthropic,
    #[strum(serialize = "google")]
    Google,
    #[strum(serialize = "openrouter")]
    OpenRouter,
    #[strum(serialize = "ollama")]
    Ollama,
    /// Any endpoint implementing the OpenAI-style chat API. Used for the gateway,
    /// LM Studio and custom providers.
    #[strum(serialize = "openai-compatible")]
    OpenAICompatible,
}

impl Backend {
    /// The endpoint used when no base URL is supplied, if the backend has one.
    pub fn default_api_base(self) -> Option<&'static str> {
        match self {
            Backend::OpenAI => Some("https://api.openai.com/v1"),
            Backend::Anthropic => Some("https://api.anthropic.com/v1"),
            Backend::Google => Some("https://generativelanguage.googleapis.com/v1beta"),
            Backend::OpenRouter => Some("https://openrouter.ai/api/v1"),
            Backend::Ollama => Some(crate::providers::catalog::OLLAMA_DEFAULT_API_BASE),
            Backend::OpenAICompatible => None,
        }
    }
}

/// Errors raised while building a client. The resolver surfaces these unmodified.
#[derive(Error, Debug)]
pub enum ConstructionError {
    /// The base URL could not be parsed
    #[error("invalid API base URL \"{url}\": {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// No base URL was given and the backend has no default
    #[error("the {0} backend requires an API base URL")]
    MissingBaseUrl(Backend),
    /// The API key cannot be sent as a header value
    #[error("the API key contains characters that are not allowed in a header")]
    InvalidApiKey,
    /// The transport could not be initialized
    #[error("failed to initialize the HTTP client: {0}")]
    HttpClient(
        #[from]
        #[source]
        reqwest::Error,
    ),
    /// An error raised by a factory outside this crate
    #[error("{0}")]
    Other(Box<dyn StdError + Send + Sync>),
}

/// Builds one client per (backend, model, credential, base URL) binding.
pub trait ClientFactory: Send + Sync {
    type Client;

    /// `base_url`: when `None`, the backend's default endpoint is used.
    fn build_client(
        &self,
        backend: Backend,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Self::Client, ConstructionError>;
}
