use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use url::Url;

use super::{Backend, ClientFactory, ConstructionError};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A chat model client bound to exactly one backend, model, credential and endpoint.
///
/// The binding is fixed at construction. Authentication headers are baked into the
/// underlying [`reqwest::Client`].
#[derive(Clone)]
pub struct HttpModelClient {
    backend: Backend,
    model: String,
    api_base: Url,
    api_key: Option<String>,
    http: Client,
}

impl HttpModelClient {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The transport, with authentication headers already applied.
    pub fn http(&self) -> &Client {
        &self.http
    }
}

impl fmt::Debug for HttpModelClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpModelClient")
            .field("backend", &self.backend)
            .field("model", &self.model)
            .field("api_base", &self.api_base.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// Two clients are equal when they share a binding; the transport is not compared.
impl PartialEq for HttpModelClient {
    fn eq(&self, other: &Self) -> bool {
        self.backend == other.backend
            && self.model == other.model
            && self.api_base == other.api_base
            && self.api_key == other.api_key
    }
}

fn sensitive(value: &str) -> Result<HeaderValue, ConstructionError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| ConstructionError::InvalidApiKey)?;
    value.set_sensitive(true);

    Ok(value)
}

fn auth_headers(backend: Backend, api_key: &str) -> Result<HeaderMap, ConstructionError> {
    let mut headers = HeaderMap::new();

    match backend {
        Backend::Anthropic => {
            headers.insert("x-api-key", sensitive(api_key)?);
            headers.insert(
                "anthropic-version",
                HeaderValue::from_static(ANTHROPIC_VERSION),
            );
        }
        Backend::Google => {
            headers.insert("x-goog-api-key", sensitive(api_key)?);
        }
        Backend::OpenAI | Backend::OpenRouter | Backend::Ollama | Backend::OpenAICompatible => {
            headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {}", api_key))?);
        }
    }

    Ok(headers)
}

/// Builds [`HttpModelClient`]s.
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory;

impl HttpClientFactory {
    pub fn new() -> HttpClientFactory {
        HttpClientFactory
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = HttpModelClient;

    fn build_client(
        &self,
        backend: Backend,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<HttpModelClient, ConstructionError> {
        let raw_base = base_url
            .or_else(|| backend.default_api_base())
            .ok_or(ConstructionError::MissingBaseUrl(backend))?;

        let api_base = Url::parse(raw_base).map_err(|source| ConstructionError::InvalidBaseUrl {
            url: raw_base.to_string(),
            source,
        })?;

        let headers = match api_key {
            Some(api_key) => auth_headers(backend, api_key)?,
            None => HeaderMap::new(),
        };

        let http = Client::builder().default_headers(headers).build()?;

        Ok(HttpModelClient {
            backend,
            model: model.to_string(),
            api_base,
            api_key: api_key.map(str::to_string),
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_backend_default_endpoint() {
        let client = HttpClientFactory::new()
            .build_client(Backend::OpenAI, "gpt-4.1", Some("sk-test"), None)
            .unwrap();

        assert_eq!(client.api_base().as_str(), "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-4.1");
        assert!(client.has_api_key());
    }

    #[test]
    fn explicit_endpoint_overrides_default() {
        let client = HttpClientFactory::new()
            .build_client(Backend::Ollama, "llama3", None, Some("http://10.0.0.2:11434"))
            .unwrap();

        assert_eq!(client.api_base().as_str(), "http://10.0.0.2:11434/");
        assert!(!client.has_api_key());
    }

    #[test]
    fn malformed_endpoint_is_rejected() {
        let err = HttpClientFactory::new()
            .build_client(Backend::OpenAICompatible, "m", Some("k"), Some("not a url"))
            .unwrap_err();

        assert!(matches!(err, ConstructionError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn compatible_backend_requires_endpoint() {
        let err = HttpClientFactory::new()
            .build_client(Backend::OpenAICompatible, "m", Some("k"), None)
            .unwrap_err();

        assert!(matches!(
            err,
            ConstructionError::MissingBaseUrl(Backend::OpenAICompatible)
        ));
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let err = HttpClientFactory::new()
            .build_client(Backend::Anthropic, "claude", Some("bad\nkey"), None)
            .unwrap_err();

        assert!(matches!(err, ConstructionError::InvalidApiKey));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let client = HttpClientFactory::new()
            .build_client(Backend::Google, "gemini-2.5-pro", Some("secret-key"), None)
            .unwrap();

        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
