//! Resolution of model requests into clients.
//!
//! A [`ModelRequest`] names a provider and a model. The [`Resolver`] turns the request and the
//! user's [`UserSettings`] into a [`Resolution`]: a primary client and an ordered list of backup
//! clients. Resolution proceeds in one direction:
//!
//! 1. If the provider is `"auto"`, a fixed list of candidate models is probed in order and the
//!    first one with a credential is resolved as if it had been requested directly.
//! 2. The provider descriptor is looked up in the [`ProviderCatalog`].
//! 3. If the user has Dyad Pro enabled and a gateway-wide key, the request is routed through
//!    the gateway. In budget-saver mode, a Google request with the user's own key keeps the
//!    direct client as primary and the gateway client as backup.
//! 4. Otherwise, a client is constructed directly against the provider.
//!
//! The resolver holds no mutable state. Concurrent resolutions are independent.

mod auto;
mod direct;
mod gateway;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::client::ClientFactory;
use crate::credentials::{CredentialSource, Environment, ProcessEnvironment};
use crate::error::{Error, Result};
use crate::failures::{FailureOracle, NoFailures};
use crate::providers::catalog::ProviderCatalog;
use crate::providers::AUTO_PROVIDER_ID;
use crate::settings::UserSettings;

pub use auto::AUTO_CANDIDATES;
pub use gateway::DEFAULT_GATEWAY_URL;

/// A request for a client: a provider id (or `"auto"`) and a model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelRequest {
    pub provider: String,
    pub name: String,
}

impl ModelRequest {
    pub fn new(provider: &str, name: &str) -> ModelRequest {
        ModelRequest {
            provider: provider.to_string(),
            name: name.to_string(),
        }
    }

    /// A request for the automatic model cascade.
    pub fn auto() -> ModelRequest {
        ModelRequest::new(AUTO_PROVIDER_ID, AUTO_PROVIDER_ID)
    }

    pub fn is_auto(&self) -> bool {
        self.provider == AUTO_PROVIDER_ID
    }
}

impl fmt::Display for ModelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.name)
    }
}

/// Parses `<provider> "/" <model>`, or `auto` on its own. Only the first slash separates the
/// provider, so model names may contain slashes.
impl FromStr for ModelRequest {
    type Err = ParseRequestError;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let raw = raw.trim();

        if raw == AUTO_PROVIDER_ID {
            return Ok(ModelRequest::auto());
        }

        match raw.split_once('/') {
            Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {
                Ok(ModelRequest::new(provider, model))
            }
            _ => Err(ParseRequestError(raw.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("model \"{0}\" must be written as <provider>/<model>")]
pub struct ParseRequestError(String);

/// A constructed client together with how it was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelClient<C> {
    pub client: C,
    /// `"auto"` for clients routed through the gateway, the provider id for direct builtin
    /// connections, absent for local and custom providers.
    pub builtin_provider_id: Option<String>,
    /// The model id the client is bound to. Gateway clients carry the prefixed id.
    pub model: String,
    /// Where the client's API key came from. Absent for keyless clients.
    pub credential_source: Option<CredentialSource>,
}

/// The clients to try, in order of preference.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<C> {
    pub primary: ModelClient<C>,
    pub backups: Vec<ModelClient<C>>,
}

impl<C> Resolution<C> {
    pub fn single(primary: ModelClient<C>) -> Resolution<C> {
        Resolution {
            primary,
            backups: Vec::new(),
        }
    }

    /// Iterates over every client, primary first.
    pub fn clients(&self) -> impl Iterator<Item = &ModelClient<C>> {
        std::iter::once(&self.primary).chain(self.backups.iter())
    }
}

pub struct Resolver<F: ClientFactory> {
    catalog: Arc<dyn ProviderCatalog>,
    env: Arc<dyn Environment>,
    failures: Arc<dyn FailureOracle>,
    factory: F,
    gateway_url: Option<String>,
}

impl<F: ClientFactory> Resolver<F> {
    /// Creates a resolver reading the process environment and assuming no recent failures.
    pub fn new(catalog: Arc<dyn ProviderCatalog>, factory: F) -> Resolver<F> {
        Resolver {
            catalog,
            env: Arc::new(ProcessEnvironment),
            failures: Arc::new(NoFailures),
            factory,
            gateway_url: None,
        }
    }

    pub fn with_environment(mut self, env: Arc<dyn Environment>) -> Resolver<F> {
        self.env = env;
        self
    }

    pub fn with_failure_oracle(mut self, failures: Arc<dyn FailureOracle>) -> Resolver<F> {
        self.failures = failures;
        self
    }

    /// Overrides the gateway endpoint. Takes precedence over `DYAD_GATEWAY_URL`.
    pub fn with_gateway_url(mut self, url: Option<String>) -> Resolver<F> {
        self.gateway_url = url;
        self
    }

    /// Resolves a request into a primary client and its backups.
    pub async fn resolve(
        &self,
        request: &ModelRequest,
        settings: &UserSettings,
    ) -> Result<Resolution<F::Client>> {
        if request.is_auto() {
            return self.resolve_auto(settings).await;
        }

        self.resolve_concrete(request, settings).await
    }

    /// Resolves a request for a concrete provider: gateway override first, else a direct
    /// connection.
    async fn resolve_concrete(
        &self,
        request: &ModelRequest,
        settings: &UserSettings,
    ) -> Result<Resolution<F::Client>> {
        let descriptor = self
            .catalog
            .provider(&request.provider)
            .await
            .ok_or_else(|| Error::UnknownProvider(request.provider.clone()))?;

        if let Some(resolution) = self.gateway_override(request, settings, &descriptor)? {
            return Ok(resolution);
        }

        let client = self.direct(request, settings, &descriptor)?;

        Ok(Resolution::single(client))
    }
}
