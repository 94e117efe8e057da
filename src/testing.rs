//! Fakes for the resolver's collaborators.

use std::collections::{HashMap, HashSet};

use crate::client::{Backend, ClientFactory, ConstructionError};
use crate::failures::FailureOracle;

/// Base URL for which [`FakeFactory`] fails construction.
pub(crate) const FAILING_URL: &str = "http://fail.invalid";

/// Model id for which [`FakeFactory`] fails construction.
pub(crate) const FAILING_MODEL: &str = "unbuildable";

pub(crate) fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeClient {
    pub backend: Backend,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl FakeClient {
    pub(crate) fn new(
        backend: Backend,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
    ) -> FakeClient {
        FakeClient {
            backend,
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
            base_url: base_url.map(str::to_string),
        }
    }
}

/// Records the binding it was asked to construct.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FakeFactory;

impl ClientFactory for FakeFactory {
    type Client = FakeClient;

    fn build_client(
        &self,
        backend: Backend,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<FakeClient, ConstructionError> {
        if base_url == Some(FAILING_URL) || model == FAILING_MODEL {
            return Err(ConstructionError::Other("refusing to connect".into()));
        }

        Ok(FakeClient::new(backend, model, api_key, base_url))
    }
}

/// Reports failures for a fixed set of (provider, model) pairs.
#[derive(Debug, Clone, Default)]
pub(crate) struct FixedOracle {
    failed: HashSet<(String, String)>,
}

impl FixedOracle {
    pub(crate) fn failing(provider: &str, model: &str) -> FixedOracle {
        let mut failed = HashSet::new();
        failed.insert((provider.to_string(), model.to_string()));

        FixedOracle { failed }
    }
}

impl FailureOracle for FixedOracle {
    fn has_recent_failure(&self, provider: &str, model: &str) -> bool {
        self.failed
            .contains(&(provider.to_string(), model.to_string()))
    }
}
