//! Resolve a model request into ready-to-use chat model clients.
//!
//! Callers ask for a client by provider and model name. The [`Resolver`] works out, without
//! the caller's involvement:
//! - Which credential source holds the API key (settings, environment or the gateway-wide key).
//! - Whether the request should be routed through the paid gateway instead of the provider.
//! - Whether a backup client should be prepared alongside the primary one.
//! - Which concrete model to use when the caller asks for `"auto"`.
//!
//! The resolver makes one decision per request and hands back client handles. Executing
//! requests against those clients, and retrying on the backups, is up to the caller.
//!
//! ## Collaborators
//!
//! The resolver reads from four injected collaborators:
//! - A [`ProviderCatalog`], mapping provider ids to [`ProviderDescriptor`]s.
//! - An [`Environment`], for environment-sourced API keys and endpoint overrides.
//! - A [`FailureOracle`], reporting whether a (provider, model) pair failed recently.
//! - A [`ClientFactory`], constructing the client handles.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod failures;
pub mod providers;
pub mod resolver;
pub mod settings;

#[cfg(test)]
mod testing;

pub use client::{Backend, ClientFactory, ConstructionError, HttpClientFactory, HttpModelClient};
pub use credentials::{Credential, CredentialSource, Environment, ProcessEnvironment};
pub use error::{Error, ErrorKind, Result};
pub use failures::{FailureOracle, NoFailures, RecentFailureTracker};
pub use providers::catalog::{ProviderCatalog, StaticCatalog};
pub use providers::{ProviderDescriptor, ProviderKind, ProviderType};
pub use resolver::{ModelClient, ModelRequest, Resolution, Resolver};
pub use settings::{ProviderSetting, SecretValue, UserSettings};
