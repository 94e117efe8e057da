//! Resolution errors.
//!
//! Every error is surfaced to the caller of [`crate::Resolver::resolve`]; nothing is retried or
//! swallowed. [`ErrorKind`] gives the broad category, which callers can use to decide how to
//! present the problem (e.g. "add an API key for provider X").

use thiserror::Error;

use crate::client::ConstructionError;

/// General categories of resolution errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user's configuration cannot produce a client: an unknown provider, a missing
    /// credential, a custom provider without a base URL, or an exhausted auto cascade.
    Configuration,
    /// The provider is builtin but of no kind this crate can construct.
    UnsupportedProvider,
    /// The client factory failed.
    Construction,
}

fn remediation(env_var: &Option<String>) -> String {
    match env_var {
        Some(var) => format!("add an API key in settings or define {}", var),
        None => "add an API key in settings".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// No provider descriptor exists for the id
    #[error("provider \"{0}\" does not exist")]
    UnknownProvider(String),
    /// No credential was found anywhere in the precedence chain
    #[error("no API key found for provider \"{provider}\", {}", remediation(.env_var))]
    MissingCredential {
        provider: String,
        env_var: Option<String>,
    },
    /// A custom provider has no base URL
    #[error("custom provider \"{0}\" does not define an API base URL")]
    MissingApiBaseUrl(String),
    /// None of the auto cascade's candidates has a credential
    #[error("no credentials were found for any of the automatically selected models")]
    NoAutoCandidate,
    /// The provider is builtin but not a supported kind
    #[error("provider \"{0}\" is not supported")]
    UnsupportedProvider(String),
    /// The client factory failed
    #[error("failed to construct a client for \"{provider}/{model}\": {source}")]
    Construction {
        provider: String,
        model: String,
        #[source]
        source: ConstructionError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownProvider(_)
            | Error::MissingCredential { .. }
            | Error::MissingApiBaseUrl(_)
            | Error::NoAutoCandidate => ErrorKind::Configuration,
            Error::UnsupportedProvider(_) => ErrorKind::UnsupportedProvider,
            Error::Construction { .. } => ErrorKind::Construction,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
