use super::{ModelClient, ModelRequest, Resolution, Resolver};
use crate::client::{Backend, ClientFactory};
use crate::credentials::{gateway_credential, CredentialSource};
use crate::error::{Error, Result};
use crate::providers::{ProviderDescriptor, ProviderKind, AUTO_PROVIDER_ID};
use crate::settings::UserSettings;

pub const DEFAULT_GATEWAY_URL: &str = "https://llm-gateway.dyad.sh/v1";

const GATEWAY_URL_VAR: &str = "DYAD_GATEWAY_URL";

/// Aggregator free-tier suffix the gateway does not understand.
const FREE_TIER_SUFFIX: &str = ":free";

fn gateway_model_id(prefix: &str, model: &str) -> String {
    let model = model.strip_suffix(FREE_TIER_SUFFIX).unwrap_or(model);

    format!("{}{}", prefix, model)
}

impl<F: ClientFactory> Resolver<F> {
    fn gateway_url(&self) -> String {
        self.gateway_url
            .clone()
            .or_else(|| self.env.var(GATEWAY_URL_VAR))
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
    }

    /// Whether the user's own Google key should be tried before the gateway.
    fn prefers_direct(&self, request: &ModelRequest, settings: &UserSettings) -> bool {
        let google = ProviderKind::Google.id();

        settings.enable_pro_saver_mode
            && request.provider == google
            && settings.api_key(google).is_some()
            && !self.failures.has_recent_failure(google, &request.name)
    }

    /// Routes the request through the gateway when Dyad Pro applies. Returns `None` when the
    /// request should connect to the provider directly.
    pub(super) fn gateway_override(
        &self,
        request: &ModelRequest,
        settings: &UserSettings,
        descriptor: &ProviderDescriptor,
    ) -> Result<Option<Resolution<F::Client>>> {
        if !settings.enable_dyad_pro {
            return Ok(None);
        }

        let credential = match gateway_credential(settings) {
            Some(credential) => credential,
            None => return Ok(None),
        };

        let prefix = match descriptor.gateway_prefix.as_deref() {
            Some(prefix) => prefix,
            None => {
                tracing::warn!(
                    provider = %descriptor.id,
                    model = %request.name,
                    "provider cannot be routed through the Dyad Pro gateway, connecting directly"
                );
                return Ok(None);
            }
        };

        let model = gateway_model_id(prefix, &request.name);

        let client = self
            .factory
            .build_client(
                Backend::OpenAICompatible,
                &model,
                Some(credential.value()),
                Some(&self.gateway_url()),
            )
            .map_err(|source| Error::Construction {
                provider: AUTO_PROVIDER_ID.to_string(),
                model: model.clone(),
                source,
            })?;

        let gateway = ModelClient {
            client,
            builtin_provider_id: Some(AUTO_PROVIDER_ID.to_string()),
            model,
            credential_source: Some(CredentialSource::Gateway),
        };

        if self.prefers_direct(request, settings) {
            tracing::debug!(
                provider = %request.provider,
                model = %request.name,
                "budget saver: using own key first, gateway as backup"
            );

            let primary = self.direct(request, settings, descriptor)?;

            return Ok(Some(Resolution {
                primary,
                backups: vec![gateway],
            }));
        }

        tracing::debug!(model = %gateway.model, "routing through the gateway");

        Ok(Some(Resolution::single(gateway)))
    }
}
