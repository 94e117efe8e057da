use super::{ModelClient, ModelRequest, Resolver};
use crate::client::ClientFactory;
use crate::credentials::provider_credential;
use crate::error::Result;
use crate::providers::{ProviderDescriptor, ProviderVariant};
use crate::settings::UserSettings;

impl<F: ClientFactory> Resolver<F> {
    /// Connects to the provider directly, using the provider's own key from settings or the
    /// environment.
    pub(super) fn direct(
        &self,
        request: &ModelRequest,
        settings: &UserSettings,
        descriptor: &ProviderDescriptor,
    ) -> Result<ModelClient<F::Client>> {
        let variant = ProviderVariant::of(descriptor)?;

        let credential = provider_credential(descriptor, settings, self.env.as_ref());

        let client = variant.construct(
            &self.factory,
            descriptor,
            &request.name,
            credential.as_ref(),
            self.env.as_ref(),
        )?;

        let credential_source = match variant {
            ProviderVariant::Builtin(kind) if kind.is_local() => None,
            _ => credential.map(|c| c.source()),
        };

        Ok(ModelClient {
            client,
            builtin_provider_id: variant.identity().map(|kind| kind.id().to_string()),
            model: request.name.clone(),
            credential_source,
        })
    }
}
