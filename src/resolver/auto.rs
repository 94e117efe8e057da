use super::{ModelRequest, Resolution, Resolver};
use crate::client::ClientFactory;
use crate::credentials::any_credential;
use crate::error::{Error, Result};
use crate::providers::ProviderKind;
use crate::settings::UserSettings;

/// The models tried by the `"auto"` provider, in order of preference.
pub const AUTO_CANDIDATES: [(ProviderKind, &str); 3] = [
    (ProviderKind::Google, "gemini-2.5-flash-preview-04-17"),
    (ProviderKind::Anthropic, "claude-3-7-sonnet-latest"),
    (ProviderKind::OpenAI, "gpt-4.1"),
];

impl<F: ClientFactory> Resolver<F> {
    /// Resolves the first candidate for which any credential exists. The chosen candidate goes
    /// through the full concrete resolution, gateway override included.
    pub(super) async fn resolve_auto(
        &self,
        settings: &UserSettings,
    ) -> Result<Resolution<F::Client>> {
        for (kind, model) in AUTO_CANDIDATES {
            // Candidates are probed one at a time; the first usable one wins.
            let descriptor = match self.catalog.provider(kind.id()).await {
                Some(descriptor) => descriptor,
                None => {
                    tracing::debug!(
                        provider = kind.id(),
                        "auto candidate is not in the catalog, skipping"
                    );
                    continue;
                }
            };

            let credential = match any_credential(&descriptor, settings, self.env.as_ref()) {
                Some(credential) => credential,
                None => {
                    tracing::debug!(
                        provider = kind.id(),
                        model,
                        "auto candidate has no credential, skipping"
                    );
                    continue;
                }
            };

            tracing::debug!(
                provider = kind.id(),
                model,
                source = %credential.source(),
                "auto selected candidate"
            );

            let request = ModelRequest::new(kind.id(), model);

            return self.resolve_concrete(&request, settings).await;
        }

        Err(Error::NoAutoCandidate)
    }
}
