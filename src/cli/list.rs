use modelroute::config::Config;
use modelroute::credentials::provider_credential;
use modelroute::providers::ProviderVariant;
use modelroute::{ProcessEnvironment, ProviderCatalog, ProviderDescriptor, ProviderType};

use super::table::Table;
use super::{format_output, or_dash};
use crate::{ListArgs, ListObject};

#[derive(serde::Serialize)]
struct Provider {
    id: String,
    #[serde(rename = "type")]
    provider_type: ProviderType,
    api_base_url: Option<String>,
    env_var_name: Option<String>,
    gateway_prefix: Option<String>,
    /// Where the direct-connection key would come from: "settings", "environment",
    /// "local" for keyless providers, or absent.
    credential: Option<String>,
}

impl Provider {
    fn describe(descriptor: ProviderDescriptor, config: &Config) -> Provider {
        let local = matches!(
            ProviderVariant::of(&descriptor),
            Ok(ProviderVariant::Builtin(kind)) if kind.is_local()
        );

        let credential = if local {
            Some("local".to_string())
        } else {
            provider_credential(&descriptor, &config.settings, &ProcessEnvironment)
                .map(|c| c.source().to_string())
        };

        Provider {
            id: descriptor.id,
            provider_type: descriptor.provider_type,
            api_base_url: descriptor.api_base_url,
            env_var_name: descriptor.env_var_name,
            gateway_prefix: descriptor.gateway_prefix,
            credential,
        }
    }
}

impl From<Vec<Provider>> for Table {
    fn from(value: Vec<Provider>) -> Self {
        let mut tab = Table::new(&[
            "ID",
            "TYPE",
            "BASE_URL",
            "ENV_VAR",
            "GATEWAY_PREFIX",
            "CREDENTIAL",
        ]);

        for provider in value {
            tab.add_row(vec![
                provider.id,
                provider.provider_type.to_string(),
                or_dash(provider.api_base_url.as_deref()),
                or_dash(provider.env_var_name.as_deref()),
                or_dash(provider.gateway_prefix.as_deref()),
                match provider.credential {
                    Some(credential) => credential,
                    None => "none".to_string(),
                },
            ]);
        }

        tab
    }
}

async fn get_providers(config: &Config) -> Vec<Provider> {
    let catalog = config.catalog();

    catalog
        .providers()
        .await
        .into_iter()
        .map(|descriptor| Provider::describe(descriptor, config))
        .collect()
}

pub(crate) async fn list_cmd(config: &Config, args: &ListArgs) {
    let format = args.format;

    match &args.object {
        ListObject::Providers => {
            let providers = get_providers(config).await;
            format_output(providers, format);
        }
    }
}
