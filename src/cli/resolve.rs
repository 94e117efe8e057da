use std::sync::Arc;

use modelroute::config::Config;
use modelroute::{
    HttpClientFactory, HttpModelClient, ModelClient, ModelRequest, RecentFailureTracker,
    Resolution, Resolver,
};

use super::table::Table;
use super::{format_output, or_dash};
use crate::ResolveArgs;

#[derive(serde::Serialize)]
struct ResolvedClient {
    role: &'static str,
    tag: Option<String>,
    backend: String,
    model: String,
    base_url: String,
    key: Option<String>,
}

impl ResolvedClient {
    fn new(role: &'static str, client: ModelClient<HttpModelClient>) -> ResolvedClient {
        ResolvedClient {
            role,
            tag: client.builtin_provider_id,
            backend: client.client.backend().to_string(),
            model: client.model,
            base_url: client.client.api_base().to_string(),
            key: client.credential_source.map(|source| source.to_string()),
        }
    }
}

fn describe(resolution: Resolution<HttpModelClient>) -> Vec<ResolvedClient> {
    let mut clients = vec![ResolvedClient::new("primary", resolution.primary)];

    clients.extend(
        resolution
            .backups
            .into_iter()
            .map(|backup| ResolvedClient::new("backup", backup)),
    );

    clients
}

impl From<Vec<ResolvedClient>> for Table {
    fn from(value: Vec<ResolvedClient>) -> Self {
        let mut tab = Table::new(&["ROLE", "TAG", "BACKEND", "MODEL", "BASE_URL", "KEY"]);

        for client in value {
            tab.add_row(vec![
                client.role.to_string(),
                or_dash(client.tag.as_deref()),
                client.backend,
                client.model,
                client.base_url,
                match client.key {
                    Some(key) => key,
                    None => "none".to_string(),
                },
            ]);
        }

        tab
    }
}

fn parse_request(raw: &str) -> ModelRequest {
    match raw.parse() {
        Ok(request) => request,
        Err(err) => die!("{}", err),
    }
}

fn failure_tracker(config: &Config, failed: &[String]) -> RecentFailureTracker {
    let tracker = RecentFailureTracker::with_window(config.failure_window());

    for raw in failed {
        let request = parse_request(raw);

        tracker.record_failure(&request.provider, &request.name);
    }

    tracker
}

pub(crate) async fn resolve_cmd(config: &Config, args: &ResolveArgs) {
    let request = parse_request(&args.model);

    let tracker = failure_tracker(config, &args.failed);

    let resolver = Resolver::new(Arc::new(config.catalog()), HttpClientFactory::new())
        .with_failure_oracle(Arc::new(tracker))
        .with_gateway_url(config.gateway_url());

    let resolution = match resolver.resolve(&request, &config.settings).await {
        Ok(resolution) => resolution,
        Err(err) => die!("failed to resolve \"{}\": {}", request, err),
    };

    format_output(describe(resolution), args.format);
}
