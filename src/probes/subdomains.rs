use crate::config::ScanConfig;
use crate::entities::{Domain, Strategy, Url};
use crate::http::HttpClient;
use crate::probes::{consume_tasks, init_domain_tasks, merge_url};
use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

#[derive(Deserialize)]
struct CrtShEntry {
    name_value: String,
}

/// Candidate subdomains of `host` from certificate-transparency logs,
/// deduplicated, wildcards dropped, capped at `limit`.
pub async fn enumerate(client: &HttpClient, host: &str, limit: usize) -> Result<Vec<String>> {
    let lookup = format!("https://crt.sh/?q=%25.{host}&output=json");
    let body = client.get_json(&lookup).await?;
    let entries: Vec<CrtShEntry> = serde_json::from_value(body)?;

    Ok(collect_names(entries, host, limit))
}

fn collect_names(entries: Vec<CrtShEntry>, host: &str, limit: usize) -> Vec<String> {
    let suffix = format!(".{host}");
    let mut seen = HashSet::new();
    let mut subdomains = Vec::new();

    for entry in entries {
        for name in entry.name_value.split('\n') {
            let name = name.trim().to_lowercase();
            if name.is_empty() || name.contains('*') || !name.ends_with(&suffix) {
                continue;
            }
            if seen.insert(name.clone()) {
                subdomains.push(name);
                if subdomains.len() >= limit {
                    return subdomains;
                }
            }
        }
    }

    subdomains
}

/// Expands the domain into its subdomains and recurses into the regular
/// strategies for each one. Expanded domains never expand again, so the
/// recursion is one level deep. Boxed because the future type cycles through
/// the consumer.
pub fn run<'a>(
    client: &'a HttpClient,
    domain: &'a Domain,
    config: &'a ScanConfig,
    gate: &'a Arc<Semaphore>,
) -> BoxFuture<'a, Result<HashSet<Url>>> {
    async move {
        let subdomains = enumerate(client, domain.host(), config.max_subdomains).await?;
        if subdomains.is_empty() {
            return Ok(HashSet::new());
        }
        info!(domain = %domain, count = subdomains.len(), "expanding subdomains");

        let mut found = HashSet::new();
        for name in subdomains {
            let sub = match Domain::expanded(&name) {
                Ok(sub) => sub,
                Err(e) => {
                    debug!(error = %e, "skipping unusable subdomain");
                    continue;
                }
            };

            let tasks = init_domain_tasks(&sub, config)?;
            let urls = consume_tasks(tasks, client, gate.clone()).await;
            for url in urls {
                merge_url(&mut found, url.retag(Strategy::Subdomain));
            }
        }

        Ok(found)
    }
    .boxed()
}
