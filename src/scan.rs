use crate::config::ScanConfig;
use crate::entities::{Domain, Results, Url};
use crate::errors::ScanError;
use crate::filters::filter_urls;
use crate::http::HttpClient;
use crate::probes::{consume_tasks, init_domain_tasks, MAX_CONCURRENT_PROBES};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Scans every domain, strictly one at a time in input order. Within one
/// domain, tasks run concurrently; across domains nothing overlaps, which
/// bounds the load any single run puts on distinct targets.
///
/// Always yields one entry per input domain: a domain-level failure is
/// logged and recorded as an empty set, never aborting the run. An empty
/// input produces an empty mapping.
pub async fn run(
    domains: Vec<Domain>,
    config: &ScanConfig,
    client: &HttpClient,
) -> Result<Results, ScanError> {
    config.validate()?;

    let mut results = Results::new();

    for domain in domains {
        info!(domain = %domain, "scanning");
        match domain_routine(&domain, config, client).await {
            Ok(urls) => {
                info!(domain = %domain, found = urls.len(), "scan finished");
                results.insert(domain.name(), urls);
            }
            Err(e) => {
                error!(domain = %domain, error = %e, "domain scan failed");
                results.insert(domain.name(), HashSet::new());
            }
        }
    }

    Ok(results)
}

/// One domain's pipeline: generate tasks, consume them under a fresh probe
/// gate, filter the raw discoveries.
async fn domain_routine(
    domain: &Domain,
    config: &ScanConfig,
    client: &HttpClient,
) -> anyhow::Result<HashSet<Url>> {
    let tasks = init_domain_tasks(domain, config)?;
    let gate = Arc::new(Semaphore::new(MAX_CONCURRENT_PROBES));
    let raw = consume_tasks(tasks, client, gate).await;
    Ok(filter_urls(raw, config.precision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn an_empty_domain_list_yields_an_empty_mapping() {
        let client = HttpClient::new(None, Default::default()).unwrap();
        let results = run(Vec::new(), &ScanConfig::default(), &client)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn a_contradictory_config_fails_before_any_scan() {
        let client = HttpClient::new(None, Default::default()).unwrap();
        let config = ScanConfig {
            script_scan: false,
            bruteforce_scan: false,
            ..ScanConfig::default()
        };
        let domains = vec![Domain::new("example.com").unwrap()];
        assert!(matches!(
            run(domains, &config, &client).await,
            Err(ScanError::NoStrategy)
        ));
    }
}
