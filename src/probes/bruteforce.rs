use crate::entities::{Domain, Strategy, Url};
use crate::http::HttpClient;
use crate::probes::{detection, merge_url};
use anyhow::Result;
use futures::{stream, StreamExt};
use std::collections::HashSet;
use tokio::sync::Semaphore;
use tracing::debug;

pub const COMMON_PATHS: &[&str] = &[
    "/graphql",
    "/graphql/console",
    "/graphiql",
    "/playground",
    "/console",
    "/query",
    "/api",
    "/api/graphql",
    "/api/v1/graphql",
    "/api/v2/graphql",
    "/v1/graphql",
    "/v2/graphql",
    "/v3/graphql",
    "/v1/graphiql",
    "/v2/graphiql",
    "/gql",
    "/api/gql",
    "/graph",
    "/graphql/v1",
    "/graphql-api",
];

/// How many paths are resolved at once within one bruteforce task. The
/// per-domain probe gate still caps actual in-flight requests.
const PATH_CONCURRENCY: usize = 16;

/// Probes every path with the detection query. A strict GraphQL signature
/// marks the URL confirmed; a loose GraphQL-shaped reply still produces an
/// unconfirmed candidate. Individual probe failures mean "nothing here".
pub async fn run(
    client: &HttpClient,
    domain: &Domain,
    paths: &[String],
    gate: &Semaphore,
) -> Result<HashSet<Url>> {
    let probe_urls: Vec<url::Url> = paths.iter().map(|path| domain.with_path(path)).collect();
    let responses = stream::iter(probe_urls)
        .map(|probe_url| {
            async move {
                let _permit = gate.acquire().await?;
                let response = detection::probe(client, probe_url.as_str()).await?;
                anyhow::Ok((probe_url, response))
            }
        })
        .buffer_unordered(PATH_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    let mut found = HashSet::new();
    for result in responses {
        let (probe_url, response) = match result {
            Ok(pair) => pair,
            Err(e) => {
                debug!(domain = %domain, error = %e, "path probe failed");
                continue;
            }
        };

        let strict = detection::has_graphql_signature(&response);
        if strict || detection::looks_like_graphql(&response) {
            if let Some(url) = Url::parse(probe_url.as_str(), Strategy::Bruteforce) {
                merge_url(&mut found, if strict { url.confirmed() } else { url });
            }
        }
    }

    Ok(found)
}

/// Loads a custom path list, one per line. Blank lines and `#` comments are
/// skipped; a missing leading slash is added.
pub fn load_wordlist(path: &std::path::Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let paths: Vec<String> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            if line.starts_with('/') {
                line.to_string()
            } else {
                format!("/{line}")
            }
        })
        .collect();
    Ok(paths)
}

pub fn default_paths() -> Vec<String> {
    COMMON_PATHS.iter().map(|s| s.to_string()).collect()
}
