use crate::entities::{Domain, Strategy, Url};
use crate::http::HttpClient;
use crate::probes::{detection, merge_url};
use anyhow::Result;
use futures::{stream, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tokio::sync::Semaphore;
use tracing::debug;

static SCRIPT_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<script[^>]*\ssrc\s*=\s*["']([^"']+)["']"#).unwrap());

static ABSOLUTE_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["'](https?://[^"'\s]*(?:graphql|gql)[^"'\s]*)["']"#).unwrap());

static RELATIVE_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["'](/[A-Za-z0-9_\-./]*(?:graphql|gql)[A-Za-z0-9_\-./]*)["']"#).unwrap());

/// Cap on linked script files fetched per page.
const MAX_LINKED_SCRIPTS: usize = 10;

const FETCH_CONCURRENCY: usize = 8;

/// Pulls GraphQL endpoint references out of the domain's front-end: the root
/// page itself (covering inline scripts) plus up to [`MAX_LINKED_SCRIPTS`]
/// linked script files. Every candidate gets one detection probe to record
/// whether it answers like a GraphQL server.
pub async fn run(client: &HttpClient, domain: &Domain, gate: &Semaphore) -> Result<HashSet<Url>> {
    let page = {
        let _permit = gate.acquire().await?;
        client.get_html(domain.base().as_str()).await?
    };

    let mut sources = Vec::new();

    let script_urls: Vec<url::Url> = SCRIPT_SRC
        .captures_iter(&page.body)
        .filter_map(|cap| domain.base().join(&cap[1]).ok())
        .take(MAX_LINKED_SCRIPTS)
        .collect();

    let fetched = stream::iter(script_urls)
        .map(|script_url| async move {
            let _permit = gate.acquire().await?;
            let response = client.get_html(script_url.as_str()).await?;
            anyhow::Ok(response.body)
        })
        .buffer_unordered(FETCH_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    sources.push(page.body);
    for body in fetched {
        match body {
            Ok(body) => sources.push(body),
            Err(e) => debug!(domain = %domain, error = %e, "script fetch failed"),
        }
    }

    let mut candidates = HashSet::new();
    for source in &sources {
        candidates.extend(extract_candidates(domain.base(), source));
    }

    let checked = stream::iter(candidates)
        .map(|raw| async move {
            let confirmed = match gate.acquire().await {
                Ok(_permit) => match detection::probe(client, &raw).await {
                    Ok(response) => detection::has_graphql_signature(&response),
                    Err(_) => false,
                },
                Err(_) => false,
            };
            (raw, confirmed)
        })
        .buffer_unordered(FETCH_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    let mut found = HashSet::new();
    for (raw, confirmed) in checked {
        if let Some(url) = Url::parse(&raw, Strategy::Script) {
            merge_url(&mut found, if confirmed { url.confirmed() } else { url });
        }
    }

    Ok(found)
}

/// Endpoint-looking URL literals in `source`, resolved against `base`.
/// Absolute http(s) literals are taken as-is; root-relative paths join the
/// base. Only literals with a `graphql`/`gql` segment count.
pub(crate) fn extract_candidates(base: &url::Url, source: &str) -> HashSet<String> {
    let mut out = HashSet::new();

    for cap in ABSOLUTE_ENDPOINT.captures_iter(source) {
        out.insert(cap[1].to_string());
    }

    for cap in RELATIVE_ENDPOINT.captures_iter(source) {
        if let Ok(joined) = base.join(&cap[1]) {
            out.insert(joined.to_string());
        }
    }

    out
}
