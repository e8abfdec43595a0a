mod bruteforce;
mod detection;
mod script;
mod subdomains;

pub use bruteforce::{default_paths, load_wordlist, COMMON_PATHS};
pub use detection::{has_graphql_signature, looks_like_graphql, DETECTION_QUERY};

use crate::config::ScanConfig;
use crate::entities::{Domain, Strategy, Url};
use crate::errors::ScanError;
use crate::http::HttpClient;
use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Cap on in-flight HTTP probes per domain, shared by every task of that
/// domain's scan.
pub const MAX_CONCURRENT_PROBES: usize = 30;

/// Tasks resolved at once. The probe gate is the real backpressure bound.
const TASK_CONCURRENCY: usize = 4;

/// One probing strategy bound to one domain. The set is closed: strategies
/// come and go with configuration flags, not at runtime.
#[derive(Debug, Clone)]
pub enum Task {
    ScriptInspection {
        domain: Domain,
    },
    PathBruteforce {
        domain: Domain,
        paths: Vec<String>,
    },
    SubdomainExpansion {
        domain: Domain,
        config: ScanConfig,
    },
}

impl Task {
    pub fn kind(&self) -> Strategy {
        match self {
            Task::ScriptInspection { .. } => Strategy::Script,
            Task::PathBruteforce { .. } => Strategy::Bruteforce,
            Task::SubdomainExpansion { .. } => Strategy::Subdomain,
        }
    }

    pub fn domain(&self) -> &Domain {
        match self {
            Task::ScriptInspection { domain }
            | Task::PathBruteforce { domain, .. }
            | Task::SubdomainExpansion { domain, .. } => domain,
        }
    }

    fn run<'a>(
        &'a self,
        client: &'a HttpClient,
        gate: &'a Arc<Semaphore>,
    ) -> BoxFuture<'a, Result<HashSet<Url>>> {
        match self {
            Task::ScriptInspection { domain } => script::run(client, domain, gate).boxed(),
            Task::PathBruteforce { domain, paths } => {
                bruteforce::run(client, domain, paths, gate).boxed()
            }
            Task::SubdomainExpansion { domain, config } => {
                subdomains::run(client, domain, config, gate)
            }
        }
    }
}

/// Builds the task set for one domain. Pure: no I/O happens here. Order is
/// fixed (script, bruteforce, expansion) so a scan's plan is deterministic
/// for a given configuration.
pub fn init_domain_tasks(domain: &Domain, config: &ScanConfig) -> Result<Vec<Task>, ScanError> {
    config.validate()?;

    let mut tasks = Vec::new();

    if config.script_scan {
        tasks.push(Task::ScriptInspection {
            domain: domain.clone(),
        });
    }

    if config.bruteforce_scan {
        let paths = config.wordlist.clone().unwrap_or_else(default_paths);
        tasks.push(Task::PathBruteforce {
            domain: domain.clone(),
            paths,
        });
    }

    // Domains that came out of expansion never expand again.
    if !domain.from_expansion() && config.max_subdomains > 0 {
        tasks.push(Task::SubdomainExpansion {
            domain: domain.clone(),
            config: config.clone(),
        });
    }

    Ok(tasks)
}

/// Terminal state of one executed task. Failures carry the strategy for
/// logging and contribute nothing to the aggregate.
#[derive(Debug)]
pub enum TaskOutcome {
    Found(HashSet<Url>),
    Failed(Strategy),
}

/// Inserts `url` keeping the confirmed variant when the set already holds an
/// equal (canonically identical) entry. Plain `HashSet::insert` would keep
/// whichever arrived first and could lose a confirmation.
pub(crate) fn merge_url(set: &mut HashSet<Url>, url: Url) {
    if url.confirmed {
        set.replace(url);
    } else if !set.contains(&url) {
        set.insert(url);
    }
}

/// Union of all discovered URL sets. Commutative, so the consumer's result
/// does not depend on task completion order.
pub fn aggregate(outcomes: Vec<TaskOutcome>) -> HashSet<Url> {
    let mut all = HashSet::new();
    for outcome in outcomes {
        if let TaskOutcome::Found(urls) = outcome {
            for url in urls {
                merge_url(&mut all, url);
            }
        }
    }
    all
}

/// Executes every task for one domain concurrently, each probe gated by the
/// shared semaphore. A failing task is logged and reduced to an empty
/// contribution; this never returns early and never errors. An empty task
/// list is a valid no-op.
pub async fn consume_tasks<'a>(
    tasks: Vec<Task>,
    client: &'a HttpClient,
    gate: Arc<Semaphore>,
) -> HashSet<Url> {
    let outcomes = stream::iter(tasks)
        .map(move |task| {
            let gate = gate.clone();
            async move {
                let kind = task.kind();
                let domain = task.domain().name();
                match task.run(client, &gate).await {
                    Ok(urls) => {
                        debug!(%domain, strategy = %kind, found = urls.len(), "task finished");
                        TaskOutcome::Found(urls)
                    }
                    Err(e) => {
                        warn!(%domain, strategy = %kind, error = %e, "task failed");
                        TaskOutcome::Failed(kind)
                    }
                }
            }
        })
        .buffer_unordered(TASK_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    aggregate(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str, strategy: Strategy) -> Url {
        Url::parse(raw, strategy).unwrap()
    }

    #[test]
    fn tasks_come_in_a_fixed_order() {
        let domain = Domain::new("example.com").unwrap();
        let tasks = init_domain_tasks(&domain, &ScanConfig::default()).unwrap();

        let kinds: Vec<Strategy> = tasks.iter().map(Task::kind).collect();
        assert_eq!(
            kinds,
            vec![Strategy::Script, Strategy::Bruteforce, Strategy::Subdomain]
        );
    }

    #[test]
    fn disabled_strategies_are_left_out() {
        let domain = Domain::new("example.com").unwrap();

        let no_script = ScanConfig {
            script_scan: false,
            ..ScanConfig::default()
        };
        let kinds: Vec<Strategy> = init_domain_tasks(&domain, &no_script)
            .unwrap()
            .iter()
            .map(Task::kind)
            .collect();
        assert_eq!(kinds, vec![Strategy::Bruteforce, Strategy::Subdomain]);

        let no_bruteforce = ScanConfig {
            bruteforce_scan: false,
            ..ScanConfig::default()
        };
        let kinds: Vec<Strategy> = init_domain_tasks(&domain, &no_bruteforce)
            .unwrap()
            .iter()
            .map(Task::kind)
            .collect();
        assert_eq!(kinds, vec![Strategy::Script, Strategy::Subdomain]);
    }

    #[test]
    fn both_strategies_disabled_is_a_config_error() {
        let domain = Domain::new("example.com").unwrap();
        let config = ScanConfig {
            script_scan: false,
            bruteforce_scan: false,
            ..ScanConfig::default()
        };
        assert!(matches!(
            init_domain_tasks(&domain, &config),
            Err(ScanError::NoStrategy)
        ));
    }

    #[test]
    fn expanded_domains_do_not_expand_again() {
        let domain = Domain::expanded("api.example.com").unwrap();
        let tasks = init_domain_tasks(&domain, &ScanConfig::default()).unwrap();
        assert!(tasks
            .iter()
            .all(|task| task.kind() != Strategy::Subdomain));
    }

    #[test]
    fn a_zero_reduce_limit_skips_expansion() {
        let domain = Domain::new("example.com").unwrap();
        let config = ScanConfig {
            max_subdomains: 0,
            ..ScanConfig::default()
        };
        let tasks = init_domain_tasks(&domain, &config).unwrap();
        assert!(tasks
            .iter()
            .all(|task| task.kind() != Strategy::Subdomain));
    }

    #[test]
    fn custom_wordlist_binds_to_the_bruteforce_task() {
        let domain = Domain::new("example.com").unwrap();
        let config = ScanConfig {
            wordlist: Some(vec!["/custom".to_string()]),
            ..ScanConfig::default()
        };
        let tasks = init_domain_tasks(&domain, &config).unwrap();
        let Some(Task::PathBruteforce { paths, .. }) =
            tasks.iter().find(|t| t.kind() == Strategy::Bruteforce)
        else {
            panic!("bruteforce task missing");
        };
        assert_eq!(paths, &vec!["/custom".to_string()]);
    }

    #[test]
    fn aggregate_is_order_independent() {
        let a = url("https://x.com/graphql", Strategy::Script);
        let b = url("https://x.com/gql", Strategy::Bruteforce);

        let forward = aggregate(vec![
            TaskOutcome::Found([a.clone()].into()),
            TaskOutcome::Found([b.clone()].into()),
        ]);
        let reversed = aggregate(vec![
            TaskOutcome::Found([b.clone()].into()),
            TaskOutcome::Found([a.clone()].into()),
        ]);
        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn failures_contribute_the_empty_set() {
        let a = url("https://x.com/graphql", Strategy::Script);
        let all = aggregate(vec![
            TaskOutcome::Found([a].into()),
            TaskOutcome::Failed(Strategy::Bruteforce),
            TaskOutcome::Failed(Strategy::Subdomain),
        ]);
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn duplicates_across_strategies_collapse() {
        let all = aggregate(vec![
            TaskOutcome::Found([url("https://x.com/graphql", Strategy::Script)].into()),
            TaskOutcome::Found([url("https://x.com/graphql/", Strategy::Bruteforce)].into()),
        ]);
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn a_confirmation_survives_duplicate_collapse() {
        // The same endpoint, unconfirmed from script inspection and confirmed
        // from bruteforce; whichever order the tasks finish in, the aggregate
        // entry must stay confirmed.
        let unconfirmed = url("https://x.com/graphql", Strategy::Script);
        let confirmed = url("https://x.com/graphql/", Strategy::Bruteforce).confirmed();

        for outcomes in [
            vec![
                TaskOutcome::Found([unconfirmed.clone()].into()),
                TaskOutcome::Found([confirmed.clone()].into()),
            ],
            vec![
                TaskOutcome::Found([confirmed.clone()].into()),
                TaskOutcome::Found([unconfirmed.clone()].into()),
            ],
        ] {
            let all = aggregate(outcomes);
            assert_eq!(all.len(), 1);
            assert!(all.iter().all(|u| u.confirmed));
        }
    }

    #[tokio::test]
    async fn an_empty_task_list_is_a_no_op() {
        let client = HttpClient::new(None, Default::default()).unwrap();
        let gate = Arc::new(Semaphore::new(MAX_CONCURRENT_PROBES));
        let urls = consume_tasks(Vec::new(), &client, gate).await;
        assert!(urls.is_empty());
    }
}
