use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use gqlhound::config::{ScanConfig, DEFAULT_MAX_SUBDOMAINS};
use gqlhound::http::HttpClient;
use gqlhound::io::{display_results, read_domains, send_webhook, write_results};
use gqlhound::probes::load_wordlist;
use gqlhound::scan;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_banner() {
    println!("{}", r"             _ _                           _ ".bright_magenta());
    println!("{}", r"  __ _  __ _| | |__   ___  _   _ _ __   __| |".bright_magenta());
    println!("{}", r" / _` |/ _` | | '_ \ / _ \| | | | '_ \ / _` |".bright_magenta());
    println!("{}", r"| (_| | (_| | | | | | (_) | |_| | | | | (_| |".bright_magenta());
    println!("{}", r" \__, |\__, |_|_| |_|\___/ \__,_|_| |_|\__,_|".bright_magenta());
    println!("{}", r" |___/    |_|                                ".bright_magenta());
    println!(
        "  {} {}\n",
        "GraphQL Endpoint Hunter".bold().white(),
        format!("v{}", VERSION).dimmed()
    );
}

#[derive(Parser)]
#[command(name = "gqlhound")]
#[command(version = VERSION)]
#[command(about = "hunts exposed graphql endpoints across one or many domains")]
struct Cli {
    /// Single domain to scan
    #[arg(short, long, conflicts_with = "file")]
    domain: Option<String>,

    /// File containing domains to scan, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write results to this JSON file
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Disable script scanning
    #[arg(long)]
    no_script: bool,

    /// Disable common-path bruteforce scanning
    #[arg(long)]
    no_bruteforce: bool,

    /// Keep only endpoints with a strict GraphQL response signature
    #[arg(short, long)]
    precision: bool,

    /// Maximum number of subdomains expanded per domain
    #[arg(short, long, default_value_t = DEFAULT_MAX_SUBDOMAINS)]
    reduce: usize,

    /// Custom wordlist for path bruteforce
    #[arg(long)]
    wordlist: Option<PathBuf>,

    /// Webhook URL to send results to
    #[arg(short, long)]
    webhook_url: Option<String>,

    /// HTTP/HTTPS/SOCKS proxy URL
    #[arg(short = 'x', long)]
    proxy: Option<String>,

    /// Custom HTTP headers (can be repeated)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Suppress the banner and result printing
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "gqlhound=error"
    } else if verbose {
        "gqlhound=debug"
    } else {
        "gqlhound=info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_headers(headers: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for header in headers {
        // Try JSON format first: {"Authorization": "Bearer token"}
        if header.starts_with('{') {
            let parsed: HashMap<String, String> =
                serde_json::from_str(header).context("Invalid JSON header format")?;
            map.extend(parsed);
        } else if let Some((key, value)) = header.split_once(':') {
            // Standard format: "Authorization: Bearer token"
            map.insert(key.trim().to_string(), value.trim().to_string());
        } else {
            bail!("Invalid header format: {}", header);
        }
    }

    Ok(map)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.quiet, cli.verbose);

    if cli.domain.is_none() && cli.file.is_none() {
        bail!("no domain or input file provided; use -d for a single domain or -f for a domain list file");
    }

    let wordlist = cli
        .wordlist
        .as_deref()
        .map(load_wordlist)
        .transpose()
        .context("Failed to load wordlist")?;

    let config = ScanConfig {
        script_scan: !cli.no_script,
        bruteforce_scan: !cli.no_bruteforce,
        precision: cli.precision,
        max_subdomains: cli.reduce,
        wordlist,
    };
    config.validate()?;

    if !cli.quiet {
        print_banner();
    }

    let headers_map = parse_headers(&cli.headers)?;
    let client = HttpClient::new(cli.proxy.as_deref(), headers_map)?;

    let domains = read_domains(cli.file.as_deref(), cli.domain.as_deref())?;

    let results = scan::run(domains, &config, &client).await?;

    if !cli.quiet {
        let bulk_mode = cli.file.is_some();
        display_results(&results, bulk_mode);
    }

    if let Some(path) = cli.output_file.as_deref() {
        write_results(path, &results)?;
    }

    if let Some(url) = cli.webhook_url.as_deref() {
        send_webhook(&client, url, &results).await;
    }

    Ok(())
}
