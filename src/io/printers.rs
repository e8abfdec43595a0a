use crate::entities::{Results, Url};
use colored::Colorize;

/// Human-readable report. Bulk mode (file input) lists only the domains
/// with hits; single mode prints every endpoint.
pub fn display_results(results: &Results, bulk_mode: bool) {
    if bulk_mode {
        display_bulk(results);
    } else {
        display_detailed(results);
    }
}

fn display_bulk(results: &Results) {
    let mut found_count = 0;

    for (domain, urls) in results.iter() {
        if urls.is_empty() {
            continue;
        }
        found_count += 1;
        println!(
            "{} {} - {} endpoint(s)",
            "[+]".green(),
            domain.bold(),
            urls.len()
        );
    }

    println!();
    println!(
        "{} Scan complete: {} endpoint(s) across {} of {} domain(s)",
        "[*]".cyan(),
        results.total_urls(),
        found_count,
        results.len()
    );
}

fn display_detailed(results: &Results) {
    for (domain, urls) in results.iter() {
        println!("{} Domain: {}", "[*]".cyan(), domain.bold());

        if urls.is_empty() {
            println!("{} No GraphQL endpoints detected", "[-]".red());
            println!();
            continue;
        }

        let mut sorted: Vec<&Url> = urls.iter().collect();
        sorted.sort();

        println!("{} Found {} endpoint(s):", "[+]".green(), sorted.len());
        for url in sorted {
            let marker = if url.confirmed {
                "confirmed".green()
            } else {
                "candidate".yellow()
            };
            println!("    {} [{}] ({})", url, marker, url.strategy.to_string().dimmed());
        }
        println!();
    }
}
