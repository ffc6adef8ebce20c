//! Crawl commands: preview listings or download everything they link to.

use std::sync::Arc;

use anyhow::bail;
use console::style;

use crate::config::Settings;
use crate::models::RunMode;
use crate::scrapers::HttpClient;
use crate::services::pool;
use crate::services::year::{process_year, YearSummary};

/// Crawl the selected years in the given mode.
///
/// `explicit_years` wins over the configured range when non-empty. Years run
/// through the year-level pool when more than one worker is configured;
/// otherwise strictly oldest-first.
pub async fn cmd_crawl(
    settings: &Settings,
    explicit_years: &[String],
    mode: RunMode,
) -> anyhow::Result<()> {
    let years: Vec<String> = if explicit_years.is_empty() {
        settings.years()
    } else {
        explicit_years.to_vec()
    };
    if years.is_empty() {
        bail!(
            "no years to crawl: start_year {} is past end_year {}",
            settings.start_year,
            settings.end_year
        );
    }

    println!(
        "{} {} mode: {} year(s), output {}",
        style("Starting").green().bold(),
        mode.label().to_lowercase(),
        years.len(),
        settings.output_dir.display()
    );

    let client = Arc::new(HttpClient::new(
        settings.request_timeout(),
        settings.request_delay(),
        settings.user_agent.as_deref(),
        &settings.referer,
    ));

    // One throwaway request so the challenge cookie is in the jar before
    // any worker starts.
    client.warm_up(&settings.site_url).await;

    let settings = Arc::new(settings.clone());
    let summaries = if settings.year_workers <= 1 {
        let mut summaries = Vec::with_capacity(years.len());
        for year in years {
            summaries.push(process_year(client.clone(), settings.clone(), year, mode).await);
        }
        summaries
    } else {
        let client = client.clone();
        let pool_settings = settings.clone();
        pool::run_pool(
            years,
            settings.year_workers,
            move |year: String| {
                let client = client.clone();
                let settings = pool_settings.clone();
                async move { process_year(client, settings, year, mode).await }
            },
            |year| YearSummary::aborted(year),
        )
        .await
    };

    print_tally(&summaries, mode);
    Ok(())
}

fn print_tally(summaries: &[YearSummary], mode: RunMode) {
    let albums: usize = summaries.iter().map(|s| s.albums).sum();

    println!();
    println!(
        "{} {} year(s), {} album(s)",
        style("Finished").green().bold(),
        summaries.len(),
        albums
    );

    if mode == RunMode::Download {
        let succeeded: usize = summaries.iter().map(|s| s.succeeded).sum();
        let skipped: usize = summaries.iter().map(|s| s.skipped).sum();
        let failed: usize = summaries.iter().map(|s| s.failed).sum();
        println!(
            "  {} downloaded, {} already on disk, {} failed",
            style(succeeded).green(),
            style(skipped).dim(),
            style(failed).red()
        );
    }

    for summary in summaries.iter().filter(|s| s.report_path.is_none()) {
        println!(
            "  {} year {} ended without a report",
            style("!").yellow(),
            summary.year
        );
    }
}
