//! One year, end to end: walk the listing, dispatch albums, write the report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use tracing::{info, warn};

use crate::config::Settings;
use crate::crawl::{PageWalker, SeenUrls};
use crate::models::{Album, DownloadOutcome, DownloadResult, RunMode};
use crate::report::YearReport;
use crate::scrapers::HttpClient;
use crate::services::{download, pool};

/// Summary returned to the run-level tally after a year completes.
#[derive(Debug)]
pub struct YearSummary {
    pub year: String,
    pub albums: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub report_path: Option<PathBuf>,
}

impl YearSummary {
    /// Summary for a year whose task never produced one (crashed worker or
    /// unusable output directory).
    pub fn aborted(year: &str) -> Self {
        Self {
            year: year.to_string(),
            albums: 0,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            report_path: None,
        }
    }
}

/// Crawl one year and, in download mode, fetch everything it lists.
///
/// Pages are drained strictly one at a time: every album of a page is
/// dispatched and collected before the cursor advances, which bounds
/// in-flight work to one page's batch.
pub async fn process_year(
    client: Arc<HttpClient>,
    settings: Arc<Settings>,
    year: String,
    mode: RunMode,
) -> YearSummary {
    let base_url = settings.year_index_url(&year);
    let dest_dir = match mode {
        RunMode::Preview => settings.preview_dir(),
        RunMode::Download => settings.year_dir(&year),
    };

    if let Err(e) = std::fs::create_dir_all(&dest_dir) {
        eprintln!(
            "{} year {}: cannot create {}: {}",
            style("✗").red(),
            year,
            dest_dir.display(),
            e
        );
        return YearSummary::aborted(&year);
    }

    println!(
        "{} year {} ({} mode)",
        style(">>>").cyan().bold(),
        year,
        mode.label().to_lowercase()
    );

    let seen = SeenUrls::new();
    let mut walker = PageWalker::new(
        client.as_ref(),
        base_url.as_str(),
        &seen,
        settings.listing_retries,
    );
    let mut report = YearReport::new(&year, mode);
    let mut summary = YearSummary::aborted(&year);

    while let Some(batch) = walker.next_page().await {
        info!("year {}: page yielded {} new albums", year, batch.len());

        match mode {
            RunMode::Preview => {
                for album in &batch {
                    println!("  {} {}", style("·").dim(), album.title);
                    report.record_preview(album);
                }
                summary.albums += batch.len();
            }
            RunMode::Download => {
                let results = download_batch(&client, &settings, batch, &dest_dir).await;
                for result in &results {
                    match result.outcome {
                        DownloadOutcome::Success => summary.succeeded += 1,
                        DownloadOutcome::Skipped => summary.skipped += 1,
                        DownloadOutcome::Failed => summary.failed += 1,
                    }
                    print_outcome(&year, result);
                    report.record_outcome(result);
                }
                summary.albums += results.len();
            }
        }
    }

    match report.write_to(&dest_dir) {
        Ok(path) => {
            println!(
                "{} year {} done: {} albums, report {}",
                style("✓").green(),
                year,
                report.total(),
                path.display()
            );
            summary.report_path = Some(path);
        }
        Err(e) => {
            warn!("year {}: report write failed: {}", year, e);
            eprintln!("{} year {}: report write failed: {}", style("✗").red(), year, e);
        }
    }

    summary
}

fn print_outcome(year: &str, result: &DownloadResult) {
    let tag = match result.outcome {
        DownloadOutcome::Success => style("SUCCESS").green(),
        DownloadOutcome::Skipped => style("SKIPPED").dim(),
        DownloadOutcome::Failed => style("FAILED").red(),
    };
    match &result.error {
        Some(error) => println!("  [{}] [{}] {}: {}", year, tag, result.album.title, error),
        None => println!("  [{}] [{}] {}", year, tag, result.album.title),
    }
}

/// Download one page's batch, sequentially or through the entity-level pool.
///
/// With workers, results land in completion order; sequential runs keep
/// discovery order.
async fn download_batch(
    client: &Arc<HttpClient>,
    settings: &Arc<Settings>,
    batch: Vec<Album>,
    dest_dir: &Path,
) -> Vec<DownloadResult> {
    if settings.entity_workers <= 1 {
        let mut results = Vec::with_capacity(batch.len());
        for album in batch {
            results.push(download::fetch_album(client, &album, dest_dir).await);
        }
        return results;
    }

    let client = client.clone();
    let dest_dir = dest_dir.to_path_buf();
    pool::run_pool(
        batch,
        settings.entity_workers,
        move |album: Album| {
            let client = client.clone();
            let dest_dir = dest_dir.clone();
            async move { download::fetch_album(&client, &album, &dest_dir).await }
        },
        |album| DownloadResult::failed(album.clone(), "download worker crashed"),
    )
    .await
}
