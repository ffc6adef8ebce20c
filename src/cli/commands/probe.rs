//! Probe command: resolve one album page without downloading.

use console::style;

use crate::config::Settings;
use crate::models::Container;
use crate::scrapers::{resolve, HttpClient};
use crate::services::download::destination_filename;

/// Fetch a single album page and print the link a run would pick.
pub async fn cmd_probe(settings: &Settings, url: &str) -> anyhow::Result<()> {
    let client = HttpClient::new(
        settings.request_timeout(),
        settings.request_delay(),
        settings.user_agent.as_deref(),
        &settings.referer,
    );
    client.warm_up(&settings.site_url).await;

    let page = match client.fetch_html(url).await {
        Some(page) => page,
        None => {
            println!("{} page would not fetch: {}", style("✗").red(), url);
            return Ok(());
        }
    };

    match resolve::resolve_target(&page, url) {
        Some(target) => {
            let kind = match target.container {
                Container::Zip => "album zip",
                Container::Mp3 => "single mp3",
            };
            println!("{} {} ({})", style("→").green(), target.url, kind);
            println!(
                "  would save as {}",
                destination_filename(url, target.container)
            );
        }
        None => println!("{} no download link on that page", style("✗").red()),
    }

    Ok(())
}
