//! Download-target resolution on album pages.

use scraper::{Html, Selector};
use url::Url;

use crate::models::{Container, DownloadTarget};

/// Marker for a full-album zip link.
const ZIP_MARKER: &str = "zip320";
/// Marker for a single-track mp3 link.
const MP3_MARKER: &str = "d320";

/// Pick the best download link on an album page.
///
/// Two strict passes over every anchor in document order: any zip link wins
/// over any mp3 link, regardless of position. Relative hrefs resolve against
/// the album page URL.
pub fn resolve_target(html: &str, album_url: &str) -> Option<DownloadTarget> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").ok()?;

    let hrefs: Vec<&str> = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .collect();

    let (href, container) = hrefs
        .iter()
        .find(|href| href.contains(ZIP_MARKER))
        .map(|href| (*href, Container::Zip))
        .or_else(|| {
            hrefs
                .iter()
                .find(|href| href.contains(MP3_MARKER))
                .map(|href| (*href, Container::Mp3))
        })?;

    let url = Url::parse(album_url).ok()?.join(href).ok()?;
    Some(DownloadTarget {
        url: url.to_string(),
        container,
    })
}
