//! Album-link extraction from listing pages.
//!
//! Two strategies are tried in order: a block-scoped pass that takes one
//! anchor per album card, then a flat scan of every anchor inside the
//! content container. A page without the container yields nothing.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::Album;

/// Path marker identifying an album page.
const ALBUM_MARKER: &str = "-songs";
/// Path marker identifying listing navigation, never an album.
const NAV_MARKER: &str = "browse-by-year";

/// Containers that hold the album grid, in preference order.
const CONTAINER_SELECTORS: &[&str] = &["div.gw", "section.bots"];
/// Per-album card blocks inside the container.
const BLOCK_SELECTOR: &str = "div.a-i";
const ANCHOR_SELECTOR: &str = "a[href]";

/// Extract album links from one listing page, resolving relative hrefs
/// against `base_url`.
pub fn extract_albums(html: &str, base_url: &str) -> Vec<Album> {
    let document = Html::parse_document(html);

    let container = match find_container(&document) {
        Some(c) => c,
        None => return Vec::new(),
    };

    let mut anchors = block_scoped_anchors(container);
    if anchors.is_empty() {
        anchors = flat_anchors(container);
    }

    anchors
        .into_iter()
        .filter_map(|anchor| album_from_anchor(anchor, base_url))
        .collect()
}

fn find_container<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    for selector_str in CONTAINER_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(element) = document.select(&selector).next() {
            return Some(element);
        }
    }
    None
}

/// One anchor per album card. Yields nothing when the page doesn't use the
/// card markup, which sends callers to the flat scan.
fn block_scoped_anchors(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let block_selector = match Selector::parse(BLOCK_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let anchor_selector = match Selector::parse(ANCHOR_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    container
        .select(&block_selector)
        .filter_map(|block| block.select(&anchor_selector).next())
        .collect()
}

fn flat_anchors(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    match Selector::parse(ANCHOR_SELECTOR) {
        Ok(selector) => container.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Apply the candidate filter and build an `Album`.
///
/// A link qualifies iff its href carries the album marker, does not carry
/// the navigation marker, and its text is non-empty. The first text line is
/// the title; any further lines (cast, director) become the details byline.
fn album_from_anchor(anchor: ElementRef<'_>, base_url: &str) -> Option<Album> {
    let href = anchor.value().attr("href")?;
    if !href.contains(ALBUM_MARKER) || href.contains(NAV_MARKER) {
        return None;
    }

    let lines: Vec<&str> = anchor
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let title = (*lines.first()?).to_string();

    let url = Url::parse(base_url).ok()?.join(href).ok()?;

    let details = if lines.len() > 1 {
        Some(lines[1..].join(" | "))
    } else {
        None
    };

    Some(Album::new(url.to_string(), title).with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/browse-by-year/1998?page=1";

    #[test]
    fn test_block_scoped_strategy() {
        let html = r#"
            <div class="gw">
              <div class="a-i">
                <a href="/movie-a-songs">Movie A<span>Star One | Dir One</span></a>
              </div>
              <div class="a-i">
                <a href="/movie-b-songs">Movie B</a>
              </div>
            </div>
        "#;
        let albums = extract_albums(html, BASE);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].url, "https://example.com/movie-a-songs");
        assert_eq!(albums[0].title, "Movie A");
        assert_eq!(albums[0].details.as_deref(), Some("Star One | Dir One"));
        assert_eq!(albums[1].title, "Movie B");
        assert!(albums[1].details.is_none());
    }

    #[test]
    fn test_flat_fallback_when_no_blocks() {
        let html = r#"
            <section class="bots">
              <a href="/movie-c-songs">Movie C</a>
              <a href="/movie-d-songs">Movie D</a>
            </section>
        "#;
        let albums = extract_albums(html, BASE);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[1].url, "https://example.com/movie-d-songs");
    }

    #[test]
    fn test_navigation_and_offsite_links_filtered() {
        let html = r#"
            <div class="gw">
              <a href="/browse-by-year/1998-songs?page=2">2</a>
              <a href="/about">About</a>
              <a href="/movie-e-songs">Movie E</a>
              <a href="/movie-f-songs">   </a>
            </div>
        "#;
        let albums = extract_albums(html, BASE);
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].title, "Movie E");
    }

    #[test]
    fn test_no_container_yields_nothing() {
        let html = r#"<div class="other"><a href="/movie-g-songs">Movie G</a></div>"#;
        assert!(extract_albums(html, BASE).is_empty());
    }

    #[test]
    fn test_absolute_hrefs_kept_as_is() {
        let html = r#"
            <div class="gw">
              <a href="https://cdn.example.org/movie-h-songs">Movie H</a>
            </div>
        "#;
        let albums = extract_albums(html, BASE);
        assert_eq!(albums[0].url, "https://cdn.example.org/movie-h-songs");
    }

    #[test]
    fn test_block_strategy_preferred_over_flat() {
        // The stray anchor outside any card must not appear when cards exist.
        let html = r#"
            <div class="gw">
              <a href="/stray-songs">Stray</a>
              <div class="a-i"><a href="/movie-i-songs">Movie I</a></div>
            </div>
        "#;
        let albums = extract_albums(html, BASE);
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].title, "Movie I");
    }
}
