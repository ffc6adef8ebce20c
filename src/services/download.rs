//! Album download: filename derivation, skip-on-exists, streamed writes.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::DownloadError;
use crate::models::{Album, Container, DownloadResult, DownloadTarget};
use crate::scrapers::{resolve, HttpClient};

/// Quality suffix the site serves; every saved file carries it.
const QUALITY_SUFFIX: &str = "_320kbps";

/// Characters that break common filesystems, dropped outright.
const ILLEGAL_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Derive the destination filename for an album.
///
/// Works from the album page URL, not the download link: the link target
/// carries opaque tokens while the page slug names the movie. Pure and
/// deterministic — the same album always lands on the same name.
pub fn destination_filename(album_url: &str, container: Container) -> String {
    let base = album_url.rsplit('/').next().unwrap_or(album_url);
    let base = base.split('?').next().unwrap_or(base);

    let cleaned: String = base
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .map(|c| if c == '-' { '_' } else { c })
        .collect();

    format!("{}{}.{}", cleaned, QUALITY_SUFFIX, container.extension())
}

/// Resolve an album page to its best target, then stream it to disk.
pub async fn fetch_album(client: &HttpClient, album: &Album, dest_dir: &Path) -> DownloadResult {
    let page = match client.fetch_html(&album.url).await {
        Some(page) => page,
        None => {
            return DownloadResult::failed(album.clone(), DownloadError::PageUnavailable.to_string())
        }
    };

    let target = match resolve::resolve_target(&page, &album.url) {
        Some(target) => target,
        None => return DownloadResult::failed(album.clone(), DownloadError::NoTarget.to_string()),
    };

    download(client, album, &target, dest_dir).await
}

/// Download one album's resolved target into `dest_dir`.
///
/// An existing destination file short-circuits to `Skipped` before any
/// network traffic — presence on disk is the only resume index. A fresh
/// download streams into a `.part` sibling and is renamed into place only
/// after the body completes, so an interrupted stream never leaves a file
/// that looks finished.
pub async fn download(
    client: &HttpClient,
    album: &Album,
    target: &DownloadTarget,
    dest_dir: &Path,
) -> DownloadResult {
    let filename = destination_filename(&album.url, target.container);
    let dest = dest_dir.join(&filename);

    if dest.exists() {
        debug!("skipping {}, already on disk", filename);
        return DownloadResult::skipped(album.clone());
    }

    match stream_to_disk(client, &target.url, &dest).await {
        Ok(()) => {
            info!("saved {}", filename);
            DownloadResult::success(album.clone())
        }
        Err(e) => DownloadResult::failed(album.clone(), e.to_string()),
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

async fn stream_to_disk(client: &HttpClient, url: &str, dest: &Path) -> Result<(), DownloadError> {
    let response = client.stream(url).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status));
    }

    let part = part_path(dest);
    if let Err(e) = write_body(response, &part).await {
        let _ = fs::remove_file(&part).await;
        return Err(e);
    }

    fs::rename(&part, dest).await?;
    Ok(())
}

async fn write_body(response: reqwest::Response, part: &Path) -> Result<(), DownloadError> {
    let mut file = fs::File::create(part).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_destination_filename_zip() {
        assert_eq!(
            destination_filename("https://example.com/movie-a-songs", Container::Zip),
            "movie_a_songs_320kbps.zip"
        );
    }

    #[test]
    fn test_destination_filename_mp3() {
        assert_eq!(
            destination_filename("https://example.com/movie-b-songs", Container::Mp3),
            "movie_b_songs_320kbps.mp3"
        );
    }

    #[test]
    fn test_destination_filename_strips_query_string() {
        assert_eq!(
            destination_filename("https://example.com/movie-e-songs?ref=home", Container::Zip),
            "movie_e_songs_320kbps.zip"
        );
    }

    #[test]
    fn test_destination_filename_drops_illegal_chars() {
        assert_eq!(
            destination_filename("https://example.com/movie-\"x\"<late>-songs", Container::Zip),
            "movie_xlate_songs_320kbps.zip"
        );
    }

    #[test]
    fn test_destination_filename_is_deterministic() {
        let first = destination_filename("https://example.com/movie-c-songs", Container::Zip);
        let second = destination_filename("https://example.com/movie-c-songs", Container::Zip);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_existing_file_skips_without_network() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie_d_songs_320kbps.zip"), b"data").unwrap();

        // The target points at a closed port; a skip must never touch it.
        let client = HttpClient::new(
            Duration::from_secs(1),
            Duration::ZERO,
            Some("test"),
            "https://example.com/",
        );
        let album = Album::new("https://example.com/movie-d-songs", "Movie D");
        let target = DownloadTarget {
            url: "http://127.0.0.1:1/files/zip320/album.zip".to_string(),
            container: Container::Zip,
        };

        let first = download(&client, &album, &target, dir.path()).await;
        let second = download(&client, &album, &target, dir.path()).await;
        assert_eq!(first.outcome, crate::models::DownloadOutcome::Skipped);
        assert_eq!(second.outcome, crate::models::DownloadOutcome::Skipped);
    }

    #[test]
    fn test_part_path_appends_suffix() {
        let part = part_path(Path::new("/tmp/a_320kbps.zip"));
        assert_eq!(part, Path::new("/tmp/a_320kbps.zip.part"));
    }
}
