//! Core data types for the crawl-and-fetch pipeline.

/// One discoverable album page within a year's listing.
///
/// Identity is the canonical absolute `url`. The title and the optional
/// byline under it only feed reports; two links with different text but the
/// same URL are the same album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub url: String,
    pub title: String,
    /// Extra text the listing shows under the title (cast, director).
    pub details: Option<String>,
}

impl Album {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }
}

/// Container type of a resolved download link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Full-album zip archive.
    Zip,
    /// Single-track mp3.
    Mp3,
}

impl Container {
    /// File extension written to disk for this container.
    pub fn extension(self) -> &'static str {
        match self {
            Container::Zip => "zip",
            Container::Mp3 => "mp3",
        }
    }
}

/// The direct download link chosen from an album page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub container: Container,
}

/// Outcome of one album download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success,
    /// Destination file already on disk; nothing was fetched.
    Skipped,
    Failed,
}

impl DownloadOutcome {
    pub fn label(self) -> &'static str {
        match self {
            DownloadOutcome::Success => "SUCCESS",
            DownloadOutcome::Skipped => "SKIPPED",
            DownloadOutcome::Failed => "FAILED",
        }
    }
}

/// Final record for one album, consumed by the year report. Never mutated
/// after creation.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub album: Album,
    pub outcome: DownloadOutcome,
    pub error: Option<String>,
}

impl DownloadResult {
    pub fn success(album: Album) -> Self {
        Self {
            album,
            outcome: DownloadOutcome::Success,
            error: None,
        }
    }

    pub fn skipped(album: Album) -> Self {
        Self {
            album,
            outcome: DownloadOutcome::Skipped,
            error: None,
        }
    }

    pub fn failed(album: Album, error: impl Into<String>) -> Self {
        Self {
            album,
            outcome: DownloadOutcome::Failed,
            error: Some(error.into()),
        }
    }
}

/// Whether a run only lists discovered albums or actually downloads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Preview,
    Download,
}

impl RunMode {
    pub fn label(self) -> &'static str {
        match self {
            RunMode::Preview => "PREVIEW",
            RunMode::Download => "DOWNLOAD",
        }
    }
}
