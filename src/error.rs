//! Error taxonomy for download operations.
//!
//! Failures never cross component boundaries as propagated errors: listing
//! and album-page fetch problems collapse to `None` at the point of
//! occurrence, and everything below that is captured into a `Failed` result
//! at the downloader boundary. `anyhow` appears only at the CLI edge.

use thiserror::Error;

/// Errors captured while resolving or streaming one album download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Connection, TLS, or timeout failure from the transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status on the download link.
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Local filesystem failure while writing the file.
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// The album page had no recognizable download link.
    #[error("no download link on album page")]
    NoTarget,

    /// The album page itself would not fetch or parse.
    #[error("album page unavailable")]
    PageUnavailable,
}
