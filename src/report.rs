//! Per-year crawl reports.
//!
//! A report accumulates one block per album in the order outcomes were
//! recorded and is flushed to disk exactly once, after the year's crawl
//! terminates. A crash mid-crawl loses the report but never the files —
//! downloads resume off existence-on-disk, the report does not.

use std::path::{Path, PathBuf};

use crate::models::{Album, DownloadResult, RunMode};

const RULE_HEAVY: &str =
    "============================================================";
const RULE_LIGHT: &str = "----------------------------------------";

pub struct YearReport {
    year: String,
    mode: RunMode,
    entries: Vec<String>,
}

impl YearReport {
    pub fn new(year: &str, mode: RunMode) -> Self {
        Self {
            year: year.to_string(),
            mode,
            entries: Vec::new(),
        }
    }

    /// Number of recorded blocks; the rendered total is always this.
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Record a previewed album. Nothing was downloaded for it.
    pub fn record_preview(&mut self, album: &Album) {
        self.entries.push(format!(
            "MOVIE: {}\nDETAILS: {}\nURL: {}\n{}",
            album.title,
            album.details.as_deref().unwrap_or(""),
            album.url,
            RULE_LIGHT
        ));
    }

    /// Record a download outcome.
    pub fn record_outcome(&mut self, result: &DownloadResult) {
        let mut block = format!(
            "[{}] MOVIE: {}\nURL: {}",
            result.outcome.label(),
            result.album.title,
            result.album.url
        );
        if let Some(error) = &result.error {
            block.push_str("\nERROR: ");
            block.push_str(error);
        }
        block.push('\n');
        block.push_str(RULE_LIGHT);
        self.entries.push(block);
    }

    /// Report file name, deterministic from year and mode.
    pub fn file_name(&self) -> String {
        match self.mode {
            RunMode::Preview => format!("verified_list_{}.txt", self.year),
            RunMode::Download => format!("download_report_{}.txt", self.year),
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "--- {} REPORT FOR {} ---\n",
            self.mode.label(),
            self.year
        ));
        out.push_str(&format!(
            "Total Unique Movies Found: {}\n",
            self.entries.len()
        ));
        out.push_str(&format!(
            "Generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(RULE_HEAVY);
        out.push_str("\n\n");
        out.push_str(&self.entries.join("\n\n"));
        out.push('\n');
        out
    }

    /// Write the report in one shot: temp sibling first, then rename, so a
    /// crash never leaves a half-written report in place.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let final_path = dir.join(self.file_name());
        let tmp_path = dir.join(format!("{}.tmp", self.file_name()));
        std::fs::write(&tmp_path, self.render())?;
        std::fs::rename(&tmp_path, &final_path)?;
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DownloadOutcome;

    fn album() -> Album {
        Album::new("https://example.com/movie-a-songs", "Movie A")
            .with_details(Some("Star One | Dir One".to_string()))
    }

    #[test]
    fn test_total_matches_entries() {
        let mut report = YearReport::new("1998", RunMode::Preview);
        assert_eq!(report.total(), 0);
        report.record_preview(&album());
        report.record_preview(&album());
        assert_eq!(report.total(), 2);
        assert!(report
            .render()
            .contains("Total Unique Movies Found: 2"));
    }

    #[test]
    fn test_preview_block_format() {
        let mut report = YearReport::new("1998", RunMode::Preview);
        report.record_preview(&album());
        let rendered = report.render();
        assert!(rendered.starts_with("--- PREVIEW REPORT FOR 1998 ---\n"));
        assert!(rendered.contains("MOVIE: Movie A\n"));
        assert!(rendered.contains("DETAILS: Star One | Dir One\n"));
        assert!(rendered.contains("URL: https://example.com/movie-a-songs\n"));
    }

    #[test]
    fn test_outcome_block_carries_error() {
        let mut report = YearReport::new("2003", RunMode::Download);
        report.record_outcome(&DownloadResult::failed(album(), "HTTP 503"));
        report.record_outcome(&DownloadResult::skipped(album()));
        let rendered = report.render();
        assert!(rendered.contains("[FAILED] MOVIE: Movie A"));
        assert!(rendered.contains("ERROR: HTTP 503"));
        assert!(rendered.contains("[SKIPPED] MOVIE: Movie A"));
        assert_eq!(
            DownloadResult::skipped(album()).outcome,
            DownloadOutcome::Skipped
        );
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            YearReport::new("1998", RunMode::Preview).file_name(),
            "verified_list_1998.txt"
        );
        assert_eq!(
            YearReport::new("1998", RunMode::Download).file_name(),
            "download_report_1998.txt"
        );
    }

    #[test]
    fn test_write_to_creates_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = YearReport::new("2001", RunMode::Download);
        report.record_outcome(&DownloadResult::success(album()));

        let path = report.write_to(dir.path()).unwrap();
        assert!(path.ends_with("download_report_2001.txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[SUCCESS] MOVIE: Movie A"));
        // No stray temp file left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
