//! Run configuration.
//!
//! Settings come from an optional `albumhaul.toml` (an explicit `--config`
//! path, or one in the working directory), with CLI flags layered on top by
//! the command dispatcher. Everything is static once the process starts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Site crawled by default. The per-year listing lives under
/// `<site_url>/<year_index_path>/<year>`.
pub const DEFAULT_SITE_URL: &str = "https://www.masstamilan.dev";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Site root; the challenge warm-up request also goes here.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Path under the site root for the per-year index.
    #[serde(default = "default_year_index_path")]
    pub year_index_path: String,

    /// First year to crawl (inclusive).
    #[serde(default = "default_start_year")]
    pub start_year: u16,

    /// Last year to crawl (inclusive).
    #[serde(default = "default_end_year")]
    pub end_year: u16,

    /// Root directory receiving per-year subdirectories and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Fixed delay applied before every request, in milliseconds. Shared by
    /// all workers; never adapts to responses.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Years processed at once.
    #[serde(default = "default_workers")]
    pub year_workers: usize,

    /// Downloads in flight within one listing page.
    #[serde(default = "default_workers")]
    pub entity_workers: usize,

    /// Extra attempts for a failed listing-page fetch before treating the
    /// failure as end of pagination. 0 keeps the upstream behavior of ending
    /// the year on the first failure.
    #[serde(default)]
    pub listing_retries: u32,

    /// User-Agent override. Unset or "impersonate" rotates real browser
    /// agents; any other value is sent verbatim.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Referer header sent with every request.
    #[serde(default = "default_referer")]
    pub referer: String,
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_year_index_path() -> String {
    "browse-by-year".to_string()
}

fn default_start_year() -> u16 {
    1952
}

fn default_end_year() -> u16 {
    2026
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("music")
}

fn default_request_delay_ms() -> u64 {
    1200
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_workers() -> usize {
    1
}

fn default_referer() -> String {
    "https://www.google.com/".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            year_index_path: default_year_index_path(),
            start_year: default_start_year(),
            end_year: default_end_year(),
            output_dir: default_output_dir(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            year_workers: default_workers(),
            entity_workers: default_workers(),
            listing_retries: 0,
            user_agent: None,
            referer: default_referer(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit path, or `albumhaul.toml` in the
    /// working directory, or defaults when neither exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            return toml::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()));
        }

        let candidate = Path::new("albumhaul.toml");
        if candidate.exists() {
            let raw = std::fs::read_to_string(candidate).context("reading albumhaul.toml")?;
            return toml::from_str(&raw).context("parsing albumhaul.toml");
        }

        Ok(Self::default())
    }

    /// Listing base URL for one year; pagination appends `page=N` to it.
    pub fn year_index_url(&self, year: &str) -> String {
        format!(
            "{}/{}/{}",
            self.site_url.trim_end_matches('/'),
            self.year_index_path.trim_matches('/'),
            year
        )
    }

    /// The configured year range as labels, oldest first.
    pub fn years(&self) -> Vec<String> {
        if self.start_year > self.end_year {
            return Vec::new();
        }
        (self.start_year..=self.end_year)
            .map(|y| y.to_string())
            .collect()
    }

    /// Directory receiving one year's downloaded files and report.
    pub fn year_dir(&self, year: &str) -> PathBuf {
        self.output_dir.join(year)
    }

    /// Shared directory for preview reports, across all years.
    pub fn preview_dir(&self) -> PathBuf {
        self.output_dir.join("test_reports")
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_index_url() {
        let settings = Settings::default();
        assert_eq!(
            settings.year_index_url("1998"),
            "https://www.masstamilan.dev/browse-by-year/1998"
        );
    }

    #[test]
    fn test_year_index_url_tolerates_slashes() {
        let settings = Settings {
            site_url: "https://example.com/".to_string(),
            year_index_path: "/by-year/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.year_index_url("2001"),
            "https://example.com/by-year/2001"
        );
    }

    #[test]
    fn test_years_range() {
        let settings = Settings {
            start_year: 2001,
            end_year: 2003,
            ..Default::default()
        };
        assert_eq!(settings.years(), vec!["2001", "2002", "2003"]);
    }

    #[test]
    fn test_years_empty_when_inverted() {
        let settings = Settings {
            start_year: 2005,
            end_year: 2001,
            ..Default::default()
        };
        assert!(settings.years().is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str("start_year = 1998\nend_year = 1999\n").unwrap();
        assert_eq!(settings.start_year, 1998);
        assert_eq!(settings.site_url, DEFAULT_SITE_URL);
        assert_eq!(settings.request_delay_ms, 1200);
        assert_eq!(settings.entity_workers, 1);
    }
}
