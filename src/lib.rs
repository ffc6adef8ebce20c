//! albumhaul - yearly soundtrack-album acquisition.
//!
//! Crawls a per-year movie-song index on a challenge-protected content site,
//! resolves the best available download for each album page (full zip
//! preferred over a single track), and streams the files into per-year
//! directories. Presence on disk is the only resume index; every year's
//! crawl ends with one plain-text report.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod models;
pub mod report;
pub mod scrapers;
pub mod services;
