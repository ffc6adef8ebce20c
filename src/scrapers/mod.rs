//! Site access: paced fetching, listing extraction, target resolution.

pub mod http_client;
pub mod listing;
pub mod pacer;
pub mod resolve;
pub mod user_agent;

pub use http_client::HttpClient;
pub use pacer::RequestPacer;
