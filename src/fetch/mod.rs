/// Thumbnail fetch pipeline
///
/// This module talks to the host endpoint that renders thumbnail listings:
/// - URL construction for the fragment endpoint (url.rs)
/// - Async HTTP fetch and image decoding (client.rs)
/// - Parsing the server-rendered fragment (fragment.rs)

pub mod client;
pub mod fragment;
pub mod url;

use thiserror::Error;

/// Errors raised while fetching or decoding a thumbnail listing
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed thumbnail fragment: {0}")]
    Fragment(#[from] quick_xml::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
