use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out after {timeout_secs}s fetching {url}")]
    FetchTimeout { url: String, timeout_secs: u64 },

    #[error("request blocked by {source_id} (HTTP {status}); try the rendered fetch method")]
    FetchBlocked { source_id: String, status: u16 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid batch request: {0}")]
    Validation(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
