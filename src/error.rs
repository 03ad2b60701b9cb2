// ABOUTME: Error types with structured exit codes for CLI
// ABOUTME: Maps domain errors to specific exit codes for shell scripting

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status} on {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Failed to fetch blocks for page {page_id}: {source}")]
    PageFetch {
        page_id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Network(_) => 3,
            Error::Api { .. } => 4,
            Error::Parse(_) => 5,
            Error::Filesystem(_) => 6,
            Error::PageFetch { source, .. } => source.exit_code(),
        }
    }

    /// Tags a tree-fetch failure with the page it aborted.
    pub fn for_page(self, page_id: &str) -> Self {
        Error::PageFetch {
            page_id: page_id.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(format!("Invalid config file: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
