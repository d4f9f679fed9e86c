use async_trait::async_trait;

use crate::hit::Hit;

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("search backend failed: {0}")]
    Backend(String),
    #[error("failed to load dataset from {path}: {source}")]
    DatasetLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset from {path}: {message}")]
    DatasetParse { path: String, message: String },
}

/// The black-box search capability behind the palette. Output order is the
/// backend's relevance ranking; the grouper re-sorts it deterministically.
/// Implementations must not fail on a well-formed non-empty query merely
/// because nothing matched — that is an empty hit list.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Hit>, SearchError>;
}
