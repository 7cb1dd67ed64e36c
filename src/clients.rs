use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::types::place::{Coordinate, Place, SearchPage};

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchError {
    /// The request never produced a readable response
    #[error("Request to the maps provider failed: {reason}")]
    Transport { reason: String },

    #[error("Maps provider answered with status {status}")]
    Provider {
        status: String,
        message: Option<String>,
    },
}

impl From<reqwest::Error> for SearchError {
    fn from(value: reqwest::Error) -> Self {
        SearchError::Transport {
            reason: value.to_string(),
        }
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// The provider a search runs against. One call is one (billed) request.
#[async_trait]
pub trait GeoSearchClient: Send + Sync {
    async fn nearby_search(
        &self,
        coordinate: Coordinate,
        category: Option<&str>,
    ) -> Result<SearchPage>;

    /// The token must be passed back exactly as the previous page returned it
    async fn nearby_search_continue(&self, page_token: &str) -> Result<SearchPage>;

    async fn reverse_geocode(&self, coordinate: Coordinate, language: &str)
        -> Result<Option<Place>>;
}
