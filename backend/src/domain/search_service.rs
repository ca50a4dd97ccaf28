//! Startup search: repository query plus rating post-filter.

use std::sync::Arc;

use serde_json::json;

use crate::domain::ports::{ReviewRepository, StartupRepository};
use crate::domain::review_service::map_review_error;
use crate::domain::startup_service::map_startup_error;
use crate::domain::{Error, SEARCH_LIMIT_DEFAULT, SearchFilterError, SearchFilters, SearchHit, StartupId};

impl From<SearchFilterError> for Error {
    fn from(error: SearchFilterError) -> Self {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.key(),
            "code": "invalid_filter",
        }))
    }
}

#[derive(Clone)]
pub struct SearchService {
    startups: Arc<dyn StartupRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl SearchService {
    pub fn new(startups: Arc<dyn StartupRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { startups, reviews }
    }

    /// Run a search. `limit` defaults to [`SEARCH_LIMIT_DEFAULT`] and never
    /// exceeds it.
    pub async fn search(&self, filters: SearchFilters, limit: Option<u32>) -> Result<Vec<SearchHit>, Error> {
        let filters = filters.normalised()?;
        let limit = limit
            .unwrap_or(SEARCH_LIMIT_DEFAULT)
            .clamp(1, SEARCH_LIMIT_DEFAULT);
        let startups = self
            .startups
            .search(&filters.startup_query(limit))
            .await
            .map_err(map_startup_error)?;
        if startups.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<StartupId> = startups.iter().map(|s| s.id).collect();
        let summaries = self
            .reviews
            .summaries(&ids)
            .await
            .map_err(map_review_error)?;
        Ok(filters.post_filter(startups, &summaries))
    }
}
