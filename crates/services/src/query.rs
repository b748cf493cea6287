//! Typed accessors for the `/query` endpoints.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use domain::{ApiError, Correlated, QueryApi, QueryFilter, QueryRecord};
use middleware::{HttpMiddleware, RequestConfig};

pub const CATEGORIES_PATH: &str = "/query/categories";
pub const STATUSES_PATH: &str = "/query/statuses";
pub const TYPES_PATH: &str = "/query/types";
pub const SEARCH_PATH: &str = "/query/search";
pub const TEST_DATA_PATH: &str = "/query/test-data";

/// The only value `post_test_data` accepts.
pub const TEST_DATA_NUM: i64 = 100;

/// [`QueryApi`] over the HTTP middleware.
#[derive(Debug, Clone)]
pub struct QueryService {
    http: HttpMiddleware,
}

impl QueryService {
    /// Creates a service sharing `http`'s transport and credential store.
    pub fn new(http: HttpMiddleware) -> Self {
        Self { http }
    }

    async fn lookup(&self, path: &str) -> Result<Correlated<Vec<String>>, ApiError> {
        self.http.get(path, RequestConfig::new()).await?.decode()
    }
}

/// Rejects any `num` other than [`TEST_DATA_NUM`].
pub fn validate_test_data(num: i64) -> Result<(), ApiError> {
    if num == TEST_DATA_NUM {
        Ok(())
    } else {
        Err(ApiError::validation(format!("num must be {TEST_DATA_NUM}")))
    }
}

#[async_trait]
impl QueryApi for QueryService {
    async fn categories(&self) -> Result<Correlated<Vec<String>>, ApiError> {
        self.lookup(CATEGORIES_PATH).await
    }

    async fn statuses(&self) -> Result<Correlated<Vec<String>>, ApiError> {
        self.lookup(STATUSES_PATH).await
    }

    async fn types(&self) -> Result<Correlated<Vec<String>>, ApiError> {
        self.lookup(TYPES_PATH).await
    }

    async fn search(&self, filter: &QueryFilter) -> Result<Correlated<Vec<QueryRecord>>, ApiError> {
        let config = RequestConfig::new().params(filter.to_query_params());
        let found: Correlated<Vec<QueryRecord>> = self.http.get(SEARCH_PATH, config).await?.decode()?;
        debug!(count = found.data.len(), "Search returned records");
        Ok(found)
    }

    async fn post_test_data(&self, num: i64) -> Result<Correlated<Vec<QueryRecord>>, ApiError> {
        if let Err(err) = validate_test_data(num) {
            warn!(num, "Rejected test data before dispatch");
            return Err(err);
        }
        self.http
            .post(TEST_DATA_PATH, Some(json!({ "num": num })), RequestConfig::new())
            .await?
            .decode()
    }
}
