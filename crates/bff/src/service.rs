//! The BFF operations.

use std::sync::Arc;

use tracing::{info, warn};

use domain::{
    enrich_record, enrich_user, ApiError, AuthApi, BffFailure, BffResult, CredentialStore,
    EnrichedRecord, Envelope, FilterOptions, LoginSession, QueryApi, QueryFilter, QueryOptions,
    QueryRecord, Timestamp, UserInfo,
};

use crate::messages;

/// Adapts domain service results for the presentation layer.
///
/// Every operation returns a [`BffResult`]: a successful [`Envelope`] or a
/// [`BffFailure`] carrying the operation's fixed message. The underlying
/// [`ApiError`] is logged and then discarded.
#[derive(Clone)]
pub struct BffService {
    auth: Arc<dyn AuthApi>,
    query: Arc<dyn QueryApi>,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for BffService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BffService").finish_non_exhaustive()
    }
}

impl BffService {
    /// Creates the BFF over the given ports.
    ///
    /// `credentials` must be the store the transport reads from, so that a
    /// successful login authenticates subsequent calls.
    pub fn new(
        auth: Arc<dyn AuthApi>,
        query: Arc<dyn QueryApi>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            auth,
            query,
            credentials,
        }
    }

    /// Logs in and returns the enriched user together with the access token.
    pub async fn login(&self, username: &str, password: &str) -> BffResult<LoginSession> {
        let response = self
            .auth
            .login(username, password)
            .await
            .map_err(|err| failed("login", &err, messages::LOGIN_FAILED))?;

        let request_id = response.request_id_string();
        let login = response.data;
        self.credentials.set(login.access_token.clone());

        let user = enrich_user(login.user, Timestamp::now());
        info!(username = %user.username, role = ?user.role, "User logged in");

        let session = LoginSession {
            user,
            token: login.access_token,
        };
        Ok(Envelope::success(session, request_id).with_message(messages::LOGIN_SUCCEEDED))
    }

    /// Fetches the current user's profile with derived role and permissions.
    pub async fn get_user_profile(&self) -> BffResult<UserInfo> {
        let response = self
            .auth
            .profile()
            .await
            .map_err(|err| failed("get_user_profile", &err, messages::PROFILE_FAILED))?;

        let request_id = response.request_id_string();
        let user = enrich_user(response.data, Timestamp::now());
        Ok(Envelope::success(user, request_id).with_message(messages::PROFILE_SUCCEEDED))
    }

    /// Fetches categories, statuses and types concurrently.
    ///
    /// All three lookups are started before any is awaited. The operation
    /// fails as a whole as soon as any lookup fails.
    pub async fn get_query_options(&self) -> BffResult<QueryOptions> {
        let (categories, statuses, types) = tokio::try_join!(
            self.query.categories(),
            self.query.statuses(),
            self.query.types(),
        )
        .map_err(|err| failed("get_query_options", &err, messages::OPTIONS_FAILED))?;

        let request_id = categories.request_id_string();
        let options = QueryOptions {
            filters: FilterOptions {
                categories: categories.data,
                statuses: statuses.data,
                types: types.data,
            },
        };
        Ok(Envelope::success(options, request_id).with_message(messages::OPTIONS_SUCCEEDED))
    }

    /// Runs a filtered search and enriches every record.
    pub async fn get_query_data(&self, filter: &QueryFilter) -> BffResult<Vec<EnrichedRecord>> {
        let response = self
            .query
            .search(filter)
            .await
            .map_err(|err| failed("get_query_data", &err, messages::QUERY_DATA_FAILED))?;

        let request_id = response.request_id_string();
        let adapted_at = Timestamp::now();
        let records: Vec<EnrichedRecord> = response
            .data
            .into_iter()
            .map(|record| enrich_record(record, adapted_at))
            .collect();

        let message = messages::query_data_succeeded(records.len());
        Ok(Envelope::success(records, request_id).with_message(message))
    }

    /// Appends the test record. Returns the data set as it was before the append.
    ///
    /// The argument is passed through unchecked; the domain service and the
    /// backend enforce the `num == 100` rule.
    pub async fn post_test_data(&self, num: i64) -> BffResult<Vec<QueryRecord>> {
        let response = self
            .query
            .post_test_data(num)
            .await
            .map_err(|err| failed("post_test_data", &err, messages::TEST_DATA_FAILED))?;

        let request_id = response.request_id_string();
        Ok(Envelope::success(response.data, request_id))
    }
}

fn failed(operation: &'static str, err: &ApiError, message: &'static str) -> BffFailure {
    warn!(operation, class = ?err.class(), error = %err, "BFF operation failed");
    BffFailure::new(message)
}
