//! In-memory query data set.

use tokio::sync::RwLock;
use tracing::info;

use domain::{QueryFilter, QueryRecord, RecordId};

use crate::error::{BackendError, NUM_MUST_BE_100};

pub const CATEGORIES: [&str; 4] = ["开发", "测试", "维护", "设计"];
pub const STATUSES: [&str; 4] = ["进行中", "已完成", "暂停", "计划中"];
pub const TYPES: [&str; 2] = ["内部", "外部"];

/// The only value `append_test_record` accepts.
pub const TEST_DATA_NUM: i64 = 100;

/// The fixture records plus anything appended since startup.
///
/// Nothing is persisted; a restart returns to the fixture.
#[derive(Debug)]
pub struct QueryStore {
    records: RwLock<Vec<QueryRecord>>,
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::with_records(fixture())
    }
}

impl QueryStore {
    /// A store seeded with the fixture data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `records`.
    pub fn with_records(records: Vec<QueryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn categories(&self) -> Vec<String> {
        CATEGORIES.iter().map(|s| s.to_string()).collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        STATUSES.iter().map(|s| s.to_string()).collect()
    }

    pub fn types(&self) -> Vec<String> {
        TYPES.iter().map(|s| s.to_string()).collect()
    }

    /// Records matching every active predicate of `filter`, in insertion order.
    pub async fn search(&self, filter: &QueryFilter) -> Vec<QueryRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    /// Appends one generated record and returns the data set as it was
    /// before the append.
    ///
    /// # Errors
    ///
    /// [`BackendError::BadRequest`] unless `num == 100`; nothing is appended.
    pub async fn append_test_record(&self, num: i64) -> Result<Vec<QueryRecord>, BackendError> {
        if num != TEST_DATA_NUM {
            return Err(BackendError::BadRequest(NUM_MUST_BE_100.to_string()));
        }

        let mut records = self.records.write().await;
        let snapshot = records.clone();
        let next = snapshot.len() as u64 + 1;
        records.push(QueryRecord {
            id: RecordId::new(next),
            name: format!("项目{next}"),
            category: "设计".into(),
            status: "进行中".into(),
            kind: "外部".into(),
            description: format!("这是一个外部设计项目，美滋滋{num}"),
            created_at: "2024-01-12".into(),
        });
        info!(record_id = next, total = records.len(), "Test record appended");

        Ok(snapshot)
    }
}

fn fixture() -> Vec<QueryRecord> {
    let row = |id: u64, name: &str, category: &str, status: &str, kind: &str, description: &str, created_at: &str| {
        QueryRecord {
            id: RecordId::new(id),
            name: name.into(),
            category: category.into(),
            status: status.into(),
            kind: kind.into(),
            description: description.into(),
            created_at: created_at.into(),
        }
    };
    vec![
        row(1, "项目A", "开发", "进行中", "内部", "这是一个内部开发项目", "2024-01-15"),
        row(2, "项目B", "测试", "已完成", "外部", "这是一个外部测试项目", "2024-01-10"),
        row(3, "项目C", "维护", "暂停", "内部", "这是一个内部维护项目", "2024-01-05"),
        row(4, "项目D", "开发", "进行中", "外部", "这是一个外部开发项目", "2024-01-20"),
        row(5, "项目E", "测试", "已完成", "内部", "这是一个内部测试项目", "2024-01-12"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[QueryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_by_category_preserves_order() {
        let store = QueryStore::new();
        let found = store.search(&QueryFilter::all().with_category("开发")).await;
        assert_eq!(names(&found), vec!["项目A", "项目D"]);
    }

    #[tokio::test]
    async fn test_search_ands_predicates() {
        let store = QueryStore::new();
        let filter = QueryFilter::all().with_category("测试").with_kind("内部");
        assert_eq!(names(&store.search(&filter).await), vec!["项目E"]);
    }

    #[tokio::test]
    async fn test_empty_filter_returns_everything() {
        let store = QueryStore::new();
        let filter = QueryFilter::all().with_status("");
        assert_eq!(store.search(&filter).await.len(), 5);
    }

    #[tokio::test]
    async fn test_append_returns_pre_append_snapshot() {
        let store = QueryStore::new();

        let snapshot = store.append_test_record(100).await.unwrap();
        assert_eq!(snapshot.len(), 5);

        let designs = store.search(&QueryFilter::all().with_category("设计")).await;
        assert_eq!(designs.len(), 1);
        assert_eq!(designs[0].id, RecordId::new(6));
        assert_eq!(designs[0].name, "项目6");
        assert_eq!(designs[0].description, "这是一个外部设计项目，美滋滋100");
    }

    #[tokio::test]
    async fn test_append_rejects_other_numbers() {
        let store = QueryStore::new();

        let err = store.append_test_record(99).await.unwrap_err();

        assert_eq!(err, BackendError::BadRequest(NUM_MUST_BE_100.into()));
        assert_eq!(store.search(&QueryFilter::all()).await.len(), 5);
    }
}
