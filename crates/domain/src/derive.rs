//! Pure derivation rules applied by the BFF layer.
//!
//! Everything here is a deterministic function of its inputs (apart from the
//! caller-supplied timestamps), so the rules can be tested without any I/O.

use serde::{Deserialize, Serialize};

use crate::{EnrichedRecord, Permission, QueryRecord, RawUser, Role, Timestamp, UserInfo, Username};

/// The single privileged account.
pub const ADMIN_USERNAME: &str = "admin";

/// Weight used when a status is not one of the known values.
pub const DEFAULT_STATUS_WEIGHT: u32 = 3;

/// Weight used when a type is not one of the known values.
pub const DEFAULT_TYPE_WEIGHT: u32 = 2;

/// Priority weight contributed by a record's status.
pub fn status_weight(status: &str) -> u32 {
    match status {
        "进行中" => 3,
        "已完成" => 1,
        "暂停" => 4,
        "计划中" => 2,
        _ => DEFAULT_STATUS_WEIGHT,
    }
}

/// Priority weight contributed by a record's type.
pub fn type_weight(kind: &str) -> u32 {
    match kind {
        "内部" => 2,
        "外部" => 3,
        _ => DEFAULT_TYPE_WEIGHT,
    }
}

/// `status_weight(status) + type_weight(type)`.
pub fn calculate_priority(record: &QueryRecord) -> u32 {
    status_weight(&record.status) + type_weight(&record.kind)
}

/// The non-empty values among category, status and type, in that order.
pub fn generate_tags(record: &QueryRecord) -> Vec<String> {
    [&record.category, &record.status, &record.kind]
        .into_iter()
        .filter(|value| !value.is_empty())
        .cloned()
        .collect()
}

/// Extends a raw record with `updated_at`, `priority` and `tags`.
pub fn enrich_record(record: QueryRecord, adapted_at: Timestamp) -> EnrichedRecord {
    let priority = calculate_priority(&record);
    let tags = generate_tags(&record);
    EnrichedRecord {
        record,
        updated_at: adapted_at,
        priority,
        tags,
    }
}

/// Role derived from the username alone.
pub fn determine_role(username: &Username) -> Role {
    if username.as_str() == ADMIN_USERNAME {
        Role::Admin
    } else {
        Role::User
    }
}

/// Permissions derived from the username alone.
pub fn permissions_for(username: &Username) -> Vec<Permission> {
    match determine_role(username) {
        Role::Admin => vec![
            Permission::Read,
            Permission::Write,
            Permission::Delete,
            Permission::Manage,
        ],
        Role::User => vec![Permission::Read],
    }
}

/// Builds a [`UserInfo`] from the raw user with derived fields.
pub fn enrich_user(user: RawUser, login_time: Timestamp) -> UserInfo {
    UserInfo {
        role: determine_role(&user.username),
        permissions: permissions_for(&user.username),
        id: user.id,
        username: user.username,
        email: user.email,
        last_login_time: login_time,
    }
}

// ---------------------------------------------------------------------------
// Presentation classification
// ---------------------------------------------------------------------------

/// Display urgency of a priority value. Lower priority values are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    /// Priority ≤ 2.
    Ok,
    /// Priority 3.
    Warn,
    /// Priority ≥ 4.
    Alert,
}

impl PriorityLevel {
    /// Classifies a priority value.
    pub fn from_priority(priority: u32) -> Self {
        match priority {
            0..=2 => Self::Ok,
            3 => Self::Warn,
            _ => Self::Alert,
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Alert => "alert",
        };
        f.write_str(label)
    }
}
