//! Lifecycle flags carried by every soft-deletable document
//!
//! The flags are serialized as top-level document keys (the owning struct flattens
//! them), so stored documents look like `{"id": ..., "is_deleted": false,
//! "deleted_at": null, "is_active": true, ...}`. Missing keys fall back to the
//! defaults, which keeps documents written before the flags existed readable.
//!
//! `deleted_at` is always written with six fractional digits and a `Z` suffix, so
//! stored timestamps compare the same way as text (jsonb) and as instants.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use config::LifecycleScope;
use serde::{Deserialize, Serialize};

/// Document key of the logical deletion flag
pub const IS_DELETED_FIELD: &str = "is_deleted";
/// Document key of the deletion timestamp
pub const DELETED_AT_FIELD: &str = "deleted_at";
/// Document key of the administrative enable/disable flag
pub const IS_ACTIVE_FIELD: &str = "is_active";

/// Keys the lifecycle layer owns inside a document
pub const LIFECYCLE_FIELDS: [&str; 3] = [IS_DELETED_FIELD, DELETED_AT_FIELD, IS_ACTIVE_FIELD];

/// Soft delete and active/inactive state of a document.
///
/// The two booleans are independent: a document may be deleted while still
/// marked active, and deactivating never touches the deletion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleFlags {
    pub is_deleted: bool,
    #[serde(with = "timestamp_format")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Default for LifecycleFlags {
    fn default() -> Self {
        Self {
            is_deleted: false,
            deleted_at: None,
            is_active: true,
        }
    }
}

impl LifecycleFlags {
    /// Flag as deleted at the given instant, kept to microsecond precision
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at.trunc_subsecs(6));
    }

    /// Undo a soft delete
    pub fn clear_deleted(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Visible to default reads: neither deleted nor deactivated
    pub fn is_visible(&self) -> bool {
        self.is_within(LifecycleScope::Active)
    }

    /// In-memory counterpart of the scope's query conditions
    pub fn is_within(&self, scope: LifecycleScope) -> bool {
        match scope {
            LifecycleScope::Active => !self.is_deleted && self.is_active,
            LifecycleScope::NonDeleted => !self.is_deleted,
            LifecycleScope::DeletedOnly => self.is_deleted,
            LifecycleScope::All => true,
        }
    }
}

/// Stored text form of a timestamp, e.g. `2024-01-01T00:00:00.500000Z`.
///
/// Range bounds on `deleted_at` should be built with this so the comparison is
/// chronological in every backend.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_some(&super::format_timestamp(*at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}

/// Index backing the default read scope of a collection
pub fn lifecycle_index_sql(collection: &str) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS idx_{0}_lifecycle ON {0} (((body ->> '{1}')), ((body ->> '{2}')))",
        collection, IS_DELETED_FIELD, IS_ACTIVE_FIELD
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let flags = LifecycleFlags::default();
        assert!(!flags.is_deleted);
        assert!(flags.deleted_at.is_none());
        assert!(flags.is_active);
        assert!(flags.is_visible());
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let flags: LifecycleFlags = serde_json::from_value(json!({})).unwrap();
        assert_eq!(flags, LifecycleFlags::default());

        let flags: LifecycleFlags = serde_json::from_value(json!({ "is_active": false })).unwrap();
        assert!(!flags.is_active);
        assert!(!flags.is_deleted);
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(LifecycleFlags::default()).unwrap();
        let object = value.as_object().unwrap();
        for field in LIFECYCLE_FIELDS {
            assert!(object.contains_key(field), "missing {}", field);
        }
        assert_eq!(value[DELETED_AT_FIELD], json!(null));
    }

    #[test]
    fn test_deactivation_keeps_deletion_state() {
        let mut flags = LifecycleFlags::default();
        let now = Utc::now();
        flags.mark_deleted(now);
        flags.set_active(false);
        flags.set_active(true);

        assert!(flags.is_deleted);
        assert_eq!(flags.deleted_at, Some(now.trunc_subsecs(6)));
        assert!(!flags.is_visible());

        flags.clear_deleted();
        assert!(flags.is_visible());
        assert!(flags.deleted_at.is_none());
    }

    #[test]
    fn test_deleted_at_text_order_is_time_order() {
        let on_the_second = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let half_past = DateTime::parse_from_rfc3339("2024-01-01T00:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut earlier = LifecycleFlags::default();
        earlier.mark_deleted(on_the_second);
        let mut later = LifecycleFlags::default();
        later.mark_deleted(half_past);

        let earlier_json = serde_json::to_value(earlier).unwrap();
        let later_json = serde_json::to_value(later).unwrap();
        assert_eq!(earlier_json[DELETED_AT_FIELD], json!("2024-01-01T00:00:00.000000Z"));
        assert_eq!(later_json[DELETED_AT_FIELD], json!("2024-01-01T00:00:00.500000Z"));

        let earlier_text = earlier_json[DELETED_AT_FIELD].as_str().unwrap();
        let later_text = later_json[DELETED_AT_FIELD].as_str().unwrap();
        assert!(earlier_text < later_text);

        // Round trip is exact, and other RFC 3339 spellings still load
        let reloaded: LifecycleFlags = serde_json::from_value(later_json).unwrap();
        assert_eq!(reloaded, later);
        let legacy: LifecycleFlags =
            serde_json::from_value(json!({ "deleted_at": "2024-01-01T01:00:00.5+01:00" })).unwrap();
        assert_eq!(legacy.deleted_at, Some(half_past));
    }

    #[test]
    fn test_scope_membership() {
        let visible = LifecycleFlags::default();
        let mut inactive = LifecycleFlags::default();
        inactive.set_active(false);
        let mut deleted = LifecycleFlags::default();
        deleted.mark_deleted(Utc::now());

        assert!(visible.is_within(LifecycleScope::Active));
        assert!(!inactive.is_within(LifecycleScope::Active));
        assert!(inactive.is_within(LifecycleScope::NonDeleted));
        assert!(!deleted.is_within(LifecycleScope::NonDeleted));
        assert!(deleted.is_within(LifecycleScope::DeletedOnly));
        assert!(!visible.is_within(LifecycleScope::DeletedOnly));
        for flags in [visible, inactive, deleted] {
            assert!(flags.is_within(LifecycleScope::All));
        }
    }

    #[test]
    fn test_lifecycle_index_sql() {
        assert_eq!(
            lifecycle_index_sql("accounts"),
            "CREATE INDEX IF NOT EXISTS idx_accounts_lifecycle ON accounts (((body ->> 'is_deleted')), ((body ->> 'is_active')))"
        );
    }
}
