//! Lifecycle behaviour of `#[document]` types over the in-memory backend

use chrono::SubsecRound;
use softkeep::document_store::query_builder::matching;
use softkeep::prelude::*;

#[document(collection = "accounts")]
pub struct Account {
    #[primary_key]
    pub id: String,
    #[index]
    pub email: String,
    pub plan: String,
}

fn account(id: &str, plan: &str) -> Account {
    Account::new(id.to_string(), format!("{}@example.com", id), plan.to_string())
}

fn ids(accounts: &[Account]) -> Vec<&str> {
    accounts.iter().map(|a| a.id.as_str()).collect()
}

#[test]
fn test_new_documents_start_visible() {
    let fresh = account("a", "pro");
    assert!(!fresh.is_deleted());
    assert!(fresh.deleted_at().is_none());
    assert!(fresh.is_active());
}

#[test]
fn test_macro_generated_metadata() {
    assert_eq!(Account::collection_name(), "accounts");
    assert_eq!(Account::primary_key_field(), "id");
    assert_eq!(account("a", "pro").document_id(), "a");

    let indexes = Account::create_indexes_sql();
    assert_eq!(indexes.len(), 2);
    assert!(indexes[0].contains("idx_accounts_lifecycle"));
    assert!(indexes[1].contains("idx_accounts_email"));
}

#[test]
fn test_flags_serialize_as_top_level_keys() {
    let value = serde_json::to_value(account("a", "pro")).unwrap();
    assert_eq!(value["is_deleted"], json!(false));
    assert_eq!(value["deleted_at"], json!(null));
    assert_eq!(value["is_active"], json!(true));
    assert!(value.get("lifecycle").is_none());
}

#[test]
fn test_documents_without_flags_read_as_visible() {
    let legacy: Account = serde_json::from_value(json!({
        "id": "old",
        "email": "old@example.com",
        "plan": "free"
    }))
    .unwrap();
    assert!(legacy.lifecycle.is_visible());

    // The default scope does not require the keys to be present
    let stored = json!({ "id": "old", "plan": "free" });
    let scoped = QueryBuilder::new().active_non_deleted();
    assert!(matching::matches(&stored, scoped.conditions()));
}

#[tokio::test]
async fn test_soft_delete_sets_flag_and_timestamp() {
    let store = LifecycleStore::new(MemoryStore::<Account>::new());
    let mut doc = store.insert(account("a", "pro")).await.unwrap();

    let before = Utc::now();
    let saved = store.soft_delete(&mut doc).await.unwrap();
    let after = Utc::now();

    assert!(doc.is_deleted());
    assert!(saved.is_deleted());
    // Stored to the microsecond
    let deleted_at = saved.deleted_at().unwrap();
    assert!(before.trunc_subsecs(6) <= deleted_at && deleted_at <= after);
    assert_eq!(deleted_at, deleted_at.trunc_subsecs(6));
    // Deleting does not deactivate
    assert!(saved.is_active());
}

#[tokio::test]
async fn test_activation_leaves_deletion_state_alone() {
    let store = LifecycleStore::new(MemoryStore::<Account>::new());
    let mut doc = store.insert(account("a", "pro")).await.unwrap();
    store.soft_delete(&mut doc).await.unwrap();
    let deleted_at = doc.deleted_at();

    store.deactivate(&mut doc).await.unwrap();
    assert!(!doc.is_active());
    assert!(doc.is_deleted());
    assert_eq!(doc.deleted_at(), deleted_at);

    let saved = store.activate(&mut doc).await.unwrap();
    assert!(saved.is_active());
    assert!(saved.is_deleted());
    assert_eq!(saved.deleted_at(), deleted_at);

    let raw = store.inner().get_by_id(&"a".to_string()).await.unwrap().unwrap();
    assert_eq!(raw.lifecycle, saved.lifecycle);
}

#[tokio::test]
async fn test_soft_deleted_document_scenario() {
    let store = LifecycleStore::new(MemoryStore::<Account>::new());
    let mut a = store.insert(account("a", "pro")).await.unwrap();
    store.insert(account("b", "pro")).await.unwrap();

    store.soft_delete(&mut a).await.unwrap();

    // Default lookups by id and by query no longer see A
    assert!(store.get_by_id(&"a".to_string()).await.unwrap().is_none());
    let by_email = QueryBuilder::new().filter(QueryFilter::eq("email", json!("a@example.com")));
    assert!(store.find_one(by_email.clone()).await.unwrap().is_none());
    assert!(store.find(by_email).await.unwrap().is_empty());

    let active = store.find_active_non_deleted(QueryBuilder::new()).await.unwrap();
    assert_eq!(ids(&active), vec!["b"]);

    // The explicit paths still reach it
    let with_deleted = store
        .with_deleted()
        .get_by_id(&"a".to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(with_deleted.deleted_at().is_some());

    let raw = store.inner().get_by_id(&"a".to_string()).await.unwrap().unwrap();
    assert!(raw.is_deleted());

    let trash = store.only_deleted().find(QueryBuilder::new()).await.unwrap();
    assert_eq!(ids(&trash), vec!["a"]);
}

#[tokio::test]
async fn test_find_active_non_deleted_over_every_flag_combination() {
    let store = MemoryStore::<Account>::new();
    let plans = ["free", "pro"];

    for i in 0..16 {
        let mut doc = account(&format!("acct{}", i), plans[i % 2]);
        if i & 0b0100 != 0 {
            doc.lifecycle.mark_deleted(Utc::now());
        }
        if i & 0b1000 != 0 {
            doc.lifecycle.set_active(false);
        }
        store.insert(doc).await.unwrap();
    }

    let queries = [
        QueryBuilder::new(),
        QueryBuilder::new().filter(QueryFilter::eq("plan", json!("pro"))),
        QueryBuilder::new().filter(QueryFilter::eq("is_deleted", json!(true))),
        QueryBuilder::new().filter(QueryFilter::eq("is_active", json!(false))),
        QueryBuilder::new().filter(QueryFilter::ne("is_deleted", json!(false))),
    ];

    for query in queries {
        let found = store.find_active_non_deleted(query.clone()).await.unwrap();
        assert!(!found.is_empty());
        assert!(found.iter().all(|doc| !doc.is_deleted() && doc.is_active()));

        let count = store.count_active_non_deleted(query).await.unwrap();
        assert_eq!(count, found.len() as i64);
    }

    assert_eq!(store.count(QueryBuilder::new()).await.unwrap(), 16);
    assert_eq!(
        store.count_active_non_deleted(QueryBuilder::new()).await.unwrap(),
        4
    );
}

#[tokio::test]
async fn test_restore_returns_document_to_default_reads() {
    let store = LifecycleStore::new(MemoryStore::<Account>::new());
    let mut doc = store.insert(account("a", "pro")).await.unwrap();
    store.soft_delete(&mut doc).await.unwrap();
    assert_eq!(store.count(QueryBuilder::new()).await.unwrap(), 0);

    store.restore(&mut doc).await.unwrap();
    assert!(!doc.is_deleted());
    assert!(doc.deleted_at().is_none());
    assert_eq!(store.count(QueryBuilder::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_caller_precedence_from_config() {
    let config = LifecycleConfig::new(LifecycleScope::NonDeleted, FilterPrecedence::Caller);
    let store = LifecycleStore::with_config(MemoryStore::<Account>::new(), &config);

    let mut inactive = store.insert(account("a", "pro")).await.unwrap();
    store.deactivate(&mut inactive).await.unwrap();
    store.insert(account("b", "pro")).await.unwrap();

    // NonDeleted keeps the deactivated account visible
    assert_eq!(store.count(QueryBuilder::new()).await.unwrap(), 2);

    // The caller's flag condition is honoured rather than replaced
    let query = QueryBuilder::new().filter(QueryFilter::eq("is_active", json!(false)));
    let found = store.find(query).await.unwrap();
    assert_eq!(ids(&found), vec!["a"]);
}

#[tokio::test]
async fn test_ordering_and_pagination_through_scope() {
    let store = LifecycleStore::new(MemoryStore::<Account>::new());
    for (id, plan) in [("c", "pro"), ("a", "free"), ("d", "pro"), ("b", "team")] {
        store.insert(account(id, plan)).await.unwrap();
    }
    let mut hidden = store.get_by_id(&"a".to_string()).await.unwrap().unwrap();
    store.soft_delete(&mut hidden).await.unwrap();

    let query = QueryBuilder::new()
        .order_by("email", SortOrder::Asc)
        .offset(1)
        .limit(2);
    let found = store.find(query).await.unwrap();
    assert_eq!(ids(&found), vec!["c", "d"]);
}

/// Store whose writes always fail, to check that lifecycle operations pass errors through
struct RejectingStore;

#[async_trait]
impl DocumentStore for RejectingStore {
    type Model = Account;

    async fn insert(&self, document: Account) -> Result<Account, StoreError> {
        Err(StoreError::conflict(Account::collection_name(), document.id))
    }

    async fn save(&self, document: Account) -> Result<Account, StoreError> {
        Err(StoreError::conflict(Account::collection_name(), document.id))
    }

    async fn get_by_id(&self, _id: &String) -> Result<Option<Account>, StoreError> {
        Ok(None)
    }

    async fn find(&self, _query: QueryBuilder) -> Result<Vec<Account>, StoreError> {
        Ok(Vec::new())
    }

    async fn count(&self, _query: QueryBuilder) -> Result<i64, StoreError> {
        Ok(0)
    }

    async fn delete(&self, _id: &String) -> Result<bool, StoreError> {
        Ok(false)
    }
}

impl SoftDeletable for RejectingStore {}

#[tokio::test]
async fn test_write_failures_are_returned_unchanged() {
    let store = RejectingStore;
    let mut doc = account("a", "pro");

    let err = store.soft_delete(&mut doc).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { ref id, .. } if id == "a"));
    // The in-memory document was still updated before the write
    assert!(doc.is_deleted());

    assert!(store.deactivate(&mut doc).await.is_err());
    assert!(store.activate(&mut doc).await.is_err());
    assert!(store.restore(&mut doc).await.is_err());
}
