use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// A record type persisted as a JSON document.
///
/// Usually implemented by the `#[document]` attribute macro, which also adds the
/// lifecycle flags:
/// ```ignore
/// use softkeep::prelude::*;
///
/// #[document(collection = "accounts")]
/// pub struct Account {
///     #[primary_key]
///     pub id: Uuid,
///     pub email: String,
/// }
/// ```
///
/// Manual implementations need serde, an id and a collection name.
pub trait Document: Clone + Send + Sync + Debug + Serialize + DeserializeOwned + 'static {
    /// Primary key type, rendered with `Display` as the storage key
    type Id: Clone + Send + Sync + Debug + Display + Serialize + DeserializeOwned + 'static;

    /// Collection (and backing table) name
    fn collection_name() -> &'static str;

    /// Name of the primary key field inside the document
    fn primary_key_field() -> &'static str {
        "id"
    }

    /// Extract ID from document instance
    fn document_id(&self) -> Self::Id;

    /// Storage key for an id
    fn storage_key(id: &Self::Id) -> String {
        id.to_string()
    }

    /// Generate CREATE TABLE SQL for the PostgreSQL backend
    fn create_collection_sql() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id TEXT PRIMARY KEY, \
             body JSONB NOT NULL, \
             created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
             updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
            Self::collection_name()
        )
    }

    /// Generate DROP TABLE SQL statement
    fn drop_collection_sql() -> String {
        format!("DROP TABLE IF EXISTS {}", Self::collection_name())
    }

    /// Generate CREATE INDEX SQL statements
    fn create_indexes_sql() -> Vec<String> {
        vec![]
    }
}
