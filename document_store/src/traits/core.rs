use super::document::Document;
use crate::{QueryBuilder, StoreError};
use async_trait::async_trait;

/// Persistence operations shared by every document backend.
///
/// These are the raw operations: no lifecycle filtering happens here. Wrap a store in
/// [`LifecycleStore`](crate::LifecycleStore) to get filtered reads.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The document type stored in this collection
    type Model: Document;

    /// Store a new document, failing if its id is already taken
    async fn insert(&self, document: Self::Model) -> Result<Self::Model, StoreError>;

    /// Write a document, replacing any stored version with the same id
    async fn save(&self, document: Self::Model) -> Result<Self::Model, StoreError>;

    /// Get a document by its id
    async fn get_by_id(
        &self,
        id: &<Self::Model as Document>::Id,
    ) -> Result<Option<Self::Model>, StoreError>;

    /// Find documents matching query conditions
    async fn find(&self, query: QueryBuilder) -> Result<Vec<Self::Model>, StoreError>;

    /// Find first document matching query conditions
    async fn find_one(&self, query: QueryBuilder) -> Result<Option<Self::Model>, StoreError> {
        let mut results = self.find(query.limit(1)).await?;
        Ok(results.pop())
    }

    /// Count documents matching query conditions
    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError>;

    /// Remove a document from storage, returns whether it existed
    async fn delete(&self, id: &<Self::Model as Document>::Id) -> Result<bool, StoreError>;
}
