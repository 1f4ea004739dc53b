use super::core::DocumentStore;
#[cfg(feature = "debug-logging")]
use super::document::Document;
use super::lifecycle::Lifecycle;
use crate::{QueryBuilder, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use config::{FilterPrecedence, LifecycleScope};

/// Lifecycle operations for stores whose documents carry lifecycle flags.
///
/// Each state change mutates the caller's document and persists it with exactly one
/// `save`; whatever that write returns, error included, is handed back unchanged.
/// No ordering between the operations is enforced.
#[async_trait]
pub trait SoftDeletable: DocumentStore
where
    Self::Model: Lifecycle,
{
    /// How `find_active_non_deleted` merges caller conditions on the flags
    fn filter_precedence(&self) -> FilterPrecedence {
        FilterPrecedence::Lifecycle
    }

    /// Mark the document deleted now and persist it
    async fn soft_delete(&self, document: &mut Self::Model) -> Result<Self::Model, StoreError> {
        document.lifecycle_mut().mark_deleted(Utc::now());
        crate::debug_log!(
            "soft-deleting {} {}",
            <Self::Model as Document>::collection_name(),
            document.document_id()
        );
        self.save(document.clone()).await
    }

    /// Clear the deletion flag and timestamp and persist the document
    async fn restore(&self, document: &mut Self::Model) -> Result<Self::Model, StoreError> {
        document.lifecycle_mut().clear_deleted();
        crate::debug_log!(
            "restoring {} {}",
            <Self::Model as Document>::collection_name(),
            document.document_id()
        );
        self.save(document.clone()).await
    }

    /// Disable the document without deleting it
    async fn deactivate(&self, document: &mut Self::Model) -> Result<Self::Model, StoreError> {
        document.lifecycle_mut().set_active(false);
        crate::debug_log!(
            "deactivating {} {}",
            <Self::Model as Document>::collection_name(),
            document.document_id()
        );
        self.save(document.clone()).await
    }

    /// Re-enable the document; its deletion state is left as is
    async fn activate(&self, document: &mut Self::Model) -> Result<Self::Model, StoreError> {
        document.lifecycle_mut().set_active(true);
        crate::debug_log!(
            "activating {} {}",
            <Self::Model as Document>::collection_name(),
            document.document_id()
        );
        self.save(document.clone()).await
    }

    /// Documents matching `query` that are neither deleted nor deactivated.
    ///
    /// Under `FilterPrecedence::Caller` this only holds for the flags `query` leaves
    /// unconstrained: a caller condition on a flag is kept, so flagged documents can
    /// be returned.
    async fn find_active_non_deleted(
        &self,
        query: QueryBuilder,
    ) -> Result<Vec<Self::Model>, StoreError> {
        let query = query.with_scope(LifecycleScope::Active, self.filter_precedence());
        self.find(query).await
    }

    /// Count of documents matching `query` that are neither deleted nor deactivated,
    /// with the same `FilterPrecedence::Caller` caveat as `find_active_non_deleted`
    async fn count_active_non_deleted(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        let query = query.with_scope(LifecycleScope::Active, self.filter_precedence());
        self.count(query).await
    }
}
