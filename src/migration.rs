//! Collection setup for the PostgreSQL backend
//!
//! Creates the backing table of a document type together with its lifecycle and field
//! indexes. Existing documents are never rewritten.

use crate::core::SoftKeep;
use crate::errors::SoftKeepError;
use document_store::{Document, DocumentStore, StoreError, ValidatedCollectionName};

impl SoftKeep {
    /// Create the collection table and indexes for a document type.
    /// If recreate is true, drops the existing table first.
    pub async fn auto_migrate<T: Document>(&self, recreate: bool) -> Result<(), SoftKeepError> {
        let collection =
            ValidatedCollectionName::new(T::collection_name()).map_err(StoreError::from)?;

        if recreate {
            let drop_sql = T::drop_collection_sql();
            crate::debug_log!("Dropping collection with SQL: {}", drop_sql);
            sqlx::query(&drop_sql).execute(self.pool()).await?;
        }

        let create_sql = T::create_collection_sql();
        crate::debug_log!("Creating collection with SQL: {}", create_sql);
        sqlx::query(&create_sql).execute(self.pool()).await?;

        let indexes = T::create_indexes_sql();
        for index_sql in &indexes {
            crate::debug_log!("Creating index with SQL: {}", index_sql);
            sqlx::query(index_sql).execute(self.pool()).await?;
        }

        tracing::info!(
            collection = %collection,
            indexes = indexes.len(),
            recreated = recreate,
            "collection ready"
        );
        Ok(())
    }

    /// Migrate the store's collection, then register the store
    pub async fn register_store_with_migration<S>(
        &mut self,
        name: String,
        store: S,
        recreate: bool,
    ) -> Result<(), SoftKeepError>
    where
        S: DocumentStore + 'static,
    {
        self.auto_migrate::<S::Model>(recreate).await?;
        self.register_store(name, store)
    }
}
