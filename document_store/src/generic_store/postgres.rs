//! PostgreSQL document backend
//!
//! One table per collection: `id TEXT PRIMARY KEY, body JSONB`, plus timestamps
//! maintained by the store. Create the table with `SoftKeep::auto_migrate`.

use crate::query_builder::SqlGenerator;
use crate::traits::{Document, DocumentStore, Lifecycle, SoftDeletable};
use crate::validation::ValidatedCollectionName;
use crate::{DbPool, QueryBuilder, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use std::marker::PhantomData;

/// Document store backed by a PostgreSQL JSONB table
pub struct PgDocumentStore<T: Document> {
    pub(crate) db_pool: DbPool,
    collection: ValidatedCollectionName,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for PgDocumentStore<T> {
    fn clone(&self) -> Self {
        Self {
            db_pool: self.db_pool.clone(),
            collection: self.collection.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> std::fmt::Debug for PgDocumentStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgDocumentStore")
            .field("collection", &self.collection.as_str())
            .finish()
    }
}

impl<T: Document> PgDocumentStore<T> {
    /// Create a store for `T`'s collection, validating the collection name
    pub fn new(db_pool: DbPool) -> Result<Self, StoreError> {
        let collection = ValidatedCollectionName::new(T::collection_name())?;
        Ok(Self {
            db_pool,
            collection,
            _phantom: PhantomData,
        })
    }

    pub fn pool(&self) -> &DbPool {
        &self.db_pool
    }

    pub fn collection(&self) -> &ValidatedCollectionName {
        &self.collection
    }

    fn encode(&self, document: &T) -> Result<(String, Value), StoreError> {
        let key = T::storage_key(&document.document_id());
        let body = serde_json::to_value(document)
            .map_err(|e| StoreError::serialization(self.collection.as_str(), e))?;
        Ok((key, body))
    }

    fn decode(&self, body: Value) -> Result<T, StoreError> {
        serde_json::from_value(body).map_err(|e| StoreError::serialization(self.collection.as_str(), e))
    }

    fn db_error(&self, operation: &str, e: sqlx::Error) -> StoreError {
        StoreError::database_operation(self.collection.as_str(), operation, e)
    }
}

#[async_trait]
impl<T: Document> DocumentStore for PgDocumentStore<T> {
    type Model = T;

    async fn insert(&self, document: T) -> Result<T, StoreError> {
        let (key, body) = self.encode(&document)?;
        let sql = SqlGenerator::insert_document(&self.collection);

        let stored = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(&key)
            .bind(Json(body))
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| {
                let duplicate = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if duplicate {
                    StoreError::conflict(self.collection.as_str(), &key)
                } else {
                    self.db_error("insert", e)
                }
            })?;

        self.decode(stored.0)
    }

    async fn save(&self, document: T) -> Result<T, StoreError> {
        let (key, body) = self.encode(&document)?;
        let sql = SqlGenerator::save_document(&self.collection);

        let stored = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(&key)
            .bind(Json(body))
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| self.db_error("save", e))?;

        self.decode(stored.0)
    }

    async fn get_by_id(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        let sql = SqlGenerator::get_document(&self.collection);

        let stored = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(T::storage_key(id))
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| self.db_error("get_by_id", e))?;

        stored.map(|Json(body)| self.decode(body)).transpose()
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<T>, StoreError> {
        let (sql, params) = SqlGenerator::select_documents(&self.collection, &query)?;
        crate::debug_log!("[FIND] {} params={}", sql, params.len());

        let mut sqlx_query = sqlx::query_scalar::<_, Json<Value>>(&sql);
        for param in params {
            sqlx_query = sqlx_query.bind(Json(param));
        }

        let rows = sqlx_query
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| self.db_error("find", e))?;

        rows.into_iter().map(|Json(body)| self.decode(body)).collect()
    }

    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        let (sql, params) = SqlGenerator::count_documents(&self.collection, &query)?;
        crate::debug_log!("[COUNT] {} params={}", sql, params.len());

        let mut sqlx_query = sqlx::query_scalar::<_, i64>(&sql);
        for param in params {
            sqlx_query = sqlx_query.bind(Json(param));
        }

        sqlx_query
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| self.db_error("count", e))
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, StoreError> {
        let sql = SqlGenerator::delete_document(&self.collection);

        let result = sqlx::query(&sql)
            .bind(T::storage_key(id))
            .execute(&self.db_pool)
            .await
            .map_err(|e| self.db_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl<T: Lifecycle> SoftDeletable for PgDocumentStore<T> {}
