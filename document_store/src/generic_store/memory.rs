//! In-memory document backend
//!
//! Documents are kept serialized as `serde_json::Value`, in insertion order, and
//! queried with the same filter semantics as the PostgreSQL backend.

use crate::query_builder::matching;
use crate::traits::{Document, DocumentStore, Lifecycle, SoftDeletable};
use crate::{QueryBuilder, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    // insertion sequence -> document
    documents: BTreeMap<u64, Value>,
    // storage key -> insertion sequence
    keys: HashMap<String, u64>,
}

impl Collection {
    fn put(&mut self, key: String, document: Value) {
        match self.keys.get(&key) {
            Some(seq) => {
                self.documents.insert(*seq, document);
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.keys.insert(key, seq);
                self.documents.insert(seq, document);
            }
        }
    }
}

/// Document store held in process memory.
///
/// Clones share the same collection.
pub struct MemoryStore<T: Document> {
    collection: Arc<RwLock<Collection>>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> std::fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("collection", &T::collection_name())
            .finish()
    }
}

impl<T: Document> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            collection: Arc::new(RwLock::new(Collection::default())),
            _phantom: PhantomData,
        }
    }

    /// Number of stored documents, flagged ones included
    pub async fn len(&self) -> usize {
        self.collection.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn to_value(document: &T) -> Result<Value, StoreError> {
        serde_json::to_value(document)
            .map_err(|e| StoreError::serialization(T::collection_name(), e))
    }

    fn from_value(value: Value) -> Result<T, StoreError> {
        serde_json::from_value(value).map_err(|e| StoreError::serialization(T::collection_name(), e))
    }
}

#[async_trait]
impl<T: Document> DocumentStore for MemoryStore<T> {
    type Model = T;

    async fn insert(&self, document: T) -> Result<T, StoreError> {
        let key = T::storage_key(&document.document_id());
        let value = Self::to_value(&document)?;

        let mut collection = self.collection.write().await;
        if collection.keys.contains_key(&key) {
            return Err(StoreError::conflict(T::collection_name(), key));
        }
        crate::trace_log!("insert {} {}", T::collection_name(), key);
        collection.put(key, value);

        Ok(document)
    }

    async fn save(&self, document: T) -> Result<T, StoreError> {
        let key = T::storage_key(&document.document_id());
        let value = Self::to_value(&document)?;

        crate::trace_log!("save {} {}", T::collection_name(), key);
        self.collection.write().await.put(key, value);

        Ok(document)
    }

    async fn get_by_id(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        let key = T::storage_key(id);
        let value = {
            let collection = self.collection.read().await;
            collection
                .keys
                .get(&key)
                .and_then(|seq| collection.documents.get(seq))
                .cloned()
        };

        value.map(Self::from_value).transpose()
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<T>, StoreError> {
        let selected: Vec<Value> = {
            let collection = self.collection.read().await;
            let mut matched: Vec<&Value> = collection
                .documents
                .values()
                .filter(|document| matching::matches(document, query.conditions()))
                .collect();

            if !query.ordering().is_empty() {
                // Stable, so ties keep insertion order like the SQL fallback ordering
                matched.sort_by(|a, b| matching::order_documents(a, b, query.ordering()));
            }

            let offset = query.offset_value().unwrap_or(0).max(0) as usize;
            let limit = query
                .limit_value()
                .map(|limit| limit.max(0) as usize)
                .unwrap_or(usize::MAX);

            matched
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect()
        };

        selected.into_iter().map(Self::from_value).collect()
    }

    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        let collection = self.collection.read().await;
        let total = collection
            .documents
            .values()
            .filter(|document| matching::matches(document, query.conditions()))
            .count();
        Ok(total as i64)
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, StoreError> {
        let key = T::storage_key(id);
        let mut collection = self.collection.write().await;
        match collection.keys.remove(&key) {
            Some(seq) => {
                collection.documents.remove(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<T: Lifecycle> SoftDeletable for MemoryStore<T> {}
