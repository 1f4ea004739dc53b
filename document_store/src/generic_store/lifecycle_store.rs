//! Lifecycle-filtered view over any document store
//!
//! `LifecycleStore` decorates a store so that default reads only see documents in its
//! scope (by default: neither deleted nor deactivated). Writes pass straight through.
//! Wider views are explicit: `with_deleted()`, `only_deleted()`, `with_scope()`, or
//! the wrapped store itself via `inner()`.

use crate::traits::{Document, DocumentStore, Lifecycle, SoftDeletable};
use crate::{QueryBuilder, StoreError};
use async_trait::async_trait;
use config::{FilterPrecedence, LifecycleConfig, LifecycleScope};

#[derive(Debug, Clone)]
pub struct LifecycleStore<S> {
    inner: S,
    scope: LifecycleScope,
    precedence: FilterPrecedence,
}

impl<S> LifecycleStore<S>
where
    S: DocumentStore,
    S::Model: Lifecycle,
{
    /// Wrap a store with the default scope (active, non-deleted documents)
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, &LifecycleConfig::default())
    }

    pub fn with_config(inner: S, config: &LifecycleConfig) -> Self {
        Self {
            inner,
            scope: config.default_scope,
            precedence: config.precedence,
        }
    }

    /// Change how caller conditions on the flags are merged
    pub fn precedence_mode(mut self, precedence: FilterPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn scope(&self) -> LifecycleScope {
        self.scope
    }

    pub fn precedence(&self) -> FilterPrecedence {
        self.precedence
    }

    /// The unfiltered store underneath
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn scoped(&self, query: QueryBuilder) -> QueryBuilder {
        query.with_scope(self.scope, self.precedence)
    }
}

impl<S> LifecycleStore<S>
where
    S: DocumentStore + Clone,
    S::Model: Lifecycle,
{
    /// A view over the same store with another scope
    pub fn with_scope(&self, scope: LifecycleScope) -> Self {
        Self {
            inner: self.inner.clone(),
            scope,
            precedence: self.precedence,
        }
    }

    /// A view that also sees deleted and deactivated documents
    pub fn with_deleted(&self) -> Self {
        self.with_scope(LifecycleScope::All)
    }

    /// A view over soft-deleted documents only
    pub fn only_deleted(&self) -> Self {
        self.with_scope(LifecycleScope::DeletedOnly)
    }
}

#[async_trait]
impl<S> DocumentStore for LifecycleStore<S>
where
    S: DocumentStore,
    S::Model: Lifecycle,
{
    type Model = S::Model;

    async fn insert(&self, document: Self::Model) -> Result<Self::Model, StoreError> {
        self.inner.insert(document).await
    }

    async fn save(&self, document: Self::Model) -> Result<Self::Model, StoreError> {
        self.inner.save(document).await
    }

    async fn get_by_id(
        &self,
        id: &<Self::Model as Document>::Id,
    ) -> Result<Option<Self::Model>, StoreError> {
        let scope = self.scope;
        Ok(self
            .inner
            .get_by_id(id)
            .await?
            .filter(|document| document.lifecycle().is_within(scope)))
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<Self::Model>, StoreError> {
        self.inner.find(self.scoped(query)).await
    }

    async fn find_one(&self, query: QueryBuilder) -> Result<Option<Self::Model>, StoreError> {
        self.inner.find_one(self.scoped(query)).await
    }

    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        self.inner.count(self.scoped(query)).await
    }

    async fn delete(&self, id: &<Self::Model as Document>::Id) -> Result<bool, StoreError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl<S> SoftDeletable for LifecycleStore<S>
where
    S: DocumentStore,
    S::Model: Lifecycle,
{
    fn filter_precedence(&self) -> FilterPrecedence {
        self.precedence
    }

    // Bypass the view's own scope so a wider or trash view cannot leak flagged documents
    async fn find_active_non_deleted(
        &self,
        query: QueryBuilder,
    ) -> Result<Vec<Self::Model>, StoreError> {
        let query = query.with_scope(LifecycleScope::Active, self.precedence);
        self.inner.find(query).await
    }

    async fn count_active_non_deleted(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        let query = query.with_scope(LifecycleScope::Active, self.precedence);
        self.inner.count(query).await
    }
}
