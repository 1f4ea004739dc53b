//! Document Store - lifecycle-aware persistence layer for SoftKeep
//!
//! This crate provides the foundational types and traits for document persistence:
//! the `DocumentStore` trait with in-memory and PostgreSQL JSONB backends, the
//! lifecycle flags every soft-deletable document carries, the `SoftDeletable`
//! operations, and the query builder used to compose lifecycle scopes into reads.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod errors;
pub mod generic_store;
pub mod lifecycle;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;

pub use config::{FilterPrecedence, LifecycleScope};
pub use errors::StoreError;
pub use generic_store::{LifecycleStore, MemoryStore, PgDocumentStore};
pub use lifecycle::LifecycleFlags;
pub use query_builder::{QueryBuilder, QueryFilter, QueryOperator, SortOrder};
pub use traits::*;
pub use validation::{ValidatedCollectionName, ValidatedFieldName, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
