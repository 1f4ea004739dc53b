//! Convenience re-exports for common document-store usage

// Core traits
pub use crate::traits::{Document, DocumentStore, Lifecycle, SoftDeletable};

// Error types
pub use crate::errors::StoreError;

// Stores
pub use crate::generic_store::{LifecycleStore, MemoryStore, PgDocumentStore};

// Lifecycle flags and scopes
pub use crate::lifecycle::{format_timestamp, LifecycleFlags};
pub use config::{FilterPrecedence, LifecycleConfig, LifecycleScope};

// Validation
pub use crate::validation::{ValidatedCollectionName, ValidatedFieldName, ValidationError};

// Query building
pub use crate::query_builder::{QueryBuilder, QueryFilter, SortOrder};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::PgPool;
