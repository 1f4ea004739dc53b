//! Convenience re-exports for common SoftKeep usage
//!
//! ```rust
//! use softkeep::prelude::*;
//! ```

// Core SoftKeep components
pub use crate::core::SoftKeep;
pub use crate::errors::SoftKeepError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, LifecycleConfig};

// Re-export commonly used document-store types for convenience
pub use document_store::prelude::*;

// Re-export document_store module for macro-generated code
pub use document_store;

// Attribute macro for document types
pub use lifecycle_derive::document;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use chrono::{DateTime, Utc};
pub use serde_json::json;
pub use sqlx;
pub use tokio;
pub use uuid::Uuid;
