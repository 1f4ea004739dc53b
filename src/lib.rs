//! # SoftKeep
//!
//! Soft delete and active/inactive lifecycle flags for document stores. Documents get
//! `is_deleted`, `deleted_at` and `is_active` flags, lifecycle operations that persist
//! them, and reads that hide flagged documents unless a wider scope is asked for.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use softkeep::prelude::*;
//!
//! #[document(collection = "accounts")]
//! pub struct Account {
//!     #[primary_key]
//!     pub id: Uuid,
//!     #[index]
//!     pub email: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let softkeep = SoftKeep::new(config).await?;
//!     softkeep.auto_migrate::<Account>(false).await?;
//!
//!     let accounts = softkeep.lifecycle_store::<Account>()?;
//!     let mut account = accounts
//!         .insert(Account::new(Uuid::new_v4(), "ada@example.com".to_string()))
//!         .await?;
//!
//!     accounts.soft_delete(&mut account).await?;
//!
//!     // Default reads no longer see the account
//!     assert!(accounts.get_by_id(&account.id).await?.is_none());
//!     // The trash view still does
//!     assert_eq!(accounts.only_deleted().count(QueryBuilder::new()).await?, 1);
//!
//!     Ok(())
//! }
//! ```

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

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::SoftKeep;
pub use errors::SoftKeepError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, FilterPrecedence, LifecycleConfig, LifecycleScope};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use document_store;
pub use lifecycle_derive;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
