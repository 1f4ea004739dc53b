//! Error types for the SoftKeep crate

use config::ConfigError;
use document_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoftKeepError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Store already registered: {0}")]
    StoreAlreadyRegistered(String),
}
