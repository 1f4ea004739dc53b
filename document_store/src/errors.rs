use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error in '{collection}' during {operation}: {source}")]
    Database {
        collection: String,
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Serialization error in '{collection}': {source}")]
    Serialization {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Document '{id}' already exists in '{collection}'")]
    Conflict { collection: String, id: String },
}

impl StoreError {
    pub fn database_operation(collection: &str, operation: &str, source: sqlx::Error) -> Self {
        Self::Database {
            collection: collection.to_string(),
            operation: operation.to_string(),
            source,
        }
    }

    pub fn serialization(collection: &str, source: serde_json::Error) -> Self {
        Self::Serialization {
            collection: collection.to_string(),
            source,
        }
    }

    pub fn conflict(collection: &str, id: impl ToString) -> Self {
        Self::Conflict {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}
