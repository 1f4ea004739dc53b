//! Core SoftKeep functionality
//!
//! `SoftKeep` owns the connection pool and the lifecycle configuration, builds stores
//! for document types and keeps a registry of named stores.

use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::SoftKeepError;
use config::{AppConfig, DatabaseConfig, LifecycleConfig};
use document_store::{Document, DocumentStore, Lifecycle, LifecycleStore, PgDocumentStore};

/// Main coordinator: database pool, lifecycle settings and named stores
pub struct SoftKeep {
    pool: PgPool,
    lifecycle: LifecycleConfig,
    stores: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl SoftKeep {
    /// Connect using the database section and keep the lifecycle section
    pub async fn new(config: AppConfig) -> Result<Self, SoftKeepError> {
        let pool = Self::connect(&config.database).await?;
        Ok(Self::from_pool(pool, config.lifecycle))
    }

    /// Load configuration from the environment and connect
    pub async fn from_env() -> Result<Self, SoftKeepError> {
        let config = AppConfig::load()?;
        Self::new(config).await
    }

    /// Use an existing pool
    pub fn from_pool(pool: PgPool, lifecycle: LifecycleConfig) -> Self {
        Self {
            pool,
            lifecycle,
            stores: HashMap::new(),
        }
    }

    async fn connect(config: &DatabaseConfig) -> Result<PgPool, SoftKeepError> {
        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connecting to PostgreSQL"
        );
        let pool = pool_options.connect(&config.connection_string()).await?;
        Ok(pool)
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn lifecycle_config(&self) -> &LifecycleConfig {
        &self.lifecycle
    }

    /// Raw PostgreSQL store for `T`, without lifecycle filtering
    pub fn document_store<T: Document>(&self) -> Result<PgDocumentStore<T>, SoftKeepError> {
        Ok(PgDocumentStore::new(self.pool.clone())?)
    }

    /// PostgreSQL store for `T` filtered by the configured lifecycle scope
    pub fn lifecycle_store<T: Lifecycle>(
        &self,
    ) -> Result<LifecycleStore<PgDocumentStore<T>>, SoftKeepError> {
        let inner = self.document_store::<T>()?;
        Ok(LifecycleStore::with_config(inner, &self.lifecycle))
    }

    /// Register a store with a given name
    pub fn register_store<S>(&mut self, name: String, store: S) -> Result<(), SoftKeepError>
    where
        S: DocumentStore + 'static,
    {
        if self.stores.contains_key(&name) {
            return Err(SoftKeepError::StoreAlreadyRegistered(name));
        }

        crate::debug_log!("registering store {}", name);
        self.stores.insert(name, Box::new(store));
        Ok(())
    }

    /// Get a registered store by name
    pub fn get_store<S>(&self, name: &str) -> Result<&S, SoftKeepError>
    where
        S: DocumentStore + 'static,
    {
        self.stores
            .get(name)
            .and_then(|store| store.downcast_ref::<S>())
            .ok_or_else(|| SoftKeepError::StoreNotFound(name.to_string()))
    }

    /// Get a mutable reference to a registered store by name
    pub fn get_store_mut<S>(&mut self, name: &str) -> Result<&mut S, SoftKeepError>
    where
        S: DocumentStore + 'static,
    {
        self.stores
            .get_mut(name)
            .and_then(|store| store.downcast_mut::<S>())
            .ok_or_else(|| SoftKeepError::StoreNotFound(name.to_string()))
    }

    /// List all registered store names
    pub fn list_stores(&self) -> Vec<&String> {
        self.stores.keys().collect()
    }

    /// Remove a store by name
    pub fn unregister_store(&mut self, name: &str) -> Result<(), SoftKeepError> {
        self.stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SoftKeepError::StoreNotFound(name.to_string()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), SoftKeepError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
