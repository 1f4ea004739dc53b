pub mod lifecycle_store;
pub mod memory;
pub mod postgres;

pub use lifecycle_store::LifecycleStore;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
