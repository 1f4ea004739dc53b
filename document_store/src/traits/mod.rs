//! Traits for document persistence
//!
//! `Document` and `Lifecycle` describe record types; `DocumentStore` is the
//! persistence layer and `SoftDeletable` the lifecycle operations on top of it.

pub mod core;
pub mod document;
pub mod lifecycle;
pub mod soft_deletable;

// Re-export all public items for convenience
pub use core::DocumentStore;
pub use document::Document;
pub use lifecycle::Lifecycle;
pub use soft_deletable::SoftDeletable;
