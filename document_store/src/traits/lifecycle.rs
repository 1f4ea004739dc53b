use super::document::Document;
use crate::lifecycle::LifecycleFlags;
use chrono::{DateTime, Utc};

/// A document carrying soft delete and active/inactive flags.
///
/// Generated by `#[document]`; a manual implementation only has to expose a
/// `LifecycleFlags` field (flattened into the serialized document).
pub trait Lifecycle: Document {
    fn lifecycle(&self) -> &LifecycleFlags;

    fn lifecycle_mut(&mut self) -> &mut LifecycleFlags;

    fn is_deleted(&self) -> bool {
        self.lifecycle().is_deleted
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle().deleted_at
    }

    fn is_active(&self) -> bool {
        self.lifecycle().is_active
    }
}
