//! Lifecycle scopes as query composition
//!
//! A scope is a set of conditions on the lifecycle flags that gets merged into a
//! caller's query. Reads stay filtered by default, yet a caller can always ask for a
//! wider scope (or the raw store) instead of being stuck with a hidden hook.

use crate::lifecycle::{IS_ACTIVE_FIELD, IS_DELETED_FIELD};
use crate::query_builder::builder::QueryBuilder;
use crate::query_builder::filter::QueryFilter;
use config::{FilterPrecedence, LifecycleScope};
use serde_json::json;

/// Conditions a scope adds to a query.
///
/// `Ne` is used rather than `Eq` so documents written before the flags existed,
/// which read back with the defaults, stay visible.
pub fn scope_conditions(scope: LifecycleScope) -> Vec<QueryFilter> {
    match scope {
        LifecycleScope::Active => vec![
            QueryFilter::ne(IS_DELETED_FIELD, json!(true)),
            QueryFilter::ne(IS_ACTIVE_FIELD, json!(false)),
        ],
        LifecycleScope::NonDeleted => vec![QueryFilter::ne(IS_DELETED_FIELD, json!(true))],
        LifecycleScope::DeletedOnly => vec![QueryFilter::eq(IS_DELETED_FIELD, json!(true))],
        LifecycleScope::All => Vec::new(),
    }
}

impl QueryBuilder {
    /// Merge a lifecycle scope into this query.
    ///
    /// With [`FilterPrecedence::Lifecycle`] the scope's condition on a flag replaces any
    /// top-level caller condition on that flag. With [`FilterPrecedence::Caller`] the
    /// scope only constrains flags the caller left alone.
    pub fn with_scope(mut self, scope: LifecycleScope, precedence: FilterPrecedence) -> Self {
        for condition in scope_conditions(scope) {
            let Some(field) = condition.field().map(str::to_string) else {
                continue;
            };

            match precedence {
                FilterPrecedence::Lifecycle => {
                    let discarded: Vec<_> = self
                        .take_field_conditions(&field)
                        .into_iter()
                        .filter(|previous| previous != &condition)
                        .collect();
                    if !discarded.is_empty() {
                        tracing::warn!(
                            field = %field,
                            scope = %scope,
                            discarded = discarded.len(),
                            "caller conditions on lifecycle field replaced by scope"
                        );
                    }
                    self.conditions.push(condition);
                }
                FilterPrecedence::Caller => {
                    if !self.constrains(&field) {
                        self.conditions.push(condition);
                    }
                }
            }
        }

        crate::trace_log!("query scoped to {}: {:?}", scope, self.conditions);
        self
    }

    /// Shorthand for the default read scope with lifecycle precedence
    pub fn active_non_deleted(self) -> Self {
        self.with_scope(LifecycleScope::Active, FilterPrecedence::Lifecycle)
    }
}
