use crate::query_builder::filter::QueryFilter;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::validation::ValidationError;
use serde_json::Value;

/// Query builder for document reads
///
/// Top-level filters are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    /// Add ordering
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    /// Add limit
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add offset
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn conditions(&self) -> &[QueryFilter] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[(String, SortOrder)] {
        &self.order_by
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    /// Whether a top-level condition constrains `field`.
    ///
    /// Conditions nested inside AND/OR groups are not considered.
    pub fn constrains(&self, field: &str) -> bool {
        self.conditions
            .iter()
            .any(|condition| condition.field() == Some(field))
    }

    /// Remove the top-level conditions on `field` and return them
    pub fn take_field_conditions(&mut self, field: &str) -> Vec<QueryFilter> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.conditions)
            .into_iter()
            .partition(|condition| condition.field() == Some(field));
        self.conditions = kept;
        taken
    }

    /// Drop the top-level conditions on `field`
    pub fn without_field(mut self, field: &str) -> Self {
        self.take_field_conditions(field);
        self
    }

    /// Build WHERE clause
    pub fn build_where_clause(&self) -> Result<(String, Vec<Value>), ValidationError> {
        SqlGenerator::build_where_clause(&self.conditions)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(&self) -> Result<String, ValidationError> {
        SqlGenerator::build_order_clause(&self.order_by)
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(&self) -> String {
        SqlGenerator::build_limit_clause(self.limit, self.offset)
    }

    /// Build complete query parts (WHERE, ORDER BY, LIMIT, Values)
    pub fn build(&self) -> Result<(String, String, String, Vec<Value>), ValidationError> {
        let (where_clause, values) = self.build_where_clause()?;
        let order_clause = self.build_order_clause()?;
        let limit_clause = self.build_limit_clause();

        Ok((where_clause, order_clause, limit_clause, values))
    }
}
