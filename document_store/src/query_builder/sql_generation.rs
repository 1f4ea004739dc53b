//! SQL generation for the PostgreSQL document backend
//!
//! Documents live in a `body JSONB` column. Every parameter is bound as `jsonb`;
//! pattern operators unwrap their parameter with `#>> '{}'`.

use crate::query_builder::builder::QueryBuilder;
use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::SortOrder;
use crate::validation::{ValidatedCollectionName, ValidatedFieldName, ValidationError};
use serde_json::Value;

pub struct SqlGenerator;

impl SqlGenerator {
    /// `body #> '{path}'`, the jsonb value at a field path
    pub fn json_expr(field: &str) -> Result<String, ValidationError> {
        let field = ValidatedFieldName::new(field)?;
        Ok(format!("(body #> {})", field.to_json_path()))
    }

    /// `body #>> '{path}'`, the text value at a field path
    pub fn text_expr(field: &str) -> Result<String, ValidationError> {
        let field = ValidatedFieldName::new(field)?;
        Ok(format!("(body #>> {})", field.to_json_path()))
    }

    /// Build WHERE clause from conditions
    pub fn build_where_clause(
        conditions: &[QueryFilter],
    ) -> Result<(String, Vec<Value>), ValidationError> {
        if conditions.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut values = Vec::new();
        let mut param_counter = 1;

        let conditions_sql = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, &mut values, &mut param_counter))
            .collect::<Result<Vec<_>, _>>()?
            .join(" AND ");

        Ok((format!("WHERE {}", conditions_sql), values))
    }

    fn build_condition_sql(
        filter: &QueryFilter,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, ValidationError> {
        match filter {
            QueryFilter::Condition(condition) => {
                Self::build_single_condition_sql(condition, values, param_counter)
            }
            QueryFilter::Group { operator, filters } => {
                if filters.is_empty() {
                    // Empty AND is vacuously true, empty OR has nothing to satisfy it
                    return Ok(match operator {
                        LogicalOperator::And => "TRUE".to_string(),
                        LogicalOperator::Or => "FALSE".to_string(),
                    });
                }

                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, values, param_counter))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(operator_str);

                Ok(format!("({})", group_conditions))
            }
        }
    }

    fn next_param(value: &Value, values: &mut Vec<Value>, param_counter: &mut usize) -> String {
        values.push(value.clone());
        let param = format!("${}", param_counter);
        *param_counter += 1;
        param
    }

    fn build_single_condition_sql(
        condition: &QueryCondition,
        values: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> Result<String, ValidationError> {
        let expr = Self::json_expr(&condition.field)?;
        let null_check = format!("({} IS NULL OR {} = 'null'::jsonb)", expr, expr);

        let sql = match (&condition.operator, &condition.value) {
            (QueryOperator::IsNull, _)
            | (QueryOperator::Eq, None)
            | (QueryOperator::Eq, Some(Value::Null)) => null_check,
            (QueryOperator::IsNotNull, _)
            | (QueryOperator::Ne, None)
            | (QueryOperator::Ne, Some(Value::Null)) => format!("NOT {}", null_check),
            (QueryOperator::Eq, Some(value)) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} = {}", expr, param)
            }
            (QueryOperator::Ne, Some(value)) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} IS DISTINCT FROM {}", expr, param)
            }
            (QueryOperator::Gt, Some(value)) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} > {}", expr, param)
            }
            (QueryOperator::Gte, Some(value)) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} >= {}", expr, param)
            }
            (QueryOperator::Lt, Some(value)) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} < {}", expr, param)
            }
            (QueryOperator::Lte, Some(value)) => {
                let param = Self::next_param(value, values, param_counter);
                format!("{} <= {}", expr, param)
            }
            (QueryOperator::Like, Some(value @ Value::String(_))) => {
                let text = Self::text_expr(&condition.field)?;
                let param = Self::next_param(value, values, param_counter);
                format!("{} LIKE ({} #>> '{{}}')", text, param)
            }
            (QueryOperator::ILike, Some(value @ Value::String(_))) => {
                let text = Self::text_expr(&condition.field)?;
                let param = Self::next_param(value, values, param_counter);
                format!("{} ILIKE ({} #>> '{{}}')", text, param)
            }
            (QueryOperator::In, Some(Value::Array(candidates))) => {
                if candidates.is_empty() {
                    "FALSE".to_string()
                } else {
                    let params = candidates
                        .iter()
                        .map(|candidate| Self::next_param(candidate, values, param_counter))
                        .collect::<Vec<_>>();
                    format!("{} IN ({})", expr, params.join(", "))
                }
            }
            (QueryOperator::NotIn, Some(Value::Array(candidates))) => {
                if candidates.is_empty() {
                    "TRUE".to_string()
                } else {
                    let params = candidates
                        .iter()
                        .map(|candidate| Self::next_param(candidate, values, param_counter))
                        .collect::<Vec<_>>();
                    format!("({} IS NULL OR {} NOT IN ({}))", expr, expr, params.join(", "))
                }
            }
            _ => "FALSE".to_string(),
        };

        Ok(sql)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> Result<String, ValidationError> {
        if order_by.is_empty() {
            return Ok(String::new());
        }

        let order_parts = order_by
            .iter()
            .map(|(field, order)| {
                Self::json_expr(field).map(|expr| format!("{} {}", expr, order.to_sql()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("ORDER BY {}", order_parts.join(", ")))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit.max(0)));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset.max(0)));
        }

        clauses.join(" ")
    }

    /// Full SELECT for a document query; unordered queries fall back to insertion order
    pub fn select_documents(
        collection: &ValidatedCollectionName,
        query: &QueryBuilder,
    ) -> Result<(String, Vec<Value>), ValidationError> {
        let (where_clause, order_clause, limit_clause, values) = query.build()?;
        let order_clause = if order_clause.is_empty() {
            "ORDER BY created_at ASC, id ASC".to_string()
        } else {
            format!("{}, created_at ASC, id ASC", order_clause)
        };

        let mut sql = format!("SELECT body FROM {}", collection);
        for part in [&where_clause, &order_clause, &limit_clause] {
            if !part.is_empty() {
                sql.push(' ');
                sql.push_str(part);
            }
        }

        Ok((sql, values))
    }

    /// COUNT for a document query; ordering and pagination are ignored
    pub fn count_documents(
        collection: &ValidatedCollectionName,
        query: &QueryBuilder,
    ) -> Result<(String, Vec<Value>), ValidationError> {
        let (where_clause, values) = query.build_where_clause()?;
        let mut sql = format!("SELECT COUNT(*) FROM {}", collection);
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }
        Ok((sql, values))
    }

    pub fn insert_document(collection: &ValidatedCollectionName) -> String {
        format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2) RETURNING body",
            collection
        )
    }

    /// Upsert by id, the `save` of the document store
    pub fn save_document(collection: &ValidatedCollectionName) -> String {
        format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body, updated_at = NOW() \
             RETURNING body",
            collection
        )
    }

    pub fn get_document(collection: &ValidatedCollectionName) -> String {
        format!("SELECT body FROM {} WHERE id = $1", collection)
    }

    pub fn delete_document(collection: &ValidatedCollectionName) -> String {
        format!("DELETE FROM {} WHERE id = $1", collection)
    }

    /// Expression index on a top-level document key
    pub fn field_index_sql(collection: &str, field: &str) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_{1} ON {0} ((body -> '{1}'))",
            collection, field
        )
    }
}
