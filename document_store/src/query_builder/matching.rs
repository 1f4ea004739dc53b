//! In-memory evaluation of query filters against JSON documents
//!
//! Semantics follow the SQL the PostgreSQL backend generates: a missing field
//! behaves like SQL NULL, `Ne`/`NotIn` also match documents without the field,
//! numbers compare numerically and strings compare as text, the way jsonb does.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::SortOrder;
use serde_json::Value;
use std::cmp::Ordering;

/// Whether a document satisfies every top-level filter
pub fn matches(document: &Value, filters: &[QueryFilter]) -> bool {
    filters.iter().all(|filter| matches_filter(document, filter))
}

pub fn matches_filter(document: &Value, filter: &QueryFilter) -> bool {
    match filter {
        QueryFilter::Condition(condition) => matches_condition(document, condition),
        QueryFilter::Group { operator, filters } => match operator {
            LogicalOperator::And => filters.iter().all(|f| matches_filter(document, f)),
            LogicalOperator::Or => filters.iter().any(|f| matches_filter(document, f)),
        },
    }
}

/// Resolve a dotted field path inside a document
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

fn is_null(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn matches_condition(document: &Value, condition: &QueryCondition) -> bool {
    let field = lookup(document, &condition.field);

    match (&condition.operator, &condition.value) {
        (QueryOperator::IsNull, _) | (QueryOperator::Eq, None) | (QueryOperator::Eq, Some(Value::Null)) => {
            is_null(field)
        }
        (QueryOperator::IsNotNull, _) | (QueryOperator::Ne, None) | (QueryOperator::Ne, Some(Value::Null)) => {
            !is_null(field)
        }
        (QueryOperator::Eq, Some(expected)) => field.is_some_and(|actual| values_equal(actual, expected)),
        (QueryOperator::Ne, Some(expected)) => !field.is_some_and(|actual| values_equal(actual, expected)),
        (QueryOperator::Gt, Some(bound)) => compare_field(field, bound) == Some(Ordering::Greater),
        (QueryOperator::Gte, Some(bound)) => matches!(
            compare_field(field, bound),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        (QueryOperator::Lt, Some(bound)) => compare_field(field, bound) == Some(Ordering::Less),
        (QueryOperator::Lte, Some(bound)) => matches!(
            compare_field(field, bound),
            Some(Ordering::Less | Ordering::Equal)
        ),
        (QueryOperator::Like, Some(Value::String(pattern))) => field
            .and_then(Value::as_str)
            .is_some_and(|text| like_match(text, pattern, false)),
        (QueryOperator::ILike, Some(Value::String(pattern))) => field
            .and_then(Value::as_str)
            .is_some_and(|text| like_match(text, pattern, true)),
        (QueryOperator::In, Some(Value::Array(candidates))) => field.is_some_and(|actual| {
            candidates
                .iter()
                .any(|candidate| values_equal(actual, candidate))
        }),
        (QueryOperator::NotIn, Some(Value::Array(candidates))) => !field.is_some_and(|actual| {
            candidates
                .iter()
                .any(|candidate| values_equal(actual, candidate))
        }),
        // Range and pattern operators without a usable operand match nothing
        _ => false,
    }
}

fn compare_field(field: Option<&Value>, bound: &Value) -> Option<Ordering> {
    field.and_then(|actual| compare_values(actual, bound))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Compare two scalar values of the same JSON type, `None` when not comparable
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order used for sorting, missing fields sort after every value
pub fn sort_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => type_rank(x)
            .cmp(&type_rank(y))
            .then_with(|| compare_values(x, y).unwrap_or(Ordering::Equal)),
    }
}

/// Compare two documents by a list of sort keys
pub fn order_documents(a: &Value, b: &Value, order_by: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in order_by {
        let ordering = sort_cmp(lookup(a, field), lookup(b, field));
        let ordering = match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[derive(Debug, PartialEq)]
enum PatternToken {
    AnySequence,
    AnyChar,
    Literal(char),
}

fn tokenize_pattern(pattern: &str, case_insensitive: bool) -> Vec<PatternToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        let token = match c {
            '%' => PatternToken::AnySequence,
            '_' => PatternToken::AnyChar,
            '\\' => match chars.next() {
                Some(escaped) => PatternToken::Literal(escaped),
                None => PatternToken::Literal('\\'),
            },
            other => PatternToken::Literal(other),
        };
        let token = match token {
            PatternToken::Literal(c) if case_insensitive => {
                PatternToken::Literal(c.to_lowercase().next().unwrap_or(c))
            }
            token => token,
        };
        tokens.push(token);
    }

    tokens
}

/// SQL LIKE matching: `%` any sequence, `_` any single character, `\` escapes
pub fn like_match(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let text: Vec<char> = if case_insensitive {
        text.chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    } else {
        text.chars().collect()
    };
    let tokens = tokenize_pattern(pattern, case_insensitive);

    // reachable[j]: the first i tokens can match text[..j]
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;

    for token in &tokens {
        let mut next = vec![false; text.len() + 1];
        match token {
            PatternToken::AnySequence => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= reachable[j];
                    next[j] = seen;
                }
            }
            PatternToken::AnyChar => {
                for j in 0..text.len() {
                    next[j + 1] = reachable[j];
                }
            }
            PatternToken::Literal(expected) => {
                for j in 0..text.len() {
                    next[j + 1] = reachable[j] && text[j] == *expected;
                }
            }
        }
        reachable = next;
    }

    reachable[text.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "name": "Ada Lovelace",
            "age": 36,
            "score": 9.5,
            "is_deleted": false,
            "is_active": true,
            "deleted_at": null,
            "joined": "2024-03-01T10:00:00Z",
            "profile": { "city": "London" },
            "tags": ["math", "poetry"]
        })
    }

    #[test]
    fn test_equality_and_missing_fields() {
        let document = doc();
        assert!(matches_filter(&document, &QueryFilter::eq("age", json!(36))));
        assert!(matches_filter(&document, &QueryFilter::eq("age", json!(36.0))));
        assert!(!matches_filter(&document, &QueryFilter::eq("missing", json!(1))));
        assert!(matches_filter(&document, &QueryFilter::ne("missing", json!(1))));
        assert!(matches_filter(&document, &QueryFilter::eq("deleted_at", Value::Null)));
        assert!(matches_filter(&document, &QueryFilter::is_null("missing")));
        assert!(!matches_filter(&document, &QueryFilter::is_not_null("deleted_at")));
    }

    #[test]
    fn test_nested_lookup() {
        let document = doc();
        assert_eq!(lookup(&document, "profile.city"), Some(&json!("London")));
        assert_eq!(lookup(&document, "profile.zip"), None);
        assert_eq!(lookup(&document, "name.first"), None);
        assert!(matches_filter(
            &document,
            &QueryFilter::eq("profile.city", json!("London"))
        ));
    }

    #[test]
    fn test_ranges() {
        let document = doc();
        assert!(matches_filter(&document, &QueryFilter::gt("age", json!(30))));
        assert!(matches_filter(&document, &QueryFilter::lte("score", json!(9.5))));
        assert!(!matches_filter(&document, &QueryFilter::lt("age", json!(36))));
        // Incomparable types never match a range
        assert!(!matches_filter(&document, &QueryFilter::gt("name", json!(1))));
        assert!(!matches_filter(&document, &QueryFilter::gt("missing", json!(1))));
    }

    #[test]
    fn test_timestamps_compare_as_text() {
        // jsonb orders strings as text, so mixed precisions are not chronological
        let document = json!({ "at": "2024-01-01T00:00:00.5Z" });
        assert!(matches_filter(
            &document,
            &QueryFilter::lt("at", json!("2024-01-01T00:00:00Z"))
        ));
        assert!(!matches_filter(
            &document,
            &QueryFilter::eq("at", json!("2024-01-01T01:00:00.5+01:00"))
        ));

        // Fixed-precision timestamps sort chronologically
        let stored = json!({ "deleted_at": "2024-01-01T00:00:00.500000Z" });
        assert!(!matches_filter(
            &stored,
            &QueryFilter::lt("deleted_at", json!("2024-01-01T00:00:00.250000Z"))
        ));
        assert!(matches_filter(
            &stored,
            &QueryFilter::gt("deleted_at", json!("2024-01-01T00:00:00.000000Z"))
        ));
    }

    #[test]
    fn test_in_and_not_in() {
        let document = doc();
        assert!(matches_filter(
            &document,
            &QueryFilter::in_values("age", vec![json!(1), json!(36)])
        ));
        assert!(!matches_filter(&document, &QueryFilter::in_values("age", vec![])));
        assert!(matches_filter(&document, &QueryFilter::not_in_values("age", vec![])));
        assert!(matches_filter(
            &document,
            &QueryFilter::not_in_values("missing", vec![json!(1)])
        ));
    }

    #[test]
    fn test_groups() {
        let document = doc();
        let either = QueryFilter::or(vec![
            QueryFilter::eq("age", json!(1)),
            QueryFilter::eq("profile.city", json!("London")),
        ]);
        assert!(matches_filter(&document, &either));
        assert!(matches_filter(&document, &QueryFilter::and(vec![])));
        assert!(!matches_filter(&document, &QueryFilter::or(vec![])));
    }

    #[test]
    fn test_like_patterns() {
        assert!(like_match("Ada Lovelace", "Ada%", false));
        assert!(like_match("Ada Lovelace", "%love%", true));
        assert!(!like_match("Ada Lovelace", "%love%", false));
        assert!(like_match("abc", "a_c", false));
        assert!(!like_match("abbc", "a_c", false));
        assert!(like_match("100%", "100\\%", false));
        assert!(!like_match("1000", "100\\%", false));
        assert!(like_match("", "%", false));
        assert!(!like_match("", "_", false));
    }

    #[test]
    fn test_sort_order_missing_last() {
        let a = json!({ "n": 1 });
        let b = json!({ "n": 2 });
        let none = json!({});
        let asc = [("n".to_string(), SortOrder::Asc)];
        let desc = [("n".to_string(), SortOrder::Desc)];

        assert_eq!(order_documents(&a, &b, &asc), Ordering::Less);
        assert_eq!(order_documents(&none, &b, &asc), Ordering::Greater);
        assert_eq!(order_documents(&a, &b, &desc), Ordering::Greater);
        assert_eq!(order_documents(&none, &b, &desc), Ordering::Less);
    }
}
