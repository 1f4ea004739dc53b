//! Query builder utilities
//!
//! Queries are built once and then either compiled to JSONB SQL for PostgreSQL or
//! evaluated directly against in-memory documents.

pub mod builder;
pub mod filter;
pub mod matching;
pub mod ordering;
pub mod scope;
pub mod sql_generation;


pub use builder::QueryBuilder;
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use ordering::SortOrder;
pub use sql_generation::SqlGenerator;
