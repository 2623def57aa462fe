//! Table-backed data source implementation for PostgreSQL.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tracing::debug;

use segno_core::error::{DataSourceError, SourceResult};
use segno_core::models::{FilterBag, FilterValue, OrderDirection};
use segno_core::ports::{DataSource, QueryPlan};

use super::database::Database;

// =============================================================================
// Table Binding
// =============================================================================

/// Errors raised while declaring a table binding.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The name is not usable as a bare SQL identifier.
    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Host-declared mapping from filter keys to the columns of one table.
///
/// Every identifier is validated at construction time, which is what
/// makes the dynamic SQL below safe: only vetted names are ever
/// interpolated, all values arrive as bound parameters.
#[derive(Debug, Clone)]
pub struct TableBinding {
    table: String,
    order_column: String,
    columns: BTreeMap<String, String>,
}

impl TableBinding {
    /// Declare a binding for `table`, ordered by `order_column`.
    ///
    /// The order column doubles as the pagination axis, so it should be
    /// unique (or have a unique tiebreaker) for offsets to be stable
    /// across requests.
    pub fn new(
        table: impl Into<String>,
        order_column: impl Into<String>,
    ) -> Result<Self, BindingError> {
        let table = validated(table.into())?;
        let order_column = validated(order_column.into())?;

        Ok(Self {
            table,
            order_column,
            columns: BTreeMap::new(),
        })
    }

    /// Expose `column` under `filter_key`.
    ///
    /// Keys carrying a `_gte`/`_lte` suffix at query time compare
    /// against the column bound under the suffix-less key.
    pub fn with_column(
        mut self,
        filter_key: impl Into<String>,
        column: impl Into<String>,
    ) -> Result<Self, BindingError> {
        let column = validated(column.into())?;
        self.columns.insert(filter_key.into(), column);
        Ok(self)
    }

    /// The bound table name.
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Accept only bare `[A-Za-z_][A-Za-z0-9_]*` identifiers.
fn validated(name: String) -> Result<String, BindingError> {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');

    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(BindingError::InvalidIdentifier(name))
    }
}

// =============================================================================
// PgTableSource
// =============================================================================

/// PostgreSQL implementation of [`DataSource`] over one bound table.
///
/// `Desc` enumeration on the order column is display order, matching
/// the planner's conventions for forward pagination.
pub struct PgTableSource<T> {
    pool: PgPool,
    binding: TableBinding,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgTableSource<T> {
    pub fn new(db: &Database, binding: TableBinding) -> Self {
        Self {
            pool: db.pool().clone(),
            binding,
            _marker: PhantomData,
        }
    }
}

fn select_query(binding: &TableBinding, plan: &QueryPlan) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT * FROM {}", binding.table));
    push_filters(&mut qb, binding, &plan.filters);

    let direction = match plan.order {
        OrderDirection::Asc => "ASC",
        OrderDirection::Desc => "DESC",
    };
    qb.push(format!(" ORDER BY {} {}", binding.order_column, direction));

    qb.push(" LIMIT ");
    qb.push_bind(i64::from(plan.limit));
    qb.push(" OFFSET ");
    qb.push_bind(plan.offset as i64);

    qb
}

fn count_query(binding: &TableBinding, filters: &FilterBag) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", binding.table));
    push_filters(&mut qb, binding, filters);
    qb
}

// Build the WHERE clause dynamically.
//
// SAFETY: This dynamic SQL is safe from injection because:
// 1. Table and column names come from the TableBinding, which only
//    accepts validated identifiers, never from request input
// 2. Operators (=, >=, <=, IN, AND) are hardcoded
// 3. All VALUES are bound parameters via push_bind
// 4. Order direction comes from an enum, not user strings
fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, binding: &TableBinding, filters: &FilterBag) {
    let mut prefix = " WHERE ";

    for (key, value) in filters.iter() {
        let (base, op) = split_operator(key);

        let Some(column) = binding.columns.get(base) else {
            debug!(key, "Dropping filter with no bound column");
            continue;
        };

        qb.push(prefix);
        prefix = " AND ";
        push_condition(qb, column, op, value);
    }
}

/// Map a `_gte`/`_lte` key suffix to its comparison operator.
fn split_operator(key: &str) -> (&str, &str) {
    if let Some(base) = key.strip_suffix("_gte") {
        (base, " >= ")
    } else if let Some(base) = key.strip_suffix("_lte") {
        (base, " <= ")
    } else {
        (key, " = ")
    }
}

fn push_condition(
    qb: &mut QueryBuilder<'static, Postgres>,
    column: &str,
    op: &str,
    value: &FilterValue,
) {
    match value {
        // An empty membership set matches nothing
        FilterValue::List(items) if items.is_empty() => {
            qb.push("1 = 0");
        }
        FilterValue::List(items) => {
            qb.push(column);
            qb.push(" IN (");
            {
                let mut values = qb.separated(", ");
                for item in items {
                    match item {
                        FilterValue::Int(i) => {
                            values.push_bind(*i);
                        }
                        FilterValue::Text(s) => {
                            values.push_bind(s.clone());
                        }
                        FilterValue::Bool(b) => {
                            values.push_bind(*b);
                        }
                        FilterValue::List(_) => {
                            debug!(column, "Skipping nested list in filter value");
                        }
                    }
                }
            }
            qb.push(")");
        }
        FilterValue::Int(i) => {
            qb.push(column);
            qb.push(op);
            qb.push_bind(*i);
        }
        FilterValue::Text(s) => {
            qb.push(column);
            qb.push(op);
            qb.push_bind(s.clone());
        }
        FilterValue::Bool(b) => {
            qb.push(column);
            qb.push(op);
            qb.push_bind(*b);
        }
    }
}

#[async_trait]
impl<T> DataSource for PgTableSource<T>
where
    T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
    type Record = T;

    async fn count(&self, filters: &FilterBag) -> SourceResult<u64> {
        let mut qb = count_query(&self.binding, filters);

        let row: (i64,) = qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DataSourceError::QueryFailed(e.to_string()))?;

        Ok(row.0 as u64)
    }

    async fn fetch(&self, plan: &QueryPlan) -> SourceResult<Vec<T>> {
        let mut qb = select_query(&self.binding, plan);

        qb.build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DataSourceError::QueryFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> TableBinding {
        TableBinding::new("users", "registered_at")
            .unwrap()
            .with_column("user_role", "role")
            .unwrap()
            .with_column("registered", "registered_at")
            .unwrap()
    }

    fn plan(filters: FilterBag) -> QueryPlan {
        QueryPlan {
            limit: 10,
            offset: 20,
            order: OrderDirection::Desc,
            filters,
        }
    }

    // Test critique: seuls des identifiants sûrs sont interpolés
    #[test]
    fn test_binding_rejects_unsafe_identifiers() {
        assert!(TableBinding::new("users; DROP TABLE users", "id").is_err());
        assert!(TableBinding::new("users", "id DESC").is_err());
        assert!(TableBinding::new("", "id").is_err());
        assert!(TableBinding::new("1users", "id").is_err());

        let err = TableBinding::new("users", "id")
            .unwrap()
            .with_column("role", "role = role")
            .unwrap_err();
        assert!(matches!(err, BindingError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_binding_accepts_plain_identifiers() {
        assert!(TableBinding::new("users", "registered_at").is_ok());
        assert!(TableBinding::new("_private", "col_2").is_ok());
    }

    #[test]
    fn test_select_query_shape() {
        let filters = FilterBag::new()
            .with("user_role", "editor")
            .with("registered_gte", 100);

        let sql = select_query(&binding(), &plan(filters)).into_sql();

        assert_eq!(
            sql,
            "SELECT * FROM users WHERE registered_at >= $1 AND role = $2 \
             ORDER BY registered_at DESC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn test_select_query_without_filters() {
        let sql = select_query(&binding(), &plan(FilterBag::new())).into_sql();
        assert_eq!(
            sql,
            "SELECT * FROM users ORDER BY registered_at DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_ascending_enumeration() {
        let mut asc = plan(FilterBag::new());
        asc.order = OrderDirection::Asc;

        let sql = select_query(&binding(), &asc).into_sql();
        assert!(sql.contains("ORDER BY registered_at ASC"));
    }

    #[test]
    fn test_count_query_shape() {
        let filters = FilterBag::new().with("user_role", "editor");
        let sql = count_query(&binding(), &filters).into_sql();

        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE role = $1");
    }

    // Test critique: une clé sans colonne liée est ignorée, pas interpolée
    #[test]
    fn test_unbound_filter_key_is_dropped() {
        let filters = FilterBag::new()
            .with("user_role", "editor")
            .with("no_such_key", "x");

        let sql = count_query(&binding(), &filters).into_sql();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE role = $1");
    }

    #[test]
    fn test_list_filter_becomes_in_clause() {
        let filters = FilterBag::new().with(
            "user_role",
            FilterValue::List(vec![
                FilterValue::Text("editor".into()),
                FilterValue::Text("admin".into()),
            ]),
        );

        let sql = count_query(&binding(), &filters).into_sql();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE role IN ($1, $2)");
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let filters = FilterBag::new().with("user_role", FilterValue::List(vec![]));

        let sql = count_query(&binding(), &filters).into_sql();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE 1 = 0");
    }

    #[test]
    fn test_operator_suffixes() {
        assert_eq!(split_operator("registered_gte"), ("registered", " >= "));
        assert_eq!(split_operator("registered_lte"), ("registered", " <= "));
        assert_eq!(split_operator("user_role"), ("user_role", " = "));
    }
}
