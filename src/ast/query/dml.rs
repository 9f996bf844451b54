//! Insert, update, delete and aggregate payloads.

use super::{Method, Query};
use crate::ast::clause::{AggregateClause, AggregateKind, ClauseKind, Component, InsertClause, UpdateClause};
use crate::ast::values::Value;
use crate::error::{ShardqlError, ShardqlResult};
use crate::schema::{Bindable, FieldNameCache};

fn collect_columns<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

impl Query {
    /// Single-row insert.
    pub fn as_insert<I, S, V>(self, columns: I, values: V) -> ShardqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = Value>,
    {
        self.as_insert_rows(columns, [values.into_iter().collect::<Vec<_>>()])
    }

    /// Multi-row insert; every row must match the column count.
    pub fn as_insert_rows<I, S, R>(mut self, columns: I, rows: R) -> ShardqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Vec<Value>>,
    {
        let columns = collect_columns(columns);
        let rows: Vec<Vec<Value>> = rows.into_iter().collect();
        if columns.is_empty() || rows.is_empty() || rows.iter().any(Vec::is_empty) {
            return Err(ShardqlError::invalid_argument(
                "insert columns and values cannot be empty",
            ));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(ShardqlError::invalid_argument(format!(
                "insert expects {} values per row, got {}",
                columns.len(),
                row.len()
            )));
        }
        self.method = Method::Insert;
        self.clear_component(Component::Insert);
        self.add_component(
            Component::Insert,
            ClauseKind::Insert(InsertClause::Values {
                columns,
                rows,
                returning_id: false,
            }),
        );
        Ok(self)
    }

    /// `INSERT INTO table (columns) SELECT ...`
    pub fn as_insert_query<I, S>(mut self, columns: I, query: Query) -> ShardqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = collect_columns(columns);
        if columns.is_empty() {
            return Err(ShardqlError::invalid_argument("insert columns cannot be empty"));
        }
        if query.method != Method::Select {
            return Err(ShardqlError::invalid_state(
                "insert source must be a select query",
            ));
        }
        self.method = Method::Insert;
        self.clear_component(Component::Insert);
        let query = self.adopt(query);
        self.add_component(
            Component::Insert,
            ClauseKind::Insert(InsertClause::Query { columns, query }),
        );
        Ok(self)
    }

    /// Insert a record using its cached field names.
    pub fn as_insert_record<T: Bindable>(self, record: &T, fields: &FieldNameCache) -> ShardqlResult<Self> {
        let columns = fields.field_names::<T>();
        self.as_insert(columns.iter().cloned(), record.field_values())
    }

    /// Append the dialect's last-insert-id statement after the insert.
    pub fn returning_id(mut self) -> Self {
        for clause in self.clauses.iter_mut() {
            if let ClauseKind::Insert(InsertClause::Values { returning_id, .. }) = &mut clause.kind {
                *returning_id = true;
            }
        }
        self
    }

    pub fn as_update<I, S, V>(mut self, columns: I, values: V) -> ShardqlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = Value>,
    {
        let columns = collect_columns(columns);
        let values: Vec<Value> = values.into_iter().collect();
        if columns.is_empty() || values.is_empty() {
            return Err(ShardqlError::invalid_argument(
                "update columns and values cannot be empty",
            ));
        }
        if columns.len() != values.len() {
            return Err(ShardqlError::invalid_argument(format!(
                "update expects {} values, got {}",
                columns.len(),
                values.len()
            )));
        }
        self.method = Method::Update;
        self.clear_component(Component::Update);
        self.add_component(
            Component::Update,
            ClauseKind::Update(UpdateClause { columns, values }),
        );
        Ok(self)
    }

    pub fn as_update_record<T: Bindable>(self, record: &T, fields: &FieldNameCache) -> ShardqlResult<Self> {
        let columns = fields.field_names::<T>();
        self.as_update(columns.iter().cloned(), record.field_values())
    }

    pub fn as_delete(mut self) -> Self {
        self.method = Method::Delete;
        self
    }

    // ===== Aggregates =====

    pub fn as_aggregate<I, S>(mut self, kind: AggregateKind, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.method = Method::Aggregate;
        self.clear_component(Component::Aggregate);
        self.add_component(
            Component::Aggregate,
            ClauseKind::Aggregate(AggregateClause {
                kind,
                columns: collect_columns(columns),
            }),
        );
        self
    }

    /// `COUNT(*)`, or `COUNT` over the given columns.
    pub fn as_count<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = collect_columns(columns);
        if columns.is_empty() {
            columns.push("*".to_string());
        }
        self.as_aggregate(AggregateKind::Count, columns)
    }

    pub fn as_avg(self, column: impl Into<String>) -> Self {
        self.as_aggregate(AggregateKind::Avg, [column.into()])
    }

    pub fn as_sum(self, column: impl Into<String>) -> Self {
        self.as_aggregate(AggregateKind::Sum, [column.into()])
    }

    pub fn as_max(self, column: impl Into<String>) -> Self {
        self.as_aggregate(AggregateKind::Max, [column.into()])
    }

    pub fn as_min(self, column: impl Into<String>) -> Self {
        self.as_aggregate(AggregateKind::Min, [column.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_count_mismatch() {
        let err = Query::table("t")
            .as_insert(["a", "b"], vec![Value::from(1)])
            .unwrap_err();
        assert!(matches!(err, ShardqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_insert_empty_rejected() {
        let err = Query::table("t")
            .as_insert_rows(["a"], Vec::<Vec<Value>>::new())
            .unwrap_err();
        assert!(matches!(err, ShardqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_update_count_mismatch() {
        let err = Query::table("t")
            .as_update(["a"], vec![Value::from(1), Value::from(2)])
            .unwrap_err();
        assert!(matches!(err, ShardqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_count_defaults_to_star() {
        let q = Query::table("t").as_count(Vec::<String>::new());
        let Some(ClauseKind::Aggregate(agg)) =
            q.get_components(Component::Aggregate, None).next().map(|c| &c.kind)
        else {
            panic!("expected aggregate");
        };
        assert_eq!(agg.columns, vec!["*"]);
        assert_eq!(q.method(), Method::Aggregate);
    }
}
