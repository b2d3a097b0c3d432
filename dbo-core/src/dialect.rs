use std::fmt::Write;

/// Which temporal column is being declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDateTimeType {
    Date,
    DateTime,
    Time,
}

/// How a backend expresses a result limit and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitQuery {
    /// Trailing `LIMIT n OFFSET m`.
    Limit,
    /// Filtering on `ROWNUM`, rendered by the query builder itself.
    RowsFromTo,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
    OffsetFetch,
    /// No limit support at all.
    NotSupported,
}

/// Backend vocabulary of SQL type names and feature flags.
///
/// Pure lookups, no state. The defaults describe a generic ANSI backend, drivers override
/// what differs.
pub trait SqlDialect {
    fn as_dyn(&self) -> &dyn SqlDialect;

    fn boolean_type(&self) -> &'static str {
        "boolean"
    }

    fn blob_type(&self) -> &'static str {
        "blob"
    }

    fn date_time_type(&self, value: SqlDateTimeType) -> &'static str {
        match value {
            SqlDateTimeType::Date => "date",
            SqlDateTimeType::DateTime => "timestamp",
            SqlDateTimeType::Time => "interval",
        }
    }

    /// True when durations are stored as an integer number of milliseconds because the
    /// backend has no native interval type.
    fn uses_time_as_milliseconds(&self) -> bool {
        false
    }

    fn double_precision_type(&self, _size: usize) -> &'static str {
        "double precision"
    }

    /// Column type of an autoincrement identifier.
    fn autoincrement_type(&self) -> &'static str {
        "integer"
    }

    /// Fragment appended to the autoincrement column declaration.
    fn autoincrement_sql(&self) -> &'static str {
        ""
    }

    fn autoincrement_create_sequence_sql(&self, _table: &str, _id: &str) -> Vec<String> {
        Vec::new()
    }

    fn autoincrement_drop_sequence_sql(&self, _table: &str, _id: &str) -> Vec<String> {
        Vec::new()
    }

    fn autoincrement_insert_infix(&self, _id: &str) -> String {
        String::new()
    }

    fn autoincrement_insert_suffix(&self, _id: &str) -> String {
        String::new()
    }

    fn require_subquery_alias(&self) -> bool {
        false
    }

    fn support_alter_table(&self) -> bool {
        true
    }

    fn limit_query_method(&self) -> LimitQuery {
        LimitQuery::Limit
    }

    /// Emit the limit/offset clause in the flavor of [`SqlDialect::limit_query_method`].
    fn write_limit_offset(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match self.limit_query_method() {
            LimitQuery::Limit => {
                if let Some(limit) = limit {
                    let _ = write!(out, "\nLIMIT {}", limit);
                } else if offset.is_some() {
                    out.push_str("\nLIMIT -1");
                }
                if let Some(offset) = offset {
                    let _ = write!(out, " OFFSET {}", offset);
                }
            }
            LimitQuery::OffsetFetch => {
                if limit.is_none() && offset.is_none() {
                    return;
                }
                let _ = write!(out, "\nOFFSET {} ROWS", offset.unwrap_or(0));
                if let Some(limit) = limit {
                    let _ = write!(out, " FETCH NEXT {} ROWS ONLY", limit);
                }
            }
            LimitQuery::RowsFromTo | LimitQuery::NotSupported => {}
        }
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }
}
