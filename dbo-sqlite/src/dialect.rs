use dbo_core::{LimitQuery, SqlDateTimeType, SqlDialect};

/// Type names and feature flags of SQLite.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect {}

impl SqlDialect for SqliteDialect {
    fn as_dyn(&self) -> &dyn SqlDialect {
        self
    }

    fn boolean_type(&self) -> &'static str {
        "bool"
    }

    fn blob_type(&self) -> &'static str {
        "blob not null"
    }

    fn date_time_type(&self, value: SqlDateTimeType) -> &'static str {
        match value {
            SqlDateTimeType::Date => "date",
            SqlDateTimeType::Time => "bigint",
            SqlDateTimeType::DateTime => "datetime2",
        }
    }

    fn uses_time_as_milliseconds(&self) -> bool {
        true
    }

    fn double_precision_type(&self, _size: usize) -> &'static str {
        "double"
    }

    fn autoincrement_type(&self) -> &'static str {
        "autoincrement"
    }

    fn autoincrement_sql(&self) -> &'static str {
        ""
    }

    fn require_subquery_alias(&self) -> bool {
        true
    }

    fn support_alter_table(&self) -> bool {
        true
    }

    fn limit_query_method(&self) -> LimitQuery {
        LimitQuery::OffsetFetch
    }
}
