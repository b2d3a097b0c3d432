#[cfg(test)]
mod tests {
    use dbo_core::{
        Connection, Driver, LimitQuery, SqlDateTimeType, SqlDialect, Statement,
    };
    use dbo_sqlite::{SqliteConnection, SqliteDriver};
    use dbo_tests::{init_logs, silent_logs};
    use indoc::indoc;
    use time::macros::{date, datetime};

    fn memory() -> SqliteConnection {
        init_logs();
        SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database")
    }

    #[test]
    fn usage_errors() {
        let connection = memory();
        let mut statement = connection.prepare("select 1").unwrap();
        assert!(statement.next_row().unwrap_err().is_usage());
        assert!(statement.row().unwrap_err().is_usage());
        assert_eq!(statement.column_count(), 0);
        statement.execute().unwrap();
        assert!(statement.execute().map(|_| ()).unwrap_err().is_usage());
        assert!(statement.bind(0, 1).map(|_| ()).unwrap_err().is_usage());
        statement.close();
        assert!(statement.is_closed());
        assert!(statement.next_row().unwrap_err().is_usage());
        assert!(statement.bind_null(0).map(|_| ()).unwrap_err().is_usage());
        assert!(statement.execute().map(|_| ()).unwrap_err().is_usage());
        assert_eq!(statement.sql(), "select 1");
    }

    #[test]
    fn native_errors() {
        let connection = memory();
        silent_logs! {
            let mut statement = connection.prepare("selec 1").unwrap();
            let error = statement.execute().map(|_| ()).unwrap_err();
            assert!(error.is_statement());
            // SQLITE_ERROR
            assert_eq!(error.code(), Some(1));
            assert!(error.to_string().contains("selec 1"));

            let mut statement = connection.prepare("select ?").unwrap();
            let error = statement
                .bind(3, 1)
                .unwrap()
                .execute()
                .map(|_| ())
                .expect_err("Index 3 has no placeholder");
            // SQLITE_RANGE
            assert_eq!(error.code(), Some(25));

            connection
                .execute_immediate("create table unique_names (name text unique)")
                .unwrap();
            connection
                .execute_immediate("insert into unique_names values ('a')")
                .unwrap();
            let mut insert = connection.prepare("insert into unique_names values (?)").unwrap();
            let error = insert.bind(0, "a").unwrap().execute().map(|_| ()).unwrap_err();
            // SQLITE_CONSTRAINT_UNIQUE
            assert_eq!(error.code(), Some(2067));
            insert.bind(0, "b").unwrap().execute().unwrap();
            assert_eq!(insert.affected_row_count(), 1);

            let error = connection.prepare("select 'a\0b'").unwrap().execute().map(|_| ()).unwrap_err();
            assert!(error.is_statement());
        }
    }

    #[test]
    fn execute_immediate() {
        let connection = memory();
        connection
            .execute_immediate(indoc! {"
                -- the table
                create table items (id integer primary key, name text);
            "})
            .unwrap();
        silent_logs! {
            let error = connection
                .execute_immediate("insert into items (name) values ('a'); insert into items (name) values ('b')")
                .unwrap_err();
            assert!(error.is_statement());
            assert!(connection.execute_immediate("").unwrap_err().is_statement());
        }
        connection
            .execute_immediate("insert into items (name) values ('c') returning id")
            .unwrap();
        let mut select = connection.prepare("select count(*) from items").unwrap();
        select.execute().unwrap();
        assert!(select.next_row().unwrap());
        assert_eq!(select.row().unwrap().get::<i64>(0).unwrap(), Some(1));
    }

    #[test]
    fn returning_is_drained() {
        let connection = memory();
        connection
            .execute_immediate("create table drained (id integer primary key, name text)")
            .unwrap();
        let mut insert = connection
            .prepare("insert into drained (name) values (?), (?) returning id")
            .unwrap();
        insert.bind(0, "a").unwrap().bind(1, "b").unwrap().execute().unwrap();
        assert_eq!(insert.affected_row_count(), 2);
        assert_eq!(insert.inserted_id(), 2);
        assert_eq!(insert.column_count(), 0);
    }

    #[test]
    fn ddl_affects_no_rows() {
        let connection = memory();
        connection
            .execute_immediate("create table counted (id integer primary key)")
            .unwrap();
        let mut insert = connection
            .prepare("insert into counted values (1), (2), (3)")
            .unwrap();
        insert.execute().unwrap();
        assert_eq!(insert.affected_row_count(), 3);
        let mut create = connection.prepare("create table other (id integer)").unwrap();
        create.execute().unwrap();
        assert_eq!(create.affected_row_count(), 0);
        let mut drop = connection.prepare("drop table counted").unwrap();
        drop.execute().unwrap();
        assert_eq!(drop.affected_row_count(), 0);
    }

    #[test]
    fn temporal_storage() {
        let connection = memory();
        let mut statement = connection.prepare("select ?, ?, typeof(?)").unwrap();
        statement
            .bind(0, datetime!(2023-07-04 09:08:07.006))
            .unwrap()
            .bind(1, date!(2023 - 07 - 04))
            .unwrap()
            .bind(2, time::Duration::seconds(3))
            .unwrap()
            .execute()
            .unwrap();
        assert!(statement.next_row().unwrap());
        let row = statement.row().unwrap();
        assert_eq!(
            row.get::<String>(0).unwrap().as_deref(),
            Some("2023-07-04 09:08:07.006")
        );
        assert_eq!(row.get::<String>(1).unwrap().as_deref(), Some("2023-07-04"));
        assert_eq!(row.get::<String>(2).unwrap().as_deref(), Some("integer"));
    }

    #[test]
    fn display() {
        let connection = memory();
        let statement = connection.prepare("  select 1  \n").unwrap();
        assert_eq!(statement.to_string(), "select 1");
        let long = format!("select '{}'", "x".repeat(1000));
        let statement = connection.prepare(long).unwrap();
        assert!(statement.to_string().ends_with("..."));
    }

    #[test]
    fn dialect() {
        let connection = memory();
        let dialect = connection.dialect();
        assert_eq!(SqliteDriver::NAME, "sqlite");
        assert_eq!(dialect.boolean_type(), "bool");
        assert_eq!(dialect.blob_type(), "blob not null");
        assert_eq!(dialect.date_time_type(SqlDateTimeType::Date), "date");
        assert_eq!(dialect.date_time_type(SqlDateTimeType::Time), "bigint");
        assert_eq!(dialect.date_time_type(SqlDateTimeType::DateTime), "datetime2");
        assert_eq!(dialect.double_precision_type(8), "double");
        assert_eq!(dialect.autoincrement_type(), "autoincrement");
        assert_eq!(dialect.autoincrement_sql(), "");
        assert_eq!(dialect.autoincrement_insert_infix("id"), "");
        assert_eq!(dialect.autoincrement_insert_suffix("id"), "");
        assert!(dialect.autoincrement_create_sequence_sql("t", "id").is_empty());
        assert!(dialect.autoincrement_drop_sequence_sql("t", "id").is_empty());
        assert!(dialect.uses_time_as_milliseconds());
        assert!(dialect.require_subquery_alias());
        assert!(dialect.support_alter_table());
        assert_eq!(dialect.limit_query_method(), LimitQuery::OffsetFetch);
        let _ = SqliteDriver::new().dialect();
    }
}
