#[cfg(test)]
mod tests {
    use dbo_core::{Connection, Statement};
    use dbo_sqlite::{ConnectionOptions, RowCursor, SqliteConnection};
    use dbo_tests::{init_logs, silent_logs};
    use std::{fs, path::Path, sync::Mutex};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            let error = SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
                .expect_err("Should not be able to open in read only unexisting database");
            assert!(error.is_connection());
            assert!(error.code().is_some());
        }
    }

    #[test]
    fn read_only() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/read_only.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        {
            let connection = SqliteConnection::connect(&format!("sqlite://{}", DB_PATH))
                .expect("Could not create the database");
            connection
                .execute_immediate("create table numbers (value integer)")
                .expect("Could not create the table");
        }
        let connection = SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        silent_logs! {
            let error = connection
                .execute_immediate("insert into numbers values (1)")
                .expect_err("A read only database must reject writes");
            assert!(error.is_statement());
            // SQLITE_READONLY
            assert_eq!(error.code().map(|v| v & 0xff), Some(8));
        }
        drop(connection);
        fs::remove_file(DB_PATH).expect("Failed to remove the test database file");
    }

    #[test]
    fn busy_clone() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/busy.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        let connection =
            SqliteConnection::connect(&format!("sqlite://{}?mode=rwc&busy_timeout=50", DB_PATH))
                .expect("Could not open the database");
        connection
            .execute_immediate("create table t (id integer primary key)")
            .unwrap();
        connection
            .execute_immediate("insert into t values (1), (2)")
            .unwrap();
        let clone = connection.try_clone().expect("Could not clone the connection");
        {
            let mut select = connection.prepare("select id from t").unwrap();
            select.execute().unwrap();
            assert!(select.next_row().unwrap());
            assert!(!select.cursor().is_some_and(RowCursor::is_exhausted));
            silent_logs! {
                let error = clone
                    .execute_immediate("insert into t values (3)")
                    .expect_err("The write must time out while the cursor holds the lock");
                assert!(error.is_statement());
                // SQLITE_BUSY
                assert_eq!(error.code().map(|v| v & 0xff), Some(5));
            }
            assert!(select.next_row().unwrap());
            assert!(!select.next_row().unwrap());
            assert!(select.cursor().is_some_and(RowCursor::is_exhausted));
        }
        clone
            .execute_immediate("insert into t values (3)")
            .expect("The write must succeed once the reader is done");
        drop(clone);
        drop(connection);
        fs::remove_file(DB_PATH).expect("Failed to remove the test database file");
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("duckdb://some_value").is_err());
            assert!(SqliteConnection::connect("sqlite://").is_err());
            assert!(SqliteConnection::connect("sqlite://:memory:?show_queries=maybe").is_err());
            assert!(SqliteConnection::connect("sqlite://:memory:?busy_timeout=-1").is_err());
        };
    }

    #[test]
    fn connection_options() {
        let options = ConnectionOptions::parse("sqlite://:memory:").unwrap();
        assert_eq!(options.path, ":memory:");
        assert!(options.params.is_empty());
        assert!(!options.show_queries);
        assert_eq!(options.busy_timeout, ConnectionOptions::DEFAULT_BUSY_TIMEOUT);
        assert_eq!(options.uri(), "file::memory:");

        let options = ConnectionOptions::parse("sqlite://a.db?busy_timeout=250&mode=ro").unwrap();
        assert_eq!(options.busy_timeout, 250);
        assert_eq!(options.uri(), "file:a.db?mode=ro");

        let options =
            ConnectionOptions::parse("sqlite://data/my%20db.sqlite?mode=rwc&show_queries=true&cache=shared")
                .unwrap();
        assert_eq!(options.path, "data/my db.sqlite");
        assert!(options.show_queries);
        assert_eq!(
            options.params,
            [
                ("mode".to_string(), "rwc".to_string()),
                ("cache".to_string(), "shared".to_string())
            ]
        );
        assert_eq!(options.uri(), "file:data/my db.sqlite?mode=rwc&cache=shared");

        let options = ConnectionOptions::parse("sqlite://what%3F%23.db").unwrap();
        assert_eq!(options.path, "what?#.db");
        assert_eq!(options.uri(), "file:what%3f%23.db");
    }

    #[test]
    fn open_twice() {
        init_logs();
        let mut connection = SqliteConnection::new();
        assert!(!connection.is_open());
        connection
            .open("sqlite://:memory:")
            .expect("Could not open the database");
        assert!(connection.is_open());
        assert_eq!(connection.connection_string(), "sqlite://:memory:");
        silent_logs! {
            let error = connection
                .open("sqlite://:memory:")
                .expect_err("A connection opens only once");
            assert!(error.is_connection());
        }
        assert!(connection.is_open());
    }

    #[test]
    fn unopened() {
        let connection = SqliteConnection::default();
        let error = connection
            .prepare("select 1")
            .map(|_| ())
            .expect_err("An unopened connection cannot prepare");
        assert!(error.is_usage());
        assert!(connection.execute_immediate("select 1").unwrap_err().is_usage());
        assert!(connection.begin_transaction().unwrap_err().is_usage());

        let clone = connection.try_clone().expect("Could not clone");
        assert!(!clone.is_open());
    }

    #[test]
    fn clone_memory() {
        init_logs();
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        connection.set_show_queries(true);
        connection
            .execute_immediate("create table only_here (id integer)")
            .expect("Could not create the table");
        let clone = connection.try_clone().expect("Could not clone the connection");
        assert!(clone.is_open());
        assert!(clone.show_queries());
        assert_eq!(clone.connection_string(), connection.connection_string());
        // Each private in-memory database belongs to its own session
        silent_logs! {
            let error = clone
                .execute_immediate("select * from only_here")
                .expect_err("The clone must not see the tables of the original");
            assert!(error.is_statement());
        }
    }

    #[test]
    fn transaction_flag() {
        init_logs();
        let connection = SqliteConnection::connect("sqlite://:memory:?show_queries=true")
            .expect("Could not open the database");
        assert!(connection.show_queries());
        assert!(!connection.in_transaction());
        connection.begin_transaction().unwrap();
        assert!(connection.in_transaction());
        let clone = connection.try_clone().unwrap();
        assert!(!clone.in_transaction());
        connection.commit().unwrap();
        assert!(!connection.in_transaction());
        connection.begin_transaction().unwrap();
        connection.rollback().unwrap();
        assert!(!connection.in_transaction());
    }

    #[test]
    fn statement_borrows_connection() {
        let connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        let mut first = connection.prepare("values (1)").unwrap();
        let mut second = connection.prepare("values (2)").unwrap();
        first.execute().unwrap();
        second.execute().unwrap();
        let mut value = 0i32;
        assert!(first.next_row().unwrap());
        assert!(second.next_row().unwrap());
        assert!(first.get_result(0, &mut value).unwrap());
        assert_eq!(value, 1);
        assert!(second.get_result(0, &mut value).unwrap());
        assert_eq!(value, 2);
    }
}
