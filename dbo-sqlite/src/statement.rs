use crate::{CBox, RowCursor, SqliteConnection, bind::bind_param, statement_error};
use dbo_core::{
    AsBindParam, BindParam, Error, FromColumn, Result, Row, Statement, is_row_producing,
    skip_leading_trivia, truncate_long,
};
use libsqlite3_sys::*;
use std::{
    collections::BTreeMap,
    ffi::{CString, c_char, c_int},
    fmt::{self, Display},
    mem, ptr,
};

#[derive(Debug, Default)]
enum State {
    #[default]
    Building,
    NonQuery,
    Cursor(RowCursor),
    Closed,
}

impl State {
    fn no_rows(&self) -> Error {
        let error = Error::usage(match self {
            State::Building => "The statement was not executed yet",
            State::NonQuery => "The statement did not produce rows",
            State::Closed => "The statement is closed",
            State::Cursor(..) => "The statement has an open cursor",
        });
        log::error!("{}", error);
        error
    }
}

/// A prepared statement of a [`SqliteConnection`].
///
/// Parameters are accumulated as owned [`BindParam`] values keyed by index and attached to
/// the native statement only when [`Statement::execute`] runs. Placeholders left unbound
/// are null. The native statement lives as long as
/// the row cursor of the last execution, it is finalized on `reset`, `close` or drop.
#[derive(Debug)]
pub struct SqliteStatement<'c> {
    connection: &'c SqliteConnection,
    sql: String,
    bindings: BTreeMap<usize, BindParam>,
    state: State,
    last_inserted_id: i64,
    affected_rows: i64,
}

impl<'c> SqliteStatement<'c> {
    pub(crate) fn new(connection: &'c SqliteConnection, sql: String) -> Self {
        log::trace!("Statement created: {}", truncate_long!(sql));
        Self {
            connection,
            sql,
            bindings: BTreeMap::new(),
            state: State::Building,
            last_inserted_id: -1,
            affected_rows: 0,
        }
    }

    /// Parameters bound so far, by placeholder index.
    pub fn bindings(&self) -> &BTreeMap<usize, BindParam> {
        &self.bindings
    }

    pub fn is_executed(&self) -> bool {
        matches!(self.state, State::NonQuery | State::Cursor(..))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    pub fn cursor(&self) -> Option<&RowCursor> {
        match &self.state {
            State::Cursor(cursor) => Some(cursor),
            _ => None,
        }
    }

    fn ensure_building(&self, action: &str) -> Result<()> {
        let error = match self.state {
            State::Building => return Ok(()),
            State::Closed => Error::usage(format!("Cannot {} a closed statement", action)),
            State::NonQuery | State::Cursor(..) => Error::usage(format!(
                "Cannot {} a statement that was already executed, call reset first",
                action
            )),
        };
        log::error!("{}", error);
        Err(error)
    }

    fn active_cursor(&self) -> Result<&RowCursor> {
        match &self.state {
            State::Cursor(cursor) => Ok(cursor),
            state => Err(state.no_rows()),
        }
    }

    fn run(&mut self, bindings: &BTreeMap<usize, BindParam>) -> Result<State> {
        let connection = self.connection.handle()?;
        let row_producing = is_row_producing(&self.sql);
        if self.connection.show_queries() {
            log::info!("{}", self.sql);
        }
        let statement = prepare(connection, &self.sql)?;
        for (index, value) in bindings {
            bind_param(*statement, *index, value, &self.sql)?;
        }
        // The per-statement change count ignores DDL, the session total does not lag behind.
        let changes_before = unsafe { sqlite3_total_changes64(connection) };
        let state = if row_producing {
            State::Cursor(RowCursor::open(statement, &self.sql)?)
        } else {
            step_to_completion(&statement, &self.sql)?;
            State::NonQuery
        };
        unsafe {
            self.last_inserted_id = sqlite3_last_insert_rowid(connection);
            self.affected_rows = sqlite3_total_changes64(connection) - changes_before;
        }
        Ok(state)
    }
}

impl Statement for SqliteStatement<'_> {
    fn reset(&mut self) -> Result<&mut Self> {
        if self.is_closed() {
            let error = Error::usage("Cannot reset a closed statement");
            log::error!("{}", error);
            return Err(error);
        }
        self.state = State::Building;
        self.bindings.clear();
        Ok(self)
    }

    fn bind(&mut self, index: usize, value: impl AsBindParam) -> Result<&mut Self> {
        self.ensure_building("bind parameters of")?;
        self.bindings.insert(index, value.as_bind_param());
        Ok(self)
    }

    fn execute(&mut self) -> Result<&mut Self> {
        self.ensure_building("execute")?;
        // Payloads are released on every exit path, the native layer keeps its own copies.
        let bindings = mem::take(&mut self.bindings);
        self.state = self.run(&bindings)?;
        Ok(self)
    }

    fn inserted_id(&self) -> i64 {
        self.last_inserted_id
    }

    fn affected_row_count(&self) -> i64 {
        self.affected_rows
    }

    fn column_count(&self) -> i32 {
        self.cursor().map_or(0, RowCursor::column_count)
    }

    fn column_name(&self, column: usize) -> Result<&str> {
        self.active_cursor()?.column_name(column)
    }

    fn next_row(&mut self) -> Result<bool> {
        match &mut self.state {
            State::Cursor(cursor) => cursor.next_row(&self.sql),
            state => Err(state.no_rows()),
        }
    }

    fn row(&self) -> Result<&Row> {
        self.active_cursor()?.row()
    }

    fn get_result<T: FromColumn>(&self, column: usize, value: &mut T) -> Result<bool> {
        self.active_cursor()?.get_result(column, value)
    }

    fn sql(&self) -> &str {
        &self.sql
    }

    fn close(&mut self) {
        if !self.is_closed() {
            log::trace!("Statement closed: {}", truncate_long!(self.sql));
        }
        self.state = State::Closed;
        self.bindings.clear();
    }
}

impl Display for SqliteStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql).to_string().trim())
    }
}

/// Compile exactly one statement from `sql`.
pub(crate) fn prepare(connection: *mut sqlite3, sql: &str) -> Result<CBox<sqlite3_stmt>> {
    let query = CString::new(sql.as_bytes()).map_err(|e| {
        let error = Error::statement(
            format!("The query contains a nul byte at position {}", e.nul_position()),
            Some(SQLITE_MISUSE),
            sql,
        );
        log::error!("{}", error);
        error
    })?;
    let len = c_int::try_from(sql.len())
        .map_err(|_| Error::statement("The query is too long", Some(SQLITE_TOOBIG), sql))?;
    let mut statement = CBox::null(|p| unsafe {
        sqlite3_finalize(p);
    });
    let mut tail: *const c_char = ptr::null();
    let rc = unsafe {
        sqlite3_prepare_v2(connection, query.as_ptr(), len, &mut *statement, &mut tail)
    };
    if rc != SQLITE_OK {
        return Err(statement_error(connection, "Cannot prepare the query", sql));
    }
    if statement.is_null() {
        let error = Error::statement("The query does not contain a statement", None, sql);
        log::error!("{}", error);
        return Err(error);
    }
    if !tail.is_null() {
        let consumed = tail as usize - query.as_ptr() as usize;
        if !skip_leading_trivia(sql.get(consumed..).unwrap_or_default()).is_empty() {
            let error = Error::statement(
                "Cannot prepare more than one statement at a time",
                Some(SQLITE_MISUSE),
                sql,
            );
            log::error!("{}", error);
            return Err(error);
        }
    }
    log::trace!("Prepared {:p}: {}", *statement, truncate_long!(sql));
    Ok(statement)
}

/// Step a statement until it is done, discarding any row it returns.
pub(crate) fn step_to_completion(statement: &CBox<sqlite3_stmt>, sql: &str) -> Result<()> {
    let mut discarded = 0usize;
    loop {
        match unsafe { sqlite3_step(**statement) } {
            SQLITE_ROW => {
                discarded += 1;
            }
            SQLITE_DONE => {
                break;
            }
            _ => {
                return Err(statement_error(
                    unsafe { sqlite3_db_handle(**statement) },
                    "Cannot execute the query",
                    sql,
                ));
            }
        }
    }
    if discarded > 0 {
        log::warn!(
            "Discarded {} rows returned by a statement that is not a query: {}",
            discarded,
            truncate_long!(sql)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::SqliteConnection;
    use dbo_core::{BindParam, Connection, Statement};

    #[test]
    fn bind_places_values_by_index() {
        let connection = SqliteConnection::connect("sqlite://:memory:").unwrap();
        let mut statement = connection.prepare("select ?, ?, ?, ?").unwrap();
        statement.bind(2, 30).unwrap().bind(0, "a").unwrap();
        assert_eq!(
            statement.bindings().iter().collect::<Vec<_>>(),
            [(&0, &BindParam::Text("a".into())), (&2, &BindParam::Int32(30))]
        );
        statement.bind(0, 1i64).unwrap();
        assert_eq!(statement.bindings()[&0], BindParam::Int64(1));
        statement.execute().unwrap();
        assert!(statement.bindings().is_empty());
        assert!(statement.is_executed());
    }

    #[test]
    fn failed_execute_returns_to_building() {
        let connection = SqliteConnection::connect("sqlite://:memory:").unwrap();
        let mut statement = connection.prepare("select * from missing where id = ?").unwrap();
        statement.bind(0, 1).unwrap();
        let error = statement.execute().unwrap_err();
        assert!(error.is_statement());
        assert!(!statement.is_executed());
        assert!(statement.bindings().is_empty());
        statement.bind(0, 2).unwrap();
    }

    #[test]
    fn huge_index_fails_at_execute() {
        let connection = SqliteConnection::connect("sqlite://:memory:").unwrap();
        let mut statement = connection.prepare("select ?").unwrap();
        for index in [usize::MAX, 1 << 40, 5] {
            statement.bind(index, 1).unwrap();
            assert_eq!(statement.bindings().len(), 1);
            let error = statement.execute().unwrap_err();
            assert!(error.is_statement());
            // SQLITE_RANGE
            assert_eq!(error.code(), Some(25));
            assert!(statement.bindings().is_empty());
        }
    }
}
