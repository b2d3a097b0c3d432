use crate::{
    CBox, SqliteDriver, SqliteStatement, result_code_message,
    statement::{prepare, step_to_completion},
};
use dbo_core::{Connection, Driver, Error, Result, truncate_long};
use libsqlite3_sys::{
    SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI, SQLITE_TRACE_STMT,
    sqlite3, sqlite3_busy_timeout, sqlite3_close, sqlite3_errmsg, sqlite3_extended_errcode,
    sqlite3_extended_result_codes, sqlite3_open_v2, sqlite3_trace_v2,
};
use std::{
    cell::Cell,
    ffi::{CStr, CString, c_char, c_int, c_uint, c_void},
    fmt, ptr,
};
use url::form_urlencoded;

/// Settings carried by the connection string, `sqlite://<path>[?<params>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Database file, `:memory:` for a private in-memory database.
    pub path: String,
    /// Parameters forwarded to SQLite as URI parameters (`mode`, `cache`, ...).
    pub params: Vec<(String, String)>,
    /// Log every statement and transaction boundary at info level.
    pub show_queries: bool,
    /// Milliseconds a statement waits for a lock held by another session before failing
    /// with `SQLITE_BUSY`.
    pub busy_timeout: u32,
}

impl ConnectionOptions {
    pub const DEFAULT_BUSY_TIMEOUT: u32 = 5000;

    pub fn parse(connection_string: &str) -> Result<Self> {
        let prefix = format!("{}://", SqliteDriver::NAME);
        let Some(rest) = connection_string.strip_prefix(&prefix) else {
            let error = Error::connection(
                format!(
                    "Expected the connection string to start with `{}`, found `{}`",
                    prefix,
                    truncate_long!(connection_string).to_string().trim_end()
                ),
                None,
            );
            log::error!("{}", error);
            return Err(error);
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let path = urlencoding::decode(path).map_err(|e| {
            let error = Error::connection(format!("Invalid path in connection string: {}", e), None);
            log::error!("{}", error);
            error
        })?;
        if path.is_empty() {
            let error = Error::connection("The connection string does not name a database", None);
            log::error!("{}", error);
            return Err(error);
        }
        let mut show_queries = false;
        let mut busy_timeout = Self::DEFAULT_BUSY_TIMEOUT;
        let mut params = Vec::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == "show_queries" {
                show_queries = match &*value {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => {
                        let error = Error::connection(
                            format!("Invalid value `{}` for show_queries", value),
                            None,
                        );
                        log::error!("{}", error);
                        return Err(error);
                    }
                };
            } else if key == "busy_timeout" {
                busy_timeout = value.parse::<u32>().map_err(|_| {
                    let error = Error::connection(
                        format!("Invalid value `{}` for busy_timeout, expected milliseconds", value),
                        None,
                    );
                    log::error!("{}", error);
                    error
                })?;
            } else {
                params.push((key.into_owned(), value.into_owned()));
            }
        }
        Ok(Self {
            path: path.into_owned(),
            params,
            show_queries,
            busy_timeout,
        })
    }

    /// The `file:` URI handed to the native open call.
    pub fn uri(&self) -> String {
        let mut uri = String::from("file:");
        for c in self.path.chars() {
            match c {
                '%' => uri.push_str("%25"),
                '?' => uri.push_str("%3f"),
                '#' => uri.push_str("%23"),
                c => uri.push(c),
            }
        }
        if !self.params.is_empty() {
            uri.push('?');
            uri.push_str(
                &form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&self.params)
                    .finish(),
            );
        }
        uri
    }
}

unsafe extern "C" fn trace_statement(
    event: c_uint,
    _context: *mut c_void,
    _statement: *mut c_void,
    sql: *mut c_void,
) -> c_int {
    if event == SQLITE_TRACE_STMT as c_uint && !sql.is_null() {
        let sql = unsafe { CStr::from_ptr(sql as *const c_char) }.to_string_lossy();
        log::trace!(target: "dbo_sqlite::native", "{}", truncate_long!(sql).to_string().trim_end());
    }
    0
}

fn open_session(options: &ConnectionOptions) -> Result<CBox<sqlite3>> {
    let uri = CString::new(options.uri()).map_err(|_| {
        let error = Error::connection("The connection string contains a nul byte", None);
        log::error!("{}", error);
        error
    })?;
    // The native open allocates a handle even when it fails, the guard closes it.
    let mut connection = CBox::null(|p| unsafe {
        sqlite3_close(p);
    });
    let rc = unsafe {
        sqlite3_open_v2(
            uri.as_ptr(),
            &mut *connection,
            SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
            ptr::null(),
        )
    };
    if rc != SQLITE_OK {
        let (message, code) = if connection.is_null() {
            (result_code_message(rc), rc)
        } else {
            unsafe {
                (
                    crate::error_message_from_ptr(&sqlite3_errmsg(*connection)).to_string(),
                    sqlite3_extended_errcode(*connection),
                )
            }
        };
        let error = Error::connection(
            format!("Cannot open `{}`: {}", options.path, message),
            Some(code),
        );
        log::error!("{}", error);
        return Err(error);
    }
    unsafe {
        sqlite3_extended_result_codes(*connection, 1);
        sqlite3_busy_timeout(
            *connection,
            c_int::try_from(options.busy_timeout).unwrap_or(c_int::MAX),
        );
        sqlite3_trace_v2(
            *connection,
            SQLITE_TRACE_STMT as c_uint,
            Some(trace_statement),
            ptr::null_mut(),
        );
    }
    log::debug!("Opened session {:p} on `{}`", *connection, options.path);
    Ok(connection)
}

/// A session on a SQLite database, owning the native handle.
///
/// The native session runs in autocommit mode: the transaction methods only record and
/// report the boundaries requested by the layer above.
pub struct SqliteConnection {
    pub(crate) connection: Option<CBox<sqlite3>>,
    pub(crate) connection_string: String,
    pub(crate) show_queries: bool,
    pub(crate) transaction: Cell<bool>,
}

impl SqliteConnection {
    /// An unopened connection.
    pub const fn new() -> Self {
        Self {
            connection: None,
            connection_string: String::new(),
            show_queries: false,
            transaction: Cell::new(false),
        }
    }

    pub(crate) fn handle(&self) -> Result<*mut sqlite3> {
        self.connection.as_ref().map(|v| **v).ok_or_else(|| {
            let error = Error::usage("The connection is not open");
            log::error!("{}", error);
            error
        })
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn show_queries(&self) -> bool {
        self.show_queries
    }

    pub fn set_show_queries(&mut self, value: bool) {
        self.show_queries = value;
    }

    /// Whether `begin_transaction` was called without a matching commit or rollback.
    pub fn in_transaction(&self) -> bool {
        self.transaction.get()
    }

    fn log_transaction(&self, message: &str) {
        if self.show_queries {
            log::info!("{}", message);
        } else {
            log::trace!("{}", message);
        }
    }
}

impl Default for SqliteConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("connection", &self.connection.as_ref().map(|v| **v))
            .field("connection_string", &self.connection_string)
            .field("show_queries", &self.show_queries)
            .field("transaction", &self.transaction.get())
            .finish()
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let Some(connection) = &self.connection {
            log::debug!("Closing session {:p}", **connection);
        }
    }
}

impl Connection for SqliteConnection {
    type Driver = SqliteDriver;
    type Statement<'c> = SqliteStatement<'c>;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    fn connect(connection_string: &str) -> Result<Self> {
        let mut connection = Self::new();
        connection.open(connection_string)?;
        Ok(connection)
    }

    fn open(&mut self, connection_string: &str) -> Result<()> {
        if self.connection.is_some() {
            let error = Error::connection("Can't connect: already connected", None);
            log::error!("{}", error);
            return Err(error);
        }
        let options = ConnectionOptions::parse(connection_string)?;
        let connection = open_session(&options)?;
        self.connection = Some(connection);
        self.connection_string = connection_string.to_string();
        self.show_queries = options.show_queries;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn try_clone(&self) -> Result<Self> {
        let mut result = Self::new();
        if self.is_open() {
            result.open(&self.connection_string)?;
        }
        result.show_queries = self.show_queries;
        Ok(result)
    }

    fn execute_immediate(&self, sql: &str) -> Result<()> {
        let connection = self.handle()?;
        if self.show_queries {
            log::info!("{}", sql);
        }
        let statement = prepare(connection, sql)?;
        step_to_completion(&statement, sql)
    }

    fn begin_transaction(&self) -> Result<()> {
        self.handle()?;
        self.transaction.set(true);
        self.log_transaction("begin transaction -- implicit");
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.handle()?;
        if !self.transaction.replace(false) {
            log::warn!("Commit requested without a transaction in progress");
        }
        self.log_transaction("commit transaction -- autocommit");
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.handle()?;
        if !self.transaction.replace(false) {
            log::warn!("Rollback requested without a transaction in progress");
        }
        self.log_transaction("rollback transaction -- autocommit, nothing to undo");
        Ok(())
    }

    fn prepare(&self, sql: impl Into<String>) -> Result<SqliteStatement<'_>> {
        self.handle()?;
        Ok(SqliteStatement::new(self, sql.into()))
    }
}
