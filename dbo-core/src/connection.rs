use crate::{Driver, Result, Statement};

/// A session with the database, owning exactly one native handle.
///
/// A connection is either unopened or opened exactly once. Statements borrow the
/// connection that prepared them and cannot outlive it.
pub trait Connection: Sized {
    type Driver: Driver<Connection = Self>;
    type Statement<'c>: Statement
    where
        Self: 'c;

    fn driver(&self) -> &Self::Driver;

    /// Create a connection and open it with `connection_string`.
    fn connect(connection_string: &str) -> Result<Self>;

    /// Open the session. Fails if it is already open or the native open fails.
    fn open(&mut self, connection_string: &str) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Open an independent session using the same connection string.
    ///
    /// Nothing is shared with `self`: statements and transaction state of one clone are
    /// never observable from the other.
    fn try_clone(&self) -> Result<Self>;

    /// Run SQL without parameters directly against the session, blocking until done.
    fn execute_immediate(&self, sql: &str) -> Result<()>;

    fn begin_transaction(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;

    /// Create a statement for `sql` with no parameters bound yet.
    fn prepare(&self, sql: impl Into<String>) -> Result<Self::Statement<'_>>;

    fn dialect(&self) -> <Self::Driver as Driver>::Dialect {
        self.driver().dialect()
    }
}
