use crate::{AsBindParam, BindParam, FromColumn, Result, Row};
use std::fmt::Display;

/// A parameterized statement and its results.
///
/// # Lifecycle
/// A statement starts in the building state where parameters are bound by their 0-based
/// placeholder position. `execute` runs it once, after which either the metadata
/// (`inserted_id`, `affected_row_count`) or the row cursor (`next_row`, `get_result`) is
/// available. `reset` returns the statement to the building state with no bindings, so it
/// can run again with a fresh parameter set.
///
/// Methods return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// statement.bind(0, 42)?.bind(1, "hello")?.execute()?;
/// ```
pub trait Statement: Display {
    /// Discard bindings and results, keeping the SQL text.
    fn reset(&mut self) -> Result<&mut Self>;

    /// Bind the parameter at `index` (from 0).
    fn bind(&mut self, index: usize, value: impl AsBindParam) -> Result<&mut Self>;

    fn bind_null(&mut self, index: usize) -> Result<&mut Self> {
        self.bind(index, BindParam::Null)
    }

    fn execute(&mut self) -> Result<&mut Self>;

    /// Identifier generated by the most recent insert on the session, as cached by the last
    /// `execute`. Meaningful only after an insert, never fails.
    fn inserted_id(&self) -> i64;

    fn affected_row_count(&self) -> i64;

    /// Number of columns of the active result, 0 when there is none.
    fn column_count(&self) -> i32;

    fn column_name(&self, column: usize) -> Result<&str>;

    /// Move to the next row of the result. Returns `false` once the rows are exhausted, and
    /// keeps returning `false` afterwards.
    fn next_row(&mut self) -> Result<bool>;

    /// The row the cursor is positioned on.
    fn row(&self) -> Result<&Row>;

    /// Decode `column` of the current row into `value`. Returns `Ok(false)` without touching
    /// `value` when the column is null.
    fn get_result<T: FromColumn>(&self, column: usize, value: &mut T) -> Result<bool> {
        self.row()?.get_result(column, value)
    }

    /// The SQL text, unmodified.
    fn sql(&self) -> &str;

    /// Release the native resources. The statement cannot be used afterwards.
    fn close(&mut self);
}
