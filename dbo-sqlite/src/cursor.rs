use crate::{
    CBox, statement_error,
    extract::{extract_name, extract_value},
};
use dbo_core::{Error, FromColumn, Result, Row};
use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_ROW, sqlite3_column_count, sqlite3_db_handle, sqlite3_step,
    sqlite3_stmt,
};
use std::{ffi::c_int, sync::Arc};

/// Forward-only, non-restartable sequence over the rows of an executed query.
///
/// The native statement is stepped once when the cursor is opened, so its initial
/// position is already the first row (or the end, for an empty result). The first
/// [`RowCursor::next_row`] only reports that position, later calls advance first.
#[derive(Debug)]
pub struct RowCursor {
    statement: CBox<sqlite3_stmt>,
    labels: Arc<[String]>,
    row: Option<Row>,
    has_started: bool,
}

impl RowCursor {
    pub(crate) fn open(statement: CBox<sqlite3_stmt>, sql: &str) -> Result<Self> {
        let count = unsafe { sqlite3_column_count(*statement) };
        let labels = (0..count)
            .map(|i| extract_name(*statement, i))
            .collect::<Result<Arc<[_]>>>()?;
        let mut cursor = Self {
            statement,
            labels,
            row: None,
            has_started: false,
        };
        cursor.step(sql)?;
        Ok(cursor)
    }

    /// Step once and copy the row. Any result other than a row or the end, lock timeouts
    /// included, exhausts the cursor.
    fn step(&mut self, sql: &str) -> Result<()> {
        let statement = *self.statement;
        self.row = None;
        match unsafe { sqlite3_step(statement) } {
            SQLITE_ROW => {
                let values = (0..self.labels.len() as c_int)
                    .map(|i| extract_value(statement, i))
                    .collect::<Result<_>>()?;
                self.row = Some(Row::new(self.labels.clone(), values));
                Ok(())
            }
            SQLITE_DONE => Ok(()),
            _ => Err(statement_error(
                unsafe { sqlite3_db_handle(statement) },
                "Cannot fetch the next row",
                sql,
            )),
        }
    }

    /// Advance to the next row, `false` once exhausted. The native statement is not
    /// stepped past its end, which would silently restart it.
    pub fn next_row(&mut self, sql: &str) -> Result<bool> {
        if !self.has_started {
            self.has_started = true;
        } else if self.row.is_some() {
            self.step(sql)?;
        }
        Ok(self.row.is_some())
    }

    pub fn is_exhausted(&self) -> bool {
        self.has_started && self.row.is_none()
    }

    pub fn row(&self) -> Result<&Row> {
        if !self.has_started {
            return Err(Error::usage(
                "The cursor is not positioned on a row yet, call next_row first",
            ));
        }
        self.row
            .as_ref()
            .ok_or_else(|| Error::usage("The cursor is exhausted, there is no current row"))
    }

    pub fn get_result<T: FromColumn>(&self, column: usize, value: &mut T) -> Result<bool> {
        self.row()?.get_result(column, value)
    }

    pub fn column_count(&self) -> i32 {
        self.labels.len() as i32
    }

    pub fn column_name(&self, column: usize) -> Result<&str> {
        self.labels.get(column).map(String::as_str).ok_or_else(|| {
            Error::usage(format!(
                "Column index {} is out of range, the result has {} columns",
                column,
                self.labels.len()
            ))
        })
    }
}
