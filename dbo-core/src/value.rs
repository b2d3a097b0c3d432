use crate::{Error, FromColumn, Result};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// One cell of the generic row buffer, in the storage classes a native cursor reports.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Box<[u8]>),
}

impl Value {
    /// The per-column null indicator.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(..) => "INTEGER",
            Value::Real(..) => "REAL",
            Value::Text(..) => "TEXT",
            Value::Blob(..) => "BLOB",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "'{}'", v),
            Value::Blob(v) => write!(f, "<blob {} bytes>", v.len()),
        }
    }
}

/// The current row of a cursor: column labels shared across rows plus the decoded cells.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Row {
    pub labels: Arc<[String]>,
    pub values: Box<[Value]>,
}

impl Row {
    pub fn new(labels: Arc<[String]>, values: Box<[Value]>) -> Self {
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, column: usize) -> Result<&Value> {
        self.values.get(column).ok_or_else(|| {
            Error::usage(format!(
                "Column index {} is out of range, the row has {} columns",
                column,
                self.values.len()
            ))
        })
    }

    /// Decode `column` into `value`.
    ///
    /// Returns `Ok(false)` when the column is null, leaving `value` untouched. A decoding
    /// failure also leaves `value` untouched.
    pub fn get_result<T: FromColumn>(&self, column: usize, value: &mut T) -> Result<bool> {
        let cell = self.value(column)?;
        if cell.is_null() {
            return Ok(false);
        }
        *value = T::from_column(cell)?;
        Ok(true)
    }

    /// Decode `column`, `None` when it is null.
    pub fn get<T: FromColumn>(&self, column: usize) -> Result<Option<T>> {
        let cell = self.value(column)?;
        if cell.is_null() {
            return Ok(None);
        }
        T::from_column(cell).map(Some)
    }
}
