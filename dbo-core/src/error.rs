use std::fmt::{self, Display};
use thiserror::Error;

/// Failure kinds surfaced by a backend.
///
/// The set is closed: drivers map every native failure onto one of these variants,
/// carrying the native diagnostic text and, when the backend exposes one, its result code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Opening a session failed, or the connection was already open.
    #[error("Connection error: {message}{}", Code(.code))]
    Connection { message: String, code: Option<i32> },

    /// The native layer rejected a prepare, bind or execute step.
    #[error("Statement error: {message}{}{}", Code(.code), Sql(.sql))]
    Statement {
        message: String,
        code: Option<i32>,
        sql: String,
    },

    /// The caller used a connection or statement outside its valid state.
    #[error("Usage error: {0}")]
    Usage(String),

    /// A column value could not be decoded into the requested type.
    #[error("Conversion error: {0}")]
    Conversion(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn connection(message: impl Into<String>, code: Option<i32>) -> Self {
        Error::Connection {
            message: message.into(),
            code,
        }
    }

    pub fn statement(message: impl Into<String>, code: Option<i32>, sql: impl Into<String>) -> Self {
        Error::Statement {
            message: message.into(),
            code,
            sql: sql.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Error::Conversion(message.into())
    }

    /// Backend result code, if the native layer reported one.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Connection { code, .. } | Error::Statement { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    pub fn is_statement(&self) -> bool {
        matches!(self, Error::Statement { .. })
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(..))
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Conversion(..))
    }
}

struct Code<'a>(&'a Option<i32>);

impl Display for Code<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, " (code {})", code),
            None => Ok(()),
        }
    }
}

struct Sql<'a>(&'a str);

impl Display for Sql<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, "\nWhile executing:\n{}", crate::truncate_long!(self.0))
    }
}
