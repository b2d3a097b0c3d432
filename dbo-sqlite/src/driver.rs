use crate::{SqliteConnection, SqliteDialect};
use dbo_core::Driver;

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver {}

impl SqliteDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;
    type Dialect = SqliteDialect;

    const NAME: &'static str = "sqlite";

    fn dialect(&self) -> SqliteDialect {
        SqliteDialect {}
    }
}
