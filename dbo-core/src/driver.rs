use crate::{Connection, Result, SqlDialect};

pub trait Driver {
    type Connection: Connection<Driver = Self>;
    type Dialect: SqlDialect;

    /// Scheme of the connection strings this driver accepts (`<NAME>://...`).
    const NAME: &'static str;

    fn dialect(&self) -> Self::Dialect;

    fn connect(&self, connection_string: &str) -> Result<Self::Connection> {
        Self::Connection::connect(connection_string)
    }
}
