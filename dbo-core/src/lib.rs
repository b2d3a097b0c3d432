mod bind_param;
mod connection;
mod datetime;
mod dialect;
mod driver;
mod error;
mod from_column;
mod statement;
mod util;
mod value;

pub use bind_param::*;
pub use connection::*;
pub use datetime::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use from_column::*;
pub use statement::*;
pub use util::*;
pub use value::*;
