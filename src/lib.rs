//! Statement execution and cursor layer for the Rust data layer.
//!
//! Backends implement [`Driver`], [`Connection`] and [`Statement`], the object mapper
//! talks to them through these traits only.
//!
//! ```rust,ignore
//! let connection = SqliteConnection::connect("sqlite://app.sqlite?mode=rwc")?;
//! let mut statement = connection.prepare("select id, name from users where id = ?")?;
//! statement.bind(0, 1)?.execute()?;
//! while statement.next_row()? {
//!     let mut name = String::new();
//!     statement.get_result(1, &mut name)?;
//! }
//! ```
pub use dbo_core::*;
