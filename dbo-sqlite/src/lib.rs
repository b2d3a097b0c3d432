mod bind;
mod cbox;
mod connection;
mod cursor;
mod dialect;
mod driver;
mod extract;
mod statement;

use dbo_core::Error;
use libsqlite3_sys::{sqlite3, sqlite3_errmsg, sqlite3_errstr, sqlite3_extended_errcode};
use std::{
    ffi::{CStr, c_char, c_int},
    ptr,
};

pub(crate) use cbox::*;
pub use connection::*;
pub use cursor::*;
pub use dialect::*;
pub use driver::*;
pub use statement::*;

pub(crate) fn error_message_from_ptr<'a>(ptr: &'a *const c_char) -> &'a str {
    unsafe {
        if *ptr != ptr::null() {
            CStr::from_ptr(*ptr)
                .to_str()
                .unwrap_or("Unknown error (the error message was not a valid C string)")
        } else {
            "Unknown error (could not extract the error message)"
        }
    }
}

/// Statement error built from the last failure recorded on `connection`.
pub(crate) fn statement_error(connection: *mut sqlite3, context: &str, sql: &str) -> Error {
    let (message, code) = unsafe {
        (
            error_message_from_ptr(&sqlite3_errmsg(connection)).to_string(),
            sqlite3_extended_errcode(connection),
        )
    };
    let message = if context.is_empty() {
        message
    } else {
        format!("{}: {}", context, message)
    };
    let error = Error::statement(message, Some(code), sql);
    log::error!("{}", error);
    error
}

/// Error message for a result code when no connection handle is available.
pub(crate) fn result_code_message(rc: c_int) -> String {
    unsafe { error_message_from_ptr(&sqlite3_errstr(rc)).to_string() }
}
