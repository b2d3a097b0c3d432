use crate::statement_error;
use dbo_core::{BindParam, Error, Result, format_date, format_timestamp};
use libsqlite3_sys::*;
use std::ffi::{c_char, c_int, c_void};

fn payload_len(len: usize, index: usize, sql: &str) -> Result<c_int> {
    c_int::try_from(len).map_err(|_| {
        let error = Error::statement(
            format!("Parameter {} is too large ({} bytes)", index, len),
            Some(SQLITE_TOOBIG),
            sql,
        );
        log::error!("{}", error);
        error
    })
}

unsafe fn bind_text(statement: *mut sqlite3_stmt, slot: c_int, value: &str, len: c_int) -> c_int {
    unsafe {
        sqlite3_bind_text(
            statement,
            slot,
            value.as_ptr() as *const c_char,
            len,
            SQLITE_TRANSIENT(),
        )
    }
}

/// Attach the parameter at the 0-based `index` to its native input slot.
///
/// Text and blob payloads are copied by the native layer, the caller may drop `value` as
/// soon as this returns.
pub(crate) fn bind_param(
    statement: *mut sqlite3_stmt,
    index: usize,
    value: &BindParam,
    sql: &str,
) -> Result<()> {
    let slot = index
        .checked_add(1)
        .and_then(|v| c_int::try_from(v).ok())
        .ok_or_else(|| {
            let error = Error::statement(
                format!("Parameter index {} is out of range", index),
                Some(SQLITE_RANGE),
                sql,
            );
            log::error!("{}", error);
            error
        })?;
    let rc = unsafe {
        match value {
            BindParam::Null => sqlite3_bind_null(statement, slot),
            BindParam::Short(v) => sqlite3_bind_int(statement, slot, *v as c_int),
            BindParam::Int32(v) => sqlite3_bind_int(statement, slot, *v as c_int),
            BindParam::Int64(v) => sqlite3_bind_int64(statement, slot, *v),
            BindParam::Double(v) => sqlite3_bind_double(statement, slot, *v),
            BindParam::Text(v) => {
                bind_text(statement, slot, v, payload_len(v.len(), index, sql)?)
            }
            BindParam::Blob(v) => sqlite3_bind_blob(
                statement,
                slot,
                v.as_ptr() as *const c_void,
                payload_len(v.len(), index, sql)?,
                SQLITE_TRANSIENT(),
            ),
            BindParam::Timestamp(v) => {
                let v = format_timestamp(v).inspect_err(|e| log::error!("{}", e))?;
                bind_text(statement, slot, &v, v.len() as c_int)
            }
            BindParam::Date(v) => {
                let v = format_date(v).inspect_err(|e| log::error!("{}", e))?;
                bind_text(statement, slot, &v, v.len() as c_int)
            }
            BindParam::Duration(v) => {
                let millis = i64::try_from(v.whole_milliseconds()).map_err(|_| {
                    let error = Error::conversion(format!(
                        "Duration {} does not fit in 64 bit milliseconds",
                        v
                    ));
                    log::error!("{}", error);
                    error
                })?;
                sqlite3_bind_int64(statement, slot, millis)
            }
        }
    };
    if rc != SQLITE_OK {
        return Err(statement_error(
            unsafe { sqlite3_db_handle(statement) },
            &format!("Cannot bind parameter {} ({})", index, value.kind()),
            sql,
        ));
    }
    log::trace!("Bound parameter {} = {}", index, value);
    Ok(())
}
