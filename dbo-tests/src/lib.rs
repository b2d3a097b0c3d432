mod binding;
#[cfg(not(feature = "disable-clone"))]
mod clone;
mod cursor;
mod examples;
#[cfg(not(feature = "disable-metadata"))]
mod metadata;
mod nullability;
mod reset;
mod transaction;

use crate::{
    binding::{binding, positional},
    cursor::{cursor, empty_cursor},
    examples::{insert_example, select_example},
    nullability::nullability,
    reset::reset,
    transaction::transaction,
};
#[cfg(not(feature = "disable-clone"))]
use clone::clone;
use dbo_core::Connection;
use log::LevelFilter;
#[cfg(not(feature = "disable-metadata"))]
use metadata::metadata;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every scenario against `connection`.
///
/// The connection must be open on a database that persists across sessions (a file),
/// the clone scenario opens a second session and expects to see the same tables.
pub fn execute_tests<C: Connection>(mut connection: C) {
    positional(&mut connection).expect("Positional binding test did not succeed");
    binding(&mut connection).expect("Binding test did not succeed");
    cursor(&mut connection).expect("Cursor test did not succeed");
    empty_cursor(&mut connection).expect("Empty cursor test did not succeed");
    nullability(&mut connection).expect("Nullability test did not succeed");
    #[cfg(not(feature = "disable-metadata"))]
    metadata(&mut connection).expect("Metadata test did not succeed");
    reset(&mut connection).expect("Reset test did not succeed");
    transaction(&mut connection).expect("Transaction test did not succeed");
    #[cfg(not(feature = "disable-clone"))]
    clone(&mut connection).expect("Clone test did not succeed");
    select_example(&mut connection).expect("Select example test did not succeed");
    insert_example(&mut connection).expect("Insert example test did not succeed");
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
