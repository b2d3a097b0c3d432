use anyhow::{Context, Result, ensure};
use dbo_core::{BindParam, Connection, SqlDateTimeType, SqlDialect, Statement};
use indoc::{formatdoc, indoc};
use time::{
    Date, Duration, PrimitiveDateTime,
    macros::{date, datetime},
};

/// Every placeholder receives the value bound at its own index.
pub fn positional<C: Connection>(connection: &mut C) -> Result<()> {
    let mut statement = connection.prepare("select ?, ?, ?, ?, ?")?;
    statement
        .bind(4, "last")?
        .bind(0, 10)?
        .bind(2, 30i64)?
        .bind(1, "second")?
        .bind(3, 4.5)?
        .execute()?;
    ensure!(statement.next_row()?, "Expected one row");
    ensure!(statement.column_count() == 5);
    let mut first = 0i32;
    let mut second = String::new();
    let mut third = 0i64;
    let mut fourth = 0.0f64;
    let mut fifth = String::new();
    ensure!(statement.get_result(0, &mut first)?);
    ensure!(statement.get_result(1, &mut second)?);
    ensure!(statement.get_result(2, &mut third)?);
    ensure!(statement.get_result(3, &mut fourth)?);
    ensure!(statement.get_result(4, &mut fifth)?);
    assert_eq!(first, 10);
    assert_eq!(second, "second");
    assert_eq!(third, 30);
    assert_eq!(fourth, 4.5);
    assert_eq!(fifth, "last");
    ensure!(!statement.next_row()?, "Expected exactly one row");

    // A gap left while binding is a null parameter
    let mut statement = connection.prepare("select ?, ?, ?")?;
    statement.bind(2, 3)?.bind(0, 1)?.execute()?;
    ensure!(statement.next_row()?);
    let mut middle = -1i32;
    ensure!(!statement.get_result(1, &mut middle)?);
    assert_eq!(middle, -1);
    let mut last = 0i32;
    ensure!(statement.get_result(2, &mut last)?);
    assert_eq!(last, 3);
    Ok(())
}

/// Round trip of every bind parameter kind through a table.
pub fn binding<C: Connection>(connection: &mut C) -> Result<()> {
    let dialect = connection.dialect();
    connection.execute_immediate("drop table if exists dbo_binding")?;
    connection
        .execute_immediate(&formatdoc! {"
            create table dbo_binding (
                id integer primary key,
                short_value smallint,
                int_value integer,
                big_value bigint,
                double_value {double},
                flag_value {boolean},
                text_value text,
                blob_value {blob},
                timestamp_value {timestamp},
                date_value {date},
                duration_value {time},
                null_value text,
                missing_value integer
            )",
            double = dialect.double_precision_type(8),
            boolean = dialect.boolean_type(),
            blob = dialect.blob_type(),
            timestamp = dialect.date_time_type(SqlDateTimeType::DateTime),
            date = dialect.date_time_type(SqlDateTimeType::Date),
            time = dialect.date_time_type(SqlDateTimeType::Time),
        })
        .context("Could not create the table dbo_binding")?;

    let timestamp = datetime!(2024-02-29 13:45:30.250);
    let day = date!(1999 - 12 - 31);
    let duration = Duration::milliseconds(90_061_001);
    let blob = vec![0u8, 1, 2, 127, 128, 255];
    let mut insert = connection.prepare(indoc! {"
        insert into dbo_binding (
            short_value, int_value, big_value, double_value, flag_value, text_value,
            blob_value, timestamp_value, date_value, duration_value, null_value, missing_value
        ) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    "})?;
    insert
        .bind(0, -7i16)?
        .bind(1, 2_000_000_000i32)?
        .bind(2, i64::MIN + 1)?
        .bind(3, -1234.5625f64)?
        .bind(4, true)?
        .bind(5, String::from("it's a text"))?
        .bind(6, blob.as_slice())?
        .bind(7, timestamp)?
        .bind(8, day)?
        .bind(9, duration)?
        .bind_null(10)?
        .bind(11, None::<i32>)?
        .execute()
        .context("Could not insert into dbo_binding")?;

    let mut select = connection.prepare(indoc! {"
        select short_value, int_value, big_value, double_value, flag_value, text_value,
               blob_value, timestamp_value, date_value, duration_value, null_value, missing_value
        from dbo_binding
    "})?;
    select.execute()?;
    ensure!(select.next_row()?, "The inserted row was not found");
    ensure!(select.column_count() == 12);
    assert_eq!(select.column_name(0)?, "short_value");
    assert_eq!(select.column_name(11)?, "missing_value");

    let mut short_value = 0i16;
    let mut int_value = 0i32;
    let mut big_value = 0i64;
    let mut double_value = 0.0f64;
    let mut flag_value = false;
    let mut text_value = String::new();
    let mut blob_value = Vec::<u8>::new();
    let mut timestamp_value = PrimitiveDateTime::MIN;
    let mut date_value = Date::MIN;
    let mut duration_value = Duration::ZERO;
    ensure!(select.get_result(0, &mut short_value)?);
    ensure!(select.get_result(1, &mut int_value)?);
    ensure!(select.get_result(2, &mut big_value)?);
    ensure!(select.get_result(3, &mut double_value)?);
    ensure!(select.get_result(4, &mut flag_value)?);
    ensure!(select.get_result(5, &mut text_value)?);
    ensure!(select.get_result(6, &mut blob_value)?);
    ensure!(select.get_result(7, &mut timestamp_value)?);
    ensure!(select.get_result(8, &mut date_value)?);
    ensure!(select.get_result(9, &mut duration_value)?);
    assert_eq!(short_value, -7);
    assert_eq!(int_value, 2_000_000_000);
    assert_eq!(big_value, i64::MIN + 1);
    assert_eq!(double_value, -1234.5625);
    assert!(flag_value);
    assert_eq!(text_value, "it's a text");
    assert_eq!(blob_value, blob);
    assert_eq!(timestamp_value, timestamp);
    assert_eq!(date_value, day);
    assert_eq!(duration_value, duration);

    let mut null_value = String::from("untouched");
    let mut missing_value = 99i32;
    ensure!(!select.get_result(10, &mut null_value)?);
    ensure!(!select.get_result(11, &mut missing_value)?);
    assert_eq!(null_value, "untouched");
    assert_eq!(missing_value, 99);
    ensure!(!select.next_row()?);

    // Narrowing a value that does not fit is a conversion error, the output is kept
    let mut select = connection.prepare("select big_value from dbo_binding")?;
    select.execute()?;
    ensure!(select.next_row()?);
    let mut narrow = 5i32;
    let error = select
        .get_result(0, &mut narrow)
        .expect_err("Narrowing i64::MIN + 1 into i32 must fail");
    ensure!(error.is_conversion(), "Unexpected error: {}", error);
    assert_eq!(narrow, 5);

    // Parameters passed as already built values
    let mut select = connection.prepare("select ?, ?")?;
    select
        .bind(0, BindParam::Text("built".into()))?
        .bind(1, BindParam::Null)?
        .execute()?;
    ensure!(select.next_row()?);
    assert_eq!(select.row()?.get::<String>(0)?.as_deref(), Some("built"));
    assert_eq!(select.row()?.get::<String>(1)?, None);
    Ok(())
}
