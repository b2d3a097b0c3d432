use anyhow::{Result, ensure};
use dbo_core::{Connection, Statement};
use indoc::indoc;
use time::{Duration, PrimitiveDateTime, macros::datetime};

pub fn nullability<C: Connection>(connection: &mut C) -> Result<()> {
    connection.execute_immediate("drop table if exists dbo_nullability")?;
    connection.execute_immediate(indoc! {"
        create table dbo_nullability (
            id integer primary key,
            amount integer,
            ratio double,
            comment text,
            payload blob,
            created text
        )
    "})?;
    let mut insert = connection.prepare(indoc! {"
        insert into dbo_nullability (id, amount, ratio, comment, payload, created)
        values (?, ?, ?, ?, ?, ?)
    "})?;
    insert
        .bind(0, 1)?
        .bind(1, None::<i64>)?
        .bind(2, None::<f64>)?
        .bind(3, None::<String>)?
        .bind(4, None::<Vec<u8>>)?
        .bind(5, None::<PrimitiveDateTime>)?
        .execute()?;
    insert
        .reset()?
        .bind(0, 2)?
        .bind(1, Some(0i64))?
        .bind(2, Some(0.0))?
        .bind(3, Some(""))?
        .bind(4, Some(Vec::<u8>::new()))?
        .bind(5, Some(datetime!(2000-01-01 00:00)))?
        .execute()?;

    let mut select = connection.prepare(
        "select amount, ratio, comment, payload, created from dbo_nullability order by id",
    )?;
    select.execute()?;

    // All nulls, nothing is written
    ensure!(select.next_row()?);
    let mut amount = 17i64;
    let mut ratio = 0.5f64;
    let mut comment = String::from("keep");
    let mut payload = vec![9u8];
    let mut created = datetime!(1970-01-01 12:00);
    ensure!(!select.get_result(0, &mut amount)?);
    ensure!(!select.get_result(1, &mut ratio)?);
    ensure!(!select.get_result(2, &mut comment)?);
    ensure!(!select.get_result(3, &mut payload)?);
    ensure!(!select.get_result(4, &mut created)?);
    assert_eq!(amount, 17);
    assert_eq!(ratio, 0.5);
    assert_eq!(comment, "keep");
    assert_eq!(payload, [9]);
    assert_eq!(created, datetime!(1970-01-01 12:00));
    let mut duration = Duration::SECOND;
    ensure!(!select.get_result(0, &mut duration)?);
    assert_eq!(duration, Duration::SECOND);

    // Zero values are not null
    ensure!(select.next_row()?);
    ensure!(select.get_result(0, &mut amount)?);
    ensure!(select.get_result(1, &mut ratio)?);
    ensure!(select.get_result(2, &mut comment)?);
    ensure!(select.get_result(3, &mut payload)?);
    ensure!(select.get_result(4, &mut created)?);
    assert_eq!(amount, 0);
    assert_eq!(ratio, 0.0);
    assert_eq!(comment, "");
    assert!(payload.is_empty());
    assert_eq!(created, datetime!(2000-01-01 00:00));
    ensure!(!select.next_row()?);
    Ok(())
}
