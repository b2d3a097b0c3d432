use crate::silent_logs;
use anyhow::{Context, Result, ensure};
use dbo_core::{Connection, Statement};
use indoc::indoc;

const ROWS: i32 = 5;

pub fn cursor<C: Connection>(connection: &mut C) -> Result<()> {
    connection.execute_immediate("drop table if exists dbo_cursor")?;
    connection.execute_immediate(indoc! {"
        create table dbo_cursor (
            id integer primary key,
            label text not null
        )
    "})?;
    let mut insert = connection.prepare("insert into dbo_cursor (id, label) values (?, ?)")?;
    for i in 0..ROWS {
        insert
            .reset()?
            .bind(0, i)?
            .bind(1, format!("row {}", i))?
            .execute()
            .with_context(|| format!("Could not insert row {}", i))?;
    }

    let mut select = connection.prepare("select id, label from dbo_cursor order by id")?;
    select.execute()?;
    ensure!(select.column_count() == 2);
    assert_eq!(select.column_name(0)?, "id");
    assert_eq!(select.column_name(1)?, "label");
    silent_logs! {
        let error = select.row().expect_err("Reading before next_row must fail");
        assert!(error.is_usage(), "Unexpected error: {}", error);
    }
    let mut count = 0i32;
    while select.next_row()? {
        let mut id = -1i32;
        let mut label = String::new();
        ensure!(select.get_result(0, &mut id)?);
        ensure!(select.get_result(1, &mut label)?);
        assert_eq!(id, count);
        assert_eq!(label, format!("row {}", count));
        count += 1;
    }
    assert_eq!(count, ROWS);
    // Exhaustion is stable
    ensure!(!select.next_row()?);
    ensure!(!select.next_row()?);
    silent_logs! {
        let mut id = 42i32;
        let error = select.get_result(0, &mut id).expect_err("Reading after exhaustion must fail");
        assert!(error.is_usage(), "Unexpected error: {}", error);
        assert_eq!(id, 42);
    }

    // Column index outside the result
    let mut select = connection.prepare("select label from dbo_cursor where id = ?")?;
    select.bind(0, 3)?.execute()?;
    ensure!(select.next_row()?);
    silent_logs! {
        let mut label = String::new();
        let error = select.get_result(1, &mut label).expect_err("Column 1 does not exist");
        assert!(error.is_usage(), "Unexpected error: {}", error);
        assert!(select.column_name(1).is_err());
    }
    ensure!(!select.next_row()?);
    Ok(())
}

pub fn empty_cursor<C: Connection>(connection: &mut C) -> Result<()> {
    let mut select = connection.prepare(indoc! {"
        -- a query matching nothing
        select id from dbo_cursor where id < 0
    "})?;
    select.execute()?;
    ensure!(select.column_count() == 1);
    ensure!(!select.next_row()?);
    ensure!(!select.next_row()?);

    // Statements not producing rows have no cursor
    let mut update = connection.prepare("update dbo_cursor set label = label where id < 0")?;
    update.execute()?;
    ensure!(update.column_count() == 0);
    silent_logs! {
        let error = update.next_row().expect_err("An update has no rows");
        assert!(error.is_usage(), "Unexpected error: {}", error);
    }
    Ok(())
}
