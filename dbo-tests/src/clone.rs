use crate::silent_logs;
use anyhow::{Context, Result, ensure};
use dbo_core::{Connection, Statement};
use indoc::indoc;

/// A clone is a second session on the same database, sharing no state with the first.
pub fn clone<C: Connection>(connection: &mut C) -> Result<()> {
    connection.execute_immediate("drop table if exists dbo_clone")?;
    connection.execute_immediate(indoc! {"
        create table dbo_clone (
            id integer primary key,
            origin text not null
        )
    "})?;
    let other = connection
        .try_clone()
        .context("Could not clone the connection")?;
    ensure!(other.is_open());

    let mut first = connection.prepare("insert into dbo_clone (origin) values (?)")?;
    first.bind(0, "first")?.execute()?;
    let first_id = first.inserted_id();

    let mut second = other.prepare("insert into dbo_clone (origin) values (?)")?;
    second.bind(0, "second")?.execute()?;
    let second_id = second.inserted_id();
    ensure!(second_id > first_id);
    // Statements of one session do not see the executions of the other
    assert_eq!(first.inserted_id(), first_id);
    assert_eq!(first.affected_row_count(), 1);

    other.begin_transaction()?;
    connection.begin_transaction()?;
    connection.commit()?;
    other.commit()?;

    // The data itself is shared through the database
    let mut select = connection.prepare("select origin from dbo_clone where id = ?")?;
    select.bind(0, second_id)?.execute()?;
    ensure!(select.next_row()?);
    let mut origin = String::new();
    ensure!(select.get_result(0, &mut origin)?);
    assert_eq!(origin, "second");
    ensure!(!select.next_row()?);

    // A writer blocked by a cursor of the other session fails instead of waiting forever
    let mut reading = connection.prepare("select id from dbo_clone order by id")?;
    reading.execute()?;
    ensure!(reading.next_row()?, "Expected a first row");
    silent_logs! {
        let error = other
            .execute_immediate("insert into dbo_clone (origin) values ('blocked')")
            .expect_err("The write must fail while the other session is reading");
        ensure!(error.is_statement(), "Unexpected error: {}", error);
    }
    while reading.next_row()? {}
    other
        .execute_immediate("insert into dbo_clone (origin) values ('after')")
        .context("The write must succeed once the cursor is exhausted")?;

    drop(second);
    drop(other);
    ensure!(connection.is_open());
    let mut count = connection.prepare("select count(*) from dbo_clone")?;
    count.execute()?;
    ensure!(count.next_row()?);
    let mut rows = 0i64;
    ensure!(count.get_result(0, &mut rows)?);
    assert_eq!(rows, 3);
    Ok(())
}
