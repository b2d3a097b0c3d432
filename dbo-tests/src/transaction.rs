use crate::silent_logs;
use anyhow::{Context, Result, ensure};
use dbo_core::{Connection, Statement};
use indoc::indoc;

fn count<C: Connection>(connection: &C) -> Result<i64> {
    let mut select = connection.prepare("select count(*) from dbo_transaction")?;
    select.execute()?;
    ensure!(select.next_row()?);
    let mut count = 0i64;
    select.get_result(0, &mut count)?;
    Ok(count)
}

/// The session runs in autocommit mode, transaction boundaries are accepted and ignored.
pub fn transaction<C: Connection>(connection: &mut C) -> Result<()> {
    connection.execute_immediate("drop table if exists dbo_transaction")?;
    connection.execute_immediate(indoc! {"
        create table dbo_transaction (
            id integer primary key,
            name text
        )
    "})?;

    connection
        .begin_transaction()
        .context("Could not begin a transaction")?;
    connection.execute_immediate("insert into dbo_transaction (name) values ('committed')")?;
    connection.commit().context("Could not commit")?;
    assert_eq!(count(connection)?, 1);

    connection.begin_transaction()?;
    connection.execute_immediate("insert into dbo_transaction (name) values ('kept')")?;
    connection.rollback().context("Could not roll back")?;
    assert_eq!(count(connection)?, 2);

    // Boundaries without a matching begin are tolerated
    silent_logs! {
        connection.commit()?;
        connection.rollback()?;
    }
    Ok(())
}
