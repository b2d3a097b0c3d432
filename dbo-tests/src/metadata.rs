use anyhow::{Result, ensure};
use dbo_core::{Connection, Statement};
use indoc::indoc;

fn max_id<C: Connection>(connection: &C) -> Result<i64> {
    let mut select = connection.prepare("select max(id) from dbo_metadata")?;
    select.execute()?;
    ensure!(select.next_row()?);
    let mut id = -1i64;
    ensure!(select.get_result(0, &mut id)?, "The table is empty");
    Ok(id)
}

pub fn metadata<C: Connection>(connection: &mut C) -> Result<()> {
    connection.execute_immediate("drop table if exists dbo_metadata")?;
    connection.execute_immediate(indoc! {"
        create table dbo_metadata (
            id integer primary key autoincrement,
            name text not null,
            score integer not null default 0
        )
    "})?;

    let mut insert = connection.prepare("insert into dbo_metadata (name) values (?)")?;
    assert_eq!(insert.inserted_id(), -1);
    assert_eq!(insert.affected_row_count(), 0);
    insert.bind(0, "first")?.execute()?;
    assert_eq!(insert.affected_row_count(), 1);
    let first = insert.inserted_id();
    assert_eq!(first, max_id(connection)?);

    for name in ["second", "third", "fourth"] {
        insert.reset()?.bind(0, name)?.execute()?;
        assert_eq!(insert.affected_row_count(), 1);
        assert_eq!(insert.inserted_id(), max_id(connection)?);
    }
    assert_eq!(insert.inserted_id(), first + 3);

    // The cached values survive a reset
    insert.reset()?;
    assert_eq!(insert.inserted_id(), first + 3);
    assert_eq!(insert.affected_row_count(), 1);

    let mut update = connection.prepare("update dbo_metadata set score = ? where id > ?")?;
    update.bind(0, 10)?.bind(1, first)?.execute()?;
    assert_eq!(update.affected_row_count(), 3);
    update.reset()?.bind(0, 20)?.bind(1, first + 100)?.execute()?;
    assert_eq!(update.affected_row_count(), 0);

    let mut delete = connection.prepare("delete from dbo_metadata where score = ?")?;
    delete.bind(0, 10)?.execute()?;
    assert_eq!(delete.affected_row_count(), 3);

    // A query does not change rows
    let mut select = connection.prepare("select count(*) from dbo_metadata")?;
    select.execute()?;
    assert_eq!(select.affected_row_count(), 0);
    ensure!(select.next_row()?);
    let mut count = 0i64;
    ensure!(select.get_result(0, &mut count)?);
    assert_eq!(count, 1);
    Ok(())
}
