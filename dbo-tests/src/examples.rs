use anyhow::{Result, ensure};
use dbo_core::{BindParam, Connection, Statement};
use indoc::indoc;

fn create_table<C: Connection>(connection: &C) -> Result<()> {
    connection.execute_immediate("drop table if exists t")?;
    connection.execute_immediate(indoc! {"
        create table t (
            id integer primary key autoincrement,
            name text
        )
    "})?;
    Ok(())
}

pub fn select_example<C: Connection>(connection: &mut C) -> Result<()> {
    create_table(connection)?;
    connection.execute_immediate("insert into t (id, name) values (1, 'a')")?;

    let mut statement = connection.prepare("select id, name from t where id = ?")?;
    statement.bind(0, BindParam::Int32(1))?.execute()?;
    ensure!(statement.next_row()?);
    let mut id = 0i32;
    let mut name = String::new();
    ensure!(statement.get_result(0, &mut id)?);
    assert_eq!(id, 1);
    ensure!(statement.get_result(1, &mut name)?);
    assert_eq!(name, "a");
    ensure!(!statement.next_row()?);
    Ok(())
}

pub fn insert_example<C: Connection>(connection: &mut C) -> Result<()> {
    create_table(connection)?;

    let mut statement = connection.prepare("insert into t(name) values (?)")?;
    statement.bind(0, BindParam::Text("a".into()))?.execute()?;
    assert_eq!(statement.affected_row_count(), 1);
    let id = statement.inserted_id();

    let mut select = connection.prepare("select id from t where name = ?")?;
    select.bind(0, "a")?.execute()?;
    ensure!(select.next_row()?);
    let mut generated = -1i64;
    ensure!(select.get_result(0, &mut generated)?);
    assert_eq!(generated, id);
    ensure!(!select.next_row()?);
    Ok(())
}
