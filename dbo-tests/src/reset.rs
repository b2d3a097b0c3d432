use anyhow::{Result, ensure};
use dbo_core::{Connection, Statement};

pub fn reset<C: Connection>(connection: &mut C) -> Result<()> {
    let mut statement = connection.prepare("select ? + ?, ?")?;
    statement.bind(0, 1)?.bind(1, 2)?.bind(2, "a")?.execute()?;
    ensure!(statement.next_row()?);
    let mut sum = 0i64;
    let mut label = String::new();
    ensure!(statement.get_result(0, &mut sum)?);
    ensure!(statement.get_result(1, &mut label)?);
    assert_eq!(sum, 3);
    assert_eq!(label, "a");

    // Executing again requires a reset
    let error = statement
        .bind(0, 5)
        .map(|_| ())
        .expect_err("Binding an executed statement must fail");
    ensure!(error.is_usage(), "Unexpected error: {}", error);

    statement.reset()?.bind(0, 10)?.bind(1, 20)?.bind(2, "b")?.execute()?;
    ensure!(statement.next_row()?);
    ensure!(statement.get_result(0, &mut sum)?);
    ensure!(statement.get_result(1, &mut label)?);
    assert_eq!(sum, 30);
    assert_eq!(label, "b");
    ensure!(!statement.next_row()?);

    // Nothing of the previous parameter set is left
    statement.reset()?.bind(0, 7)?.execute()?;
    ensure!(statement.next_row()?);
    ensure!(!statement.get_result(0, &mut sum)?, "7 + null is null");
    ensure!(!statement.get_result(1, &mut label)?);
    assert_eq!(sum, 30);
    assert_eq!(label, "b");

    // A reset in the middle of the rows discards them
    let mut series = connection.prepare("values (1), (2), (3)")?;
    series.execute()?;
    ensure!(series.next_row()?);
    series.reset()?.execute()?;
    let mut rows = 0;
    while series.next_row()? {
        rows += 1;
    }
    assert_eq!(rows, 3);

    let sql = statement.sql().to_string();
    statement.close();
    assert_eq!(statement.sql(), sql);
    let error = statement.reset().map(|_| ()).expect_err("A closed statement cannot reset");
    ensure!(error.is_usage(), "Unexpected error: {}", error);
    Ok(())
}
