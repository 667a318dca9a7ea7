mod common;

use pgchain::prelude::*;

#[tokio::test]
async fn create_drop_is_repeatable_with_existence_guards() -> DbResult<()> {
    let Some(db) = common::connect("create_drop_is_repeatable_with_existence_guards").await? else {
        return Ok(());
    };
    let table = common::unique_table("ddl");

    for _ in 0..2 {
        db.create_table(&table)
            .if_not_exists()
            .column("id")?
            .sql_type("serial")
            .primary_key()
            .execute()
            .await?;
        // Second create is a no-op under IF NOT EXISTS.
        db.create_table(&table)
            .if_not_exists()
            .column("id")?
            .sql_type("serial")
            .primary_key()
            .execute()
            .await?;
        db.drop_table(&table).if_exists().execute().await?;
        db.drop_table(&table).if_exists().execute().await?;
    }
    Ok(())
}

#[tokio::test]
async fn alter_table_stops_at_first_failure() -> DbResult<()> {
    let Some(db) = common::connect("alter_table_stops_at_first_failure").await? else {
        return Ok(());
    };
    let table = common::unique_table("alter");
    db.create_table(&table)
        .column("id")?
        .sql_type("serial")
        .primary_key()
        .execute()
        .await?;

    let err = db
        .alter_table(&table)
        .add_column("nickname")?
        .sql_type(column_types::varchar(40))
        .default("anon")
        .done()?
        .drop_column("does_not_exist", false)
        .add_column("never_added")?
        .sql_type("int")
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Backend(_)));

    let columns: Vec<String> = db
        .select(["column_name"])
        .from("information_schema.columns")
        .where_("table_name")
        .equals(table.as_str())
        .order_by("column_name")
        .execute()
        .await?
        .iter()
        .filter_map(|r| r.get("column_name").and_then(Value::as_str).map(str::to_string))
        .collect();
    assert_eq!(columns, vec!["id", "nickname"]);

    db.truncate_table(&table).restart_identity().execute().await?;
    db.drop_table(&table).cascade().execute().await?;
    Ok(())
}

#[tokio::test]
async fn modify_column_runs_each_change() -> DbResult<()> {
    let Some(db) = common::connect("modify_column_runs_each_change").await? else {
        return Ok(());
    };
    let table = common::unique_table("modify");
    db.create_table(&table)
        .column("id")?
        .sql_type("serial")
        .primary_key()
        .column("score")?
        .sql_type("int")
        .execute()
        .await?;

    db.alter_table(&table)
        .modify_column("score")
        .set_type("bigint")
        .set_default(5)
        .set_not_null()
        .done()
        .rename_column("score", "points")
        .execute()
        .await?;

    db.insert_into(&table)
        .values(record! { "id" => 1 })
        .execute()
        .await?;
    let rows = db.select(["points"]).from(&table).execute().await?;
    assert_eq!(rows[0].get("points"), Some(&Value::Int(5)));

    db.drop_table(&table).execute().await?;
    Ok(())
}
