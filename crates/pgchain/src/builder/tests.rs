use super::*;
use crate::aggregate::{count_all, sum, SelectField};
use crate::config::ManagerConfig;
use crate::error::DbError;
use crate::manager::DatabaseManager;
use crate::record;
use crate::value::Value;

fn db() -> DatabaseManager {
    DatabaseManager::new(ManagerConfig::new("postgres://localhost/pgchain_test"))
}

/// Placeholders must be `$1..=$n` with n equal to the bound parameter count.
fn assert_contiguous(q: &BuiltQuery) {
    let mut seen: Vec<usize> = q
        .sql
        .split('$')
        .skip(1)
        .map(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or_else(|_| panic!("bare $ in {}", q.sql))
        })
        .collect();
    seen.sort_unstable();
    seen.dedup();
    let expected: Vec<usize> = (1..=q.params.len()).collect();
    assert_eq!(seen, expected, "placeholders in {}", q.sql);
}

// ==================== SELECT ====================

#[test]
fn test_select_all() {
    let db = db();
    assert_eq!(db.select_all().from("users").to_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_select_fields_and_distinct() {
    let db = db();
    let sql = db
        .select(["id", "name"])
        .field("email")
        .distinct()
        .from("users")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT DISTINCT id, name, email FROM users");
}

#[test]
fn test_select_requires_table() {
    let db = db();
    assert!(matches!(db.select_all().build(), Err(DbError::Configuration(_))));
}

#[test]
fn test_select_full_render_order() {
    let db = db();
    let q = db
        .select([SelectField::from("team"), count_all().alias("n").into()])
        .from("players")
        .where_("age")
        .between(18, 30)
        .or_where("status")
        .in_list(["a", "b"])
        .group_by(["team"])
        .order_by("team")
        .limit(10)
        .offset(20)
        .build()
        .unwrap();
    assert_eq!(
        q.sql,
        "SELECT team, COUNT(*) AS n FROM players WHERE age BETWEEN $1 AND $2 OR status IN ($3, $4) GROUP BY team ORDER BY team ASC LIMIT $5 OFFSET $6"
    );
    assert_eq!(q.params.len(), 6);
    assert_eq!(q.params.as_slice()[4], Value::Int(10));
    assert_eq!(q.params.as_slice()[5], Value::Int(20));
    assert_contiguous(&q);
}

#[test]
fn test_invalid_aggregate_surfaces_on_build() {
    let db = db();
    let q = db.select_all().field(sum("")).from("orders");
    assert!(matches!(q.build(), Err(DbError::InvalidArgument(_))));
}

#[test]
fn test_order_by_same_field_keeps_one_entry() {
    let db = db();
    let sql = db
        .select_all()
        .from("t")
        .order_by("x")
        .desc()
        .order_by("y")
        .order_by("x")
        .asc()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t ORDER BY y ASC, x ASC");
}

#[test]
fn test_order_by_without_direction_keeps_position() {
    let db = db();
    let sql = db
        .select_all()
        .from("t")
        .order_by("x")
        .desc()
        .order_by("y")
        .order_by("x")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t ORDER BY x DESC, y ASC");
}

#[test]
fn test_order_by_desc_shorthand() {
    let db = db();
    let sql = db.select_all().from("t").order_by_desc("created_at").to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM t ORDER BY created_at DESC");
}

#[test]
fn test_direction_without_order_by_is_rejected() {
    let db = db();
    assert!(matches!(
        db.select_all().from("t").desc().build(),
        Err(DbError::InvalidArgument(_))
    ));
}

#[test]
fn test_empty_in_lists() {
    let db = db();
    let q = db
        .select_all()
        .from("t")
        .where_("id")
        .in_list(Vec::<i64>::new())
        .build()
        .unwrap();
    assert_eq!(q.sql, "SELECT * FROM t WHERE FALSE");
    assert!(q.params.is_empty());

    let q = db
        .select_all()
        .from("t")
        .where_("id")
        .not_in(Vec::<i64>::new())
        .and_where("age")
        .greater_than(3)
        .build()
        .unwrap();
    assert_eq!(q.sql, "SELECT * FROM t WHERE TRUE AND age > $1");
    assert_contiguous(&q);
}

#[test]
fn test_null_in_between_is_rejected() {
    let db = db();
    let q = db.select_all().from("t").where_("age").between(1, Value::Null);
    assert!(matches!(q.build(), Err(DbError::InvalidArgument(_))));
}

#[test]
fn test_contains_escapes_wildcards() {
    let db = db();
    let q = db
        .select_all()
        .from("products")
        .where_("label")
        .contains("100%")
        .and_where("code")
        .starts_with("A_")
        .and_where("path")
        .ends_with("\\tmp")
        .and_where("name")
        .not_contains("x")
        .build()
        .unwrap();
    assert_eq!(
        q.sql,
        "SELECT * FROM products WHERE label ILIKE $1 AND code ILIKE $2 AND path ILIKE $3 AND name NOT ILIKE $4"
    );
    let params = q.params.as_slice();
    assert_eq!(params[0], Value::from("%100\\%%"));
    assert_eq!(params[1], Value::from("A\\_%"));
    assert_eq!(params[2], Value::from("%\\\\tmp"));
    assert_eq!(params[3], Value::from("%x%"));
}

#[test]
fn test_raw_like_is_not_escaped() {
    let db = db();
    let q = db
        .select_all()
        .from("t")
        .where_("name")
        .like("a%_")
        .or_where("name")
        .not_ilike("%b")
        .build()
        .unwrap();
    assert_eq!(q.sql, "SELECT * FROM t WHERE name LIKE $1 OR name NOT ILIKE $2");
    assert_eq!(q.params.as_slice()[0], Value::from("a%_"));
}

#[test]
fn test_null_checks() {
    let db = db();
    let q = db
        .select_all()
        .from("t")
        .where_("deleted_at")
        .is_null()
        .and_where("email")
        .is_not_null()
        .build()
        .unwrap();
    assert_eq!(q.sql, "SELECT * FROM t WHERE deleted_at IS NULL AND email IS NOT NULL");
    assert!(q.params.is_empty());
}

#[test]
fn test_invalid_table_name() {
    let db = db();
    assert!(matches!(
        db.select_all().from("users; DROP TABLE x").build(),
        Err(DbError::InvalidArgument(_))
    ));
}

// ==================== INSERT ====================

#[test]
fn test_insert_single() {
    let db = db();
    let q = db
        .insert()
        .into("users")
        .values(record! { "name" => "alice", "age" => 30 })
        .build()
        .unwrap();
    assert_eq!(q.sql, "INSERT INTO users (name, age) VALUES ($1, $2) RETURNING *");
    assert_eq!(q.params.len(), 2);
}

#[test]
fn test_insert_on_conflict_do_nothing() {
    let db = db();
    let sql = db
        .insert_into("users")
        .values(record! { "email" => "a@b.c" })
        .on_conflict("email")
        .do_nothing()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO users (email) VALUES ($1) ON CONFLICT (email) DO NOTHING RETURNING *"
    );
}

#[test]
fn test_insert_do_update_is_not_implemented() {
    let db = db();
    let q = db
        .insert_into("users")
        .values(record! { "email" => "a@b.c" })
        .on_conflict("email")
        .do_update();
    assert!(matches!(q.build(), Err(DbError::NotImplemented(_))));
}

#[test]
fn test_insert_requires_table_and_values() {
    let db = db();
    assert!(matches!(
        db.insert().values(record! { "a" => 1 }).build(),
        Err(DbError::Configuration(_))
    ));
    assert!(matches!(db.insert_into("t").build(), Err(DbError::Configuration(_))));
    assert!(matches!(
        db.insert_into("t").values_many(vec![]).build(),
        Err(DbError::Configuration(_))
    ));
    assert!(matches!(
        db.insert_into("t").values(record! {}).build(),
        Err(DbError::InvalidArgument(_))
    ));
}

#[test]
fn test_bulk_insert_pads_missing_keys_with_null() {
    let db = db();
    let q = db
        .insert_into("t")
        .values_many(vec![record! { "a" => 1, "b" => 2 }, record! { "a" => 3 }])
        .build()
        .unwrap();
    assert_eq!(q.sql, "INSERT INTO t (a, b) VALUES ($1, $2), ($3, $4) RETURNING *");
    assert_eq!(
        q.params.as_slice(),
        &[Value::Int(1), Value::Int(2), Value::Int(3), Value::Null]
    );
}

#[test]
fn test_bulk_insert_drops_extra_keys() {
    let db = db();
    let q = db
        .insert_into("t")
        .values_many(vec![record! { "a" => 1 }, record! { "a" => 2, "c" => 9 }])
        .build()
        .unwrap();
    assert_eq!(q.sql, "INSERT INTO t (a) VALUES ($1), ($2) RETURNING *");
    assert_eq!(q.params.as_slice(), &[Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_bulk_insert_rejects_empty_record() {
    let db = db();
    let q = db
        .insert_into("t")
        .values_many(vec![record! { "a" => 1 }, record! {}]);
    assert!(matches!(q.build(), Err(DbError::InvalidArgument(_))));
}

#[test]
fn test_insert_rejects_bad_column() {
    let db = db();
    let q = db.insert_into("t").values(record! { "a) VALUES (1); --" => 1 });
    assert!(matches!(q.build(), Err(DbError::InvalidArgument(_))));
}

#[test]
fn test_insert_result_helpers() {
    assert!(InsertResult::One(None).is_empty());
    let rows = InsertResult::Many(vec![record! { "id" => 1 }, record! { "id" => 2 }]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.into_records().len(), 2);
}

// ==================== UPDATE ====================

#[test]
fn test_update_set_params_come_first() {
    let db = db();
    let q = db
        .update("users")
        .set(record! { "name" => "bob", "age" => 40 })
        .where_("id")
        .equals(7)
        .or_where("id")
        .in_list([8, 9])
        .build()
        .unwrap();
    assert_eq!(
        q.sql,
        "UPDATE users SET name = $1, age = $2 WHERE id = $3 OR id IN ($4, $5) RETURNING *"
    );
    assert_eq!(q.params.as_slice()[2], Value::Int(7));
    assert_contiguous(&q);
}

#[test]
fn test_placeholders_past_nine_stay_contiguous() {
    let db = db();
    let q = db
        .select_all()
        .from("t")
        .where_("id")
        .in_list(1..=10)
        .and_where("age")
        .between(18, 65)
        .limit(5)
        .build()
        .unwrap();
    assert!(q.sql.ends_with("AND age BETWEEN $11 AND $12 LIMIT $13"), "{}", q.sql);
    assert_eq!(q.params.len(), 13);
    assert_contiguous(&q);
}

#[test]
fn test_update_set_value_overrides_in_place() {
    let db = db();
    let sql = db
        .update("users")
        .set_value("a", 1)
        .set_value("b", 2)
        .set_value("a", 3)
        .where_("id")
        .equals(1)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "UPDATE users SET a = $1, b = $2 WHERE id = $3 RETURNING *");
}

#[test]
fn test_update_without_where_is_unsafe() {
    let db = db();
    let err = db.update("users").set_value("a", 1).build().unwrap_err();
    assert!(err.is_unsafe_operation());
}

#[test]
fn test_update_without_set_is_configuration_error() {
    let db = db();
    let q = db.update("users").where_("id").equals(1);
    assert!(matches!(q.build(), Err(DbError::Configuration(_))));
}

// ==================== DELETE ====================

#[test]
fn test_delete() {
    let db = db();
    let q = db
        .delete()
        .from("sessions")
        .where_("expires_at")
        .less_than(100)
        .and_where("kind")
        .not_equals("keep")
        .build()
        .unwrap();
    assert_eq!(q.sql, "DELETE FROM sessions WHERE expires_at < $1 AND kind != $2");
    assert_eq!(q.table, "sessions");
}

#[test]
fn test_delete_without_where_is_unsafe() {
    let db = db();
    assert!(db.delete_from("sessions").build().unwrap_err().is_unsafe_operation());
}

#[test]
fn test_delete_requires_table() {
    let db = db();
    let q = db.delete().where_("id").equals(1);
    assert!(matches!(q.build(), Err(DbError::Configuration(_))));
}
