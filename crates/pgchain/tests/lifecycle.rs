mod common;

use futures_util::future::join_all;
use pgchain::{record, DatabaseManager, DbError, DbResult, ManagerConfig};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn offline() -> DatabaseManager {
    DatabaseManager::new(ManagerConfig::new("postgres://postgres@127.0.0.1:1/postgres"))
}

#[tokio::test]
async fn statements_before_connect_are_rejected() {
    let db = offline();
    assert!(!db.is_connected());

    let err = db.select_all().from("users").execute().await.unwrap_err();
    assert!(err.is_not_connected());

    let err = db
        .delete_from("users")
        .where_("id")
        .equals(1)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotConnected));

    let err = db.drop_table("users").if_exists().execute().await.unwrap_err();
    assert!(matches!(err, DbError::NotConnected));
}

#[tokio::test]
async fn not_connected_failures_are_logged_with_the_statement() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let db = offline();
    let err = db
        .select_all()
        .from("users")
        .where_("id")
        .equals(7)
        .execute()
        .await
        .unwrap_err();
    assert!(err.is_not_connected());

    let out = logs.text();
    assert!(out.contains("statement failed"), "{out}");
    assert!(out.contains("users"), "{out}");
    assert!(out.contains("SELECT * FROM users WHERE id = $1"), "{out}");
    assert!(out.contains("Int(7)"), "{out}");
}

#[tokio::test]
async fn unsafe_statements_fail_before_reaching_the_connection() {
    let db = offline();

    // UnsafeOperation, not NotConnected: nothing was sent.
    let err = db.update("users").set_value("a", 1).execute().await.unwrap_err();
    assert!(err.is_unsafe_operation());

    let err = db.delete_from("users").execute().await.unwrap_err();
    assert!(err.is_unsafe_operation());

    let err = db
        .insert_into("users")
        .values(record! { "email" => "x" })
        .on_conflict("email")
        .do_update()
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotImplemented(_)));
}

#[tokio::test]
async fn disconnect_without_connect_is_a_no_op() {
    let mut db = offline();
    db.disconnect().await;
    db.disconnect().await;
    assert!(!db.is_connected());
}

#[tokio::test]
async fn malformed_url_leaves_manager_disconnected() {
    let mut db = DatabaseManager::new(ManagerConfig::new("postgres://localhost:notaport/db"));
    let err = db.connect().await.unwrap_err();
    assert!(matches!(err, DbError::Configuration(_)));
    assert!(!db.is_connected());
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let mut db = DatabaseManager::new(
        ManagerConfig::new("postgres://postgres@127.0.0.1:1/postgres")
            .connect_timeout(Duration::from_secs(2)),
    );
    let err = db.connect().await.unwrap_err();
    assert!(matches!(err, DbError::Connection(_)));
    assert!(!db.is_connected());
}

#[tokio::test]
async fn connect_and_disconnect_are_idempotent() -> DbResult<()> {
    let Some(mut db) = common::connect("connect_and_disconnect_are_idempotent").await? else {
        return Ok(());
    };

    db.connect().await?;
    assert!(db.is_connected());

    let rows = db.select(["1 AS one"]).from("pg_catalog.pg_class").limit(1).execute().await?;
    assert_eq!(rows.len(), 1);

    db.disconnect().await;
    db.disconnect().await;
    assert!(!db.is_connected());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_managers_connect_concurrently() -> DbResult<()> {
    let Some(base) = common::config("independent_managers_connect_concurrently") else {
        return Ok(());
    };

    let tasks = (0..8).map(|i| {
        let config = base.clone().name(format!("db-{i}"));
        tokio::spawn(async move {
            let mut db = DatabaseManager::new(config);
            db.connect().await?;
            let tables = db.list_tables("pg_catalog").await?;
            db.disconnect().await;
            Ok::<_, DbError>((db.is_connected(), tables.is_empty()))
        })
    });

    for joined in join_all(tasks).await {
        let (connected, empty) = joined.expect("task panicked")?;
        assert!(!connected);
        assert!(!empty);
    }
    Ok(())
}

#[tokio::test]
async fn terminated_backend_reports_connection_closed() -> DbResult<()> {
    let Some(mut victim) = common::connect("terminated_backend_reports_connection_closed").await? else {
        return Ok(());
    };
    let Some(killer) = common::connect("terminated_backend_reports_connection_closed_killer").await? else {
        return Ok(());
    };

    let rows = victim
        .select(["pg_backend_pid() AS pid"])
        .from("pg_catalog.pg_class")
        .limit(1)
        .execute()
        .await?;
    let pid = rows[0].require("pid")?.clone();

    let terminated = killer
        .select(["pg_terminate_backend(pid) AS terminated"])
        .from("pg_stat_activity")
        .where_("pid")
        .equals(pid)
        .execute()
        .await?;
    assert_eq!(terminated.len(), 1);

    // The driver notices the closed socket asynchronously.
    let mut last = None;
    for _ in 0..50 {
        match victim.select(["1 AS one"]).from("pg_catalog.pg_class").limit(1).execute().await {
            Err(DbError::ConnectionClosed) => {
                last = Some(DbError::ConnectionClosed);
                break;
            }
            other => last = other.err(),
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(matches!(last, Some(DbError::ConnectionClosed)), "{last:?}");

    // The dead handle is still held until an explicit disconnect.
    assert!(victim.is_connected());
    victim.disconnect().await;
    assert!(!victim.is_connected());

    victim.connect().await?;
    let rows = victim.select(["1 AS one"]).from("pg_catalog.pg_class").limit(1).execute().await?;
    assert_eq!(rows.len(), 1);
    victim.disconnect().await;
    Ok(())
}
