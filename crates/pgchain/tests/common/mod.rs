#![allow(dead_code)]

use pgchain::{DatabaseManager, DbResult, ManagerConfig};
use std::time::{SystemTime, UNIX_EPOCH};

/// A connected manager, or `None` (with a message) when `DATABASE_URL` is unset.
pub async fn connect(test: &str) -> DbResult<Option<DatabaseManager>> {
    let Some(config) = config(test) else {
        return Ok(None);
    };
    let mut db = DatabaseManager::new(config);
    db.connect().await?;
    Ok(Some(db))
}

pub fn config(test: &str) -> Option<ManagerConfig> {
    dotenvy::dotenv().ok();
    match ManagerConfig::from_env() {
        Ok(config) => Some(config.name(test).application_name("pgchain-tests")),
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            None
        }
    }
}

/// A table name no other test run will collide with.
pub fn unique_table(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("pgchain_{prefix}_{}_{nanos}", std::process::id())
}
