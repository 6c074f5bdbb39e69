use crate::error::CoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

pub type DbPool = sqlx::SqlitePool;

const MAX_CONNECTIONS: u32 = 5;

/// Opens the task store at `db_path` and brings its schema up to date.
///
/// Missing parent directories and the database file itself are created.
/// Status records cascade with their task, so foreign keys are enforced on
/// every pooled connection.
pub async fn establish_connection(db_path: &str) -> Result<DbPool, CoreError> {
    let path = Path::new(db_path);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(db_path, "task store ready");
    Ok(pool)
}
