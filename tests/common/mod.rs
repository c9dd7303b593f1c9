use hrms_lite::config::Config;
use hrms_lite::db::create_schema;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// One-connection pool so every query sees the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    create_schema(&pool).await.expect("schema");
    pool
}

pub fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        api_prefix: "/api".to_string(),
    }
}
