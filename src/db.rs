//! Global database connection pool.
//!
//! The binary initializes the pool once at startup; web handlers reach it
//! through [`get_db_pool`]. Core operation modules take a
//! `&DatabaseConnection` argument instead so tests can supply their own
//! connection.

use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect to the database and store the pool globally.
pub async fn init_db(database_url: String) {
    let pool = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    DB_POOL
        .set(pool)
        .expect("init_db called more than once");
}

/// Returns the global connection pool. Panics if [`init_db`] has not run.
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("Database pool not initialized")
}
