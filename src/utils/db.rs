use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

use crate::DbPool;

const CREATE_REVIEW_ITEMS: &str = r#"
    CREATE TABLE IF NOT EXISTS review_items (
        learner_id INTEGER NOT NULL,
        item_id INTEGER NOT NULL,
        easiness DOUBLE NOT NULL DEFAULT 2.5,
        interval_days DOUBLE NOT NULL DEFAULT 0,
        repetition INTEGER NOT NULL DEFAULT 0,
        last_reviewed_at TIMESTAMP,
        due_at TIMESTAMP,
        version INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (learner_id, item_id)
    );
    CREATE INDEX IF NOT EXISTS idx_review_items_due ON review_items (learner_id, due_at);
"#;

/// Creates the tables the review store needs. Safe to run on every start.
pub fn run_migrations(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(CREATE_REVIEW_ITEMS)
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str, max_size: u32) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
}

/// Single-connection pool over a private in-memory database, schema included.
///
/// The pool is capped at one connection so every checkout sees the same database.
pub fn build_memory_pool() -> anyhow::Result<DbPool> {
    let pool = build_pool(":memory:", 1)?;
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    drop(conn);
    Ok(pool)
}

pub fn establish_memory_connection() -> anyhow::Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(":memory:")?;
    run_migrations(&mut conn)?;
    Ok(conn)
}
