//! Shared test scaffolding: a temp-file SQLite database behind the real
//! pool, so concurrent connections observe the same data.

use std::sync::Arc;

use tempfile::TempDir;

use kw_infra::db::pool::{init_db_pool, DbPool};
use kw_infra::db::ports::DbExecutor;

pub struct TestDb {
    pub executor: TestDbExecutor,
    // Held so the database file outlives the test.
    _dir: Arc<TempDir>,
}

#[derive(Clone)]
pub struct TestDbExecutor {
    pool: Arc<DbPool>,
}

impl DbExecutor for TestDbExecutor {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut diesel::SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut conn = self.pool.get()?;
        f(&mut conn)
    }
}

pub fn test_db() -> TestDb {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("keyward-test.db");
    let pool = init_db_pool(db_path.to_str().expect("utf-8 path")).expect("init test db");
    TestDb {
        executor: TestDbExecutor {
            pool: Arc::new(pool),
        },
        _dir: Arc::new(dir),
    }
}
