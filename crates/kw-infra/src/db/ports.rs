use anyhow::Result;
use diesel::SqliteConnection;

/// Runs a closure against a pooled connection. Repositories stay free of
/// pool handling and tests can substitute an in-memory database.
pub trait DbExecutor: Send + Sync {
    fn run<T>(&self, f: impl FnOnce(&mut SqliteConnection) -> Result<T>) -> Result<T>;
}

pub trait InsertMapper<D, R>: Sync + Send {
    fn to_row(&self, domain: &D) -> Result<R>;
}

pub trait RowMapper<R, D>: Sync + Send {
    fn to_domain(&self, row: &R) -> Result<D>;
}
