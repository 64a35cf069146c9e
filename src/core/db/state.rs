use sqlx::{
    Sqlite,
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous},
};
use tokio::sync::{RwLock, RwLockReadGuard};

use std::{
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use crate::core::db::GatewayError;

pub(crate) struct StoreState {
    db_file: PathBuf,
    pool: RwLock<SqlitePool>,
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("db_file", &self.db_file)
            .finish()
    }
}

fn connect_options(db_file: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_file)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
}

impl StoreState {
    pub(crate) async fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, GatewayError> {
        let db_file = db_file.as_ref().to_path_buf();
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options(&db_file))
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(path = %db_file.display(), "store opened");
        Ok(Self {
            db_file,
            pool: RwLock::new(pool),
        })
    }

    pub(crate) fn db_file(&self) -> &Path {
        &self.db_file
    }

    /// A pooled connection that keeps the store from closing while it is held.
    pub(crate) async fn conn(&self) -> Result<DbConnGuard<'_>, GatewayError> {
        let pool_guard = self.pool.read().await;
        let conn = pool_guard.acquire().await?;

        Ok(DbConnGuard {
            _pool_guard: pool_guard,
            conn,
        })
    }

    /// Checkpoints the WAL and closes the pool once outstanding connections are returned.
    pub(crate) async fn close(&self) -> Result<(), GatewayError> {
        let pool_guard = self.pool.write().await;
        if pool_guard.is_closed() {
            return Ok(());
        }

        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&*pool_guard)
            .await?;

        pool_guard.close().await;
        tracing::debug!(path = %self.db_file.display(), "store closed");
        Ok(())
    }
}

pub(crate) struct DbConnGuard<'a> {
    _pool_guard: RwLockReadGuard<'a, SqlitePool>,
    conn: PoolConnection<Sqlite>,
}

impl<'a> Deref for DbConnGuard<'a> {
    type Target = PoolConnection<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl<'a> DerefMut for DbConnGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
