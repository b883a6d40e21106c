use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use dictionary::{CacheError, LookupCache};
use sqlx::{migrate::MigrateDatabase, query, query_scalar, Pool, Sqlite, SqlitePool};

/// Lookup cache backed by a SQLite file.
pub struct SqliteCache {
    pool: Pool<Sqlite>,
}

impl SqliteCache {
    pub async fn initialize(url: &str) -> sqlx::Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    /// Drops expired rows, returns how many were removed.
    pub async fn purge_expired(&self) -> sqlx::Result<u64> {
        let result = query("DELETE FROM lookups WHERE expires_at <= ?")
            .bind(now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn backend(error: impl std::fmt::Display) -> CacheError {
    CacheError::Backend(error.to_string())
}

#[async_trait]
impl LookupCache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        query_scalar::<_, String>("SELECT value FROM lookups WHERE key = ? AND expires_at > ?")
            .bind(key)
            .bind(now())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now().checked_add_signed(ttl))
            .ok_or_else(|| backend(format!("ttl of {ttl:?} is out of range")))?;
        query(
            "INSERT INTO lookups(key, value, expires_at) VALUES(?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache(dir: &tempfile::TempDir) -> SqliteCache {
        let url = format!("sqlite://{}", dir.path().join("cache.db").display());
        SqliteCache::initialize(&url).await.unwrap()
    }

    #[tokio::test]
    async fn stored_value_is_returned_until_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(&dir).await;

        cache
            .set("define:grace", "{\"word\":\"grace\"}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get("define:grace").await.unwrap().as_deref(),
            Some("{\"word\":\"grace\"}")
        );
        assert_eq!(cache.get("define:other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(&dir).await;

        cache.set("define:grace", "old", Duration::ZERO).await.unwrap();

        assert_eq!(cache.get("define:grace").await.unwrap(), None);
        assert_eq!(cache.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn out_of_range_ttl_is_a_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(&dir).await;

        let result = cache
            .set("define:x", "v", Duration::from_secs(10_000_000_000_000))
            .await;

        assert!(matches!(result, Err(CacheError::Backend(_))));
        assert_eq!(cache.get("define:x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(&dir).await;

        cache.set("define:grace", "first", Duration::from_secs(60)).await.unwrap();
        cache.set("define:grace", "second", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("define:grace").await.unwrap().as_deref(), Some("second"));
    }
}
