//! Versioned JSON blobs keyed by scope and name.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Lifetime of a persisted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Survives restarts
    Local,
    /// Cleared on startup and logout
    Session,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Session => "session",
        }
    }
}

#[derive(Clone)]
pub struct StateStore {
    pool: SqlitePool,
}

impl StateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a blob written with `version`.
    ///
    /// A version mismatch or unparseable value removes the entry and reads as absent.
    pub async fn get<T: DeserializeOwned>(
        &self,
        scope: Scope,
        key: &str,
        version: i64,
    ) -> Result<Option<T>, AppError> {
        let row = sqlx::query("SELECT version, value FROM client_state WHERE scope = ? AND key = ?")
            .bind(scope.as_str())
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored_version: i64 = row.get("version");
        if stored_version != version {
            tracing::warn!(
                scope = scope.as_str(),
                key,
                stored_version,
                version,
                "Dropping persisted state with stale version"
            );
            self.remove(scope, key).await?;
            return Ok(None);
        }

        let raw: String = row.get("value");
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(scope = scope.as_str(), key, "Dropping corrupt persisted state: {}", e);
                self.remove(scope, key).await?;
                Ok(None)
            }
        }
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        scope: Scope,
        key: &str,
        version: i64,
        value: &T,
    ) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO client_state (scope, key, version, value, updated_at) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(scope, key) DO UPDATE SET version = excluded.version, value = excluded.value, updated_at = excluded.updated_at"
        )
        .bind(scope.as_str())
        .bind(key)
        .bind(version)
        .bind(&raw)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, scope: Scope, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM client_state WHERE scope = ? AND key = ?")
            .bind(scope.as_str())
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove every entry in `scope`. Returns the number of rows removed.
    pub async fn clear_scope(&self, scope: Scope) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM client_state WHERE scope = ?")
            .bind(scope.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Store a raw string without validation.
    #[cfg(test)]
    pub async fn put_raw(&self, scope: Scope, key: &str, version: i64, raw: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT OR REPLACE INTO client_state (scope, key, version, value, updated_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(scope.as_str())
        .bind(key)
        .bind(version)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        name: String,
    }

    async fn store() -> (StateStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("state.sqlite"))
            .await
            .unwrap();
        (StateStore::new(pool), temp_dir)
    }

    fn blob(name: &str) -> Blob {
        Blob {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let (state, _dir) = store().await;
        state.put(Scope::Local, "k", 1, &blob("a")).await.unwrap();
        state.put(Scope::Local, "k", 1, &blob("b")).await.unwrap();
        let got: Option<Blob> = state.get(Scope::Local, "k", 1).await.unwrap();
        assert_eq!(got, Some(blob("b")));

        let other: Option<Blob> = state.get(Scope::Session, "k", 1).await.unwrap();
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn test_version_mismatch_removes_entry() {
        let (state, _dir) = store().await;
        state.put(Scope::Local, "k", 1, &blob("a")).await.unwrap();

        let got: Option<Blob> = state.get(Scope::Local, "k", 2).await.unwrap();
        assert_eq!(got, None);

        // Gone even for the original version
        let got: Option<Blob> = state.get(Scope::Local, "k", 1).await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn test_corrupt_value_removes_entry() {
        let (state, _dir) = store().await;
        state
            .put_raw(Scope::Session, "k", 1, "{not json")
            .await
            .unwrap();
        let got: Option<Blob> = state.get(Scope::Session, "k", 1).await.unwrap();
        assert_eq!(got, None);
        assert_eq!(state.clear_scope(Scope::Session).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_scope_leaves_other_scope() {
        let (state, _dir) = store().await;
        state.put(Scope::Local, "a", 1, &blob("l")).await.unwrap();
        state.put(Scope::Session, "b", 1, &blob("s")).await.unwrap();

        assert_eq!(state.clear_scope(Scope::Session).await.unwrap(), 1);
        let local: Option<Blob> = state.get(Scope::Local, "a", 1).await.unwrap();
        assert_eq!(local, Some(blob("l")));
    }
}
