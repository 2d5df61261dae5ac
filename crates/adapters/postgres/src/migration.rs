//! Embedded schema migrations
//!
//! Versioned DDL applied transactionally at startup, so correctness never
//! depends on out-of-band schema state.

use almacen_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{info, warn};

/// A migration that has been applied
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// A migration definition
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        let up_sql = up_sql.into();
        let checksum = Self::calculate_checksum(&up_sql);
        Self {
            version,
            name: name.into(),
            up_sql,
            checksum,
        }
    }

    fn calculate_checksum(sql: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        sql.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

/// Applies pending migrations in version order
pub struct MigrationManager {
    pool: PgPool,
    table_name: String,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: "schema_migrations".to_string(),
        }
    }

    /// Create the bookkeeping table if missing
    pub async fn init(&self) -> AppResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#,
            self.table_name
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;

        Ok(())
    }

    pub async fn get_applied_migrations(&self) -> AppResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT version, name, applied_at, checksum FROM {} ORDER BY version ASC",
            self.table_name
        );

        sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get migrations: {}", e)))
    }

    /// Apply one migration; DDL and the bookkeeping row commit together
    pub async fn apply(&self, migration: &Migration) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to apply migration {}: {}",
                    migration.version, e
                ))
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name, checksum) VALUES ($1, $2, $3)",
            self.table_name
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            name = %migration.name,
            "Migration applied"
        );

        Ok(())
    }

    /// Apply all pending migrations; stops at the first failure
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationResult> {
        self.init().await?;

        let applied = self.get_applied_migrations().await?;
        let applied_versions: std::collections::HashSet<i64> =
            applied.iter().map(|m| m.version).collect();

        let mut result = MigrationResult {
            applied: Vec::new(),
            skipped: Vec::new(),
        };

        let mut sorted_migrations: Vec<_> = migrations.iter().collect();
        sorted_migrations.sort_by_key(|m| m.version);

        for migration in sorted_migrations {
            if applied_versions.contains(&migration.version) {
                if let Some(record) = applied.iter().find(|r| r.version == migration.version) {
                    if record.checksum != migration.checksum {
                        warn!(
                            version = migration.version,
                            "Applied migration differs from the embedded definition"
                        );
                        return Err(AppError::database(format!(
                            "Checksum mismatch for migration {}: embedded definition was modified",
                            migration.version
                        )));
                    }
                }
                result.skipped.push(migration.version);
                continue;
            }

            self.apply(migration).await?;
            result.applied.push(migration.version);
        }

        Ok(result)
    }
}

/// Outcome of a migration run
#[derive(Debug, Clone)]
pub struct MigrationResult {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
}

impl MigrationResult {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let sql = "CREATE TABLE test (id INT)";
        let m1 = Migration::new(1, "test", sql);
        let m2 = Migration::new(1, "test", sql);

        assert_eq!(m1.checksum, m2.checksum);
    }

    #[test]
    fn test_checksum_difference() {
        let m1 = Migration::new(1, "test", "CREATE TABLE test1 (id INT)");
        let m2 = Migration::new(1, "test", "CREATE TABLE test2 (id INT)");

        assert_ne!(m1.checksum, m2.checksum);
    }
}
