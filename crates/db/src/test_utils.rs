//! Throwaway `PostgreSQL` databases for integration tests.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::migrations::Migrator;

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Connection settings, read from `TEST_DB_*` environment variables.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Role used for every connection.
    pub username: String,
    /// Password of that role.
    pub password: String,
    /// Database the tests run against.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: env_or("TEST_DB_HOST", "localhost"),
            port: env_or("TEST_DB_PORT", "5433").parse().unwrap_or(5433),
            username: env_or("TEST_DB_USER", "letcook_test"),
            password: env_or("TEST_DB_PASSWORD", "letcook_test"),
            database: env_or("TEST_DB_NAME", "letcook_test"),
        }
    }
}

impl TestDbConfig {
    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }

    /// URL of the test database itself.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the `postgres` maintenance database, used to create and drop test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }
}

async fn run_on_maintenance_db(config: &TestDbConfig, sql: String) -> Result<(), DbErr> {
    let conn = Database::connect(&config.postgres_url()).await?;
    let result = conn
        .execute(Statement::from_string(DatabaseBackend::Postgres, sql))
        .await;
    conn.close().await?;
    result.map(|_| ())
}

/// A connected, fully migrated test database.
pub struct TestDatabase {
    conn: Arc<DatabaseConnection>,
    config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the configured database and bring its schema up to date.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;
        info!(database = %config.database, "Test database ready");
        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Create a fresh database with a random name, so tests can run in parallel.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("letcook_test_{}", &suffix[..8]);

        run_on_maintenance_db(&config, format!("CREATE DATABASE \"{}\"", config.database))
            .await?;
        Self::with_config(config).await
    }

    /// Shared handle to the connection, in the form repositories take.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Close the connection and drop the database.
    ///
    /// Repositories still holding the connection keep it open; `FORCE` ends
    /// those sessions.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        let Self { conn, config } = self;
        if let Ok(conn) = Arc::try_unwrap(conn) {
            conn.close().await?;
        }

        run_on_maintenance_db(
            &config,
            format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", config.database),
        )
        .await?;
        info!(database = %config.database, "Dropped test database");
        Ok(())
    }
}
