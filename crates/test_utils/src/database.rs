//! Database Test Utilities
//!
//! PostgreSQL testcontainer management for the ignored database suites.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "accounting_test";

/// Schema applied to every fresh container
const SCHEMA: &str = include_str!("../../../migrations/20260101000001_initial_schema.sql");

#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A PostgreSQL container with the schema applied
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container = Postgres::default()
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_db_name(POSTGRES_DB)
            .start()
            .await?;

        let config = TestDatabaseConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(5432).await?,
            ..TestDatabaseConfig::default()
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.connection_url())
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// A fresh container for tests that need isolation
pub async fn create_isolated_test_database(
) -> Result<TestDatabase, Box<dyn std::error::Error + Send + Sync>> {
    TestDatabase::new().await
}
