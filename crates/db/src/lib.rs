//! Persistence layer: connection pool, migrations, models and repositories.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Discrete connection settings, used when no `DATABASE_URL` is given.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// One of `disable`, `allow`, `prefer`, `require`, `verify-ca`, `verify-full`.
    pub ssl_mode: String,
}

impl DbSettings {
    /// Build connection options from the discrete settings.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)?;
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode))
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?;
    create_pool_with(options).await
}

/// Create a connection pool from prepared connection options.
pub async fn create_pool_with(options: PgConnectOptions) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ssl_mode: &str) -> DbSettings {
        DbSettings {
            host: "db.internal".into(),
            port: 6543,
            user: "aidy".into(),
            password: "secret".into(),
            database: "portfolio".into(),
            ssl_mode: ssl_mode.into(),
        }
    }

    #[test]
    fn connect_options_carry_settings() {
        let options = settings("require").connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "aidy");
        assert_eq!(options.get_database(), Some("portfolio"));
    }

    #[test]
    fn unknown_ssl_mode_is_rejected() {
        assert!(settings("sometimes").connect_options().is_err());
    }
}
