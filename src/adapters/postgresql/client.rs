//! PostgreSQL client implementation
//!
//! A thin wrapper around a deadpool connection pool. Both the ledger
//! source and the document sink are built on top of it.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{LiftError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::NoTls;

/// Pooled PostgreSQL client
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool is created lazily; no connection is opened until the first
    /// query or [`test_connection`](Self::test_connection).
    ///
    /// # Errors
    ///
    /// Returns `LiftError::Configuration` for an unparseable connection
    /// string and `LiftError::Connection` if the pool cannot be built.
    pub fn new(config: PostgreSQLConfig) -> Result<Self> {
        let connection_string: &str = config.connection_string.expose_secret().as_ref();
        let mut pg_config: tokio_postgres::Config = connection_string.parse().map_err(|e| {
            LiftError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
        })?;
        pg_config.ssl_mode(ssl_mode(&config.ssl_mode));
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match tls_connector(&config.ssl_mode)? {
            Some(connector) => Manager::from_config(pg_config, connector, manager_config),
            None => Manager::from_config(pg_config, NoTls, manager_config),
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| LiftError::Connection(format!("Failed to create connection pool: {e}")))?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| LiftError::Connection(format!("Connection test failed: {e}")))?;

        tracing::info!(
            target_db = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a pooled connection with the configured statement timeout applied
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| LiftError::Connection(format!("Failed to get connection from pool: {e}")))?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| LiftError::Connection(format!("Failed to set statement timeout: {e}")))?;

        Ok(client)
    }

    /// Close the pool
    ///
    /// Idle connections are dropped and later `get` calls fail. Calling
    /// this more than once is harmless.
    pub fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close();
            tracing::debug!(
                target_db = %self.connection_string_safe(),
                "PostgreSQL pool closed"
            );
        }
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Connection string with the credentials redacted
    pub fn connection_string_safe(&self) -> String {
        self.config.connection_string_safe()
    }
}

fn ssl_mode(mode: &str) -> SslMode {
    match mode {
        "disable" | "allow" => SslMode::Disable,
        "require" | "verify-ca" | "verify-full" => SslMode::Require,
        _ => SslMode::Prefer,
    }
}

/// TLS connector for `mode`, or `None` when TLS is disabled
///
/// Only `verify-full` checks both the certificate chain and the host name,
/// matching libpq semantics.
fn tls_connector(mode: &str) -> Result<Option<MakeTlsConnector>> {
    let mut builder = TlsConnector::builder();
    match mode {
        "disable" | "allow" => return Ok(None),
        "verify-full" => {}
        "verify-ca" => {
            builder.danger_accept_invalid_hostnames(true);
        }
        _ => {
            builder.danger_accept_invalid_certs(true);
        }
    }

    let connector = builder
        .build()
        .map_err(|e| LiftError::Configuration(format!("Failed to build TLS connector: {e}")))?;
    Ok(Some(MakeTlsConnector::new(connector)))
}
