use std::str::FromStr;
use std::time::Duration;

use url::Url;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Postgres};

use super::conn_string::{
    PARAM_APPLICATION_NAME, PARAM_DBNAME, PARAM_MAX_CONNS, PARAM_MAX_CONN_IDLE_TIME,
    PARAM_MIN_CONNS, PARAM_PASSWORD, PARAM_SSL_MODE, PARAM_USER,
};

/// Establishes pools from connection strings
///
/// The registry only ever talks to the pooling mechanism through this trait,
/// which keeps it testable without a live server.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    type Pool: DatabasePool;

    async fn establish(&self, conn_str: &str) -> Result<Self::Pool, sqlx::Error>;
}

/// A shared, cloneable handle to an open pool
///
/// Leased connections are released back to the pool when dropped. Once a pool
/// is closed, `acquire` must fail with `sqlx::Error::PoolClosed`.
#[async_trait::async_trait]
pub trait DatabasePool: Clone + Send + Sync + 'static {
    type Connection: Send + 'static;

    async fn acquire(&self) -> Result<Self::Connection, sqlx::Error>;

    /// Rejects future acquisitions. Connections already leased stay usable
    /// until dropped.
    async fn close(&self);
}

#[async_trait::async_trait]
impl DatabasePool for PgPool {
    type Connection = PoolConnection<Postgres>;

    async fn acquire(&self) -> Result<Self::Connection, sqlx::Error> {
        sqlx::Pool::<Postgres>::acquire(self).await
    }

    async fn close(&self) {
        // Calling sqlx's close marks the pool closed before the returned future
        // is polled; the future itself only waits for leases to come back.
        drop(sqlx::Pool::<Postgres>::close(self));

        let pool = self.clone();
        tokio::spawn(async move {
            sqlx::Pool::<Postgres>::close(&pool).await;
            tracing::debug!("Pool drained");
        });
    }
}

/// Connector backed by `sqlx::PgPool`
#[derive(Debug, Clone, Default)]
pub struct PgConnector;

#[async_trait::async_trait]
impl Connector for PgConnector {
    type Pool = PgPool;

    async fn establish(&self, conn_str: &str) -> Result<PgPool, sqlx::Error> {
        let (connect_options, pool_options) = parse_connection_string(conn_str)?;
        pool_options.connect_with(connect_options).await
    }
}

/// Splits a connection string into driver options and pool options
pub fn parse_connection_string(
    conn_str: &str,
) -> Result<(PgConnectOptions, PgPoolOptions), sqlx::Error> {
    let url = Url::parse(conn_str).map_err(config_error)?;

    let host = url
        .host_str()
        .ok_or_else(|| config_error("connection string has no host"))?;
    let mut connect_options = PgConnectOptions::new_without_pgpass().host(host);
    if let Some(port) = url.port() {
        connect_options = connect_options.port(port);
    }

    let mut pool_options = PgPoolOptions::new();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            PARAM_USER => connect_options = connect_options.username(&value),
            PARAM_PASSWORD => connect_options = connect_options.password(&value),
            PARAM_DBNAME => connect_options = connect_options.database(&value),
            PARAM_SSL_MODE => {
                connect_options = connect_options.ssl_mode(PgSslMode::from_str(&value)?)
            }
            PARAM_APPLICATION_NAME => {
                connect_options = connect_options.application_name(&value)
            }
            PARAM_MIN_CONNS => {
                pool_options = pool_options.min_connections(parse_number(&key, &value)?)
            }
            PARAM_MAX_CONNS => {
                pool_options = pool_options.max_connections(parse_number(&key, &value)?)
            }
            PARAM_MAX_CONN_IDLE_TIME => {
                pool_options = pool_options.idle_timeout(parse_duration(&value)?)
            }
            other => {
                return Err(config_error(format!(
                    "unsupported connection parameter '{}'",
                    other
                )))
            }
        }
    }

    Ok((connect_options, pool_options))
}

fn parse_number(key: &str, value: &str) -> Result<u32, sqlx::Error> {
    value
        .parse()
        .map_err(|_| config_error(format!("invalid value for {}: '{}'", key, value)))
}

/// Parses durations written as whole seconds, e.g. `299s`
fn parse_duration(value: &str) -> Result<Duration, sqlx::Error> {
    value
        .strip_suffix('s')
        .and_then(|secs| secs.parse().ok())
        .map(Duration::from_secs)
        .ok_or_else(|| config_error(format!("invalid duration '{}'", value)))
}

fn config_error(err: impl ToString) -> sqlx::Error {
    sqlx::Error::Configuration(err.to_string().into())
}
