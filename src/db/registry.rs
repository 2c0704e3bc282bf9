use std::collections::HashMap;

use tokio::sync::RwLock;

use super::conn_string::connection_string;
use super::pool::{Connector, DatabasePool, PgConnector};
use crate::error::PoolError;

/// Tracks at most one live pool per fully-qualified database name
///
/// Creation and close take the write lock for their whole check-and-mutate
/// sequence, including any network round trip, so concurrent creates for
/// different databases are serialized too. Lookups only take the read lock.
pub struct PoolRegistry<C: Connector = PgConnector> {
    access_token: String,
    connector: C,
    pools: RwLock<HashMap<String, C::Pool>>,
}

impl PoolRegistry<PgConnector> {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_connector(access_token, PgConnector)
    }
}

impl<C: Connector> PoolRegistry<C> {
    /// Creates a registry that establishes pools through `connector`
    pub fn with_connector(access_token: impl Into<String>, connector: C) -> Self {
        Self {
            access_token: access_token.into(),
            connector,
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// The connector new pools are established through, for inspecting
    /// connector state such as a test double's call log
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Connection string for `db_name`; 0 keeps the pool's default size
    pub fn connection_string(&self, db_name: &str, max_connections: u32) -> String {
        connection_string(&self.access_token, db_name, max_connections)
    }

    /// Creates a pool with the pooling mechanism's default size
    pub async fn create_pool(&self, db_name: &str) -> Result<C::Pool, PoolError> {
        self.create_pool_with_max_connections(db_name, 0).await
    }

    /// Creates a pool capped at `max_connections`
    ///
    /// Fails if a live pool for `db_name` is already registered. A registered
    /// pool that reports itself closed (for example because a caller closed
    /// the handle directly) is replaced.
    pub async fn create_pool_with_max_connections(
        &self,
        db_name: &str,
        max_connections: u32,
    ) -> Result<C::Pool, PoolError> {
        let mut pools = self.pools.write().await;

        if let Some(existing) = pools.get(db_name) {
            match check_alive(existing.clone()).await {
                Ok(()) => {
                    return Err(PoolError::AlreadyExists {
                        database: db_name.to_string(),
                    })
                }
                Err(sqlx::Error::PoolClosed) => {
                    tracing::debug!(database = %db_name, "Replacing closed pool");
                }
                Err(source) => {
                    return Err(PoolError::UnverifiedState {
                        database: db_name.to_string(),
                        source,
                    })
                }
            }
        }

        let conn_str = self.connection_string(db_name, max_connections);
        let pool = self
            .connector
            .establish(&conn_str)
            .await
            .map_err(|source| PoolError::Create {
                database: db_name.to_string(),
                source,
            })?;

        pools.insert(db_name.to_string(), pool.clone());
        tracing::debug!(
            database = %db_name,
            max_connections = max_connections,
            "Pool created"
        );

        Ok(pool)
    }

    /// Returns the registered pool for `db_name`
    pub async fn get_pool(&self, db_name: &str) -> Result<C::Pool, PoolError> {
        self.pools
            .read()
            .await
            .get(db_name)
            .cloned()
            .ok_or_else(|| PoolError::NotFound {
                database: db_name.to_string(),
            })
    }

    /// Leases a connection from the registered pool for `db_name`
    ///
    /// The read lock is released before acquiring, so a slow acquire never
    /// holds up other registry operations.
    pub async fn connect(
        &self,
        db_name: &str,
    ) -> Result<<C::Pool as DatabasePool>::Connection, PoolError> {
        let pool = self.get_pool(db_name).await?;
        pool.acquire().await.map_err(|source| PoolError::Acquire {
            database: db_name.to_string(),
            source,
        })
    }

    /// Closes and forgets the pool for `db_name`
    pub async fn close_pool(&self, db_name: &str) -> Result<(), PoolError> {
        let mut pools = self.pools.write().await;
        match pools.remove(db_name) {
            Some(pool) => {
                pool.close().await;
                tracing::debug!(database = %db_name, "Pool closed");
                Ok(())
            }
            None => Err(PoolError::NotFound {
                database: db_name.to_string(),
            }),
        }
    }

    /// Names of every registered database
    pub async fn databases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Closes every registered pool
    pub async fn close_all(&self) {
        let mut pools = self.pools.write().await;
        for (db_name, pool) in pools.drain() {
            pool.close().await;
            tracing::debug!(database = %db_name, "Pool closed");
        }
    }
}

/// Acquires and immediately releases a connection
///
/// Runs on its own task so that the caller dropping its future cannot abandon
/// the check halfway through.
async fn check_alive<P: DatabasePool>(pool: P) -> Result<(), sqlx::Error> {
    let task = tokio::spawn(async move { pool.acquire().await.map(drop) });
    match task.await {
        Ok(result) => result,
        Err(_) => Err(sqlx::Error::WorkerCrashed),
    }
}
