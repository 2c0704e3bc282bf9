//! Developer API methods
//!
//! Each submodule adds a group of endpoints to `BitDotIo`. Requests go through
//! the `ApiClient` seam so they can be exercised against a mock.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ClientResult;

pub mod client;
pub mod databases;
pub mod keys;
pub mod query;
pub mod transfers;

pub use client::{ApiClient, DefaultApiClient, FormParts};

/// Deserializes a JSON response body
fn decode<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Serializes a JSON request body
fn encode<T: Serialize>(value: &T) -> ClientResult<Option<Vec<u8>>> {
    Ok(Some(serde_json::to_vec(value)?))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::client::MockApiClient;
    use crate::db::{Connector, DatabasePool, PoolRegistry};
    use crate::BitDotIo;

    /// Pool type for API tests, which never open a connection
    #[derive(Clone)]
    pub struct NoPool;

    #[async_trait::async_trait]
    impl DatabasePool for NoPool {
        type Connection = ();

        async fn acquire(&self) -> Result<(), sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }

        async fn close(&self) {}
    }

    pub struct NoConnector;

    #[async_trait::async_trait]
    impl Connector for NoConnector {
        type Pool = NoPool;

        async fn establish(&self, _conn_str: &str) -> Result<NoPool, sqlx::Error> {
            Ok(NoPool)
        }
    }

    pub fn client_with(mock: MockApiClient) -> BitDotIo<NoConnector> {
        BitDotIo::with_parts(
            Arc::new(mock),
            PoolRegistry::with_connector("test_token", NoConnector),
        )
    }
}
