use std::sync::Arc;

use crate::api::{ApiClient, DefaultApiClient};
use crate::config::Config;
use crate::db::{Connector, DatabasePool, PgConnector, PoolRegistry};
use crate::error::PoolError;

/// Client for the developer API and direct database connections
///
/// One instance per access token. Share it behind an `Arc` rather than
/// creating several: each instance tracks its own pools.
pub struct BitDotIo<C: Connector = PgConnector> {
    pub(crate) api_client: Arc<dyn ApiClient>,
    pools: PoolRegistry<C>,
}

impl BitDotIo<PgConnector> {
    pub fn new(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        Self {
            api_client: Arc::new(DefaultApiClient::new(access_token.clone())),
            pools: PoolRegistry::new(access_token),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            api_client: Arc::new(DefaultApiClient::with_api_url(
                config.token.clone(),
                config.api_url.clone(),
            )),
            pools: PoolRegistry::new(config.token.clone()),
        }
    }
}

impl<C: Connector> BitDotIo<C> {
    /// Assembles a client from an explicit transport and registry
    pub fn with_parts(api_client: Arc<dyn ApiClient>, pools: PoolRegistry<C>) -> Self {
        Self { api_client, pools }
    }

    pub fn pools(&self) -> &PoolRegistry<C> {
        &self.pools
    }

    pub async fn create_pool(&self, db_name: &str) -> Result<C::Pool, PoolError> {
        self.pools.create_pool(db_name).await
    }

    pub async fn create_pool_with_max_connections(
        &self,
        db_name: &str,
        max_connections: u32,
    ) -> Result<C::Pool, PoolError> {
        self.pools
            .create_pool_with_max_connections(db_name, max_connections)
            .await
    }

    pub async fn get_pool(&self, db_name: &str) -> Result<C::Pool, PoolError> {
        self.pools.get_pool(db_name).await
    }

    pub async fn connect(
        &self,
        db_name: &str,
    ) -> Result<<C::Pool as DatabasePool>::Connection, PoolError> {
        self.pools.connect(db_name).await
    }

    pub async fn close_pool(&self, db_name: &str) -> Result<(), PoolError> {
        self.pools.close_pool(db_name).await
    }
}
