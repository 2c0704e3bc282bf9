use reqwest::Method;

use super::{decode, encode};
use crate::client::BitDotIo;
use crate::db::Connector;
use crate::error::ClientResult;
use crate::models::{Database, DatabaseConfig, DatabaseList};

fn database_path(owner: &str, db_name: &str) -> String {
    format!("db/{}/{}", owner, db_name)
}

impl<C: Connector> BitDotIo<C> {
    /// Lists every database the caller owns or collaborates on
    pub async fn list_databases(&self) -> ClientResult<Vec<Database>> {
        let body = self.api_client.call(Method::GET, "db/", None).await?;
        let list: DatabaseList = decode(&body)?;
        Ok(list.databases)
    }

    pub async fn create_database(&self, config: &DatabaseConfig) -> ClientResult<Database> {
        let body = self
            .api_client
            .call(Method::POST, "db/", encode(config)?)
            .await?;
        decode(&body)
    }

    pub async fn get_database(&self, owner: &str, db_name: &str) -> ClientResult<Database> {
        let body = self
            .api_client
            .call(Method::GET, &database_path(owner, db_name), None)
            .await?;
        decode(&body)
    }

    pub async fn update_database(
        &self,
        owner: &str,
        db_name: &str,
        config: &DatabaseConfig,
    ) -> ClientResult<Database> {
        let body = self
            .api_client
            .call(
                Method::PATCH,
                &database_path(owner, db_name),
                encode(config)?,
            )
            .await?;
        decode(&body)
    }

    pub async fn delete_database(&self, owner: &str, db_name: &str) -> ClientResult<()> {
        self.api_client
            .call(Method::DELETE, &database_path(owner, db_name), None)
            .await?;
        Ok(())
    }
}
