use reqwest::Method;

use super::decode;
use crate::client::BitDotIo;
use crate::db::Connector;
use crate::error::ClientResult;
use crate::models::{Credentials, ServiceAccount, ServiceAccountList};

fn service_account_key_path(service_account_id: &str) -> String {
    format!("service-account/{}/api-key/", service_account_id)
}

impl<C: Connector> BitDotIo<C> {
    /// Creates a new API key (also a database password) with the caller's permissions
    pub async fn create_key(&self) -> ClientResult<Credentials> {
        let body = self.api_client.call(Method::POST, "api-key/", None).await?;
        decode(&body)
    }

    /// Lists service accounts created by the caller
    pub async fn list_service_accounts(&self) -> ClientResult<Vec<ServiceAccount>> {
        let body = self
            .api_client
            .call(Method::GET, "service-account/", None)
            .await?;
        let list: ServiceAccountList = decode(&body)?;
        Ok(list.service_accounts)
    }

    pub async fn get_service_account(&self, service_account_id: &str) -> ClientResult<ServiceAccount> {
        let path = format!("service-account/{}", service_account_id);
        let body = self.api_client.call(Method::GET, &path, None).await?;
        decode(&body)
    }

    pub async fn create_service_account_key(
        &self,
        service_account_id: &str,
    ) -> ClientResult<Credentials> {
        let body = self
            .api_client
            .call(
                Method::POST,
                &service_account_key_path(service_account_id),
                None,
            )
            .await?;
        decode(&body)
    }

    /// Revokes every key issued to a service account
    pub async fn revoke_service_account_keys(&self, service_account_id: &str) -> ClientResult<()> {
        self.api_client
            .call(
                Method::DELETE,
                &service_account_key_path(service_account_id),
                None,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiClient;
    use crate::api::test_support::client_with;

    const ACCOUNT_ID: &str = "9d2f1c7e-4b5a-4f0e-8a61-2c3b4d5e6f70";

    #[tokio::test]
    async fn test_create_key() {
        let mut mock = MockApiClient::new();
        mock.expect_call()
            .withf(|method, path, body| *method == Method::POST && path == "api-key/" && body.is_none())
            .times(1)
            .returning(|_, _, _| Ok(br#"{"username": "alice", "api_key": "v2_new"}"#.to_vec()));

        let credentials = client_with(mock).create_key().await.unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.api_key, "v2_new");
    }

    #[tokio::test]
    async fn test_list_service_accounts() {
        let mut mock = MockApiClient::new();
        mock.expect_call()
            .withf(|method, path, _| *method == Method::GET && path == "service-account/")
            .times(1)
            .returning(|_, _, _| {
                Ok(format!(
                    r#"{{"service_accounts": [{{
                        "id": "{}",
                        "name": "etl",
                        "date_created": "2022-10-01T12:30:00Z",
                        "role": "read_write",
                        "databases": [{{"id": "0b3c4a4e-8d4b-4c39-9a5e-1f0cbf7d2a11", "name": "alice/scratch"}}],
                        "token_count": 2,
                        "active_token_count": 1
                    }}]}}"#,
                    ACCOUNT_ID
                )
                .into_bytes())
            });

        let accounts = client_with(mock).list_service_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "etl");
        assert_eq!(accounts[0].databases[0].name, "alice/scratch");
        assert_eq!(accounts[0].active_token_count, 1);
    }

    #[tokio::test]
    async fn test_service_account_key_paths() {
        let mut mock = MockApiClient::new();
        mock.expect_call()
            .withf(|method, path, _| {
                *method == Method::POST && path == format!("service-account/{}/api-key/", ACCOUNT_ID)
            })
            .times(1)
            .returning(|_, _, _| Ok(br#"{"username": "etl", "api_key": "v2_sa"}"#.to_vec()));
        mock.expect_call()
            .withf(|method, path, _| {
                *method == Method::DELETE && path == format!("service-account/{}/api-key/", ACCOUNT_ID)
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let client = client_with(mock);
        let credentials = client.create_service_account_key(ACCOUNT_ID).await.unwrap();
        assert_eq!(credentials.api_key, "v2_sa");
        client.revoke_service_account_keys(ACCOUNT_ID).await.unwrap();
    }
}
