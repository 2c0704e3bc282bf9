use reqwest::Method;

use super::{decode, encode};
use crate::client::BitDotIo;
use crate::db::Connector;
use crate::error::ClientResult;
use crate::models::{Query, QueryResult};

impl<C: Connector> BitDotIo<C> {
    /// Runs a SQL statement over HTTP, without a pooled connection
    pub async fn query(&self, db_name: &str, query_string: &str) -> ClientResult<QueryResult> {
        let query = Query {
            database_name: db_name.to_string(),
            query_string: query_string.to_string(),
        };
        let body = self
            .api_client
            .call(Method::POST, "query/", encode(&query)?)
            .await?;
        decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiClient;
    use crate::api::test_support::client_with;

    #[tokio::test]
    async fn test_query_round_trip() {
        let mut mock = MockApiClient::new();
        mock.expect_call()
            .withf(|method, path, body| {
                let sent: serde_json::Value =
                    serde_json::from_slice(body.as_deref().unwrap_or_default()).unwrap();
                *method == Method::POST
                    && path == "query/"
                    && sent["database_name"] == "alice/rep-tracker"
                    && sent["query_string"] == "select 'Hello, world!'"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(br#"{
                    "query_string": "select 'Hello, world!'",
                    "metadata": {"?column?": "text"},
                    "data": [["Hello, world!"]]
                }"#
                .to_vec())
            });

        let result = client_with(mock)
            .query("alice/rep-tracker", "select 'Hello, world!'")
            .await
            .unwrap();
        assert_eq!(result.data, vec![vec![serde_json::json!("Hello, world!")]]);
        assert_eq!(result.metadata["?column?"], "text");
    }
}
