use reqwest::header::{ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use tracing::instrument;

use crate::config::{API_URL, API_VERSION, USER_AGENT};
use crate::error::{ClientError, ClientResult};
use crate::models::ImportFile;

/// Text fields and file parts of a multipart/form-data body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormParts {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, ImportFile)>,
}

impl FormParts {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Transport for authenticated developer API calls
///
/// Both methods return the raw response body; responses with an error status
/// become `ClientError::Api`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn call(&self, method: Method, path: &str, body: Option<Vec<u8>>)
        -> ClientResult<Vec<u8>>;

    async fn call_multipart(
        &self,
        method: Method,
        path: &str,
        form: FormParts,
    ) -> ClientResult<Vec<u8>>;
}

/// reqwest-backed `ApiClient`
#[derive(Clone)]
pub struct DefaultApiClient {
    http_client: HttpClient,
    access_token: String,
    api_url: String,
}

impl DefaultApiClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_api_url(access_token, API_URL)
    }

    pub fn with_api_url(access_token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            access_token: access_token.into(),
            api_url: api_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            API_VERSION,
            path.trim_start_matches('/')
        )
    }

    /// Builds an authenticated request for `path`, relative to the API version
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, self.url(path))
            .bearer_auth(&self.access_token)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .header(ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Request failed");
            ClientError::Http(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_client_error() || status.is_server_error() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::error!(status = status.as_u16(), body = %body, "API returned an error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "API call completed");
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ApiClient for DefaultApiClient {
    #[instrument(skip(self, body))]
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<Vec<u8>> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }
        self.send(request).await
    }

    #[instrument(skip(self, form))]
    async fn call_multipart(
        &self,
        method: Method,
        path: &str,
        form: FormParts,
    ) -> ClientResult<Vec<u8>> {
        let mut multipart = Form::new();
        for (name, value) in form.fields {
            multipart = multipart.text(name, value);
        }
        for (name, file) in form.files {
            multipart = multipart.part(name, Part::bytes(file.contents).file_name(file.file_name));
        }

        self.send(self.request(method, path).multipart(multipart)).await
    }
}
